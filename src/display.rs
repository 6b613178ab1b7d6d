//! The monochrome framebuffer and the XOR sprite/collision engine.
//!
//! Only the draw and clear-screen instructions mutate the pixel grid;
//! renderers get a read-only view.

use crate::conf::{SCREEN_HEIGHT, SCREEN_WIDTH};
use crate::extensions::SpriteEdge;

pub struct Framebuffer {
    pixels: [bool; SCREEN_WIDTH * SCREEN_HEIGHT],
}

impl Default for Framebuffer {
    fn default() -> Self {
        Self::new()
    }
}

impl Framebuffer {
    pub fn new() -> Self {
        Framebuffer {
            pixels: [false; SCREEN_WIDTH * SCREEN_HEIGHT],
        }
    }

    pub fn clear(&mut self) {
        self.pixels.fill(false);
    }

    pub fn get(&self, x: usize, y: usize) -> bool {
        self.pixels[x + y * SCREEN_WIDTH]
    }

    /// Row-major pixel grid, `SCREEN_WIDTH * SCREEN_HEIGHT` entries.
    pub fn pixels(&self) -> &[bool] {
        &self.pixels
    }

    /// XOR-composites a sprite whose rows are one byte each, most significant
    /// bit leftmost. The origin wraps around the display; pixels past the
    /// right/bottom edge clip or wrap per `edge`. Returns true when any lit
    /// pixel was turned off.
    pub fn draw_sprite(&mut self, x: usize, y: usize, rows: &[u8], edge: SpriteEdge) -> bool {
        let x = x % SCREEN_WIDTH;
        let y = y % SCREEN_HEIGHT;
        let mut collided = false;

        for (row, &bits) in rows.iter().enumerate() {
            for col in 0..8 {
                if bits & (0b1000_0000 >> col) == 0 {
                    continue;
                }
                let (px, py) = match edge {
                    SpriteEdge::Clip => {
                        if x + col >= SCREEN_WIDTH || y + row >= SCREEN_HEIGHT {
                            continue;
                        }
                        (x + col, y + row)
                    }
                    SpriteEdge::Wrap => ((x + col) % SCREEN_WIDTH, (y + row) % SCREEN_HEIGHT),
                };
                let idx = px + py * SCREEN_WIDTH;
                if self.pixels[idx] {
                    collided = true;
                }
                self.pixels[idx] ^= true;
            }
        }

        collided
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn draws_msb_first() {
        let mut fb = Framebuffer::new();
        let hit = fb.draw_sprite(0, 0, &[0b1010_0000], SpriteEdge::Clip);
        assert!(!hit);
        assert!(fb.get(0, 0));
        assert!(!fb.get(1, 0));
        assert!(fb.get(2, 0));
        assert!(!fb.get(3, 0));
    }

    #[test]
    fn reports_collision_on_erase() {
        let mut fb = Framebuffer::new();
        assert!(!fb.draw_sprite(4, 4, &[0xFF], SpriteEdge::Clip));
        // Overlapping redraw erases pixels and reports it.
        assert!(fb.draw_sprite(4, 4, &[0x0F], SpriteEdge::Clip));
        assert!(fb.get(4, 4));
        assert!(!fb.get(8, 4));
    }

    #[test]
    fn double_draw_restores_the_region() {
        let sprite = [0xF0, 0x90, 0x90, 0x90, 0xF0];
        let mut fb = Framebuffer::new();
        fb.draw_sprite(10, 10, &sprite, SpriteEdge::Clip);
        let hit = fb.draw_sprite(10, 10, &sprite, SpriteEdge::Clip);
        assert!(hit);
        assert!(fb.pixels().iter().all(|&p| !p));
    }

    #[test]
    fn origin_wraps_before_drawing() {
        let mut fb = Framebuffer::new();
        fb.draw_sprite(SCREEN_WIDTH + 1, SCREEN_HEIGHT + 2, &[0b1000_0000], SpriteEdge::Clip);
        assert!(fb.get(1, 2));
    }

    #[test]
    fn clip_stops_at_the_edge() {
        let mut fb = Framebuffer::new();
        fb.draw_sprite(SCREEN_WIDTH - 2, SCREEN_HEIGHT - 1, &[0xFF, 0xFF], SpriteEdge::Clip);
        assert!(fb.get(SCREEN_WIDTH - 2, SCREEN_HEIGHT - 1));
        assert!(fb.get(SCREEN_WIDTH - 1, SCREEN_HEIGHT - 1));
        // Nothing wrapped to column 0 or row 0.
        assert!(fb.pixels()[..SCREEN_WIDTH].iter().all(|&p| !p));
        assert!(!fb.get(0, SCREEN_HEIGHT - 1));
    }

    #[test]
    fn wrap_continues_on_the_far_side() {
        let mut fb = Framebuffer::new();
        fb.draw_sprite(SCREEN_WIDTH - 2, SCREEN_HEIGHT - 1, &[0xFF, 0xFF], SpriteEdge::Wrap);
        assert!(fb.get(0, SCREEN_HEIGHT - 1));
        assert!(fb.get(5, SCREEN_HEIGHT - 1));
        assert!(fb.get(0, 0));
        assert!(fb.get(SCREEN_WIDTH - 1, 0));
    }
}
