use anyhow::{Context, Result};
use chip8_vm::{
    Chip8Vm, ExtensionMode, SpriteEdge, VmOptions, DEFAULT_CYCLES_PER_FRAME, SCREEN_HEIGHT,
    SCREEN_WIDTH,
};
use clap::Parser;
use raylib::prelude::*;
use std::path::PathBuf;

const BEEP_PITCH: u16 = 440;

/// Keypad layout: 1234/QWER/ASDF/ZXCV maps onto the 4x4 hex pad.
const KEYMAP: [(KeyboardKey, usize); 16] = [
    (KeyboardKey::KEY_ONE, 0x1),
    (KeyboardKey::KEY_TWO, 0x2),
    (KeyboardKey::KEY_THREE, 0x3),
    (KeyboardKey::KEY_FOUR, 0xC),
    (KeyboardKey::KEY_Q, 0x4),
    (KeyboardKey::KEY_W, 0x5),
    (KeyboardKey::KEY_E, 0x6),
    (KeyboardKey::KEY_R, 0xD),
    (KeyboardKey::KEY_A, 0x7),
    (KeyboardKey::KEY_S, 0x8),
    (KeyboardKey::KEY_D, 0x9),
    (KeyboardKey::KEY_F, 0xE),
    (KeyboardKey::KEY_Z, 0xA),
    (KeyboardKey::KEY_X, 0x0),
    (KeyboardKey::KEY_C, 0xB),
    (KeyboardKey::KEY_V, 0xF),
];

#[derive(Parser)]
#[command(about = "CHIP-8 virtual machine")]
struct Args {
    /// Path to the ROM image
    rom: PathBuf,

    /// Behavioral quirk set
    #[arg(long, value_enum, default_value = "legacy")]
    mode: ExtensionMode,

    /// Sprite behavior at the display edge
    #[arg(long, value_enum, default_value = "clip")]
    edge: SpriteEdge,

    /// Instruction cycles per 60 Hz frame
    #[arg(long, default_value_t = DEFAULT_CYCLES_PER_FRAME)]
    cycles: u32,

    /// Window scale factor
    #[arg(long, default_value_t = 15)]
    scale: i32,

    /// Foreground color, RRGGBB hex
    #[arg(long, default_value = "FFFFFF", value_parser = parse_color)]
    fg: Color,

    /// Background color, RRGGBB hex
    #[arg(long, default_value = "000000", value_parser = parse_color)]
    bg: Color,
}

fn parse_color(s: &str) -> Result<Color, String> {
    let rgb = u32::from_str_radix(s.trim_start_matches('#'), 16)
        .map_err(|_| format!("`{s}` is not an RRGGBB hex color"))?;
    if rgb > 0xFF_FF_FF {
        return Err(format!("`{s}` is not an RRGGBB hex color"));
    }
    Ok(Color::new(
        (rgb >> 16) as u8,
        (rgb >> 8) as u8,
        rgb as u8,
        255,
    ))
}

fn main() -> Result<()> {
    env_logger::init();
    let args = Args::parse();

    let mut vm = Chip8Vm::new(VmOptions {
        mode: args.mode,
        edge: args.edge,
        cycles_per_frame: args.cycles,
    });
    vm.load_path(&args.rom)
        .with_context(|| format!("loading {}", args.rom.display()))?;

    let (mut rl, thread) = raylib::init()
        .size(SCREEN_WIDTH as i32 * args.scale, SCREEN_HEIGHT as i32 * args.scale)
        .title("CHIP-8")
        .build();
    rl.set_target_fps(60);

    let mut beeping = false;
    while !rl.window_should_close() {
        for (key, idx) in KEYMAP {
            vm.keypress(idx, rl.is_key_down(key))?;
        }
        if rl.is_key_pressed(KeyboardKey::KEY_SPACE) {
            vm.toggle_pause();
        }
        if rl.is_key_pressed(KeyboardKey::KEY_BACKSPACE) {
            vm.reset();
        }

        vm.run_frame();
        vm.tick_timers();

        if vm.sound_active() != beeping {
            beeping = vm.sound_active();
            let pitch = if beeping { BEEP_PITCH } else { 0 };
            if let Err(e) = beep::beep(pitch) {
                log::debug!("tone generator unavailable: {e}");
            }
        }

        if vm.take_render_flag() {
            log::trace!("framebuffer changed this frame");
        }

        let mut d = rl.begin_drawing(&thread);
        d.clear_background(args.bg);
        let fb = vm.framebuffer();
        for y in 0..SCREEN_HEIGHT {
            for x in 0..SCREEN_WIDTH {
                if fb.get(x, y) {
                    d.draw_rectangle(
                        x as i32 * args.scale,
                        y as i32 * args.scale,
                        args.scale,
                        args.scale,
                        args.fg,
                    );
                }
            }
        }
    }

    beep::beep(0).ok();
    Ok(())
}
