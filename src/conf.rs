//! Architecture constants for the CHIP-8 machine.

pub const RAM_SIZE: usize = 4096;
pub const START_ADDR: u16 = 0x200;
pub const MAX_ROM_SIZE: usize = RAM_SIZE - START_ADDR as usize;

pub const SCREEN_WIDTH: usize = 64;
pub const SCREEN_HEIGHT: usize = 32;

pub const REGISTER_COUNT: usize = 16;
pub const STACK_SIZE: usize = 16;
pub const KEYS_COUNT: usize = 16;

pub const FONT_GLYPH_SIZE: usize = 5;
pub const FONTSET_SIZE: usize = 16 * FONT_GLYPH_SIZE;

/// Instruction cycles executed per 60 Hz frame unless configured otherwise.
/// 11 cycles/frame is roughly the 660 instructions/second cadence most
/// original interpreters ran at.
pub const DEFAULT_CYCLES_PER_FRAME: u32 = 11;

/// Built-in hex font, glyphs 0-F, five bytes each, loaded at address 0x000.
pub const FONTSET: [u8; FONTSET_SIZE] = [
    0xF0, 0x90, 0x90, 0x90, 0xF0, // 0
    0x20, 0x60, 0x20, 0x20, 0x70, // 1
    0xF0, 0x10, 0xF0, 0x80, 0xF0, // 2
    0xF0, 0x10, 0xF0, 0x10, 0xF0, // 3
    0x90, 0x90, 0xF0, 0x10, 0x10, // 4
    0xF0, 0x80, 0xF0, 0x10, 0xF0, // 5
    0xF0, 0x80, 0xF0, 0x90, 0xF0, // 6
    0xF0, 0x10, 0x20, 0x40, 0x40, // 7
    0xF0, 0x90, 0xF0, 0x90, 0xF0, // 8
    0xF0, 0x90, 0xF0, 0x10, 0xF0, // 9
    0xF0, 0x90, 0xF0, 0x90, 0x90, // A
    0xE0, 0x90, 0xE0, 0x90, 0xE0, // B
    0xF0, 0x80, 0x80, 0x80, 0xF0, // C
    0xE0, 0x90, 0x90, 0x90, 0xE0, // D
    0xF0, 0x80, 0xF0, 0x80, 0xF0, // E
    0xF0, 0x80, 0xF0, 0x80, 0x80, // F
];
