//! A CHIP-8 virtual machine: 4 KiB of memory, sixteen 8-bit registers, a
//! fixed-depth call stack, two 60 Hz timers, a 64x32 monochrome framebuffer
//! and a 16-key pad.
//!
//! The library is the execution core only. Hosts drive it once per visual
//! frame: feed keypad state, call [`Chip8Vm::run_frame`] for a batch of
//! instruction cycles, [`Chip8Vm::tick_timers`] once, then read the
//! framebuffer and [`Chip8Vm::sound_active`]. Windowing, tone generation and
//! key mapping live in the binary adapter.

pub mod conf;
pub mod decode;
pub mod display;
pub mod error;
pub mod extensions;
pub mod vm;

pub use conf::{DEFAULT_CYCLES_PER_FRAME, SCREEN_HEIGHT, SCREEN_WIDTH};
pub use display::Framebuffer;
pub use error::VmError;
pub use extensions::{ExtensionMode, SpriteEdge};
pub use vm::{Chip8Vm, RunState, VmOptions};
