//! CPU state and the fetch-decode-execute engine.

use crate::conf::{
    FONTSET, FONTSET_SIZE, FONT_GLYPH_SIZE, KEYS_COUNT, MAX_ROM_SIZE, RAM_SIZE, REGISTER_COUNT,
    STACK_SIZE, START_ADDR,
};
use crate::decode::{decode, Instruction};
use crate::display::Framebuffer;
use crate::error::{Result, VmError};
use crate::extensions::{ExtensionMode, SpriteEdge};
use rand::random;
use std::path::Path;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RunState {
    Running,
    Paused,
}

/// Configuration the VM accepts at construction time and keeps across resets.
#[derive(Debug, Clone, Copy)]
pub struct VmOptions {
    pub mode: ExtensionMode,
    pub edge: SpriteEdge,
    pub cycles_per_frame: u32,
}

impl Default for VmOptions {
    fn default() -> Self {
        VmOptions {
            mode: ExtensionMode::default(),
            edge: SpriteEdge::default(),
            cycles_per_frame: crate::conf::DEFAULT_CYCLES_PER_FRAME,
        }
    }
}

pub struct CpuState {
    pc: u16,
    memory: [u8; RAM_SIZE],
    registers: [u8; REGISTER_COUNT],
    i_register: u16,
    sp: usize,
    stack: [u16; STACK_SIZE],
    keys: [bool; KEYS_COUNT],
    delay_timer: u8,
    sound_timer: u8,
    framebuffer: Framebuffer,
    /// Register index a blocked FX0A will deposit the key into, with the
    /// keys already held when the wait began. A key only satisfies the wait
    /// on a press edge, never by being held across it.
    awaiting_key: Option<usize>,
    keys_at_wait: [bool; KEYS_COUNT],
    state: RunState,
}

impl CpuState {
    fn new() -> Self {
        let mut cpu = CpuState {
            pc: START_ADDR,
            memory: [0; RAM_SIZE],
            registers: [0; REGISTER_COUNT],
            i_register: 0,
            sp: 0,
            stack: [0; STACK_SIZE],
            keys: [false; KEYS_COUNT],
            delay_timer: 0,
            sound_timer: 0,
            framebuffer: Framebuffer::new(),
            awaiting_key: None,
            keys_at_wait: [false; KEYS_COUNT],
            state: RunState::Running,
        };
        cpu.reset();
        cpu
    }

    fn reset(&mut self) {
        self.pc = START_ADDR;
        self.memory.fill(0);
        self.registers.fill(0);
        self.i_register = 0;
        self.sp = 0;
        self.stack.fill(0);
        self.keys.fill(false);
        self.delay_timer = 0;
        self.sound_timer = 0;
        self.framebuffer.clear();
        self.awaiting_key = None;
        self.keys_at_wait.fill(false);
        self.state = RunState::Running;
        self.memory[..FONTSET_SIZE].copy_from_slice(&FONTSET);
    }
}

pub struct Chip8Vm {
    cpu: CpuState,
    mode: ExtensionMode,
    edge: SpriteEdge,
    cycles_per_frame: u32,
    rom: Vec<u8>,
    render_needed: bool,
}

impl Default for Chip8Vm {
    fn default() -> Self {
        Self::new(VmOptions::default())
    }
}

impl Chip8Vm {
    pub fn new(options: VmOptions) -> Self {
        Chip8Vm {
            cpu: CpuState::new(),
            mode: options.mode,
            edge: options.edge,
            cycles_per_frame: options.cycles_per_frame,
            rom: Vec::new(),
            render_needed: false,
        }
    }

    /// Places the font table at 0x000 and the program at 0x200, then points
    /// the machine at the program start. The image is retained so `reset`
    /// can replay it.
    pub fn load(&mut self, rom: &[u8]) -> Result<()> {
        if rom.len() > MAX_ROM_SIZE {
            return Err(VmError::RomTooLarge {
                size: rom.len(),
                max: MAX_ROM_SIZE,
            });
        }
        self.rom = rom.to_vec();
        self.reset();
        Ok(())
    }

    pub fn load_path(&mut self, path: impl AsRef<Path>) -> Result<()> {
        let bytes = std::fs::read(path).map_err(VmError::RomUnreadable)?;
        self.load(&bytes)
    }

    /// Reinitializes all mutable state and replays the retained ROM image.
    /// Extension mode, edge policy and the cycle rate are preserved.
    pub fn reset(&mut self) {
        self.cpu.reset();
        let start = START_ADDR as usize;
        self.cpu.memory[start..start + self.rom.len()].copy_from_slice(&self.rom);
        self.render_needed = true;
    }

    /// Runs one batch of instruction cycles, then yields to the host for
    /// display/audio/input servicing. Does nothing while paused.
    pub fn run_frame(&mut self) {
        if self.cpu.state == RunState::Paused {
            return;
        }
        for _ in 0..self.cycles_per_frame {
            self.tick();
        }
    }

    /// One fetch-decode-execute cycle.
    pub fn tick(&mut self) {
        let ins = decode(self.fetch());
        log::trace!("{:#06X}: {}", self.cpu.pc.wrapping_sub(2), ins.mnemonic());
        self.execute(ins);
    }

    /// Decrements the delay and sound timers toward zero. The host calls
    /// this at 60 Hz regardless of the instruction rate.
    pub fn tick_timers(&mut self) {
        if self.cpu.delay_timer > 0 {
            self.cpu.delay_timer -= 1;
        }
        if self.cpu.sound_timer > 0 {
            self.cpu.sound_timer -= 1;
        }
    }

    /// Nonzero sound timer is the sole signal for the tone generator.
    pub fn sound_active(&self) -> bool {
        self.cpu.sound_timer > 0
    }

    pub fn keypress(&mut self, idx: usize, pressed: bool) -> Result<()> {
        if idx >= KEYS_COUNT {
            return Err(VmError::InvalidKey { index: idx });
        }
        self.cpu.keys[idx] = pressed;
        Ok(())
    }

    /// True when a draw or clear has happened since the last call.
    pub fn take_render_flag(&mut self) -> bool {
        std::mem::take(&mut self.render_needed)
    }

    pub fn framebuffer(&self) -> &Framebuffer {
        &self.cpu.framebuffer
    }

    pub fn state(&self) -> RunState {
        self.cpu.state
    }

    pub fn toggle_pause(&mut self) {
        self.cpu.state = match self.cpu.state {
            RunState::Running => RunState::Paused,
            RunState::Paused => RunState::Running,
        };
    }

    pub fn pc(&self) -> u16 {
        self.cpu.pc
    }

    pub fn index(&self) -> u16 {
        self.cpu.i_register
    }

    pub fn register(&self, x: usize) -> u8 {
        self.cpu.registers[x]
    }

    pub fn delay_timer(&self) -> u8 {
        self.cpu.delay_timer
    }

    pub fn sound_timer(&self) -> u8 {
        self.cpu.sound_timer
    }

    /// Big-endian word at PC. PC advances before the body executes so that
    /// jumps and calls are not clobbered afterwards.
    fn fetch(&mut self) -> u16 {
        let pc = self.cpu.pc as usize;
        let hi = self.cpu.memory[pc % RAM_SIZE] as u16;
        let lo = self.cpu.memory[(pc + 1) % RAM_SIZE] as u16;
        self.cpu.pc = self.cpu.pc.wrapping_add(2);
        (hi << 8) | lo
    }

    fn execute(&mut self, ins: Instruction) {
        let Instruction { op, nnn, nn, n, x, y } = ins;

        match op >> 12 {
            0x0 => match nn {
                // CLS
                0xE0 => {
                    self.cpu.framebuffer.clear();
                    self.render_needed = true;
                }
                // RET
                0xEE => {
                    if let Some(addr) = self.pop_from_stack() {
                        self.cpu.pc = addr;
                    }
                }
                // 0NNN machine-code calls don't exist on this machine
                _ => self.unknown(ins),
            },

            // JP NNN
            0x1 => self.cpu.pc = nnn,

            // CALL NNN
            0x2 => {
                if self.push_to_stack(self.cpu.pc) {
                    self.cpu.pc = nnn;
                }
            }

            // SE VX, NN
            0x3 => {
                if self.cpu.registers[x] == nn {
                    self.cpu.pc += 2;
                }
            }

            // SNE VX, NN
            0x4 => {
                if self.cpu.registers[x] != nn {
                    self.cpu.pc += 2;
                }
            }

            // SE VX, VY
            0x5 if n == 0 => {
                if self.cpu.registers[x] == self.cpu.registers[y] {
                    self.cpu.pc += 2;
                }
            }

            // LD VX, NN
            0x6 => self.cpu.registers[x] = nn,

            // ADD VX, NN: wraps, VF untouched
            0x7 => self.cpu.registers[x] = self.cpu.registers[x].wrapping_add(nn),

            0x8 => self.execute_alu(ins),

            // SNE VX, VY
            0x9 if n == 0 => {
                if self.cpu.registers[x] != self.cpu.registers[y] {
                    self.cpu.pc += 2;
                }
            }

            // LD I, NNN
            0xA => self.cpu.i_register = nnn,

            // JP V0/VX, NNN: base register is mode-dependent
            0xB => {
                let base = if self.mode.offset_jump_uses_vx() {
                    self.cpu.registers[x]
                } else {
                    self.cpu.registers[0]
                };
                self.cpu.pc = nnn.wrapping_add(base as u16);
            }

            // RND VX, NN
            0xC => {
                let rng: u8 = random();
                self.cpu.registers[x] = rng & nn;
            }

            // DRW VX, VY, N
            0xD => {
                let start = (self.cpu.i_register as usize).min(RAM_SIZE);
                let end = (start + n as usize).min(RAM_SIZE);
                let rows = &self.cpu.memory[start..end];
                let collided = self.cpu.framebuffer.draw_sprite(
                    self.cpu.registers[x] as usize,
                    self.cpu.registers[y] as usize,
                    rows,
                    self.edge,
                );
                self.cpu.registers[0xF] = collided as u8;
                self.render_needed = true;
            }

            0xE => match nn {
                // SKP VX
                0x9E => {
                    if self.key_down(self.cpu.registers[x]) {
                        self.cpu.pc += 2;
                    }
                }
                // SKNP VX
                0xA1 => {
                    if !self.key_down(self.cpu.registers[x]) {
                        self.cpu.pc += 2;
                    }
                }
                _ => self.unknown(ins),
            },

            0xF => match nn {
                // LD VX, DT
                0x07 => self.cpu.registers[x] = self.cpu.delay_timer,

                // LD VX, K: re-entrant wait, see `wait_for_key`
                0x0A => self.wait_for_key(x),

                // LD DT, VX
                0x15 => self.cpu.delay_timer = self.cpu.registers[x],

                // LD ST, VX
                0x18 => self.cpu.sound_timer = self.cpu.registers[x],

                // ADD I, VX: no flag change
                0x1E => {
                    self.cpu.i_register = self
                        .cpu
                        .i_register
                        .wrapping_add(self.cpu.registers[x] as u16)
                }

                // LD F, VX: glyphs are 5 bytes each starting at 0x000
                0x29 => {
                    self.cpu.i_register = (self.cpu.registers[x] as u16) * FONT_GLYPH_SIZE as u16
                }

                // LD B, VX
                0x33 => {
                    let vx = self.cpu.registers[x];
                    let i = self.cpu.i_register as usize;
                    if i + 2 >= RAM_SIZE {
                        log::warn!("BCD store at I={i:#05X} out of range, skipped");
                    } else {
                        self.cpu.memory[i] = vx / 100;
                        self.cpu.memory[i + 1] = (vx / 10) % 10;
                        self.cpu.memory[i + 2] = vx % 10;
                    }
                }

                // LD [I], VX
                0x55 => {
                    let i = self.cpu.i_register as usize;
                    if i + x >= RAM_SIZE {
                        log::warn!("register dump at I={i:#05X} out of range, skipped");
                    } else {
                        for idx in 0..=x {
                            self.cpu.memory[i + idx] = self.cpu.registers[idx];
                        }
                        if self.mode.increments_index_on_transfer() {
                            self.cpu.i_register = self.cpu.i_register.wrapping_add(x as u16 + 1);
                        }
                    }
                }

                // LD VX, [I]
                0x65 => {
                    let i = self.cpu.i_register as usize;
                    if i + x >= RAM_SIZE {
                        log::warn!("register load at I={i:#05X} out of range, skipped");
                    } else {
                        for idx in 0..=x {
                            self.cpu.registers[idx] = self.cpu.memory[i + idx];
                        }
                        if self.mode.increments_index_on_transfer() {
                            self.cpu.i_register = self.cpu.i_register.wrapping_add(x as u16 + 1);
                        }
                    }
                }

                _ => self.unknown(ins),
            },

            _ => self.unknown(ins),
        }
    }

    /// The 8XYN family. Results land in Vx first, VF after, so VF keeps the
    /// flag value when X is F itself.
    fn execute_alu(&mut self, ins: Instruction) {
        let Instruction { n, x, y, .. } = ins;
        match n {
            0x0 => self.cpu.registers[x] = self.cpu.registers[y],
            0x1 => {
                self.cpu.registers[x] |= self.cpu.registers[y];
                if self.mode.clears_flag_on_logic() {
                    self.cpu.registers[0xF] = 0;
                }
            }
            0x2 => {
                self.cpu.registers[x] &= self.cpu.registers[y];
                if self.mode.clears_flag_on_logic() {
                    self.cpu.registers[0xF] = 0;
                }
            }
            0x3 => {
                self.cpu.registers[x] ^= self.cpu.registers[y];
                if self.mode.clears_flag_on_logic() {
                    self.cpu.registers[0xF] = 0;
                }
            }
            0x4 => {
                let (sum, carry) = self.cpu.registers[x].overflowing_add(self.cpu.registers[y]);
                self.cpu.registers[x] = sum;
                self.cpu.registers[0xF] = carry as u8;
            }
            0x5 => {
                let (diff, borrow) = self.cpu.registers[x].overflowing_sub(self.cpu.registers[y]);
                self.cpu.registers[x] = diff;
                self.cpu.registers[0xF] = !borrow as u8;
            }
            0x6 => {
                let src = if self.mode.shifts_in_place() { x } else { y };
                let val = self.cpu.registers[src];
                self.cpu.registers[x] = val >> 1;
                self.cpu.registers[0xF] = val & 1;
            }
            0x7 => {
                let (diff, borrow) = self.cpu.registers[y].overflowing_sub(self.cpu.registers[x]);
                self.cpu.registers[x] = diff;
                self.cpu.registers[0xF] = !borrow as u8;
            }
            0xE => {
                let src = if self.mode.shifts_in_place() { x } else { y };
                let val = self.cpu.registers[src];
                self.cpu.registers[x] = val << 1;
                self.cpu.registers[0xF] = val >> 7;
            }
            _ => self.unknown(ins),
        }
    }

    /// FX0A. Rewinds PC so the same instruction re-executes each cycle until
    /// a key press edge arrives, then deposits the key index and moves on. A
    /// key held since before the wait began has to be released and pressed
    /// again to count.
    fn wait_for_key(&mut self, x: usize) {
        if self.cpu.awaiting_key.is_none() {
            self.cpu.awaiting_key = Some(x);
            self.cpu.keys_at_wait = self.cpu.keys;
        }
        for i in 0..KEYS_COUNT {
            if !self.cpu.keys[i] {
                self.cpu.keys_at_wait[i] = false;
            }
        }

        let edge = (0..KEYS_COUNT).find(|&i| self.cpu.keys[i] && !self.cpu.keys_at_wait[i]);
        match (edge, self.cpu.awaiting_key) {
            (Some(key), Some(target)) => {
                self.cpu.registers[target] = key as u8;
                self.cpu.awaiting_key = None;
            }
            _ => self.cpu.pc = self.cpu.pc.wrapping_sub(2),
        }
    }

    fn key_down(&self, vx: u8) -> bool {
        self.cpu.keys.get(vx as usize).copied().unwrap_or(false)
    }

    fn unknown(&mut self, ins: Instruction) {
        // Many ROMs probe for extensions and rely on unknown words falling
        // through as no-ops. PC has already advanced.
        log::debug!("unrecognized opcode {:#06X}, skipped", ins.op);
    }

    /// Call with a full stack drops the call whole: no push, no jump.
    fn push_to_stack(&mut self, val: u16) -> bool {
        if self.cpu.sp >= STACK_SIZE {
            log::warn!("stack full, call from {:#06X} dropped", val.wrapping_sub(2));
            return false;
        }
        self.cpu.stack[self.cpu.sp] = val;
        self.cpu.sp += 1;
        true
    }

    /// Return with an empty stack falls through to the next instruction.
    fn pop_from_stack(&mut self) -> Option<u16> {
        if self.cpu.sp == 0 {
            log::warn!("stack empty, return at {:#06X} ignored", self.cpu.pc.wrapping_sub(2));
            return None;
        }
        self.cpu.sp -= 1;
        Some(self.cpu.stack[self.cpu.sp])
    }
}
