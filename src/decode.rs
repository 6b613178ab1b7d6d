//! Splits a 16-bit opcode word into its constituent fields.
//!
//! Decoding is total: every word is syntactically valid, whether or not the
//! instruction set implements it. The `Instruction` view is recomputed each
//! cycle and never stored in CPU state.

/// One decoded opcode word. All fields are plain numeric views of `op`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Instruction {
    /// The full 16-bit word.
    pub op: u16,
    /// Low 12 bits, the address/constant field.
    pub nnn: u16,
    /// Low 8 bits.
    pub nn: u8,
    /// Low 4 bits.
    pub n: u8,
    /// Bits 8-11, the first register index.
    pub x: usize,
    /// Bits 4-7, the second register index.
    pub y: usize,
}

pub fn decode(op: u16) -> Instruction {
    Instruction {
        op,
        nnn: op & 0x0FFF,
        nn: (op & 0x00FF) as u8,
        n: (op & 0x000F) as u8,
        x: ((op & 0x0F00) >> 8) as usize,
        y: ((op & 0x00F0) >> 4) as usize,
    }
}

impl Instruction {
    /// Human-readable form of the instruction, derived from the same decoded
    /// fields the dispatcher consumes. Used for trace logging.
    pub fn mnemonic(&self) -> String {
        let Instruction { op, nnn, nn, n, x, y } = *self;
        match op >> 12 {
            0x0 => match nn {
                0xE0 => "CLS".into(),
                0xEE => "RET".into(),
                _ => format!("SYS {nnn:#05X}"),
            },
            0x1 => format!("JP {nnn:#05X}"),
            0x2 => format!("CALL {nnn:#05X}"),
            0x3 => format!("SE V{x:X}, {nn:#04X}"),
            0x4 => format!("SNE V{x:X}, {nn:#04X}"),
            0x5 if n == 0 => format!("SE V{x:X}, V{y:X}"),
            0x6 => format!("LD V{x:X}, {nn:#04X}"),
            0x7 => format!("ADD V{x:X}, {nn:#04X}"),
            0x8 => match n {
                0x0 => format!("LD V{x:X}, V{y:X}"),
                0x1 => format!("OR V{x:X}, V{y:X}"),
                0x2 => format!("AND V{x:X}, V{y:X}"),
                0x3 => format!("XOR V{x:X}, V{y:X}"),
                0x4 => format!("ADD V{x:X}, V{y:X}"),
                0x5 => format!("SUB V{x:X}, V{y:X}"),
                0x6 => format!("SHR V{x:X}, V{y:X}"),
                0x7 => format!("SUBN V{x:X}, V{y:X}"),
                0xE => format!("SHL V{x:X}, V{y:X}"),
                _ => format!("DAT {op:#06X}"),
            },
            0x9 if n == 0 => format!("SNE V{x:X}, V{y:X}"),
            0xA => format!("LD I, {nnn:#05X}"),
            0xB => format!("JP V0, {nnn:#05X}"),
            0xC => format!("RND V{x:X}, {nn:#04X}"),
            0xD => format!("DRW V{x:X}, V{y:X}, {n}"),
            0xE => match nn {
                0x9E => format!("SKP V{x:X}"),
                0xA1 => format!("SKNP V{x:X}"),
                _ => format!("DAT {op:#06X}"),
            },
            0xF => match nn {
                0x07 => format!("LD V{x:X}, DT"),
                0x0A => format!("LD V{x:X}, K"),
                0x15 => format!("LD DT, V{x:X}"),
                0x18 => format!("LD ST, V{x:X}"),
                0x1E => format!("ADD I, V{x:X}"),
                0x29 => format!("LD F, V{x:X}"),
                0x33 => format!("LD B, V{x:X}"),
                0x55 => format!("LD [I], V{x:X}"),
                0x65 => format!("LD V{x:X}, [I]"),
                _ => format!("DAT {op:#06X}"),
            },
            _ => format!("DAT {op:#06X}"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn splits_every_field() {
        let ins = decode(0xD5A3);
        assert_eq!(ins.op, 0xD5A3);
        assert_eq!(ins.nnn, 0x5A3);
        assert_eq!(ins.nn, 0xA3);
        assert_eq!(ins.n, 0x3);
        assert_eq!(ins.x, 0x5);
        assert_eq!(ins.y, 0xA);
    }

    #[test]
    fn decode_is_total() {
        // High and low extremes both decode without complaint.
        assert_eq!(decode(0x0000).nnn, 0);
        assert_eq!(decode(0xFFFF).x, 0xF);
        assert_eq!(decode(0xFFFF).nn, 0xFF);
    }

    #[test]
    fn mnemonics_come_from_decoded_fields() {
        assert_eq!(decode(0x00E0).mnemonic(), "CLS");
        assert_eq!(decode(0x1234).mnemonic(), "JP 0x234");
        assert_eq!(decode(0x8AB4).mnemonic(), "ADD VA, VB");
        assert_eq!(decode(0xF533).mnemonic(), "LD B, V5");
    }
}
