//! WDC 65C02 decode table.
//!
//! Documented NMOS opcodes keep their meaning. The NMOS undocumented slots
//! become new instructions or NOPs of fixed width and timing; nothing jams.

use crate::decode::{FixupPolicy, Instruction, Mode, Op};
use crate::nmos;

/// Decode a 65C02 opcode.
#[must_use]
pub const fn decode(opcode: u8) -> Instruction {
    let (op, mode) = match opcode {
        0x04 => (Op::Tsb, Mode::ZeroPage),
        0x0C => (Op::Tsb, Mode::Absolute),
        0x14 => (Op::Trb, Mode::ZeroPage),
        0x1C => (Op::Trb, Mode::Absolute),

        0x12 => (Op::Ora, Mode::ZeroPageIndirect),
        0x32 => (Op::And, Mode::ZeroPageIndirect),
        0x52 => (Op::Eor, Mode::ZeroPageIndirect),
        0x72 => (Op::Adc, Mode::ZeroPageIndirect),
        0x92 => (Op::Sta, Mode::ZeroPageIndirect),
        0xB2 => (Op::Lda, Mode::ZeroPageIndirect),
        0xD2 => (Op::Cmp, Mode::ZeroPageIndirect),
        0xF2 => (Op::Sbc, Mode::ZeroPageIndirect),

        0x1A => (Op::Inc, Mode::Accumulator),
        0x3A => (Op::Dec, Mode::Accumulator),

        0x34 => (Op::Bit, Mode::ZeroPageX),
        0x3C => (Op::Bit, Mode::AbsoluteX),
        0x89 => (Op::Bit, Mode::Immediate),

        0x5A => (Op::Phy, Mode::Implied),
        0x7A => (Op::Ply, Mode::Implied),
        0xDA => (Op::Phx, Mode::Implied),
        0xFA => (Op::Plx, Mode::Implied),

        0x64 => (Op::Stz, Mode::ZeroPage),
        0x74 => (Op::Stz, Mode::ZeroPageX),
        0x9C => (Op::Stz, Mode::Absolute),
        0x9E => (Op::Stz, Mode::AbsoluteX),

        0x7C => (Op::Jmp, Mode::AbsoluteIndirectX),
        0x80 => (Op::Bra, Mode::Relative),

        0xCB => (Op::Wai, Mode::Implied),
        0xDB => (Op::Stp, Mode::Implied),

        // RMBn/SMBn zp
        0x07 | 0x17 | 0x27 | 0x37 | 0x47 | 0x57 | 0x67 | 0x77 => {
            (Op::Rmb(opcode >> 4), Mode::ZeroPage)
        }
        0x87 | 0x97 | 0xA7 | 0xB7 | 0xC7 | 0xD7 | 0xE7 | 0xF7 => {
            (Op::Smb((opcode >> 4) & 0x07), Mode::ZeroPage)
        }

        // BBRn/BBSn zp,rel
        0x0F | 0x1F | 0x2F | 0x3F | 0x4F | 0x5F | 0x6F | 0x7F => {
            (Op::Bbr(opcode >> 4), Mode::ZeroPageRelative)
        }
        0x8F | 0x9F | 0xAF | 0xBF | 0xCF | 0xDF | 0xEF | 0xFF => {
            (Op::Bbs((opcode >> 4) & 0x07), Mode::ZeroPageRelative)
        }

        // Reserved NOPs
        0x02 | 0x22 | 0x42 | 0x62 | 0x82 | 0xC2 | 0xE2 => (Op::Nop, Mode::Immediate),
        0x44 => (Op::Nop, Mode::ZeroPage),
        0x54 | 0xD4 | 0xF4 => (Op::Nop, Mode::ZeroPageX),
        0xDC | 0xFC => (Op::Nop, Mode::Absolute),
        0x5C => (Op::SlowNop, Mode::Absolute),
        _ if opcode & 0x07 == 0x03 => (Op::Nop, Mode::Bare),

        // ASL/ROL/LSR/ROR abs,X only fix up on a page cross
        0x1E | 0x3E | 0x5E | 0x7E => {
            return nmos::decode(opcode).with_fixup(FixupPolicy::OnCross);
        }

        _ => return nmos::decode(opcode),
    };
    Instruction::new(op, mode)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn nothing_is_undocumented() {
        for opcode in 0..=255u8 {
            let instruction = decode(opcode);
            assert!(
                instruction.op.is_documented(),
                "${opcode:02X} decodes to {:?}",
                instruction.op
            );
        }
    }

    #[test]
    fn bit_numbers_come_from_the_high_nibble() {
        assert_eq!(decode(0x37).op, Op::Rmb(3));
        assert_eq!(decode(0xF7).op, Op::Smb(7));
        assert_eq!(decode(0x0F).op, Op::Bbr(0));
        assert_eq!(decode(0xAF).op, Op::Bbs(2));
    }

    #[test]
    fn shifts_fix_up_only_on_cross() {
        assert_eq!(decode(0x1E).fixup, FixupPolicy::OnCross);
        assert_eq!(decode(0xFE).fixup, FixupPolicy::Always);
    }
}
