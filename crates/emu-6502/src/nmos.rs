//! NMOS 6502 decode table, including every undocumented opcode.

use crate::decode::{Condition, Instruction, Mode, Op};

/// Decode an NMOS opcode.
#[must_use]
pub const fn decode(opcode: u8) -> Instruction {
    use Mode::{
        Absolute as Abs, AbsoluteX as Abx, AbsoluteY as Aby, Accumulator as Acc, Immediate as Imm,
        Implied as Imp, Indirect as Ind, IndirectX as Izx, IndirectY as Izy, Relative as Rel,
        ZeroPage as Zp, ZeroPageX as Zpx, ZeroPageY as Zpy,
    };

    let (op, mode) = match opcode {
        0x00 => (Op::Brk, Imp),
        0x01 => (Op::Ora, Izx),
        0x03 => (Op::Slo, Izx),
        0x04 => (Op::Nop, Zp),
        0x05 => (Op::Ora, Zp),
        0x06 => (Op::Asl, Zp),
        0x07 => (Op::Slo, Zp),
        0x08 => (Op::Php, Imp),
        0x09 => (Op::Ora, Imm),
        0x0A => (Op::Asl, Acc),
        0x0B => (Op::Anc, Imm),
        0x0C => (Op::Nop, Abs),
        0x0D => (Op::Ora, Abs),
        0x0E => (Op::Asl, Abs),
        0x0F => (Op::Slo, Abs),

        0x10 => (Op::Branch(Condition::Plus), Rel),
        0x11 => (Op::Ora, Izy),
        0x13 => (Op::Slo, Izy),
        0x14 => (Op::Nop, Zpx),
        0x15 => (Op::Ora, Zpx),
        0x16 => (Op::Asl, Zpx),
        0x17 => (Op::Slo, Zpx),
        0x18 => (Op::Clc, Imp),
        0x19 => (Op::Ora, Aby),
        0x1A => (Op::Nop, Imp),
        0x1B => (Op::Slo, Aby),
        0x1C => (Op::Nop, Abx),
        0x1D => (Op::Ora, Abx),
        0x1E => (Op::Asl, Abx),
        0x1F => (Op::Slo, Abx),

        0x20 => (Op::Jsr, Abs),
        0x21 => (Op::And, Izx),
        0x23 => (Op::Rla, Izx),
        0x24 => (Op::Bit, Zp),
        0x25 => (Op::And, Zp),
        0x26 => (Op::Rol, Zp),
        0x27 => (Op::Rla, Zp),
        0x28 => (Op::Plp, Imp),
        0x29 => (Op::And, Imm),
        0x2A => (Op::Rol, Acc),
        0x2B => (Op::Anc, Imm),
        0x2C => (Op::Bit, Abs),
        0x2D => (Op::And, Abs),
        0x2E => (Op::Rol, Abs),
        0x2F => (Op::Rla, Abs),

        0x30 => (Op::Branch(Condition::Minus), Rel),
        0x31 => (Op::And, Izy),
        0x33 => (Op::Rla, Izy),
        0x34 => (Op::Nop, Zpx),
        0x35 => (Op::And, Zpx),
        0x36 => (Op::Rol, Zpx),
        0x37 => (Op::Rla, Zpx),
        0x38 => (Op::Sec, Imp),
        0x39 => (Op::And, Aby),
        0x3A => (Op::Nop, Imp),
        0x3B => (Op::Rla, Aby),
        0x3C => (Op::Nop, Abx),
        0x3D => (Op::And, Abx),
        0x3E => (Op::Rol, Abx),
        0x3F => (Op::Rla, Abx),

        0x40 => (Op::Rti, Imp),
        0x41 => (Op::Eor, Izx),
        0x43 => (Op::Sre, Izx),
        0x44 => (Op::Nop, Zp),
        0x45 => (Op::Eor, Zp),
        0x46 => (Op::Lsr, Zp),
        0x47 => (Op::Sre, Zp),
        0x48 => (Op::Pha, Imp),
        0x49 => (Op::Eor, Imm),
        0x4A => (Op::Lsr, Acc),
        0x4B => (Op::Alr, Imm),
        0x4C => (Op::Jmp, Abs),
        0x4D => (Op::Eor, Abs),
        0x4E => (Op::Lsr, Abs),
        0x4F => (Op::Sre, Abs),

        0x50 => (Op::Branch(Condition::OverflowClear), Rel),
        0x51 => (Op::Eor, Izy),
        0x53 => (Op::Sre, Izy),
        0x54 => (Op::Nop, Zpx),
        0x55 => (Op::Eor, Zpx),
        0x56 => (Op::Lsr, Zpx),
        0x57 => (Op::Sre, Zpx),
        0x58 => (Op::Cli, Imp),
        0x59 => (Op::Eor, Aby),
        0x5A => (Op::Nop, Imp),
        0x5B => (Op::Sre, Aby),
        0x5C => (Op::Nop, Abx),
        0x5D => (Op::Eor, Abx),
        0x5E => (Op::Lsr, Abx),
        0x5F => (Op::Sre, Abx),

        0x60 => (Op::Rts, Imp),
        0x61 => (Op::Adc, Izx),
        0x63 => (Op::Rra, Izx),
        0x64 => (Op::Nop, Zp),
        0x65 => (Op::Adc, Zp),
        0x66 => (Op::Ror, Zp),
        0x67 => (Op::Rra, Zp),
        0x68 => (Op::Pla, Imp),
        0x69 => (Op::Adc, Imm),
        0x6A => (Op::Ror, Acc),
        0x6B => (Op::Arr, Imm),
        0x6C => (Op::Jmp, Ind),
        0x6D => (Op::Adc, Abs),
        0x6E => (Op::Ror, Abs),
        0x6F => (Op::Rra, Abs),

        0x70 => (Op::Branch(Condition::OverflowSet), Rel),
        0x71 => (Op::Adc, Izy),
        0x73 => (Op::Rra, Izy),
        0x74 => (Op::Nop, Zpx),
        0x75 => (Op::Adc, Zpx),
        0x76 => (Op::Ror, Zpx),
        0x77 => (Op::Rra, Zpx),
        0x78 => (Op::Sei, Imp),
        0x79 => (Op::Adc, Aby),
        0x7A => (Op::Nop, Imp),
        0x7B => (Op::Rra, Aby),
        0x7C => (Op::Nop, Abx),
        0x7D => (Op::Adc, Abx),
        0x7E => (Op::Ror, Abx),
        0x7F => (Op::Rra, Abx),

        0x80 | 0x82 | 0x89 | 0xC2 | 0xE2 => (Op::Nop, Imm),
        0x81 => (Op::Sta, Izx),
        0x83 => (Op::Sax, Izx),
        0x84 => (Op::Sty, Zp),
        0x85 => (Op::Sta, Zp),
        0x86 => (Op::Stx, Zp),
        0x87 => (Op::Sax, Zp),
        0x88 => (Op::Dey, Imp),
        0x8A => (Op::Txa, Imp),
        0x8B => (Op::Ane, Imm),
        0x8C => (Op::Sty, Abs),
        0x8D => (Op::Sta, Abs),
        0x8E => (Op::Stx, Abs),
        0x8F => (Op::Sax, Abs),

        0x90 => (Op::Branch(Condition::CarryClear), Rel),
        0x91 => (Op::Sta, Izy),
        0x93 => (Op::Sha, Izy),
        0x94 => (Op::Sty, Zpx),
        0x95 => (Op::Sta, Zpx),
        0x96 => (Op::Stx, Zpy),
        0x97 => (Op::Sax, Zpy),
        0x98 => (Op::Tya, Imp),
        0x99 => (Op::Sta, Aby),
        0x9A => (Op::Txs, Imp),
        0x9B => (Op::Tas, Aby),
        0x9C => (Op::Shy, Abx),
        0x9D => (Op::Sta, Abx),
        0x9E => (Op::Shx, Aby),
        0x9F => (Op::Sha, Aby),

        0xA0 => (Op::Ldy, Imm),
        0xA1 => (Op::Lda, Izx),
        0xA2 => (Op::Ldx, Imm),
        0xA3 => (Op::Lax, Izx),
        0xA4 => (Op::Ldy, Zp),
        0xA5 => (Op::Lda, Zp),
        0xA6 => (Op::Ldx, Zp),
        0xA7 => (Op::Lax, Zp),
        0xA8 => (Op::Tay, Imp),
        0xA9 => (Op::Lda, Imm),
        0xAA => (Op::Tax, Imp),
        0xAB => (Op::Lxa, Imm),
        0xAC => (Op::Ldy, Abs),
        0xAD => (Op::Lda, Abs),
        0xAE => (Op::Ldx, Abs),
        0xAF => (Op::Lax, Abs),

        0xB0 => (Op::Branch(Condition::CarrySet), Rel),
        0xB1 => (Op::Lda, Izy),
        0xB3 => (Op::Lax, Izy),
        0xB4 => (Op::Ldy, Zpx),
        0xB5 => (Op::Lda, Zpx),
        0xB6 => (Op::Ldx, Zpy),
        0xB7 => (Op::Lax, Zpy),
        0xB8 => (Op::Clv, Imp),
        0xB9 => (Op::Lda, Aby),
        0xBA => (Op::Tsx, Imp),
        0xBB => (Op::Las, Aby),
        0xBC => (Op::Ldy, Abx),
        0xBD => (Op::Lda, Abx),
        0xBE => (Op::Ldx, Aby),
        0xBF => (Op::Lax, Aby),

        0xC0 => (Op::Cpy, Imm),
        0xC1 => (Op::Cmp, Izx),
        0xC3 => (Op::Dcp, Izx),
        0xC4 => (Op::Cpy, Zp),
        0xC5 => (Op::Cmp, Zp),
        0xC6 => (Op::Dec, Zp),
        0xC7 => (Op::Dcp, Zp),
        0xC8 => (Op::Iny, Imp),
        0xC9 => (Op::Cmp, Imm),
        0xCA => (Op::Dex, Imp),
        0xCB => (Op::Sbx, Imm),
        0xCC => (Op::Cpy, Abs),
        0xCD => (Op::Cmp, Abs),
        0xCE => (Op::Dec, Abs),
        0xCF => (Op::Dcp, Abs),

        0xD0 => (Op::Branch(Condition::NotEqual), Rel),
        0xD1 => (Op::Cmp, Izy),
        0xD3 => (Op::Dcp, Izy),
        0xD4 => (Op::Nop, Zpx),
        0xD5 => (Op::Cmp, Zpx),
        0xD6 => (Op::Dec, Zpx),
        0xD7 => (Op::Dcp, Zpx),
        0xD8 => (Op::Cld, Imp),
        0xD9 => (Op::Cmp, Aby),
        0xDA => (Op::Nop, Imp),
        0xDB => (Op::Dcp, Aby),
        0xDC => (Op::Nop, Abx),
        0xDD => (Op::Cmp, Abx),
        0xDE => (Op::Dec, Abx),
        0xDF => (Op::Dcp, Abx),

        0xE0 => (Op::Cpx, Imm),
        0xE1 => (Op::Sbc, Izx),
        0xE3 => (Op::Isc, Izx),
        0xE4 => (Op::Cpx, Zp),
        0xE5 => (Op::Sbc, Zp),
        0xE6 => (Op::Inc, Zp),
        0xE7 => (Op::Isc, Zp),
        0xE8 => (Op::Inx, Imp),
        // $EB is an undocumented alias of SBC #nn
        0xE9 | 0xEB => (Op::Sbc, Imm),
        0xEA => (Op::Nop, Imp),
        0xEC => (Op::Cpx, Abs),
        0xED => (Op::Sbc, Abs),
        0xEE => (Op::Inc, Abs),
        0xEF => (Op::Isc, Abs),

        0xF0 => (Op::Branch(Condition::Equal), Rel),
        0xF1 => (Op::Sbc, Izy),
        0xF3 => (Op::Isc, Izy),
        0xF4 => (Op::Nop, Zpx),
        0xF5 => (Op::Sbc, Zpx),
        0xF6 => (Op::Inc, Zpx),
        0xF7 => (Op::Isc, Zpx),
        0xF8 => (Op::Sed, Imp),
        0xF9 => (Op::Sbc, Aby),
        0xFA => (Op::Nop, Imp),
        0xFB => (Op::Isc, Aby),
        0xFC => (Op::Nop, Abx),
        0xFD => (Op::Sbc, Abx),
        0xFE => (Op::Inc, Abx),
        0xFF => (Op::Isc, Abx),

        // $x2 column (except the NOP immediates above) locks the bus
        _ => (Op::Jam, Imp),
    };
    Instruction::new(op, mode)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn jam_column() {
        for opcode in [
            0x02, 0x12, 0x22, 0x32, 0x42, 0x52, 0x62, 0x72, 0x92, 0xB2, 0xD2, 0xF2,
        ] {
            assert_eq!(decode(opcode).op, Op::Jam, "${opcode:02X}");
        }
    }

    #[test]
    fn only_jams_fall_through() {
        let jams = (0..=255u8).filter(|&op| decode(op).op == Op::Jam).count();
        assert_eq!(jams, 12);
    }

    #[test]
    fn documented_count() {
        let documented = (0..=255u8)
            .filter(|&op| decode(op).op.is_documented() && op != 0xEB)
            .filter(|&op| decode(op).op != Op::Nop || op == 0xEA)
            .count();
        assert_eq!(documented, 151);
    }
}
