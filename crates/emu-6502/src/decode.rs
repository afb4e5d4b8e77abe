//! Decoded instruction descriptors.
//!
//! A decode table maps an opcode byte to an [`Instruction`]: what the
//! instruction does, how it finds its operand, and whether indexed
//! addressing always pays the fixup cycle. The execution driver turns that
//! triple into bus cycles.

/// Operation performed by an instruction.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Op {
    // Loads and stores
    Lda,
    Ldx,
    Ldy,
    Sta,
    Stx,
    Sty,
    Stz,

    // Register transfers
    Tax,
    Tay,
    Txa,
    Tya,
    Tsx,
    Txs,

    // Stack
    Pha,
    Php,
    Pla,
    Plp,
    Phx,
    Phy,
    Plx,
    Ply,

    // Arithmetic and logic
    Adc,
    Sbc,
    And,
    Ora,
    Eor,
    Cmp,
    Cpx,
    Cpy,
    Bit,
    Inc,
    Dec,
    Inx,
    Iny,
    Dex,
    Dey,
    Asl,
    Lsr,
    Rol,
    Ror,
    Tsb,
    Trb,
    /// Reset bit n of a zero-page byte.
    Rmb(u8),
    /// Set bit n of a zero-page byte.
    Smb(u8),

    // Control flow
    Jmp,
    Jsr,
    Rts,
    Rti,
    Brk,
    Branch(Condition),
    Bra,
    /// Branch if bit n of a zero-page byte is clear.
    Bbr(u8),
    /// Branch if bit n of a zero-page byte is set.
    Bbs(u8),

    // Flags
    Clc,
    Sec,
    Cli,
    Sei,
    Cld,
    Sed,
    Clv,

    Nop,
    /// 65C02 $5C: three bytes, eight cycles.
    SlowNop,
    Wai,
    Stp,

    // NMOS undocumented
    Slo,
    Rla,
    Sre,
    Rra,
    Sax,
    Lax,
    Dcp,
    Isc,
    Anc,
    Alr,
    Arr,
    Ane,
    Lxa,
    Sbx,
    Sha,
    Shx,
    Shy,
    Tas,
    Las,
    Jam,
}

/// Branch condition on a single flag.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Condition {
    Plus,
    Minus,
    OverflowClear,
    OverflowSet,
    CarryClear,
    CarrySet,
    NotEqual,
    Equal,
}

/// Addressing mode.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Mode {
    /// One operand-less dummy read of PC.
    Implied,
    Accumulator,
    Immediate,
    ZeroPage,
    ZeroPageX,
    ZeroPageY,
    Absolute,
    AbsoluteX,
    AbsoluteY,
    /// (zp,X)
    IndirectX,
    /// (zp),Y
    IndirectY,
    /// (zp), 65C02
    ZeroPageIndirect,
    /// (abs), JMP only
    Indirect,
    /// (abs,X), 65C02 JMP only
    AbsoluteIndirectX,
    Relative,
    /// zp followed by a branch offset, 65C02 BBR/BBS
    ZeroPageRelative,
    /// No operand and no internal cycle (65C02 single-cycle NOPs).
    Bare,
}

/// How an instruction uses memory, which selects its cycle pattern.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Kind {
    /// Reads an operand.
    Read,
    /// Writes a value to the effective address.
    Write,
    /// Reads, modifies and writes back.
    Modify,
    /// Register-only, after one dummy read of PC.
    Implied,
    /// Owns its whole bus sequence (jumps, stack, interrupts, halts).
    Control,
}

/// Whether an indexed mode's fixup cycle is conditional.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FixupPolicy {
    /// Only when indexing carries into the high byte.
    OnCross,
    /// Every time, whether or not a page is crossed.
    Always,
}

/// One decode-table entry.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Instruction {
    pub op: Op,
    pub mode: Mode,
    pub fixup: FixupPolicy,
}

impl Instruction {
    /// An entry with the fixup policy implied by its kind: stores and
    /// read-modify-writes always pay it, reads only on a page cross.
    #[must_use]
    pub const fn new(op: Op, mode: Mode) -> Self {
        let fixup = match op.kind() {
            Kind::Write | Kind::Modify => FixupPolicy::Always,
            _ => FixupPolicy::OnCross,
        };
        Self { op, mode, fixup }
    }

    /// Override the fixup policy.
    #[must_use]
    pub const fn with_fixup(mut self, fixup: FixupPolicy) -> Self {
        self.fixup = fixup;
        self
    }
}

impl Op {
    /// Cycle pattern this operation follows.
    #[must_use]
    pub const fn kind(self) -> Kind {
        match self {
            Op::Lda
            | Op::Ldx
            | Op::Ldy
            | Op::Adc
            | Op::Sbc
            | Op::And
            | Op::Ora
            | Op::Eor
            | Op::Cmp
            | Op::Cpx
            | Op::Cpy
            | Op::Bit
            | Op::Nop
            | Op::Lax
            | Op::Anc
            | Op::Alr
            | Op::Arr
            | Op::Ane
            | Op::Lxa
            | Op::Sbx
            | Op::Las => Kind::Read,

            Op::Sta
            | Op::Stx
            | Op::Sty
            | Op::Stz
            | Op::Sax
            | Op::Sha
            | Op::Shx
            | Op::Shy
            | Op::Tas => Kind::Write,

            Op::Inc
            | Op::Dec
            | Op::Asl
            | Op::Lsr
            | Op::Rol
            | Op::Ror
            | Op::Tsb
            | Op::Trb
            | Op::Rmb(_)
            | Op::Smb(_)
            | Op::Slo
            | Op::Rla
            | Op::Sre
            | Op::Rra
            | Op::Dcp
            | Op::Isc => Kind::Modify,

            Op::Tax
            | Op::Tay
            | Op::Txa
            | Op::Tya
            | Op::Tsx
            | Op::Txs
            | Op::Inx
            | Op::Iny
            | Op::Dex
            | Op::Dey
            | Op::Clc
            | Op::Sec
            | Op::Cli
            | Op::Sei
            | Op::Cld
            | Op::Sed
            | Op::Clv => Kind::Implied,

            Op::Pha
            | Op::Php
            | Op::Pla
            | Op::Plp
            | Op::Phx
            | Op::Phy
            | Op::Plx
            | Op::Ply
            | Op::Jmp
            | Op::Jsr
            | Op::Rts
            | Op::Rti
            | Op::Brk
            | Op::Branch(_)
            | Op::Bra
            | Op::Bbr(_)
            | Op::Bbs(_)
            | Op::SlowNop
            | Op::Wai
            | Op::Stp
            | Op::Jam => Kind::Control,
        }
    }

    /// False for opcodes absent from the manufacturer's documentation.
    #[must_use]
    pub const fn is_documented(self) -> bool {
        !matches!(
            self,
            Op::Slo
                | Op::Rla
                | Op::Sre
                | Op::Rra
                | Op::Sax
                | Op::Lax
                | Op::Dcp
                | Op::Isc
                | Op::Anc
                | Op::Alr
                | Op::Arr
                | Op::Ane
                | Op::Lxa
                | Op::Sbx
                | Op::Sha
                | Op::Shx
                | Op::Shy
                | Op::Tas
                | Op::Las
                | Op::Jam
        )
    }
}
