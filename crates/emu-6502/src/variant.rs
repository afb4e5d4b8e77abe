//! Chip variants of the 6502 family.
//!
//! One execution driver serves every variant; the differences are confined
//! to the hooks below.

use emu_core::DecimalQuirks;

use crate::decode::Instruction;
use crate::{cmos, nmos};

/// Which address an indexing dummy cycle puts on the bus.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Fixup {
    /// The address formed before the carry into the high byte (NMOS).
    Uncorrected,
    /// The previous bus address again (65C02).
    RepeatLast,
}

/// Middle cycle of a read-modify-write.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ModifyWrite {
    /// Write the unmodified value back, then the new one (NMOS).
    WriteOriginal,
    /// Read the address a second time, then write once (65C02).
    RereadOriginal,
}

/// Behaviour that differs between 6502-family chips.
pub trait Variant {
    /// Human-readable chip name.
    const NAME: &'static str;

    /// Decode an opcode byte.
    fn decode(opcode: u8) -> Instruction;

    /// Address used by the dummy cycle of indexed addressing.
    fn fixup_behavior() -> Fixup;

    /// Bus pattern of the modify step of a read-modify-write.
    fn modify_write_order() -> ModifyWrite;

    /// Decimal behaviour of ADC/SBC, or `None` when D is ignored.
    fn decimal_mode_quirks() -> Option<DecimalQuirks>;

    /// True if JMP ($xxFF) fetches its high byte from $xx00.
    fn indirect_jump_wraps() -> bool;

    /// True if reset, BRK and interrupts clear D.
    fn clears_decimal_on_interrupt() -> bool;
}

/// Original NMOS 6502 (and the 6510/8502).
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Nmos;

impl Variant for Nmos {
    const NAME: &'static str = "6502";

    fn decode(opcode: u8) -> Instruction {
        nmos::decode(opcode)
    }

    fn fixup_behavior() -> Fixup {
        Fixup::Uncorrected
    }

    fn modify_write_order() -> ModifyWrite {
        ModifyWrite::WriteOriginal
    }

    fn decimal_mode_quirks() -> Option<DecimalQuirks> {
        Some(DecimalQuirks::Nmos)
    }

    fn indirect_jump_wraps() -> bool {
        true
    }

    fn clears_decimal_on_interrupt() -> bool {
        false
    }
}

/// WDC 65C02.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Cmos;

impl Variant for Cmos {
    const NAME: &'static str = "65C02";

    fn decode(opcode: u8) -> Instruction {
        cmos::decode(opcode)
    }

    fn fixup_behavior() -> Fixup {
        Fixup::RepeatLast
    }

    fn modify_write_order() -> ModifyWrite {
        ModifyWrite::RereadOriginal
    }

    fn decimal_mode_quirks() -> Option<DecimalQuirks> {
        Some(DecimalQuirks::Cmos)
    }

    fn indirect_jump_wraps() -> bool {
        false
    }

    fn clears_decimal_on_interrupt() -> bool {
        true
    }
}

/// Ricoh 2A03/2A07: an NMOS core with the decimal adder disconnected.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Ricoh;

impl Variant for Ricoh {
    const NAME: &'static str = "2A03";

    fn decode(opcode: u8) -> Instruction {
        nmos::decode(opcode)
    }

    fn fixup_behavior() -> Fixup {
        Fixup::Uncorrected
    }

    fn modify_write_order() -> ModifyWrite {
        ModifyWrite::WriteOriginal
    }

    fn decimal_mode_quirks() -> Option<DecimalQuirks> {
        None
    }

    fn indirect_jump_wraps() -> bool {
        true
    }

    fn clears_decimal_on_interrupt() -> bool {
        false
    }
}
