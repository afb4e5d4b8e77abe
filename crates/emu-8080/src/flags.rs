//! 8080 flag register bits.
//!
//! Bit 1 always reads 1 and bits 3 and 5 always read 0.

use emu_core::AluResult;

/// Sign flag (bit 7) - copy of bit 7 of the result.
pub const SF: u8 = 0b1000_0000;

/// Zero flag (bit 6) - set if result is zero.
pub const ZF: u8 = 0b0100_0000;

/// Auxiliary carry (bit 4) - carry out of bit 3.
pub const ACF: u8 = 0b0001_0000;

/// Parity flag (bit 2) - set if the result has an even number of 1 bits.
pub const PF: u8 = 0b0000_0100;

/// Fixed bit 1.
pub const ONE: u8 = 0b0000_0010;

/// Carry flag (bit 0) - carry or borrow out of bit 7.
pub const CF: u8 = 0b0000_0001;

/// Bits that exist in F.
pub(crate) const MASK: u8 = SF | ZF | ACF | PF | CF;

/// Normalise a byte loaded into F (POP PSW).
#[must_use]
pub(crate) const fn from_byte(value: u8) -> u8 {
    (value & MASK) | ONE
}

/// S, Z and P of a result, plus the fixed bit.
#[must_use]
pub(crate) const fn szp(result: AluResult) -> u8 {
    let mut f = ONE;
    if result.negative {
        f |= SF;
    }
    if result.zero {
        f |= ZF;
    }
    if result.parity() {
        f |= PF;
    }
    f
}
