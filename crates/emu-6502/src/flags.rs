//! 6502 processor status register (P).
//!
//! Bit 5 has no storage and always reads as 1. B only exists in the copy of
//! P pushed to the stack; a pulled value keeps whatever bit 4 held.

use emu_core::AluResult;

/// Carry flag - set if operation resulted in carry/borrow.
pub const C: u8 = 0x01;

/// Zero flag - set if result is zero.
pub const Z: u8 = 0x02;

/// Interrupt disable - when set, IRQ interrupts are ignored.
pub const I: u8 = 0x04;

/// Decimal mode - enables BCD arithmetic for ADC/SBC.
pub const D: u8 = 0x08;

/// Break flag - not a real flag, only appears when status is pushed.
/// Set when BRK pushes status, clear when IRQ/NMI pushes status.
pub const B: u8 = 0x10;

/// Unused bit - always reads as 1.
pub const U: u8 = 0x20;

/// Overflow flag - set if signed arithmetic overflowed.
pub const V: u8 = 0x40;

/// Negative flag - set if result has bit 7 set.
pub const N: u8 = 0x80;

/// Processor status register.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Status(pub u8);

impl Status {
    /// Create a new status register with the unused bit set.
    #[must_use]
    pub const fn new() -> Self {
        Self(U)
    }

    /// Create status from raw value, ensuring unused bit is set.
    #[must_use]
    pub const fn from_byte(value: u8) -> Self {
        Self(value | U)
    }

    /// Get raw value for BRK/PHP (break and unused both set).
    #[must_use]
    pub const fn to_byte_brk(self) -> u8 {
        self.0 | U | B
    }

    /// Get raw value for IRQ/NMI (unused set, break clear).
    #[must_use]
    pub const fn to_byte_irq(self) -> u8 {
        (self.0 | U) & !B
    }

    /// Check if a flag is set.
    #[must_use]
    pub const fn is_set(self, flag: u8) -> bool {
        self.0 & flag != 0
    }

    /// Set a flag.
    pub fn set(&mut self, flag: u8) {
        self.0 |= flag;
    }

    /// Clear a flag.
    pub fn clear(&mut self, flag: u8) {
        self.0 &= !flag;
    }

    /// Set or clear a flag based on condition.
    pub fn set_if(&mut self, flag: u8, condition: bool) {
        if condition {
            self.set(flag);
        } else {
            self.clear(flag);
        }
    }

    /// Update N and Z flags based on a value.
    pub fn update_nz(&mut self, value: u8) {
        self.set_if(N, value & 0x80 != 0);
        self.set_if(Z, value == 0);
    }

    /// Copy the flags selected by `mask` out of an ALU result.
    ///
    /// C is taken from `result.carry` as-is; subtractions invert their
    /// borrow before calling this.
    pub fn apply(&mut self, result: AluResult, mask: u8) {
        if mask & C != 0 {
            self.set_if(C, result.carry);
        }
        if mask & Z != 0 {
            self.set_if(Z, result.zero);
        }
        if mask & V != 0 {
            self.set_if(V, result.overflow);
        }
        if mask & N != 0 {
            self.set_if(N, result.negative);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn unused_bit_always_reads_set() {
        assert_eq!(Status::from_byte(0x00).0, U);
        assert_eq!(Status::new().to_byte_irq(), U);
        assert_eq!(Status::new().to_byte_brk(), U | B);
    }

    #[test]
    fn apply_touches_only_masked_flags() {
        let mut p = Status::from_byte(C | V);
        p.apply(AluResult::pass(0x80), N | Z);
        assert!(p.is_set(N));
        assert!(!p.is_set(Z));
        assert!(p.is_set(C));
        assert!(p.is_set(V));
    }
}
