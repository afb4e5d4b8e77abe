//! Two-level control pins.
//!
//! Levels are logical: `Raised` means the signal is asserted, regardless of
//! whether the physical line is active-low. Setting a pin returns the edge
//! it produced so callers can react to transitions without callbacks.

use std::fmt;

/// A named control pin.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Pin {
    /// Supply. While lowered the CPU refuses to step.
    Power,
    /// Reset request (latched on the rising edge).
    Reset,
    /// Maskable interrupt request (level-sensitive).
    Int,
    /// Non-maskable interrupt request (latched on the rising edge).
    Nmi,
    /// Ready. Lowering it stalls the CPU at the next fetch boundary.
    Rdy,
    /// Set overflow (6502 family).
    So,
    /// Driven by the CPU while halted.
    Halt,
    /// Driven by the CPU during an opcode fetch (SYNC on the 6502, M1 on the 8080).
    Sync,
    /// Read strobe.
    Rd,
    /// Write strobe.
    Wr,
}

impl Pin {
    const fn mask(self) -> u16 {
        1 << self as u16
    }
}

impl fmt::Display for Pin {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Pin::Power => "POWER",
            Pin::Reset => "RESET",
            Pin::Int => "INT",
            Pin::Nmi => "NMI",
            Pin::Rdy => "RDY",
            Pin::So => "SO",
            Pin::Halt => "HALT",
            Pin::Sync => "SYNC",
            Pin::Rd => "RD",
            Pin::Wr => "WR",
        };
        f.write_str(name)
    }
}

/// Logical level of a pin.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Level {
    #[default]
    Lowered,
    Raised,
}

impl From<bool> for Level {
    fn from(raised: bool) -> Self {
        if raised { Level::Raised } else { Level::Lowered }
    }
}

/// Transition produced by setting a pin.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Edge {
    NoChange,
    Rose,
    Fell,
}

/// The full pin state of one CPU.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Pins(u16);

impl Pins {
    /// All pins lowered.
    #[must_use]
    pub const fn new() -> Self {
        Self(0)
    }

    /// A powered, ready CPU with no requests pending.
    #[must_use]
    pub const fn powered() -> Self {
        Self(Pin::Power.mask() | Pin::Rdy.mask())
    }

    #[must_use]
    pub const fn level(self, pin: Pin) -> Level {
        if self.0 & pin.mask() != 0 {
            Level::Raised
        } else {
            Level::Lowered
        }
    }

    #[must_use]
    pub const fn is_raised(self, pin: Pin) -> bool {
        self.0 & pin.mask() != 0
    }

    /// Drive a pin, returning the edge this produced.
    pub fn set(&mut self, pin: Pin, level: Level) -> Edge {
        let was = self.is_raised(pin);
        match level {
            Level::Raised => self.0 |= pin.mask(),
            Level::Lowered => self.0 &= !pin.mask(),
        }
        match (was, level) {
            (false, Level::Raised) => Edge::Rose,
            (true, Level::Lowered) => Edge::Fell,
            _ => Edge::NoChange,
        }
    }

    pub fn raise(&mut self, pin: Pin) -> Edge {
        self.set(pin, Level::Raised)
    }

    pub fn lower(&mut self, pin: Pin) -> Edge {
        self.set(pin, Level::Lowered)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn reasserting_a_level_is_not_an_edge() {
        let mut pins = Pins::new();
        assert_eq!(pins.raise(Pin::Nmi), Edge::Rose);
        let before = pins;
        assert_eq!(pins.raise(Pin::Nmi), Edge::NoChange);
        assert_eq!(pins, before);
        assert_eq!(pins.lower(Pin::Nmi), Edge::Fell);
        assert_eq!(pins.lower(Pin::Nmi), Edge::NoChange);
    }

    #[test]
    fn pins_are_independent() {
        let mut pins = Pins::powered();
        pins.raise(Pin::Int);
        assert!(pins.is_raised(Pin::Power));
        assert!(pins.is_raised(Pin::Rdy));
        assert!(pins.is_raised(Pin::Int));
        assert_eq!(pins.level(Pin::Reset), Level::Lowered);
    }
}
