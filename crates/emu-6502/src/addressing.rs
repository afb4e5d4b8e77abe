//! Effective-address resolution.
//!
//! Each mode performs the same bus accesses as silicon, in the same order,
//! including dummy reads. Indexed modes first form the address without the
//! carry into the high byte; the fixup cycle that follows depends on the
//! variant and on the instruction's [`FixupPolicy`].

use emu_core::Bus;

use crate::Mos6502;
use crate::decode::{FixupPolicy, Mode};
use crate::variant::{Fixup, Variant};

/// A resolved memory operand.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) struct Operand {
    /// Final effective address.
    pub address: u16,
    /// Address before indexing (used by the SHA/SHX/SHY/TAS family).
    pub base: u16,
    /// True if indexing carried into the high byte.
    pub crossed: bool,
}

impl Operand {
    const fn direct(address: u16) -> Self {
        Self {
            address,
            base: address,
            crossed: false,
        }
    }
}

impl<V: Variant> Mos6502<V> {
    /// Resolve a memory operand, consuming every addressing cycle.
    pub(crate) fn resolve<B: Bus>(&mut self, bus: &mut B, mode: Mode, fixup: FixupPolicy) -> Operand {
        match mode {
            Mode::ZeroPage => Operand::direct(u16::from(self.fetch(bus))),
            Mode::ZeroPageX => self.zero_page_indexed(bus, self.regs.x),
            Mode::ZeroPageY => self.zero_page_indexed(bus, self.regs.y),
            Mode::Absolute => Operand::direct(self.fetch_word(bus)),
            Mode::AbsoluteX => {
                let base = self.fetch_word(bus);
                self.indexed(bus, base, self.regs.x, fixup)
            }
            Mode::AbsoluteY => {
                let base = self.fetch_word(bus);
                self.indexed(bus, base, self.regs.y, fixup)
            }
            Mode::IndirectX => {
                let pointer = self.fetch(bus);
                self.index_cycle(bus, u16::from(pointer));
                let pointer = pointer.wrapping_add(self.regs.x);
                Operand::direct(self.read_zero_page_word(bus, pointer))
            }
            Mode::IndirectY => {
                let pointer = self.fetch(bus);
                let base = self.read_zero_page_word(bus, pointer);
                self.indexed(bus, base, self.regs.y, fixup)
            }
            Mode::ZeroPageIndirect => {
                let pointer = self.fetch(bus);
                Operand::direct(self.read_zero_page_word(bus, pointer))
            }
            Mode::Implied
            | Mode::Accumulator
            | Mode::Immediate
            | Mode::Indirect
            | Mode::AbsoluteIndirectX
            | Mode::Relative
            | Mode::ZeroPageRelative
            | Mode::Bare => unreachable!("{mode:?} has no memory operand"),
        }
    }

    /// Target of JMP in its absolute and indirect forms.
    pub(crate) fn jump_target<B: Bus>(&mut self, bus: &mut B, mode: Mode) -> u16 {
        match mode {
            Mode::Indirect => {
                let pointer = self.fetch_word(bus);
                if V::indirect_jump_wraps() {
                    // High byte comes from the start of the same page
                    let lo = self.read(bus, pointer);
                    let hi = self.read(bus, (pointer & 0xFF00) | (pointer.wrapping_add(1) & 0x00FF));
                    u16::from_le_bytes([lo, hi])
                } else {
                    self.repeat_last(bus);
                    self.read_word(bus, pointer)
                }
            }
            Mode::AbsoluteIndirectX => {
                let base = self.fetch_word(bus);
                self.repeat_last(bus);
                self.read_word(bus, base.wrapping_add(u16::from(self.regs.x)))
            }
            _ => self.fetch_word(bus),
        }
    }

    /// zp,X and zp,Y: the sum wraps within page zero.
    fn zero_page_indexed<B: Bus>(&mut self, bus: &mut B, index: u8) -> Operand {
        let base = self.fetch(bus);
        self.index_cycle(bus, u16::from(base));
        Operand::direct(u16::from(base.wrapping_add(index)))
    }

    fn indexed<B: Bus>(&mut self, bus: &mut B, base: u16, index: u8, fixup: FixupPolicy) -> Operand {
        let address = base.wrapping_add(u16::from(index));
        let crossed = (base ^ address) & 0xFF00 != 0;
        let uncorrected = (base & 0xFF00) | (address & 0x00FF);
        if crossed {
            self.index_cycle(bus, uncorrected);
        } else if fixup == FixupPolicy::Always {
            self.dummy_read(bus, uncorrected);
        }
        Operand {
            address,
            base,
            crossed,
        }
    }

    /// The internal cycle spent adding an index register.
    fn index_cycle<B: Bus>(&mut self, bus: &mut B, uncorrected: u16) {
        match V::fixup_behavior() {
            Fixup::Uncorrected => self.dummy_read(bus, uncorrected),
            Fixup::RepeatLast => self.repeat_last(bus),
        }
    }

    /// Dummy read of whatever address the previous cycle drove.
    pub(crate) fn repeat_last<B: Bus>(&mut self, bus: &mut B) {
        let address = self.clock.last_address();
        self.dummy_read(bus, address);
    }

    /// Pointer fetch from page zero; the high byte wraps to $00.
    fn read_zero_page_word<B: Bus>(&mut self, bus: &mut B, pointer: u8) -> u16 {
        let lo = self.read(bus, u16::from(pointer));
        let hi = self.read(bus, u16::from(pointer.wrapping_add(1)));
        u16::from_le_bytes([lo, hi])
    }

    fn read_word<B: Bus>(&mut self, bus: &mut B, address: u16) -> u16 {
        let lo = self.read(bus, address);
        let hi = self.read(bus, address.wrapping_add(1));
        u16::from_le_bytes([lo, hi])
    }
}
