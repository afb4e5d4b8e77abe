//! Helpers shared by the 6502 integration tests.

#![allow(dead_code)]

use emu_6502::{Mos6502, Variant};
use emu_core::{Bus, Cpu, MemoryMap, StepOutcome};

/// Where test programs are loaded.
pub const ORIGIN: u16 = 0x0200;

/// A CPU about to execute `program` at [`ORIGIN`] on a flat 64K bus.
pub fn boot<V: Variant>(program: &[u8]) -> (Mos6502<V>, MemoryMap) {
    let mut bus = MemoryMap::flat();
    bus.load(ORIGIN, program);
    let mut cpu = Mos6502::<V>::new();
    cpu.regs.pc = ORIGIN;
    cpu.regs.s = 0xFD;
    (cpu, bus)
}

/// Point the reset, NMI and IRQ vectors at fixed handlers.
pub fn install_vectors(bus: &mut MemoryMap) {
    bus.load(0xFFFA, &[0x00, 0x90, 0x00, 0x80, 0x00, 0xA0]);
}

/// Step once with the trace armed and return the outcome plus the
/// addresses touched.
pub fn traced<V: Variant>(cpu: &mut Mos6502<V>, bus: &mut impl Bus) -> (StepOutcome, Vec<u16>) {
    cpu.arm_trace();
    let outcome = cpu.step(bus);
    let addresses = cpu.take_trace().iter().map(|c| c.address).collect();
    (outcome, addresses)
}
