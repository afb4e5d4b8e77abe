//! Single-vector replay.

use emu_core::{Bus, Level, MemoryMap, Pin};

use crate::harness::Harness;
use crate::report::{Mismatch, Report, compare_traces};
use crate::vector::TestVector;

/// Outcome of one vector.
#[derive(Debug, Clone, PartialEq)]
pub enum Verdict {
    Pass,
    /// Mismatched, and the first step used exactly one bus cycle: most
    /// likely an opcode that only fetched.
    ///
    /// Any wrong opcode that really is one transaction long lands here too.
    /// On the 65C02 that is the single-cycle NOPs. On the 8080 it is every
    /// register-only instruction (`MOV r,r`, ALU on a register, `INX`,
    /// `DAD`, `EI` and the like), so an 8080 report in this bucket may
    /// still be a defect.
    Unimplemented(Report),
    Defect(Report),
}

impl Verdict {
    #[must_use]
    pub const fn is_pass(&self) -> bool {
        matches!(self, Verdict::Pass)
    }

    #[must_use]
    pub const fn report(&self) -> Option<&Report> {
        match self {
            Verdict::Pass => None,
            Verdict::Unimplemented(report) | Verdict::Defect(report) => Some(report),
        }
    }
}

/// Replay one vector on a fresh CPU and flat 64K bus.
///
/// A CPU that halts (JAM, HLT) keeps being stepped, up to `step_limit`
/// extra steps, while its trace is shorter than the expected one.
pub fn run_vector<C: Harness>(vector: &TestVector<C::State>, step_limit: usize) -> Verdict {
    let mut bus = MemoryMap::flat();
    let mut cpu = C::fresh();
    cpu.load(&vector.initial);
    for &(address, value) in C::ram(&vector.initial) {
        bus.poke(address, value);
    }
    for (port, value) in vector.port_inputs() {
        bus.set_port(port, value);
    }

    cpu.arm_trace();
    cpu.set_pin(Pin::Power, Level::Raised);
    let first = cpu.step(&mut bus);
    let expected_len = vector.transactions().count();
    let mut steps = 0;
    while cpu.is_halted() && cpu.trace().len() < expected_len && steps < step_limit {
        cpu.step(&mut bus);
        steps += 1;
    }
    cpu.set_pin(Pin::Power, Level::Lowered);
    let actual = cpu.take_trace();

    let mut mismatches = Vec::new();
    cpu.compare(&vector.final_state, &mut mismatches);
    for &(address, expected) in C::ram(&vector.final_state) {
        let actual = bus.peek(address);
        if actual != expected {
            mismatches.push(Mismatch::Memory {
                address,
                expected,
                actual,
            });
        }
    }
    compare_traces(vector.transactions(), &actual, &mut mismatches);

    if mismatches.is_empty() {
        return Verdict::Pass;
    }
    let report = Report {
        name: vector.name.clone(),
        mismatches,
        expected: vector.cycles.clone(),
        actual,
    };
    if first.cycles == 1 {
        Verdict::Unimplemented(report)
    } else {
        Verdict::Defect(report)
    }
}
