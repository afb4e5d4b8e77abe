//! Per-chip glue between vector states and CPU registers.

use emu_6502::{Mos6502, Status, Variant};
use emu_8080::I8080;
use emu_core::{Cpu, Value};
use serde::de::DeserializeOwned;

use crate::report::Mismatch;
use crate::vector::{I8080State, Mos6502State};

/// A CPU the oracle can drive.
pub trait Harness: Cpu + Sized {
    /// Vector state type for this chip.
    type State: DeserializeOwned;

    /// A powered CPU, ready to fetch, with no pending requests.
    fn fresh() -> Self;

    /// Load registers from a vector state.
    fn load(&mut self, state: &Self::State);

    /// RAM contents listed by a state.
    fn ram(state: &Self::State) -> &[(u16, u8)];

    /// Push a mismatch for every register that differs from `expected`.
    fn compare(&self, expected: &Self::State, mismatches: &mut Vec<Mismatch>);
}

fn check(
    mismatches: &mut Vec<Mismatch>,
    field: &'static str,
    actual: impl Into<Value>,
    expected: impl Into<Value>,
) {
    let (actual, expected) = (actual.into(), expected.into());
    if actual != expected {
        mismatches.push(Mismatch::Register {
            field,
            expected,
            actual,
        });
    }
}

impl<V: Variant> Harness for Mos6502<V> {
    type State = Mos6502State;

    fn fresh() -> Self {
        Mos6502::new()
    }

    fn load(&mut self, state: &Mos6502State) {
        self.regs.pc = state.pc;
        self.regs.s = state.s;
        self.regs.a = state.a;
        self.regs.x = state.x;
        self.regs.y = state.y;
        self.regs.p = Status::from_byte(state.p);
    }

    fn ram(state: &Mos6502State) -> &[(u16, u8)] {
        &state.ram
    }

    fn compare(&self, expected: &Mos6502State, mismatches: &mut Vec<Mismatch>) {
        check(mismatches, "pc", self.regs.pc, expected.pc);
        check(mismatches, "s", self.regs.s, expected.s);
        check(mismatches, "a", self.regs.a, expected.a);
        check(mismatches, "x", self.regs.x, expected.x);
        check(mismatches, "y", self.regs.y, expected.y);
        // Raw P, bit 5 forced; B is whatever was last loaded into it
        check(mismatches, "p", self.regs.p.0, Status::from_byte(expected.p).0);
    }
}

impl Harness for I8080 {
    type State = I8080State;

    fn fresh() -> Self {
        I8080::new()
    }

    fn load(&mut self, state: &I8080State) {
        let regs = &mut self.regs;
        regs.pc = state.pc;
        regs.sp = state.sp;
        regs.a = state.a;
        regs.b = state.b;
        regs.c = state.c;
        regs.d = state.d;
        regs.e = state.e;
        regs.f = state.f;
        regs.h = state.h;
        regs.l = state.l;
        regs.inte = state.ie.is_some_and(|ie| ie != 0);
    }

    fn ram(state: &I8080State) -> &[(u16, u8)] {
        &state.ram
    }

    fn compare(&self, expected: &I8080State, mismatches: &mut Vec<Mismatch>) {
        let regs = &self.regs;
        check(mismatches, "pc", regs.pc, expected.pc);
        check(mismatches, "sp", regs.sp, expected.sp);
        check(mismatches, "a", regs.a, expected.a);
        check(mismatches, "b", regs.b, expected.b);
        check(mismatches, "c", regs.c, expected.c);
        check(mismatches, "d", regs.d, expected.d);
        check(mismatches, "e", regs.e, expected.e);
        check(mismatches, "f", regs.f, expected.f);
        check(mismatches, "h", regs.h, expected.h);
        check(mismatches, "l", regs.l, expected.l);
        if let Some(ie) = expected.ie {
            check(mismatches, "ie", regs.inte, ie != 0);
        }
    }
}
