//! Properties that hold for every opcode.

mod common;

use common::boot;
use emu_6502::{Cmos, Nmos, Variant};
use emu_core::{Cpu, StepEvent};
use proptest::prelude::*;

fn run_one<V: Variant>(opcode: u8, operands: [u8; 2], a: u8, x: u8, y: u8, p: u8) -> (u32, u64) {
    let (mut cpu, mut bus) = boot::<V>(&[opcode, operands[0], operands[1]]);
    cpu.regs.a = a;
    cpu.regs.x = x;
    cpu.regs.y = y;
    cpu.set_status(p);
    cpu.arm_trace();
    let outcome = cpu.step(&mut bus);
    assert!(matches!(outcome.event, StepEvent::Instruction { .. }));
    (outcome.cycles, cpu.take_trace().len() as u64)
}

proptest! {
    #[test]
    fn nmos_instructions_take_two_to_eight_cycles(
        opcode in any::<u8>(),
        operands in any::<[u8; 2]>(),
        a in any::<u8>(), x in any::<u8>(), y in any::<u8>(), p in any::<u8>(),
    ) {
        let (cycles, traced) = run_one::<Nmos>(opcode, operands, a, x, y, p);
        prop_assert!((2..=8).contains(&cycles), "${opcode:02X} took {cycles}");
        prop_assert_eq!(u64::from(cycles), traced);
    }

    #[test]
    fn cmos_instructions_take_one_to_eight_cycles(
        opcode in any::<u8>(),
        operands in any::<[u8; 2]>(),
        a in any::<u8>(), x in any::<u8>(), y in any::<u8>(), p in any::<u8>(),
    ) {
        let (cycles, traced) = run_one::<Cmos>(opcode, operands, a, x, y, p);
        prop_assert!((1..=8).contains(&cycles), "${opcode:02X} took {cycles}");
        prop_assert_eq!(u64::from(cycles), traced);
    }
}
