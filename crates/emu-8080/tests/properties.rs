//! Properties over the whole accumulator and flag space.

use emu_8080::{ACF, CF, I8080, ONE, PF, SF, ZF};
use emu_core::{Bus, Cpu, MemoryMap, alu};
use proptest::prelude::*;

const STACK: u16 = 0x4000;

fn boot(program: &[u8], a: u8, f: u8) -> (I8080, MemoryMap) {
    let mut bus = MemoryMap::flat();
    bus.load(0x0000, program);
    let mut cpu = I8080::new();
    cpu.regs.sp = STACK;
    cpu.regs.a = a;
    cpu.regs.f = f;
    (cpu, bus)
}

proptest! {
    #[test]
    fn daa_matches_the_shared_decimal_adjust(a in any::<u8>(), ac in any::<bool>(), cy in any::<bool>()) {
        let f = ONE | if ac { ACF } else { 0 } | if cy { CF } else { 0 };
        let (mut cpu, mut bus) = boot(&[0x27], a, f);
        cpu.step(&mut bus);

        let expected = alu::decimal_adjust(a, ac, cy);
        let mut want = ONE;
        if expected.negative { want |= SF; }
        if expected.zero { want |= ZF; }
        if expected.parity() { want |= PF; }
        if expected.half_carry { want |= ACF; }
        if expected.carry { want |= CF; }

        prop_assert_eq!(cpu.regs.a, expected.value);
        prop_assert_eq!(cpu.regs.f, want, "A=${:02X} F=${:02X}", a, f);
        // Carry is never cleared by DAA
        prop_assert!(!cy || cpu.regs.f & CF != 0);
    }

    #[test]
    fn pop_psw_forces_the_fixed_bits(a in any::<u8>(), f in any::<u8>()) {
        // LXI H,nnnn; PUSH H; POP PSW
        let [lo, hi] = (u16::from(a) << 8 | u16::from(f)).to_le_bytes();
        let (mut cpu, mut bus) = boot(&[0x21, lo, hi, 0xE5, 0xF1], 0, ONE);
        for _ in 0..3 {
            cpu.step(&mut bus);
        }
        prop_assert_eq!(cpu.regs.a, a);
        prop_assert_eq!(cpu.regs.f, (f & (SF | ZF | ACF | PF | CF)) | ONE);
        prop_assert_eq!(cpu.regs.sp, STACK);
    }

    #[test]
    fn push_psw_stores_a_and_f(a in any::<u8>(), f in any::<u8>()) {
        let f = (f & (SF | ZF | ACF | PF | CF)) | ONE;
        let (mut cpu, mut bus) = boot(&[0xF5, 0xF1], a, f);
        cpu.step(&mut bus);
        prop_assert_eq!(bus.peek(STACK - 1), a);
        prop_assert_eq!(bus.peek(STACK - 2), f);

        cpu.regs.a = !a;
        cpu.regs.f = ONE;
        cpu.step(&mut bus);
        prop_assert_eq!((cpu.regs.a, cpu.regs.f), (a, f));
    }
}
