//! 65C02 differences from the NMOS core.

mod common;

use common::{ORIGIN, boot, install_vectors, traced};
use emu_6502::{Cmos, Nmos, flags};
use emu_core::{Bus, BusAction, Cpu, Level, Pin, StepEvent};
use rstest::rstest;

#[rstest]
#[case::lda_absolute_x_crossed(&[0xBD, 0xFF, 0x30], 5)]
#[case::asl_absolute_x(&[0x1E, 0x00, 0x30], 6)]
#[case::asl_absolute_x_crossed(&[0x1E, 0xFF, 0x30], 7)]
#[case::inc_absolute_x(&[0xFE, 0x00, 0x30], 7)]
#[case::inc_accumulator(&[0x1A], 2)]
#[case::jmp_indirect(&[0x6C, 0x00, 0x30], 6)]
#[case::jmp_absolute_indexed_indirect(&[0x7C, 0x00, 0x30], 6)]
#[case::bra(&[0x80, 0x10], 3)]
#[case::lda_zero_page_indirect(&[0xB2, 0x10], 5)]
#[case::stz_absolute(&[0x9C, 0x00, 0x30], 4)]
#[case::tsb_zero_page(&[0x04, 0x10], 5)]
#[case::rmb(&[0x17, 0x10], 5)]
#[case::bbr_taken(&[0x0F, 0x10, 0x04], 6)]
#[case::phx(&[0xDA], 3)]
#[case::ply(&[0x7A], 4)]
#[case::single_cycle_nop(&[0x03], 1)]
#[case::two_byte_nop(&[0x02, 0x00], 2)]
#[case::zero_page_x_nop(&[0x54, 0x00], 4)]
#[case::slow_nop(&[0x5C, 0x00, 0x30], 8)]
fn cycle_counts(#[case] program: &[u8], #[case] cycles: u32) {
    let (mut cpu, mut bus) = boot::<Cmos>(program);
    cpu.regs.x = 1;
    let outcome = cpu.step(&mut bus);
    assert_eq!(outcome.cycles, cycles);
}

#[test]
fn index_fixup_repeats_the_previous_address() {
    let (mut cpu, mut bus) = boot::<Cmos>(&[0xBD, 0xFF, 0x30]);
    cpu.regs.x = 2;
    let (_, addresses) = traced(&mut cpu, &mut bus);
    assert_eq!(addresses, [ORIGIN, ORIGIN + 1, ORIGIN + 2, ORIGIN + 2, 0x3101]);
}

#[test]
fn read_modify_write_rereads_instead_of_writing_twice() {
    let (mut cpu, mut bus) = boot::<Cmos>(&[0xE6, 0x10]);
    cpu.arm_trace();
    cpu.step(&mut bus);
    let trace = cpu.take_trace();
    let actions: Vec<_> = trace.iter().map(|c| c.action).collect();
    assert_eq!(
        actions,
        [
            BusAction::Fetch,
            BusAction::Read,
            BusAction::ModifyRead,
            BusAction::Read,
            BusAction::Write
        ]
    );
}

#[test]
fn indirect_jump_does_not_wrap() {
    let (mut cpu, mut bus) = boot::<Cmos>(&[0x6C, 0xFF, 0x30]);
    bus.poke(0x30FF, 0x34);
    bus.poke(0x3100, 0x12);
    cpu.step(&mut bus);
    assert_eq!(cpu.regs.pc, 0x1234);
}

#[test]
fn decimal_mode_costs_a_cycle_and_sets_zero_from_the_result() {
    // SED; LDA #$99; CLC; ADC #$01
    let program = [0xF8, 0xA9, 0x99, 0x18, 0x69, 0x01];

    let (mut cpu, mut bus) = boot::<Cmos>(&program);
    for _ in 0..3 {
        cpu.step(&mut bus);
    }
    let outcome = cpu.step(&mut bus);
    assert_eq!(outcome.cycles, 3);
    assert_eq!(cpu.regs.a, 0x00);
    assert!(cpu.regs.p.is_set(flags::Z));
    assert!(cpu.regs.p.is_set(flags::C));

    let (mut cpu, mut bus) = boot::<Nmos>(&program);
    for _ in 0..3 {
        cpu.step(&mut bus);
    }
    let outcome = cpu.step(&mut bus);
    assert_eq!(outcome.cycles, 2);
    assert_eq!(cpu.regs.a, 0x00);
    assert!(!cpu.regs.p.is_set(flags::Z));
}

/// Operand in memory (if any), A before and after, P before and after.
#[rstest]
#[case::adc_immediate(&[0x69, 0x01], None, (0x99, 0x00), (flags::D, flags::D | flags::Z | flags::C), &[ORIGIN, ORIGIN + 1, ORIGIN + 1])]
#[case::sbc_immediate(&[0xE9, 0x01], None, (0x00, 0x99), (flags::D | flags::C, flags::D | flags::N), &[ORIGIN, ORIGIN + 1, ORIGIN + 1])]
#[case::adc_absolute(&[0x6D, 0x00, 0x30], Some((0x3000, 0x46)), (0x58, 0x04), (flags::D, flags::D | flags::V | flags::C), &[ORIGIN, ORIGIN + 1, ORIGIN + 2, 0x3000, 0x3000])]
#[case::sbc_zero_page(&[0xE5, 0x10], Some((0x0010, 0x46)), (0x46, 0x00), (flags::D | flags::C, flags::D | flags::Z | flags::C), &[ORIGIN, ORIGIN + 1, 0x0010, 0x0010])]
fn decimal_arithmetic_repeats_the_last_address(
    #[case] program: &[u8],
    #[case] operand: Option<(u16, u8)>,
    #[case] a: (u8, u8),
    #[case] p: (u8, u8),
    #[case] want_addresses: &[u16],
) {
    let ((a, want_a), (p, want_p)) = (a, p);
    let (mut cpu, mut bus) = boot::<Cmos>(program);
    if let Some((address, value)) = operand {
        bus.poke(address, value);
    }
    cpu.regs.a = a;
    cpu.set_status(p);

    let (outcome, addresses) = traced(&mut cpu, &mut bus);

    assert_eq!(outcome.cycles as usize, want_addresses.len());
    assert_eq!(addresses, want_addresses);
    assert_eq!(cpu.regs.a, want_a);
    assert_eq!(cpu.regs.p.0, want_p | flags::U, "P = {:08b}", cpu.regs.p.0);
}

#[test]
fn bit_immediate_only_touches_zero() {
    let (mut cpu, mut bus) = boot::<Cmos>(&[0x89, 0xC0]);
    cpu.regs.a = 0x01;
    cpu.step(&mut bus);
    assert!(cpu.regs.p.is_set(flags::Z));
    assert!(!cpu.regs.p.is_set(flags::N));
    assert!(!cpu.regs.p.is_set(flags::V));
}

#[test]
fn test_and_set_bits() {
    let (mut cpu, mut bus) = boot::<Cmos>(&[0x04, 0x10, 0x14, 0x10]);
    bus.poke(0x0010, 0x0F);
    cpu.regs.a = 0x30;
    cpu.step(&mut bus);
    assert_eq!(bus.peek(0x0010), 0x3F);
    assert!(cpu.regs.p.is_set(flags::Z));
    cpu.step(&mut bus);
    assert_eq!(bus.peek(0x0010), 0x0F);
    assert!(!cpu.regs.p.is_set(flags::Z));
}

#[test]
fn branch_on_bit_set() {
    // BBS3 $10,+4
    let (mut cpu, mut bus) = boot::<Cmos>(&[0xBF, 0x10, 0x04]);
    bus.poke(0x0010, 0x08);
    cpu.step(&mut bus);
    assert_eq!(cpu.regs.pc, ORIGIN + 7);
}

#[test]
fn smb_and_rmb_flip_one_bit() {
    let (mut cpu, mut bus) = boot::<Cmos>(&[0xD7, 0x10, 0x07, 0x10]);
    cpu.step(&mut bus);
    assert_eq!(bus.peek(0x0010), 0x20);
    bus.poke(0x0010, 0xFF);
    cpu.step(&mut bus);
    assert_eq!(bus.peek(0x0010), 0xFE);
}

#[test]
fn brk_clears_decimal() {
    let (mut cpu, mut bus) = boot::<Cmos>(&[0xF8, 0x00, 0x00]);
    install_vectors(&mut bus);
    cpu.step(&mut bus);
    cpu.step(&mut bus);
    assert!(!cpu.regs.p.is_set(flags::D));
    assert_eq!(cpu.regs.pc, 0xA000);
    // The pushed copy still has D set
    assert_eq!(bus.peek(0x01FB) & flags::D, flags::D);
}

#[test]
fn wai_sleeps_until_an_interrupt_request() {
    let (mut cpu, mut bus) = boot::<Cmos>(&[0xCB, 0xEA]);
    install_vectors(&mut bus);
    cpu.set_status(flags::I);

    let outcome = cpu.step(&mut bus);
    assert_eq!(outcome.cycles, 3);
    assert!(cpu.is_halted());
    assert_eq!(cpu.pin(Pin::Halt), Level::Raised);

    let outcome = cpu.step(&mut bus);
    assert_eq!(outcome.event, StepEvent::Halted);
    assert_eq!(outcome.cycles, 0);
    assert!(outcome.advanced());

    // Masked: resumes after WAI without vectoring
    assert!(!cpu.interrupt());
    let outcome = cpu.step(&mut bus);
    assert_eq!(outcome.event, StepEvent::Instruction { opcode: 0xEA });
    assert_eq!(cpu.regs.pc, ORIGIN + 2);
}

#[test]
fn stp_ignores_interrupts_until_reset() {
    let (mut cpu, mut bus) = boot::<Cmos>(&[0xDB]);
    install_vectors(&mut bus);
    cpu.set_status(0);
    cpu.step(&mut bus);
    cpu.interrupt();
    cpu.nmi();
    for _ in 0..10 {
        assert_eq!(cpu.step(&mut bus).event, StepEvent::Halted);
    }
    cpu.reset();
    cpu.step(&mut bus);
    assert!(!cpu.is_halted());
    assert_eq!(cpu.regs.pc, 0x8000);
}
