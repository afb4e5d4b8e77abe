//! Reset, NMI and IRQ sequences and pin handling.

mod common;

use common::{ORIGIN, boot, install_vectors, traced};
use emu_6502::{Cmos, Nmos, flags};
use emu_core::{Bus, Cpu, Edge, Interrupt, Level, Observable, Pin, StepEvent, Value};

#[test]
fn reset_sequence_reads_the_stack_without_writing() {
    let (mut cpu, mut bus) = boot::<Nmos>(&[]);
    install_vectors(&mut bus);
    cpu.regs.s = 0x00;
    cpu.reset();

    let (outcome, addresses) = traced(&mut cpu, &mut bus);
    assert_eq!(outcome.event, StepEvent::Interrupt(Interrupt::Reset));
    assert_eq!(outcome.cycles, 7);
    assert_eq!(
        addresses,
        [ORIGIN, ORIGIN, 0x0100, 0x01FF, 0x01FE, 0xFFFC, 0xFFFD]
    );
    assert_eq!(cpu.regs.s, 0xFD);
    assert_eq!(cpu.regs.pc, 0x8000);
    assert!(cpu.regs.p.is_set(flags::I));
    assert_eq!(bus.peek(0x0100), 0);
}

#[test]
fn masked_irq_is_ignored() {
    let (mut cpu, mut bus) = boot::<Nmos>(&[0xEA]);
    install_vectors(&mut bus);
    assert!(!cpu.interrupt());
    let outcome = cpu.step(&mut bus);
    assert_eq!(outcome.event, StepEvent::Instruction { opcode: 0xEA });
}

#[test]
fn halted_cpus_refuse_interrupts() {
    let (mut cpu, mut bus) = boot::<Nmos>(&[0x02]);
    cpu.set_status(0);
    cpu.step(&mut bus);
    assert!(cpu.is_halted());
    assert!(!cpu.interrupt());

    let (mut cpu, mut bus) = boot::<Cmos>(&[0xDB]);
    cpu.set_status(0);
    cpu.step(&mut bus);
    assert!(!cpu.interrupt());

    // WAI is woken by the request and services it
    let (mut cpu, mut bus) = boot::<Cmos>(&[0xCB]);
    install_vectors(&mut bus);
    cpu.set_status(0);
    cpu.step(&mut bus);
    assert!(cpu.interrupt());
    assert_eq!(cpu.step(&mut bus).event, StepEvent::Interrupt(Interrupt::Irq));
}

#[test]
fn irq_pushes_status_without_break() {
    let (mut cpu, mut bus) = boot::<Nmos>(&[0xEA]);
    install_vectors(&mut bus);
    cpu.set_status(flags::C);
    assert!(cpu.interrupt());

    let outcome = cpu.step(&mut bus);
    assert_eq!(outcome.event, StepEvent::Interrupt(Interrupt::Irq));
    assert_eq!(outcome.cycles, 7);
    assert_eq!(cpu.regs.pc, 0xA000);
    assert_eq!(bus.peek(0x01FD), 0x02);
    assert_eq!(bus.peek(0x01FC), 0x00);
    assert_eq!(bus.peek(0x01FB), 0x21);
    assert!(cpu.regs.p.is_set(flags::I));

    // Level-triggered: still raised, but now masked
    assert_eq!(cpu.step(&mut bus).event, StepEvent::Instruction { opcode: 0x00 });
}

#[test]
fn nmi_is_edge_triggered() {
    let (mut cpu, mut bus) = boot::<Nmos>(&[0xEA, 0xEA]);
    install_vectors(&mut bus);
    bus.load(0x9000, &[0xEA]);

    assert_eq!(cpu.set_pin(Pin::Nmi, Level::Raised), Edge::Rose);
    assert_eq!(cpu.set_pin(Pin::Nmi, Level::Raised), Edge::NoChange);

    assert_eq!(cpu.step(&mut bus).event, StepEvent::Interrupt(Interrupt::Nmi));
    assert_eq!(cpu.regs.pc, 0x9000);
    // Held high: no second NMI
    assert_eq!(cpu.step(&mut bus).event, StepEvent::Instruction { opcode: 0xEA });
}

#[test]
fn reset_wins_over_nmi_and_discards_it() {
    let (mut cpu, mut bus) = boot::<Nmos>(&[]);
    install_vectors(&mut bus);
    bus.load(0x8000, &[0xEA]);
    cpu.nmi();
    cpu.reset();

    assert_eq!(cpu.step(&mut bus).event, StepEvent::Interrupt(Interrupt::Reset));
    assert_eq!(cpu.step(&mut bus).event, StepEvent::Instruction { opcode: 0xEA });
}

#[test]
fn nmi_wins_over_irq() {
    let (mut cpu, mut bus) = boot::<Nmos>(&[0xEA]);
    install_vectors(&mut bus);
    cpu.set_status(0);
    cpu.interrupt();
    cpu.nmi();
    assert_eq!(cpu.step(&mut bus).event, StepEvent::Interrupt(Interrupt::Nmi));
}

#[test]
fn powered_off_cpu_does_nothing() {
    let (mut cpu, mut bus) = boot::<Nmos>(&[0xEA]);
    cpu.set_pin(Pin::Power, Level::Lowered);
    let outcome = cpu.step(&mut bus);
    assert_eq!(outcome.event, StepEvent::PoweredOff);
    assert!(!outcome.advanced());

    cpu.set_pin(Pin::Power, Level::Raised);
    assert_eq!(cpu.step(&mut bus).event, StepEvent::Instruction { opcode: 0xEA });
}

#[test]
fn set_overflow_pin_sets_v_on_the_rising_edge() {
    let (mut cpu, _) = boot::<Nmos>(&[]);
    cpu.set_pin(Pin::So, Level::Raised);
    assert!(cpu.regs.p.is_set(flags::V));
    cpu.regs.p.clear(flags::V);
    cpu.set_pin(Pin::So, Level::Raised);
    assert!(!cpu.regs.p.is_set(flags::V));
}

#[test]
fn registers_are_observable() {
    let (mut cpu, mut bus) = boot::<Nmos>(&[0xA2, 0x7F]);
    cpu.step(&mut bus);
    assert_eq!(cpu.query("x"), Some(Value::U8(0x7F)));
    assert_eq!(cpu.query("pc"), Some(Value::U16(ORIGIN + 2)));
    assert_eq!(cpu.query("flags.n"), Some(Value::Bool(false)));
    assert_eq!(cpu.query("state"), Some(Value::String("running".into())));
    assert_eq!(cpu.query("nonsense"), None);
    for path in cpu.query_paths() {
        assert!(cpu.query(path).is_some(), "{path}");
    }
}
