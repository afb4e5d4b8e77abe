//! 6502-family CPU: bus primitives, the step loop and entry sequences.
//!
//! Each call to `step()` runs one whole instruction (or one interrupt or
//! reset sequence). Every bus access inside it goes through the clock, so
//! the cycle count and trace come out exact without a per-cycle state
//! machine.

use std::marker::PhantomData;

use emu_core::{
    Bus, BusAction, Clock, Cpu, Cycle, Edge, Interrupt, InterruptLatch, InterruptState, Level,
    Observable, Pin, StepEvent, StepOutcome, Value,
};

use crate::flags::{B, C, D, I, N, V, Z};
use crate::variant::{Cmos, Nmos, Ricoh, Variant};
use crate::{Registers, Status};

const NMI_VECTOR: u16 = 0xFFFA;
const RESET_VECTOR: u16 = 0xFFFC;
pub(crate) const IRQ_VECTOR: u16 = 0xFFFE;

/// Why the CPU is not fetching instructions.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum RunState {
    Running,
    /// NMOS JAM: the bus loops on $FFFF until reset.
    Jammed,
    /// 65C02 WAI: asleep until any interrupt request.
    Waiting,
    /// 65C02 STP: asleep until reset.
    Stopped,
}

/// A 6502-family CPU.
///
/// The variant parameter selects decode table and silicon quirks; see
/// [`Variant`].
#[derive(Debug, Clone)]
pub struct Mos6502<V: Variant> {
    /// CPU registers.
    pub regs: Registers,
    pub(crate) clock: Clock,
    latch: InterruptLatch,
    pub(crate) run: RunState,
    variant: PhantomData<V>,
}

/// NMOS 6502.
pub type Nmos6502 = Mos6502<Nmos>;
/// WDC 65C02.
pub type Cmos65c02 = Mos6502<Cmos>;
/// Ricoh 2A03.
pub type Ricoh2a03 = Mos6502<Ricoh>;

impl<V: Variant> Default for Mos6502<V> {
    fn default() -> Self {
        Self::new()
    }
}

impl<V: Variant> Mos6502<V> {
    /// A powered CPU with power-on registers. Nothing is fetched until the
    /// first `step()`; call [`Cpu::reset`] first to run the reset sequence.
    #[must_use]
    pub fn new() -> Self {
        Self {
            regs: Registers::new(),
            clock: Clock::new(),
            latch: InterruptLatch::new(),
            run: RunState::Running,
            variant: PhantomData,
        }
    }

    /// Chip name of the variant.
    #[must_use]
    pub fn name(&self) -> &'static str {
        V::NAME
    }

    /// Overwrite P, keeping bit 5 set.
    pub fn set_status(&mut self, value: u8) {
        self.regs.p = Status::from_byte(value);
    }

    /// Bus cycles since construction.
    #[must_use]
    pub fn cycles(&self) -> u64 {
        self.clock.cycles()
    }

    // =========================================================================
    // Bus primitives
    // =========================================================================

    pub(crate) fn read<B: Bus>(&mut self, bus: &mut B, address: u16) -> u8 {
        self.clock.read(bus, address, BusAction::Read, 1)
    }

    pub(crate) fn read_modify<B: Bus>(&mut self, bus: &mut B, address: u16) -> u8 {
        self.clock.read(bus, address, BusAction::ModifyRead, 1)
    }

    pub(crate) fn write<B: Bus>(&mut self, bus: &mut B, address: u16, value: u8) {
        self.clock.write(bus, address, value, BusAction::Write, 1);
    }

    /// A read whose value is discarded.
    pub(crate) fn dummy_read<B: Bus>(&mut self, bus: &mut B, address: u16) {
        let _ = self.read(bus, address);
    }

    /// Read the byte at PC and advance PC.
    pub(crate) fn fetch<B: Bus>(&mut self, bus: &mut B) -> u8 {
        let value = self.read(bus, self.regs.pc);
        self.regs.pc = self.regs.pc.wrapping_add(1);
        value
    }

    /// Read a little-endian word at PC and advance PC past it.
    pub(crate) fn fetch_word<B: Bus>(&mut self, bus: &mut B) -> u16 {
        let lo = self.fetch(bus);
        let hi = self.fetch(bus);
        u16::from_le_bytes([lo, hi])
    }

    pub(crate) fn push<B: Bus>(&mut self, bus: &mut B, value: u8) {
        let addr = self.regs.push();
        self.write(bus, addr, value);
    }

    pub(crate) fn pull<B: Bus>(&mut self, bus: &mut B) -> u8 {
        let addr = self.regs.pop();
        self.read(bus, addr)
    }

    // =========================================================================
    // Step loop
    // =========================================================================

    fn run_step<B: Bus>(&mut self, bus: &mut B) -> StepEvent {
        if !self.is_powered() {
            return StepEvent::PoweredOff;
        }

        let halted = self.run != RunState::Running;
        let state = self
            .latch
            .poll(self.clock.pins(), self.regs.p.is_set(I), halted);
        let accepts_interrupts = matches!(self.run, RunState::Running | RunState::Waiting);
        match state {
            InterruptState::ResetPending => {
                self.latch.acknowledge(Interrupt::Reset);
                self.enter_reset(bus);
                return StepEvent::Interrupt(Interrupt::Reset);
            }
            InterruptState::NmiPending if accepts_interrupts => {
                self.latch.acknowledge(Interrupt::Nmi);
                self.enter_interrupt(bus, NMI_VECTOR);
                return StepEvent::Interrupt(Interrupt::Nmi);
            }
            InterruptState::IrqPending if accepts_interrupts => {
                self.enter_interrupt(bus, IRQ_VECTOR);
                return StepEvent::Interrupt(Interrupt::Irq);
            }
            _ => {}
        }

        match self.run {
            RunState::Running => {}
            RunState::Jammed => {
                self.dummy_read(bus, 0xFFFF);
                return StepEvent::Halted;
            }
            // A masked IRQ still ends WAI; execution resumes after it
            RunState::Waiting if self.clock.pins().is_raised(Pin::Int) => {
                self.run = RunState::Running;
            }
            RunState::Waiting | RunState::Stopped => {
                self.clock.idle(1);
                return StepEvent::Halted;
            }
        }

        if !self.clock.pins().is_raised(Pin::Rdy) {
            self.dummy_read(bus, self.regs.pc);
            return StepEvent::Stalled;
        }

        let opcode = self
            .clock
            .read(bus, self.regs.pc, BusAction::Fetch, 1);
        self.regs.pc = self.regs.pc.wrapping_add(1);
        self.execute(bus, opcode);
        StepEvent::Instruction { opcode }
    }

    /// Reset: two dummy reads, three stack reads that move S without
    /// writing, then the vector. 7 cycles.
    fn enter_reset<B: Bus>(&mut self, bus: &mut B) {
        log::debug!("{} reset", V::NAME);
        self.dummy_read(bus, self.regs.pc);
        self.dummy_read(bus, self.regs.pc);
        for _ in 0..3 {
            let addr = self.regs.push();
            self.dummy_read(bus, addr);
        }
        self.regs.p.set(I);
        if V::clears_decimal_on_interrupt() {
            self.regs.p.clear(D);
        }
        self.regs.pc = self.read_vector(bus, RESET_VECTOR);
        self.run = RunState::Running;
    }

    /// NMI/IRQ: two dummy reads of PC, push PC and P (B clear), vector. 7 cycles.
    fn enter_interrupt<B: Bus>(&mut self, bus: &mut B, vector: u16) {
        log::debug!("{} interrupt via ${vector:04X} from ${:04X}", V::NAME, self.regs.pc);
        self.run = RunState::Running;
        self.dummy_read(bus, self.regs.pc);
        self.dummy_read(bus, self.regs.pc);
        self.push_return_state(bus, self.regs.p.to_byte_irq());
        self.regs.pc = self.read_vector(bus, vector);
    }

    /// Push PC and a status byte, then mask interrupts.
    pub(crate) fn push_return_state<B: Bus>(&mut self, bus: &mut B, status: u8) {
        let [lo, hi] = self.regs.pc.to_le_bytes();
        self.push(bus, hi);
        self.push(bus, lo);
        self.push(bus, status);
        self.regs.p.set(I);
        if V::clears_decimal_on_interrupt() {
            self.regs.p.clear(D);
        }
    }

    pub(crate) fn read_vector<B: Bus>(&mut self, bus: &mut B, vector: u16) -> u16 {
        let lo = self.read(bus, vector);
        let hi = self.read(bus, vector.wrapping_add(1));
        u16::from_le_bytes([lo, hi])
    }
}

impl<V: Variant> Cpu for Mos6502<V> {
    type Registers = Registers;

    fn step<B: Bus>(&mut self, bus: &mut B) -> StepOutcome {
        let cycles = self.clock.cycles();
        let ticks = self.clock.ticks();
        let event = self.run_step(bus);
        StepOutcome {
            cycles: (self.clock.cycles() - cycles) as u32,
            ticks: self.clock.ticks() - ticks,
            event,
        }
    }

    fn pc(&self) -> u32 {
        u32::from(self.regs.pc)
    }

    fn registers(&self) -> Registers {
        self.regs
    }

    fn is_halted(&self) -> bool {
        self.run != RunState::Running
    }

    fn set_pin(&mut self, pin: Pin, level: Level) -> Edge {
        let edge = self.clock.pins_mut().set(pin, level);
        self.latch.observe(pin, edge);
        if pin == Pin::So && edge == Edge::Rose {
            self.regs.p.set(V);
        }
        edge
    }

    fn pin(&self, pin: Pin) -> Level {
        if pin == Pin::Halt {
            return (self.run != RunState::Running).into();
        }
        self.clock.pins().level(pin)
    }

    fn arm_trace(&mut self) {
        self.clock.arm_trace();
    }

    fn trace(&self) -> &[Cycle] {
        self.clock.trace()
    }

    fn take_trace(&mut self) -> Vec<Cycle> {
        self.clock.take_trace()
    }

    fn interrupt(&mut self) -> bool {
        self.set_pin(Pin::Int, Level::Raised);
        match self.run {
            RunState::Running | RunState::Waiting => !self.regs.p.is_set(I),
            // Only RESET leaves these
            RunState::Jammed | RunState::Stopped => false,
        }
    }
}

impl<V: Variant> Observable for Mos6502<V> {
    fn query(&self, path: &str) -> Option<Value> {
        let p = self.regs.p;
        match path {
            "pc" => Some(self.regs.pc.into()),
            "a" => Some(self.regs.a.into()),
            "x" => Some(self.regs.x.into()),
            "y" => Some(self.regs.y.into()),
            "s" => Some(self.regs.s.into()),
            "p" => Some(p.0.into()),
            "flags.c" => Some(p.is_set(C).into()),
            "flags.z" => Some(p.is_set(Z).into()),
            "flags.i" => Some(p.is_set(I).into()),
            "flags.d" => Some(p.is_set(D).into()),
            "flags.b" => Some(p.is_set(B).into()),
            "flags.v" => Some(p.is_set(V).into()),
            "flags.n" => Some(p.is_set(N).into()),
            "cycles" => Some(self.clock.cycles().into()),
            "state" => Some(
                match self.run {
                    RunState::Running => "running",
                    RunState::Jammed => "jammed",
                    RunState::Waiting => "waiting",
                    RunState::Stopped => "stopped",
                }
                .into(),
            ),
            _ => None,
        }
    }

    fn query_paths(&self) -> &'static [&'static str] {
        &[
            "pc", "a", "x", "y", "s", "p", "flags.c", "flags.z", "flags.i", "flags.d", "flags.b",
            "flags.v", "flags.n", "cycles", "state",
        ]
    }
}
