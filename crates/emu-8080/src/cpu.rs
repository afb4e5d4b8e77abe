//! Intel 8080 CPU: machine cycles, the step loop and interrupt acknowledge.

use emu_core::{
    Bus, BusAction, Clock, Cpu, Cycle, Edge, Interrupt, InterruptLatch, InterruptState, Level,
    Observable, Pin, StepEvent, StepOutcome, Value,
};

use crate::Registers;
use crate::flags::{ACF, CF, PF, SF, ZF};

/// States in an opcode fetch (M1).
const FETCH_STATES: u64 = 4;
/// States in a memory or I/O read or write.
const MEMORY_STATES: u64 = 3;

/// `RST 7`, what a floating data bus supplies during INTA.
const DEFAULT_INTERRUPT_OPCODE: u8 = 0xFF;

/// Intel 8080 CPU.
#[derive(Debug, Clone)]
pub struct I8080 {
    /// CPU registers.
    pub regs: Registers,
    pub(crate) clock: Clock,
    latch: InterruptLatch,
    pub(crate) halted: bool,
    /// EI was the previous instruction; INT is not sampled yet.
    pub(crate) ei_delay: bool,
    interrupt_opcode: u8,
}

impl Default for I8080 {
    fn default() -> Self {
        Self::new()
    }
}

impl I8080 {
    /// A powered CPU with PC at 0 and interrupts disabled.
    #[must_use]
    pub fn new() -> Self {
        Self {
            regs: Registers::default(),
            clock: Clock::new(),
            latch: InterruptLatch::new(),
            halted: false,
            ei_delay: false,
            interrupt_opcode: DEFAULT_INTERRUPT_OPCODE,
        }
    }

    /// Opcode the interrupting device jams onto the data bus during INTA.
    ///
    /// Normally one of the RST instructions. Any operand bytes the opcode
    /// needs are read from memory at PC.
    #[must_use]
    pub fn with_interrupt_opcode(mut self, opcode: u8) -> Self {
        self.interrupt_opcode = opcode;
        self
    }

    /// Bus cycles since construction.
    #[must_use]
    pub fn cycles(&self) -> u64 {
        self.clock.cycles()
    }

    // =========================================================================
    // Machine cycles
    // =========================================================================

    pub(crate) fn read<B: Bus>(&mut self, bus: &mut B, address: u16) -> u8 {
        self.clock.read(bus, address, BusAction::Read, MEMORY_STATES)
    }

    pub(crate) fn write<B: Bus>(&mut self, bus: &mut B, address: u16, value: u8) {
        self.clock
            .write(bus, address, value, BusAction::Write, MEMORY_STATES);
    }

    /// IN: the port number appears on both halves of the address bus.
    pub(crate) fn input<B: Bus>(&mut self, bus: &mut B, port: u8) -> u8 {
        let address = u16::from_le_bytes([port, port]);
        self.clock
            .read(bus, address, BusAction::IoRead, MEMORY_STATES)
    }

    pub(crate) fn output<B: Bus>(&mut self, bus: &mut B, port: u8, value: u8) {
        let address = u16::from_le_bytes([port, port]);
        self.clock
            .write(bus, address, value, BusAction::IoWrite, MEMORY_STATES);
    }

    /// Read the byte at PC and advance PC.
    pub(crate) fn fetch<B: Bus>(&mut self, bus: &mut B) -> u8 {
        let value = self.read(bus, self.regs.pc);
        self.regs.pc = self.regs.pc.wrapping_add(1);
        value
    }

    pub(crate) fn fetch_word<B: Bus>(&mut self, bus: &mut B) -> u16 {
        let lo = self.fetch(bus);
        let hi = self.fetch(bus);
        u16::from_le_bytes([lo, hi])
    }

    pub(crate) fn push<B: Bus>(&mut self, bus: &mut B, value: u16) {
        let [lo, hi] = value.to_le_bytes();
        self.regs.sp = self.regs.sp.wrapping_sub(1);
        self.write(bus, self.regs.sp, hi);
        self.regs.sp = self.regs.sp.wrapping_sub(1);
        self.write(bus, self.regs.sp, lo);
    }

    pub(crate) fn pop<B: Bus>(&mut self, bus: &mut B) -> u16 {
        let lo = self.read(bus, self.regs.sp);
        self.regs.sp = self.regs.sp.wrapping_add(1);
        let hi = self.read(bus, self.regs.sp);
        self.regs.sp = self.regs.sp.wrapping_add(1);
        u16::from_le_bytes([lo, hi])
    }

    // =========================================================================
    // Step loop
    // =========================================================================

    fn run_step<B: Bus>(&mut self, bus: &mut B) -> StepEvent {
        if !self.is_powered() {
            return StepEvent::PoweredOff;
        }

        let masked = !self.regs.inte || self.ei_delay;
        match self.latch.poll(self.clock.pins(), masked, self.halted) {
            InterruptState::ResetPending => {
                self.latch.acknowledge(Interrupt::Reset);
                log::debug!("8080 reset");
                self.regs.pc = 0;
                self.regs.inte = false;
                self.ei_delay = false;
                self.halted = false;
                self.clock.idle(MEMORY_STATES);
                return StepEvent::Interrupt(Interrupt::Reset);
            }
            InterruptState::IrqPending => {
                self.acknowledge_interrupt(bus);
                return StepEvent::Interrupt(Interrupt::Irq);
            }
            InterruptState::Halted => {
                self.clock.idle(1);
                return StepEvent::Halted;
            }
            InterruptState::Running | InterruptState::NmiPending => {}
        }

        let opcode = self
            .clock
            .read(bus, self.regs.pc, BusAction::Fetch, FETCH_STATES);
        self.regs.pc = self.regs.pc.wrapping_add(1);
        self.ei_delay = false;
        self.execute(bus, opcode);
        StepEvent::Instruction { opcode }
    }

    /// INTA: the device supplies an opcode in place of a fetch. PC is not
    /// advanced, so an RST pushes the address of the interrupted instruction.
    fn acknowledge_interrupt<B: Bus>(&mut self, bus: &mut B) {
        let opcode = self.interrupt_opcode;
        log::debug!(
            "8080 interrupt at ${:04X}, opcode ${opcode:02X}",
            self.regs.pc
        );
        self.halted = false;
        self.regs.inte = false;
        self.clock.acknowledge(self.regs.pc, opcode, FETCH_STATES);
        self.execute(bus, opcode);
    }
}

impl Cpu for I8080 {
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
        self.halted
    }

    fn set_pin(&mut self, pin: Pin, level: Level) -> Edge {
        let edge = self.clock.pins_mut().set(pin, level);
        // No NMI input on the 8080
        if pin != Pin::Nmi {
            self.latch.observe(pin, edge);
        }
        edge
    }

    fn pin(&self, pin: Pin) -> Level {
        if pin == Pin::Halt {
            return self.halted.into();
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
        self.regs.inte && !self.ei_delay
    }
}

impl Observable for I8080 {
    fn query(&self, path: &str) -> Option<Value> {
        let r = &self.regs;
        match path {
            "pc" => Some(r.pc.into()),
            "sp" => Some(r.sp.into()),
            "a" => Some(r.a.into()),
            "f" => Some(r.f.into()),
            "b" => Some(r.b.into()),
            "c" => Some(r.c.into()),
            "d" => Some(r.d.into()),
            "e" => Some(r.e.into()),
            "h" => Some(r.h.into()),
            "l" => Some(r.l.into()),
            "bc" => Some(r.bc().into()),
            "de" => Some(r.de().into()),
            "hl" => Some(r.hl().into()),
            "flags.s" => Some((r.f & SF != 0).into()),
            "flags.z" => Some((r.f & ZF != 0).into()),
            "flags.ac" => Some((r.f & ACF != 0).into()),
            "flags.p" => Some((r.f & PF != 0).into()),
            "flags.cy" => Some((r.f & CF != 0).into()),
            "inte" => Some(r.inte.into()),
            "halted" => Some(self.halted.into()),
            "cycles" => Some(self.clock.cycles().into()),
            _ => None,
        }
    }

    fn query_paths(&self) -> &'static [&'static str] {
        &[
            "pc", "sp", "a", "f", "b", "c", "d", "e", "h", "l", "bc", "de", "hl", "flags.s",
            "flags.z", "flags.ac", "flags.p", "flags.cy", "inte", "halted", "cycles",
        ]
    }
}
