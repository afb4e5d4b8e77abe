//! CPU core trait.

use crate::{Bus, Cycle, Edge, Interrupt, Level, Pin, Ticks};

/// What a single step did.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StepEvent {
    /// An instruction was fetched and executed.
    Instruction { opcode: u8 },
    /// An interrupt or reset entry sequence ran instead of an instruction.
    Interrupt(Interrupt),
    /// The CPU is halted (JAM, STP, WAI, HLT) and only idled.
    Halted,
    /// RDY was lowered at the fetch boundary.
    Stalled,
    /// POWER is lowered; nothing happened.
    PoweredOff,
}

/// Cost and kind of one step.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct StepOutcome {
    /// Bus transactions performed.
    pub cycles: u32,
    /// Clock states elapsed.
    pub ticks: Ticks,
    pub event: StepEvent,
}

impl StepOutcome {
    /// True if the step moved the cycle counter at all.
    ///
    /// A zero-cost step and an unimplemented step both return without bus
    /// traffic; this tells callers whether time passed.
    #[must_use]
    pub fn advanced(&self) -> bool {
        self.ticks > Ticks::ZERO
    }
}

/// A CPU core.
///
/// CPUs execute instructions and access memory through a bus. The bus is
/// passed in, not owned, so boards can share it with other components.
/// Pins are owned by the CPU and driven through [`Cpu::set_pin`].
pub trait Cpu {
    /// The type used for register inspection.
    type Registers;

    /// Execute one instruction, or one interrupt entry sequence, to completion.
    fn step<B: Bus>(&mut self, bus: &mut B) -> StepOutcome;

    /// Returns the current program counter.
    ///
    /// Returns `u32` so every address width fits; 16-bit CPUs zero-extend.
    fn pc(&self) -> u32;

    /// Returns a snapshot of all registers for inspection.
    fn registers(&self) -> Self::Registers;

    /// Returns true if the CPU is halted.
    fn is_halted(&self) -> bool;

    /// Drive an input pin. Re-asserting the current level is a no-op.
    fn set_pin(&mut self, pin: Pin, level: Level) -> Edge;

    /// Current level of any pin.
    fn pin(&self, pin: Pin) -> Level;

    /// True while POWER is raised.
    fn is_powered(&self) -> bool {
        self.pin(Pin::Power) == Level::Raised
    }

    /// Start recording bus transactions.
    fn arm_trace(&mut self);

    /// Transactions recorded since the trace was armed.
    fn trace(&self) -> &[Cycle];

    /// Stop recording and return the trace.
    fn take_trace(&mut self) -> Vec<Cycle>;

    /// Raise INT. Returns true if the CPU would service it now.
    fn interrupt(&mut self) -> bool;

    /// Pulse NMI.
    fn nmi(&mut self) {
        self.set_pin(Pin::Nmi, Level::Lowered);
        self.set_pin(Pin::Nmi, Level::Raised);
        self.set_pin(Pin::Nmi, Level::Lowered);
    }

    /// Pulse RESET. The entry sequence runs at the next fetch boundary.
    fn reset(&mut self) {
        self.set_pin(Pin::Reset, Level::Lowered);
        self.set_pin(Pin::Reset, Level::Raised);
        self.set_pin(Pin::Reset, Level::Lowered);
    }
}
