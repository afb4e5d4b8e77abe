//! Interrupt and reset sequencing.
//!
//! RESET and NMI are latched on their rising edge; INT is a level. The CPU
//! polls the latch once per instruction-fetch boundary and services at most
//! one request there, highest priority first.

use crate::{Edge, Pin, Pins};

/// A serviceable request.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Interrupt {
    Reset,
    Nmi,
    Irq,
}

/// What the CPU should do at the next fetch boundary.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InterruptState {
    Running,
    ResetPending,
    NmiPending,
    IrqPending,
    Halted,
}

impl InterruptState {
    /// The request to service, if any.
    #[must_use]
    pub const fn pending(self) -> Option<Interrupt> {
        match self {
            InterruptState::ResetPending => Some(Interrupt::Reset),
            InterruptState::NmiPending => Some(Interrupt::Nmi),
            InterruptState::IrqPending => Some(Interrupt::Irq),
            InterruptState::Running | InterruptState::Halted => None,
        }
    }
}

/// Edge latches for the edge-triggered request pins.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct InterruptLatch {
    reset: bool,
    nmi: bool,
}

impl InterruptLatch {
    #[must_use]
    pub const fn new() -> Self {
        Self {
            reset: false,
            nmi: false,
        }
    }

    /// Feed a pin transition. Only rising RESET/NMI edges latch anything.
    pub fn observe(&mut self, pin: Pin, edge: Edge) {
        match (pin, edge) {
            (Pin::Reset, Edge::Rose) => self.reset = true,
            (Pin::Nmi, Edge::Rose) => self.nmi = true,
            _ => {}
        }
    }

    /// Decide what happens at this fetch boundary.
    ///
    /// Priority is RESET, then NMI, then IRQ (only when `irq_masked` is
    /// false). With nothing serviceable a halted CPU stays halted.
    #[must_use]
    pub fn poll(&self, pins: Pins, irq_masked: bool, halted: bool) -> InterruptState {
        if self.reset {
            InterruptState::ResetPending
        } else if self.nmi {
            InterruptState::NmiPending
        } else if pins.is_raised(Pin::Int) && !irq_masked {
            InterruptState::IrqPending
        } else if halted {
            InterruptState::Halted
        } else {
            InterruptState::Running
        }
    }

    /// Clear the latch for a request that is being serviced.
    ///
    /// Reset discards a pending NMI as well.
    pub fn acknowledge(&mut self, interrupt: Interrupt) {
        match interrupt {
            Interrupt::Reset => *self = Self::new(),
            Interrupt::Nmi => self.nmi = false,
            Interrupt::Irq => {}
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    fn latch_with(reset: bool, nmi: bool) -> InterruptLatch {
        let mut latch = InterruptLatch::new();
        if reset {
            latch.observe(Pin::Reset, Edge::Rose);
        }
        if nmi {
            latch.observe(Pin::Nmi, Edge::Rose);
        }
        latch
    }

    #[rstest]
    #[case(true, true, true, false, InterruptState::ResetPending)]
    #[case(false, true, true, false, InterruptState::NmiPending)]
    #[case(false, false, true, false, InterruptState::IrqPending)]
    #[case(false, false, true, true, InterruptState::Running)]
    #[case(false, true, true, true, InterruptState::NmiPending)]
    #[case(false, false, false, false, InterruptState::Running)]
    fn priority(
        #[case] reset: bool,
        #[case] nmi: bool,
        #[case] irq: bool,
        #[case] masked: bool,
        #[case] expected: InterruptState,
    ) {
        let latch = latch_with(reset, nmi);
        let mut pins = Pins::powered();
        if irq {
            pins.raise(Pin::Int);
        }
        assert_eq!(latch.poll(pins, masked, false), expected);
    }

    #[test]
    fn falling_and_repeated_edges_do_not_latch() {
        let mut latch = InterruptLatch::new();
        latch.observe(Pin::Nmi, Edge::Fell);
        latch.observe(Pin::Nmi, Edge::NoChange);
        latch.observe(Pin::Int, Edge::Rose);
        assert_eq!(latch, InterruptLatch::new());
    }

    #[test]
    fn acknowledge_clears_only_what_was_serviced() {
        let mut latch = latch_with(false, true);
        latch.acknowledge(Interrupt::Irq);
        assert_eq!(latch.poll(Pins::powered(), false, false), InterruptState::NmiPending);
        latch.acknowledge(Interrupt::Nmi);
        assert_eq!(latch.poll(Pins::powered(), false, true), InterruptState::Halted);

        let mut latch = latch_with(true, true);
        latch.acknowledge(Interrupt::Reset);
        assert_eq!(latch.poll(Pins::powered(), false, false), InterruptState::Running);
    }
}
