//! The single-cycle bus primitive.
//!
//! Every bus transaction a CPU performs goes through [`Clock::read`] or
//! [`Clock::write`]. The clock strobes RD/WR, drives SYNC on opcode fetches,
//! counts bus cycles and clock states, and records a [`Cycle`] on every rising
//! strobe while the trace is armed.

use crate::{Bus, BusAction, Cycle, Edge, Pin, Pins, Ticks};

/// Bus cycle counter, pin file and trace recorder for one CPU.
#[derive(Debug, Clone)]
pub struct Clock {
    pins: Pins,
    cycles: u64,
    ticks: Ticks,
    last_address: u16,
    trace: Option<Vec<Cycle>>,
}

impl Default for Clock {
    fn default() -> Self {
        Self::new()
    }
}

impl Clock {
    /// A powered, ready clock with tracing disarmed.
    #[must_use]
    pub const fn new() -> Self {
        Self {
            pins: Pins::powered(),
            cycles: 0,
            ticks: Ticks::ZERO,
            last_address: 0,
            trace: None,
        }
    }

    /// Perform one read transaction lasting `states` clock states.
    pub fn read<B: Bus>(&mut self, bus: &mut B, address: u16, action: BusAction, states: u64) -> u8 {
        let value = match action {
            BusAction::IoRead => bus.io_read(address),
            _ => bus.read(address),
        };
        self.tick(address, value, action, states);
        value
    }

    /// Perform one write transaction lasting `states` clock states.
    pub fn write<B: Bus>(
        &mut self,
        bus: &mut B,
        address: u16,
        value: u8,
        action: BusAction,
        states: u64,
    ) {
        match action {
            BusAction::IoWrite => bus.io_write(address, value),
            _ => bus.write(address, value),
        }
        self.tick(address, value, action, states);
    }

    /// Record a transaction whose data is supplied by an interrupting device
    /// rather than the memory map.
    pub fn acknowledge(&mut self, address: u16, value: u8, states: u64) {
        self.tick(address, value, BusAction::Acknowledge, states);
    }

    /// Burn internal clock states with no bus transaction.
    pub fn idle(&mut self, states: u64) {
        self.ticks += Ticks::new(states);
    }

    fn tick(&mut self, address: u16, value: u8, action: BusAction, states: u64) {
        self.pins.set(
            Pin::Sync,
            matches!(action, BusAction::Fetch | BusAction::Acknowledge).into(),
        );
        let strobe = if action.is_write() { Pin::Wr } else { Pin::Rd };
        if self.pins.raise(strobe) == Edge::Rose
            && let Some(trace) = &mut self.trace
        {
            trace.push(Cycle {
                address,
                value,
                action,
            });
        }
        self.pins.lower(strobe);

        self.last_address = address;
        self.cycles += 1;
        self.ticks += Ticks::new(states);
    }

    #[must_use]
    pub const fn pins(&self) -> Pins {
        self.pins
    }

    pub fn pins_mut(&mut self) -> &mut Pins {
        &mut self.pins
    }

    /// Bus transactions performed since construction.
    #[must_use]
    pub const fn cycles(&self) -> u64 {
        self.cycles
    }

    /// Clock states elapsed since construction.
    #[must_use]
    pub const fn ticks(&self) -> Ticks {
        self.ticks
    }

    /// Address driven by the most recent transaction.
    #[must_use]
    pub const fn last_address(&self) -> u16 {
        self.last_address
    }

    /// Start recording transactions, discarding any previous trace.
    pub fn arm_trace(&mut self) {
        self.trace = Some(Vec::new());
    }

    /// Transactions recorded so far (empty when disarmed).
    #[must_use]
    pub fn trace(&self) -> &[Cycle] {
        self.trace.as_deref().unwrap_or_default()
    }

    /// Stop recording and hand back the trace.
    pub fn take_trace(&mut self) -> Vec<Cycle> {
        self.trace.take().unwrap_or_default()
    }
}
