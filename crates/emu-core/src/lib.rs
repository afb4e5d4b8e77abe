//! Core traits and types for cycle-accurate 8-bit CPU emulation.
//!
//! Every bus access goes through [`Clock`], which is the single unit of
//! forward progress. CPUs own their pins and clock; boards own the bus.

pub mod alu;
mod bus;
mod clock;
mod cpu;
mod cycle;
mod error;
mod interrupt;
mod observable;
mod pin;
mod ticks;

pub use alu::{
    AluResult, DecimalQuirks, add, add_decimal, and, compare, decimal_adjust, decrement,
    increment, or, rotate_left, rotate_right, shift_left, shift_right, subtract,
    subtract_decimal, xor,
};
pub use bus::{Access, Bus, MemoryMap, Region};
pub use clock::Clock;
pub use cpu::{Cpu, StepEvent, StepOutcome};
pub use cycle::{BusAction, Cycle};
pub use error::BusError;
pub use interrupt::{Interrupt, InterruptLatch, InterruptState};
pub use observable::{Observable, Value};
pub use pin::{Edge, Level, Pin, Pins};
pub use ticks::Ticks;
