//! Cycle-accurate Intel 8080 CPU emulator.
//!
//! Each `step()` runs one instruction. Memory transactions last three clock
//! states and opcode fetches four; internal states are added with
//! [`emu_core::Clock::idle`], so `ticks` matches the datasheet.

mod cpu;
mod execute;
mod flags;
mod registers;

pub use cpu::I8080;
pub use flags::{ACF, CF, ONE, PF, SF, ZF};
pub use registers::Registers;
