//! Cycle-accurate 6502-family CPU emulator.
//!
//! One execution driver covers the NMOS 6502, the WDC 65C02 and the Ricoh
//! 2A03. Each `step()` runs a whole instruction, but every bus access in it
//! is a separate clocked cycle, so traces and cycle counts match silicon.
//!
//! ```
//! use emu_6502::Nmos6502;
//! use emu_core::{Cpu, MemoryMap};
//!
//! let mut bus = MemoryMap::flat();
//! bus.load(0xFFFC, &[0x00, 0x02]);
//! bus.load(0x0200, &[0xA9, 0x42]); // LDA #$42
//!
//! let mut cpu = Nmos6502::new();
//! cpu.reset();
//! cpu.step(&mut bus); // reset sequence
//! let outcome = cpu.step(&mut bus);
//! assert_eq!(outcome.cycles, 2);
//! assert_eq!(cpu.regs.a, 0x42);
//! ```

mod addressing;
pub mod cmos;
mod cpu;
pub mod decode;
mod execute;
pub mod flags;
pub mod nmos;
mod registers;
mod variant;

pub use cpu::{Cmos65c02, Mos6502, Nmos6502, Ricoh2a03};
pub use decode::{Condition, FixupPolicy, Instruction, Kind, Mode, Op};
pub use flags::Status;
pub use registers::Registers;
pub use variant::{Cmos, Fixup, ModifyWrite, Nmos, Ricoh, Variant};
