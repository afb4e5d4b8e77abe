//! Conformance oracle for the CPU cores.
//!
//! A vector gives an initial state, an expected final state and the exact
//! bus traffic one instruction should produce. [`run_vector`] replays it on a
//! fresh flat bus and compares all three; [`run_suite`] does the same for a
//! directory of vector files in parallel.

mod error;
mod harness;
mod oracle;
mod report;
mod suite;
mod vector;

pub use error::VectorError;
pub use harness::Harness;
pub use oracle::{Verdict, run_vector};
pub use report::{Mismatch, Report};
pub use suite::{FileSummary, SuiteConfig, run_file, run_suite};
pub use vector::{Action, ExpectedCycle, I8080State, Mos6502State, TestVector, load_vectors};
