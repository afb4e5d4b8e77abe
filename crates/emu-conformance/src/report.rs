//! Mismatch reports.

use std::fmt;

use emu_core::{Cycle, Value};

use crate::vector::{Action, ExpectedCycle};

/// One difference between the vector and the run.
#[derive(Debug, Clone, PartialEq)]
pub enum Mismatch {
    Register {
        field: &'static str,
        expected: Value,
        actual: Value,
    },
    Memory {
        address: u16,
        expected: u8,
        actual: u8,
    },
    /// Transaction `index` differs, or one side ran out.
    Trace {
        index: usize,
        expected: Option<ExpectedCycle>,
        actual: Option<Cycle>,
    },
}

impl fmt::Display for Mismatch {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Mismatch::Register {
                field,
                expected,
                actual,
            } => write!(f, "{field}: got {actual}, want {expected}"),
            Mismatch::Memory {
                address,
                expected,
                actual,
            } => write!(f, "ram[${address:04X}]: got ${actual:02X}, want ${expected:02X}"),
            Mismatch::Trace {
                index,
                expected,
                actual,
            } => {
                write!(f, "cycle {index}: got ")?;
                match actual {
                    Some(cycle) => write!(f, "{cycle}")?,
                    None => f.write_str("nothing")?,
                }
                f.write_str(", want ")?;
                match expected {
                    Some(cycle) => write!(f, "{cycle}"),
                    None => f.write_str("nothing"),
                }
            }
        }
    }
}

/// Everything wrong with one vector, plus both traces for context.
#[derive(Debug, Clone, PartialEq)]
pub struct Report {
    pub name: String,
    pub mismatches: Vec<Mismatch>,
    pub expected: Vec<ExpectedCycle>,
    pub actual: Vec<Cycle>,
}

impl Report {
    /// True if any transaction differs.
    #[must_use]
    pub fn has_trace_mismatch(&self) -> bool {
        self.mismatches
            .iter()
            .any(|m| matches!(m, Mismatch::Trace { .. }))
    }
}

/// Compare an expected trace (idle states already removed) with a recorded one.
pub(crate) fn compare_traces<'a>(
    expected: impl IntoIterator<Item = &'a ExpectedCycle>,
    actual: &[Cycle],
    mismatches: &mut Vec<Mismatch>,
) {
    let expected: Vec<_> = expected.into_iter().copied().collect();
    for index in 0..expected.len().max(actual.len()) {
        let want = expected.get(index).copied();
        let got = actual.get(index).copied();
        let same = match (want, got) {
            (Some(want), Some(got)) => {
                want.address() == got.address
                    && want.action() == Action::of(got.action)
                    && want.value().is_none_or(|value| value == got.value)
            }
            _ => false,
        };
        if !same {
            mismatches.push(Mismatch::Trace {
                index,
                expected: want,
                actual: got,
            });
        }
    }
}

impl fmt::Display for Report {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "{}:", self.name)?;
        for mismatch in &self.mismatches {
            writeln!(f, "  {mismatch}")?;
        }

        writeln!(f, "  {:>3}  {:<20}  actual", "#", "expected")?;
        let transactions: Vec<_> = self
            .expected
            .iter()
            .filter(|c| c.action() != Action::Idle)
            .collect();
        for index in 0..transactions.len().max(self.actual.len()) {
            let want = transactions
                .get(index)
                .map_or_else(String::new, ToString::to_string);
            let got = self
                .actual
                .get(index)
                .map_or_else(String::new, ToString::to_string);
            let marker = if self.mismatches.iter().any(
                |m| matches!(m, Mismatch::Trace { index: i, .. } if *i == index),
            ) {
                '*'
            } else {
                ' '
            };
            writeln!(f, "{marker} {index:>3}  {want:<20}  {got}")?;
        }
        Ok(())
    }
}
