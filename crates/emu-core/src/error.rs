//! Bus configuration errors.

use thiserror::Error;

/// Errors raised while building or decoding a memory map.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum BusError {
    #[error("region {name} at ${base:04X} overlaps {other}")]
    Overlap {
        name: &'static str,
        base: u16,
        other: &'static str,
    },
    #[error("region {name} has zero size")]
    Empty { name: &'static str },
    #[error("region {name} at ${base:04X} with size {size:#X} runs past $FFFF")]
    OutOfRange {
        name: &'static str,
        base: u16,
        size: usize,
    },
    #[error("access to unmapped address ${address:04X}")]
    Unmapped { address: u16 },
}
