//! Bus trace events.

use std::fmt;

/// Classification of one bus transaction.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum BusAction {
    /// Opcode fetch (SYNC/M1 asserted).
    Fetch,
    /// Memory read.
    Read,
    /// First read of a read-modify-write.
    ModifyRead,
    /// Memory write.
    Write,
    /// Port read.
    IoRead,
    /// Port write.
    IoWrite,
    /// Interrupt acknowledge; the data bus supplies an opcode.
    Acknowledge,
}

impl BusAction {
    /// True for transactions that strobe WR rather than RD.
    #[must_use]
    pub const fn is_write(self) -> bool {
        matches!(self, BusAction::Write | BusAction::IoWrite)
    }
}

impl fmt::Display for BusAction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            BusAction::Fetch => "fetch",
            BusAction::Read => "read",
            BusAction::ModifyRead => "modify",
            BusAction::Write => "write",
            BusAction::IoRead => "in",
            BusAction::IoWrite => "out",
            BusAction::Acknowledge => "inta",
        };
        f.write_str(name)
    }
}

/// One recorded bus transaction.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Cycle {
    pub address: u16,
    pub value: u8,
    pub action: BusAction,
}

impl fmt::Display for Cycle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "${:04X} ${:02X} {}", self.address, self.value, self.action)
    }
}
