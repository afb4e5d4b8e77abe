//! Test vector schema.
//!
//! Files are JSON arrays of vectors in the SingleStepTests layout. Unknown
//! fields are rejected so a schema drift shows up as a load error rather
//! than as silently skipped checks.

use std::fmt;
use std::fs;
use std::path::Path;
use std::str::FromStr;

use emu_core::BusAction;
use serde::Deserialize;
use serde::de::DeserializeOwned;

use crate::VectorError;

/// Direction of one expected bus transaction.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(try_from = "String")]
pub enum Action {
    Read,
    Write,
    IoRead,
    IoWrite,
    /// A clock state with no transaction (`---`).
    Idle,
}

impl Action {
    /// Classify a recorded transaction. Fetches, the first read of a
    /// read-modify-write and interrupt acknowledges all count as reads.
    #[must_use]
    pub const fn of(action: BusAction) -> Self {
        match action {
            BusAction::Fetch | BusAction::Read | BusAction::ModifyRead | BusAction::Acknowledge => {
                Action::Read
            }
            BusAction::Write => Action::Write,
            BusAction::IoRead => Action::IoRead,
            BusAction::IoWrite => Action::IoWrite,
        }
    }
}

impl FromStr for Action {
    type Err = VectorError;

    /// Accepts `read`/`write` and three-character pin strings such as
    /// `r--`, `-w-`, `r-i`, `-wi` and `---`.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let action = match s {
            "read" => Action::Read,
            "write" => Action::Write,
            _ => match s.as_bytes() {
                [b'r', b'-', io] => {
                    if *io == b'i' {
                        Action::IoRead
                    } else {
                        Action::Read
                    }
                }
                [b'-', b'w', io] => {
                    if *io == b'i' {
                        Action::IoWrite
                    } else {
                        Action::Write
                    }
                }
                [b'-', b'-', _] => Action::Idle,
                _ => return Err(VectorError::Action(s.to_owned())),
            },
        };
        Ok(action)
    }
}

impl TryFrom<String> for Action {
    type Error = VectorError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

impl fmt::Display for Action {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            Action::Read => "read",
            Action::Write => "write",
            Action::IoRead => "in",
            Action::IoWrite => "out",
            Action::Idle => "idle",
        };
        f.write_str(s)
    }
}

/// One expected transaction: address, data (absent when undriven) and action.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
pub struct ExpectedCycle(pub u16, pub Option<u8>, pub Action);

impl ExpectedCycle {
    #[must_use]
    pub const fn address(&self) -> u16 {
        self.0
    }

    #[must_use]
    pub const fn value(&self) -> Option<u8> {
        self.1
    }

    #[must_use]
    pub const fn action(&self) -> Action {
        self.2
    }
}

impl fmt::Display for ExpectedCycle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.1 {
            Some(value) => write!(f, "${:04X} ${value:02X} {}", self.0, self.2),
            None => write!(f, "${:04X} -- {}", self.0, self.2),
        }
    }
}

/// One instruction's worth of expectations.
#[derive(Debug, Clone, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct TestVector<S> {
    pub name: String,
    pub initial: S,
    #[serde(rename = "final")]
    pub final_state: S,
    pub cycles: Vec<ExpectedCycle>,
    /// Port traffic as `(address, value, "r" | "w")`; only I/O vectors carry it.
    #[serde(default)]
    pub ports: Vec<(u16, u8, String)>,
}

impl<S> TestVector<S> {
    /// Values the CPU reads from ports, as `(address, value)`.
    ///
    /// Taken from `ports` when present, otherwise from the `r-i`
    /// transactions of the trace.
    #[must_use]
    pub fn port_inputs(&self) -> Vec<(u16, u8)> {
        let listed: Vec<_> = self
            .ports
            .iter()
            .filter(|(_, _, direction)| direction == "r")
            .map(|&(address, value, _)| (address, value))
            .collect();
        if !listed.is_empty() {
            return listed;
        }
        self.transactions()
            .filter_map(|cycle| match (cycle.action(), cycle.value()) {
                (Action::IoRead, Some(value)) => Some((cycle.address(), value)),
                _ => None,
            })
            .collect()
    }

    /// Expected transactions, without idle states.
    pub fn transactions(&self) -> impl Iterator<Item = &ExpectedCycle> {
        self.cycles.iter().filter(|c| c.action() != Action::Idle)
    }
}

/// 6502-family machine state.
#[derive(Debug, Clone, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct Mos6502State {
    pub pc: u16,
    pub s: u8,
    pub a: u8,
    pub x: u8,
    pub y: u8,
    pub p: u8,
    pub ram: Vec<(u16, u8)>,
}

/// 8080 machine state.
#[derive(Debug, Clone, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct I8080State {
    pub pc: u16,
    pub sp: u16,
    pub a: u8,
    pub b: u8,
    pub c: u8,
    pub d: u8,
    pub e: u8,
    pub f: u8,
    pub h: u8,
    pub l: u8,
    /// Interrupt enable; absent means the vector does not care.
    #[serde(default)]
    pub ie: Option<u8>,
    pub ram: Vec<(u16, u8)>,
}

/// Read and parse a vector file.
pub fn load_vectors<S: DeserializeOwned>(path: &Path) -> Result<Vec<TestVector<S>>, VectorError> {
    let data = fs::read_to_string(path).map_err(|source| VectorError::Io {
        path: path.to_path_buf(),
        source,
    })?;
    serde_json::from_str(&data).map_err(|source| VectorError::Json {
        path: path.to_path_buf(),
        source,
    })
}
