//! Errors that end a CP/M run early.

use std::fmt;
use std::io;

use emu_core::LoadError;
use intel_8080::InvalidOpcode;

/// Error type for placing a `.COM` image in memory.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ImageError {
    /// The configured load address falls inside the page-zero vectors.
    LoadAddressInPageZero { load_address: u16 },
    /// The image runs past the end of memory.
    Load(LoadError),
}

impl fmt::Display for ImageError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::LoadAddressInPageZero { load_address } => write!(
                f,
                "load address ${load_address:04X} overlaps the page-zero vectors"
            ),
            Self::Load(e) => write!(f, "{e}"),
        }
    }
}

impl std::error::Error for ImageError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::Load(e) => Some(e),
            Self::LoadAddressInPageZero { .. } => None,
        }
    }
}

impl From<LoadError> for ImageError {
    fn from(e: LoadError) -> Self {
        Self::Load(e)
    }
}

/// Error type for CP/M runs.
#[derive(Debug)]
pub enum RunError {
    /// The CPU fetched an opcode it cannot decode.
    InvalidOpcode(InvalidOpcode),
    /// The flags byte lost its fixed bit or gained a reserved one.
    FlagsCorrupted { pc: u16, flags: u8 },
    /// The program ran past the configured instruction limit.
    InstructionLimit { limit: u64 },
    /// Console output could not be written.
    Io(io::Error),
}

impl fmt::Display for RunError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::InvalidOpcode(fault) => write!(f, "{fault}"),
            Self::FlagsCorrupted { pc, flags } => {
                write!(f, "flags byte ${flags:02X} corrupted at ${pc:04X}")
            }
            Self::InstructionLimit { limit } => {
                write!(f, "instruction limit of {limit} reached")
            }
            Self::Io(e) => write!(f, "console write failed: {e}"),
        }
    }
}

impl std::error::Error for RunError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::InvalidOpcode(fault) => Some(fault),
            Self::Io(e) => Some(e),
            _ => None,
        }
    }
}

impl From<InvalidOpcode> for RunError {
    fn from(fault: InvalidOpcode) -> Self {
        Self::InvalidOpcode(fault)
    }
}

impl From<io::Error> for RunError {
    fn from(e: io::Error) -> Self {
        Self::Io(e)
    }
}
