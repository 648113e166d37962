//! Run configuration.

/// CP/M program load address (start of the TPA).
pub const TPA_START: u16 = 0x0100;

/// Default top of the TPA, as published at `$0006`.
pub const TPA_TOP: u16 = 0xFE00;

/// Settings for a CP/M run.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CpmConfig {
    /// Where the image is loaded and execution starts. Must be past the
    /// page-zero vectors at `$0000-$0007`.
    pub load_address: u16,
    /// Initial SP and the word stored at `$0006`.
    pub tpa_top: u16,
    /// Abort after this many instructions. `None` runs until exit.
    pub max_instructions: Option<u64>,
}

impl Default for CpmConfig {
    fn default() -> Self {
        Self {
            load_address: TPA_START,
            tpa_top: TPA_TOP,
            max_instructions: None,
        }
    }
}
