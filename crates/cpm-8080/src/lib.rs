//! Minimal CP/M host for running 8080 `.COM` programs.
//!
//! Enough of the CP/M environment to run console test programs such as
//! CPUTEST and 8080EXM: a flat 64K TPA, a trapped BDOS entry with the
//! console output calls, and a warm-boot exit.

mod config;
mod error;
mod machine;

pub use config::CpmConfig;
pub use error::{ImageError, RunError};
pub use machine::{BDOS_ENTRY, CpmMachine, Exit, RunReport, WARM_BOOT};
