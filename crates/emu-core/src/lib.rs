//! Core traits and types for instruction-stepped CPU emulation.
//!
//! A CPU never owns memory. The host owns a bus and lends it to the CPU for
//! the duration of each step.

mod bus;
mod cpu;
mod io_bus;
mod observable;
mod ticks;

pub use bus::{ADDRESS_SPACE, Bus, LoadError, SimpleBus};
pub use cpu::Cpu;
pub use io_bus::IoBus;
pub use observable::{Observable, Value};
pub use ticks::Ticks;
