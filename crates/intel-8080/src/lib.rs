//! Intel 8080 CPU emulator.
//!
//! Each call to `step()` executes exactly one instruction and returns the
//! number of clock cycles it took.

mod alu;
mod cpu;
pub mod disasm;
pub mod flags;
mod opcodes;
mod registers;

pub use cpu::{I8080, InvalidOpcode};
pub use flags::{Flags, parity};
pub use opcodes::{OPCODES, Opcode, opcode};
pub use registers::Registers;
