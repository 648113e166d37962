//! CPU core trait.

use crate::IoBus;

/// A CPU that executes one instruction per step.
///
/// The bus is passed in, not owned, so the host keeps control of memory
/// between steps (loading images, trapping system calls).
pub trait Cpu {
    /// The type used for register inspection.
    type Registers;

    /// Execute one instruction. Returns cycles consumed.
    ///
    /// Zero means the instruction could not be decoded; the CPU state is
    /// left as it was and the caller should stop.
    fn step<B: IoBus>(&mut self, bus: &mut B) -> u32;

    /// Reset the CPU to its initial state.
    fn reset(&mut self);

    /// Returns the current program counter.
    fn pc(&self) -> u16;

    /// Returns a snapshot of all registers for inspection.
    fn registers(&self) -> Self::Registers;

    /// Returns true if the CPU is halted.
    fn is_halted(&self) -> bool;
}
