use crate::Bus;

/// A bus that also has a separate 256-port I/O space.
///
/// The 8080 reaches it only through `IN` and `OUT`. What sits behind a
/// port is up to the machine; the CPU just forwards the access.
pub trait IoBus: Bus {
    /// Read a byte from the given I/O port.
    fn read_io(&mut self, port: u8) -> u8;

    /// Write a byte to the given I/O port.
    fn write_io(&mut self, port: u8, value: u8);
}
