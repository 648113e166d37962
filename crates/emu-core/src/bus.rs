//! Memory bus interface.

use std::fmt;

use crate::IoBus;

/// Number of addressable bytes on a 16-bit bus.
pub const ADDRESS_SPACE: usize = 0x1_0000;

/// Memory bus interface.
///
/// Components access memory through this trait. Addresses are `u16`, so
/// every address an implementation receives names a valid location.
pub trait Bus {
    /// Read a byte from the given address.
    fn read(&mut self, address: u16) -> u8;

    /// Write a byte to the given address.
    fn write(&mut self, address: u16, value: u8);
}

/// Error returned when an image cannot be placed in memory.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LoadError {
    /// The image runs past the end of the address space.
    TooLarge { offset: u16, len: usize },
}

impl fmt::Display for LoadError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::TooLarge { offset, len } => write!(
                f,
                "image of {len} bytes at ${offset:04X} does not fit in {ADDRESS_SPACE} bytes of memory",
            ),
        }
    }
}

impl std::error::Error for LoadError {}

/// Flat 64K RAM with no memory-mapped devices.
///
/// I/O ports float: reads return `$00` and writes are discarded.
pub struct SimpleBus {
    ram: Box<[u8; ADDRESS_SPACE]>,
}

impl SimpleBus {
    #[must_use]
    pub fn new() -> Self {
        Self {
            ram: Box::new([0; ADDRESS_SPACE]),
        }
    }

    /// Copy `data` into memory starting at `offset`.
    ///
    /// Nothing is written if the image would run past `$FFFF`.
    pub fn load(&mut self, offset: u16, data: &[u8]) -> Result<(), LoadError> {
        let start = usize::from(offset);
        let end = start + data.len();
        if end > ADDRESS_SPACE {
            return Err(LoadError::TooLarge {
                offset,
                len: data.len(),
            });
        }
        self.ram[start..end].copy_from_slice(data);
        Ok(())
    }

    /// Read a byte without going through the bus.
    #[must_use]
    pub fn peek(&self, address: u16) -> u8 {
        self.ram[usize::from(address)]
    }

    /// Read a little-endian word without going through the bus.
    #[must_use]
    pub fn peek_word(&self, address: u16) -> u16 {
        u16::from_le_bytes([self.peek(address), self.peek(address.wrapping_add(1))])
    }

    /// Zero all memory.
    pub fn clear(&mut self) {
        self.ram.fill(0);
    }
}

impl Default for SimpleBus {
    fn default() -> Self {
        Self::new()
    }
}

impl Bus for SimpleBus {
    fn read(&mut self, address: u16) -> u8 {
        self.ram[usize::from(address)]
    }

    fn write(&mut self, address: u16, value: u8) {
        self.ram[usize::from(address)] = value;
    }
}

impl IoBus for SimpleBus {
    fn read_io(&mut self, _port: u8) -> u8 {
        0x00
    }

    fn write_io(&mut self, _port: u8, _value: u8) {}
}
