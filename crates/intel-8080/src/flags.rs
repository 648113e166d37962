//! 8080 flag register.
//!
//! Packed layout, bit 7 to bit 0: `S Z 0 AC 0 P 1 CY`.

/// Sign flag (bit 7) - copy of bit 7 of the result.
pub const SF: u8 = 0b1000_0000;

/// Zero flag (bit 6) - set if the result is zero.
pub const ZF: u8 = 0b0100_0000;

/// Auxiliary carry flag (bit 4) - carry or borrow out of bit 3.
pub const ACF: u8 = 0b0001_0000;

/// Parity flag (bit 2) - set if the result has an even number of 1 bits.
pub const PF: u8 = 0b0000_0100;

/// Bit 1 always reads as 1.
pub const FIXED: u8 = 0b0000_0010;

/// Carry flag (bit 0) - carry out of bit 7, or borrow.
pub const CF: u8 = 0b0000_0001;

/// Bits 5 and 3 always read as 0.
pub const RESERVED: u8 = 0b0010_1000;

/// Compute parity of a byte (true if even number of 1 bits).
#[must_use]
pub const fn parity(value: u8) -> bool {
    value.count_ones().is_multiple_of(2)
}

/// The five condition flags.
///
/// Only `to_byte` and `from_byte` deal with the packed form, and both force
/// bit 1 high and bits 5 and 3 low, so a packed value leaving the CPU is
/// always well formed.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Flags {
    pub s: bool,
    pub z: bool,
    pub ac: bool,
    pub p: bool,
    pub cy: bool,
}

impl Flags {
    /// Unpack a flags byte, ignoring the fixed and reserved bits.
    #[must_use]
    pub const fn from_byte(value: u8) -> Self {
        Self {
            s: value & SF != 0,
            z: value & ZF != 0,
            ac: value & ACF != 0,
            p: value & PF != 0,
            cy: value & CF != 0,
        }
    }

    /// Pack into a flags byte with bit 1 set and bits 5 and 3 clear.
    #[must_use]
    pub const fn to_byte(self) -> u8 {
        let mut f = FIXED;
        if self.s {
            f |= SF;
        }
        if self.z {
            f |= ZF;
        }
        if self.ac {
            f |= ACF;
        }
        if self.p {
            f |= PF;
        }
        if self.cy {
            f |= CF;
        }
        f
    }

    /// Flags with Z, S and P taken from `value` and CY, AC clear.
    #[must_use]
    pub const fn zsp(value: u8) -> Self {
        Self {
            s: value & 0x80 != 0,
            z: value == 0,
            ac: false,
            p: parity(value),
            cy: false,
        }
    }
}
