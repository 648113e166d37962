//! 8080 register set.

use crate::flags::Flags;

/// 8080 registers snapshot.
///
/// B/C, D/E and H/L pair up as 16-bit values with the first register as
/// the high byte. A and the packed flags pair up as the PSW for `PUSH PSW`
/// and `POP PSW`.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Registers {
    pub a: u8,
    pub flags: Flags,
    pub b: u8,
    pub c: u8,
    pub d: u8,
    pub e: u8,
    pub h: u8,
    pub l: u8,

    pub sp: u16,
    pub pc: u16,

    /// Interrupt enable, set by `EI` and cleared by `DI`.
    pub inte: bool,

    /// Set by `HLT`.
    pub halted: bool,
}

impl Registers {
    /// Packed flags byte.
    #[must_use]
    pub const fn f(&self) -> u8 {
        self.flags.to_byte()
    }

    /// Get the PSW (A and packed flags).
    #[must_use]
    pub const fn psw(&self) -> u16 {
        (self.a as u16) << 8 | self.f() as u16
    }

    /// Get BC register pair.
    #[must_use]
    pub const fn bc(&self) -> u16 {
        (self.b as u16) << 8 | self.c as u16
    }

    /// Get DE register pair.
    #[must_use]
    pub const fn de(&self) -> u16 {
        (self.d as u16) << 8 | self.e as u16
    }

    /// Get HL register pair.
    #[must_use]
    pub const fn hl(&self) -> u16 {
        (self.h as u16) << 8 | self.l as u16
    }

    /// Set the PSW. The flags byte is normalised on the way in.
    pub fn set_psw(&mut self, value: u16) {
        self.a = (value >> 8) as u8;
        self.flags = Flags::from_byte(value as u8);
    }

    /// Set BC register pair.
    pub fn set_bc(&mut self, value: u16) {
        self.b = (value >> 8) as u8;
        self.c = value as u8;
    }

    /// Set DE register pair.
    pub fn set_de(&mut self, value: u16) {
        self.d = (value >> 8) as u8;
        self.e = value as u8;
    }

    /// Set HL register pair.
    pub fn set_hl(&mut self, value: u16) {
        self.h = (value >> 8) as u8;
        self.l = value as u8;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::flags::FIXED;

    #[test]
    fn pairs_are_high_byte_first() {
        let mut regs = Registers::default();
        regs.set_bc(0x1234);
        assert_eq!((regs.b, regs.c), (0x12, 0x34));
        regs.set_de(0xABCD);
        assert_eq!((regs.d, regs.e), (0xAB, 0xCD));
        regs.set_hl(0x00FF);
        assert_eq!((regs.h, regs.l), (0x00, 0xFF));
    }

    #[test]
    fn split_then_combine_is_identity() {
        let mut regs = Registers::default();
        for v in 0..=u16::MAX {
            regs.set_bc(v);
            regs.set_de(v);
            regs.set_hl(v);
            assert_eq!(regs.bc(), v);
            assert_eq!(regs.de(), v);
            assert_eq!(regs.hl(), v);
        }
    }

    #[test]
    fn psw_round_trip_normalises_flags() {
        let mut regs = Registers::default();
        regs.set_psw(0x42FD);
        assert_eq!(regs.a, 0x42);
        assert_eq!(regs.f(), 0xD7);
        assert_eq!(regs.psw(), 0x42D7);

        regs.set_psw(0x0000);
        assert_eq!(regs.psw(), u16::from(FIXED));
    }
}
