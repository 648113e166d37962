//! ALU operations for the 8080.
//!
//! Each operation is a pure function of its inputs and returns the result
//! byte together with the flags it produces. Callers decide which of the
//! returned flags to keep (increment and decrement leave CY untouched).

use crate::flags::Flags;

/// Result of an ALU operation with flags.
#[derive(Debug, Clone, Copy)]
pub struct AluResult {
    pub value: u8,
    pub flags: Flags,
}

/// Add two bytes with optional carry, returning result and flags.
#[must_use]
pub fn add8(a: u8, b: u8, carry: bool) -> AluResult {
    let c = u8::from(carry);
    let result16 = u16::from(a) + u16::from(b) + u16::from(c);
    let value = result16 as u8;

    let mut flags = Flags::zsp(value);
    flags.ac = (a & 0x0F) + (b & 0x0F) + c > 0x0F;
    flags.cy = result16 > 0xFF;

    AluResult { value, flags }
}

/// Subtract two bytes with optional borrow, returning result and flags.
///
/// AC and CY report a borrow out of bit 3 and bit 7 respectively.
#[must_use]
pub fn sub8(a: u8, b: u8, borrow: bool) -> AluResult {
    let c = u8::from(borrow);
    let value = a.wrapping_sub(b).wrapping_sub(c);

    let mut flags = Flags::zsp(value);
    flags.ac = (a & 0x0F) < (b & 0x0F) + c;
    flags.cy = u16::from(a) < u16::from(b) + u16::from(c);

    AluResult { value, flags }
}

/// AND operation.
///
/// The 8080 sets AC from bit 3 of the OR of the operands.
#[must_use]
pub fn and8(a: u8, b: u8) -> AluResult {
    let value = a & b;
    let mut flags = Flags::zsp(value);
    flags.ac = (a | b) & 0x08 != 0;
    AluResult { value, flags }
}

/// XOR operation.
#[must_use]
pub fn xor8(a: u8, b: u8) -> AluResult {
    let value = a ^ b;
    AluResult {
        value,
        flags: Flags::zsp(value),
    }
}

/// OR operation.
#[must_use]
pub fn or8(a: u8, b: u8) -> AluResult {
    let value = a | b;
    AluResult {
        value,
        flags: Flags::zsp(value),
    }
}

/// Compare (subtract without storing result).
#[must_use]
pub fn cp8(a: u8, b: u8) -> Flags {
    sub8(a, b, false).flags
}

/// Increment byte. CY in the result is always clear.
#[must_use]
pub fn inc8(a: u8) -> AluResult {
    let value = a.wrapping_add(1);
    let mut flags = Flags::zsp(value);
    flags.ac = a & 0x0F == 0x0F;
    AluResult { value, flags }
}

/// Decrement byte. CY in the result is always clear.
///
/// The 8080 decrements by adding `$FF`, so AC is the carry out of the low
/// nibble of that addition: set unless the low nibble was zero. This is the
/// opposite sense to `sub8`, which reports a borrow, so `DCR A` and `SUI 1`
/// disagree on AC for the same input.
#[must_use]
pub fn dec8(a: u8) -> AluResult {
    let value = a.wrapping_sub(1);
    let mut flags = Flags::zsp(value);
    flags.ac = a & 0x0F != 0;
    AluResult { value, flags }
}

/// Decimal adjust the accumulator after a BCD addition.
#[must_use]
pub fn daa(a: u8, flags: Flags) -> AluResult {
    let lo = a & 0x0F;
    let hi = a >> 4;

    let mut correction = 0u8;
    if lo > 9 || flags.ac {
        correction |= 0x06;
    }
    if hi > 9 || flags.cy || (hi >= 9 && lo > 9) {
        correction |= 0x60;
    }

    let result16 = u16::from(a) + u16::from(correction);
    let value = result16 as u8;

    let mut out = Flags::zsp(value);
    out.ac = lo + (correction & 0x0F) > 0x0F;
    out.cy = result16 > 0xFF;

    AluResult { value, flags: out }
}

/// Rotate left circular. Returns the result and the new carry (old bit 7).
#[must_use]
pub const fn rlc(a: u8) -> (u8, bool) {
    (a.rotate_left(1), a & 0x80 != 0)
}

/// Rotate right circular. Returns the result and the new carry (old bit 0).
#[must_use]
pub const fn rrc(a: u8) -> (u8, bool) {
    (a.rotate_right(1), a & 0x01 != 0)
}

/// Rotate left through carry.
#[must_use]
pub const fn ral(a: u8, carry: bool) -> (u8, bool) {
    ((a << 1) | carry as u8, a & 0x80 != 0)
}

/// Rotate right through carry.
#[must_use]
pub const fn rar(a: u8, carry: bool) -> (u8, bool) {
    ((a >> 1) | (carry as u8) << 7, a & 0x01 != 0)
}

/// 16-bit add for `DAD`. Returns the sum and the carry out of bit 15.
#[must_use]
pub const fn add16(a: u16, b: u16) -> (u16, bool) {
    a.overflowing_add(b)
}
