//! Small, total helpers for byte and bit manipulation.
//!
//! Every flag computation in the ALU goes through these, so they must stay
//! free of side effects.

/// Widen a byte to a 16-bit unsigned integer without sign extension.
#[inline]
pub const fn widen(value: u8) -> u16 {
    value as u16
}

/// Reinterpret a two's-complement byte as its unsigned 0..=255 meaning.
#[inline]
pub const fn unsigned(value: i8) -> u8 {
    value as u8
}

/// Pack a (high, low) byte pair into a 16-bit value.
#[inline]
pub const fn pack16(hi: u8, lo: u8) -> u16 {
    u16::from_be_bytes([hi, lo])
}

/// Split a 16-bit value into its (high, low) bytes.
#[inline]
pub const fn split16(value: u16) -> (u8, u8) {
    let [hi, lo] = value.to_be_bytes();
    (hi, lo)
}

/// Test bit `bit` (0 = LSB, 7 = MSB) of `value`.
#[inline]
pub const fn test_bit(value: u8, bit: u8) -> bool {
    debug_assert!(bit < 8);
    (value >> bit) & 1 != 0
}

/// Return `value` with bit `bit` forced to `set`.
#[inline]
pub const fn with_bit(value: u8, bit: u8, set: bool) -> u8 {
    debug_assert!(bit < 8);
    if set {
        value | (1 << bit)
    } else {
        value & !(1 << bit)
    }
}

/// Map `true` to 1 and `false` to 0.
#[inline]
pub const fn bit(value: bool) -> u8 {
    value as u8
}
