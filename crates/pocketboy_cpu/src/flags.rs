use bitflags::bitflags;

bitflags! {
    /// Condition bits held in the F register.
    ///
    /// Only the upper nibble exists in hardware; the low four bits of F
    /// always read back as zero.
    #[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
    pub struct Flags: u8 {
        const ZERO = 0b1000_0000;
        const SUBTRACT = 0b0100_0000;
        const HALF_CARRY = 0b0010_0000;
        const CARRY = 0b0001_0000;
    }
}

impl Flags {
    /// Build a flag set from the four individual conditions.
    #[inline]
    pub fn new(zero: bool, subtract: bool, half_carry: bool, carry: bool) -> Self {
        let mut flags = Flags::empty();
        flags.set_all(zero, subtract, half_carry, carry);
        flags
    }

    /// Overwrite all four flags at once.
    #[inline]
    pub fn set_all(&mut self, zero: bool, subtract: bool, half_carry: bool, carry: bool) {
        self.set(Flags::ZERO, zero);
        self.set(Flags::SUBTRACT, subtract);
        self.set(Flags::HALF_CARRY, half_carry);
        self.set(Flags::CARRY, carry);
    }

    /// Interpret a raw F byte, dropping the unused low nibble.
    #[inline]
    pub fn from_byte(value: u8) -> Self {
        Flags::from_bits_truncate(value)
    }

    #[inline]
    pub fn zero(self) -> bool {
        self.contains(Flags::ZERO)
    }

    #[inline]
    pub fn subtract(self) -> bool {
        self.contains(Flags::SUBTRACT)
    }

    #[inline]
    pub fn half_carry(self) -> bool {
        self.contains(Flags::HALF_CARRY)
    }

    #[inline]
    pub fn carry(self) -> bool {
        self.contains(Flags::CARRY)
    }
}
