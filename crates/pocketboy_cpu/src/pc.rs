/// The fetch cursor: address of the next instruction byte.
///
/// Stored as `u16`, so an address beyond the 16-bit space cannot be
/// represented at all; every mutation wraps modulo 65536.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct ProgramCounter(u16);

impl ProgramCounter {
    #[inline]
    pub const fn new(addr: u16) -> Self {
        Self(addr)
    }

    #[inline]
    pub const fn get(self) -> u16 {
        self.0
    }

    /// Return the current address, then step past it.
    #[inline]
    pub fn fetch_and_advance(&mut self) -> u16 {
        let addr = self.0;
        self.0 = self.0.wrapping_add(1);
        addr
    }

    #[inline]
    pub fn jump(&mut self, addr: u16) {
        self.0 = addr;
    }

    /// Add a signed displacement to the current address.
    ///
    /// The displacement is relative to the cursor as it stands, which during
    /// `JR` is already past the operand byte.
    #[inline]
    pub fn jump_relative(&mut self, offset: i8) {
        self.0 = self.0.wrapping_add_signed(offset as i16);
    }

    #[inline]
    pub fn reset(&mut self) {
        self.0 = 0;
    }
}

impl From<ProgramCounter> for u16 {
    fn from(pc: ProgramCounter) -> u16 {
        pc.0
    }
}
