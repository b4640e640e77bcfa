use crate::error::Result;

/// Abstraction over everything the CPU can address.
///
/// Data loads and stores go through `read8`/`write8`; opcode and operand
/// bytes come from `fetch8`, which reads the ROM image. Hosts layer their
/// memory-mapped peripherals on top of `write8`.
pub trait Bus {
    fn read8(&mut self, addr: u16) -> Result<u8>;
    fn write8(&mut self, addr: u16, value: u8) -> Result<()>;
    fn fetch8(&mut self, addr: u16) -> Result<u8>;

    /// One past the highest populated address of the ROM image.
    fn rom_extent(&self) -> usize;
}
