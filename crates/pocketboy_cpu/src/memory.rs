use crate::boot::{BOOT_PROGRAM, CARTRIDGE_ENTRY};
use crate::cpu::Bus;
use crate::error::{AddressSpace, Error, Result};

/// Size of the runtime address space.
pub const MEMORY_SIZE: usize = 0x10000;

/// Size of the ROM image that feeds the instruction stream.
pub const ROM_SIZE: usize = 0x10000;

/// Destination of a sprite-attribute DMA transfer (OAM).
pub const DMA_DEST: usize = 0xFE00;

/// Number of bytes moved by one DMA transfer.
pub const DMA_LEN: usize = 0xA0;

/// Flat 64 KiB memory plus the separate ROM image.
///
/// Addresses are taken as `usize` so that callers holding a computed
/// address get a bounds error instead of a silent wrap.
#[derive(Clone)]
pub struct Memory {
    ram: Box<[u8]>,
    rom: Box<[u8]>,
    rom_extent: usize,
}

impl Default for Memory {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Debug for Memory {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Memory")
            .field("rom_extent", &self.rom_extent)
            .finish_non_exhaustive()
    }
}

impl Memory {
    /// Create a memory with the built-in boot program at ROM offset 0.
    pub fn new() -> Self {
        let mut memory = Self::blank();
        memory.rom[..BOOT_PROGRAM.len()].copy_from_slice(&BOOT_PROGRAM);
        memory.rom_extent = BOOT_PROGRAM.len();
        memory
    }

    /// Create a memory with an empty ROM image and nothing loaded.
    pub fn blank() -> Self {
        Self {
            ram: vec![0; MEMORY_SIZE].into_boxed_slice(),
            rom: vec![0; ROM_SIZE].into_boxed_slice(),
            rom_extent: 0,
        }
    }

    pub fn read(&self, addr: usize) -> Result<u8> {
        self.ram
            .get(addr)
            .copied()
            .ok_or(Error::OutOfBounds {
                space: AddressSpace::Memory,
                addr,
                size: MEMORY_SIZE,
            })
    }

    pub fn write(&mut self, addr: usize, value: u8) -> Result<()> {
        let slot = self.ram.get_mut(addr).ok_or(Error::OutOfBounds {
            space: AddressSpace::Memory,
            addr,
            size: MEMORY_SIZE,
        })?;
        *slot = value;
        Ok(())
    }

    pub fn read_rom(&self, addr: usize) -> Result<u8> {
        self.rom.get(addr).copied().ok_or(Error::OutOfBounds {
            space: AddressSpace::Rom,
            addr,
            size: ROM_SIZE,
        })
    }

    /// Copy `bytes` into the ROM image starting at `offset`.
    ///
    /// Nothing is written if the bytes would not fit.
    pub fn load_rom(&mut self, bytes: &[u8], offset: usize) -> Result<()> {
        let end = offset
            .checked_add(bytes.len())
            .filter(|&end| end <= ROM_SIZE)
            .ok_or(Error::RomOverflow {
                offset,
                len: bytes.len(),
                size: ROM_SIZE,
            })?;
        self.rom[offset..end].copy_from_slice(bytes);
        self.rom_extent = self.rom_extent.max(end);
        Ok(())
    }

    /// Attach a cartridge image behind the boot program.
    ///
    /// The cartridge's first 0x100 bytes (restart and interrupt vectors)
    /// stay hidden under the boot program; the rest lands at 0x0100 onwards.
    pub fn attach_cartridge(&mut self, cartridge: &[u8]) -> Result<()> {
        match cartridge.get(CARTRIDGE_ENTRY..) {
            Some(body) => self.load_rom(body, CARTRIDGE_ENTRY),
            None => Ok(()),
        }
    }

    /// Copy 160 bytes from `src` to the sprite attribute table at 0xFE00.
    ///
    /// All-or-nothing: a source window that runs past the end of memory
    /// fails before any byte is copied.
    pub fn dma_copy(&mut self, src: usize) -> Result<()> {
        let end = src
            .checked_add(DMA_LEN)
            .filter(|&end| end <= MEMORY_SIZE)
            .ok_or(Error::OutOfBounds {
                space: AddressSpace::Memory,
                addr: src.saturating_add(DMA_LEN - 1),
                size: MEMORY_SIZE,
            })?;
        self.ram.copy_within(src..end, DMA_DEST);
        Ok(())
    }

    /// One past the highest ROM address that has ever been loaded.
    #[inline]
    pub fn rom_extent(&self) -> usize {
        self.rom_extent
    }
}

impl Bus for Memory {
    #[inline]
    fn read8(&mut self, addr: u16) -> Result<u8> {
        self.read(addr as usize)
    }

    #[inline]
    fn write8(&mut self, addr: u16, value: u8) -> Result<()> {
        self.write(addr as usize, value)
    }

    #[inline]
    fn fetch8(&mut self, addr: u16) -> Result<u8> {
        self.read_rom(addr as usize)
    }

    #[inline]
    fn rom_extent(&self) -> usize {
        self.rom_extent
    }
}
