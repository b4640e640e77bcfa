use pocketboy_cpu::boot::BOOT_SIZE;
use pocketboy_cpu::{Bus, Memory, Result};

/// Writing here starts a sprite-attribute DMA from `value << 8`.
pub const DMA_REG: u16 = 0xFF46;

/// Writing a nonzero value here unmaps the boot program.
pub const BOOT_OFF_REG: u16 = 0xFF50;

/// One past the cartridge ROM window; data reads below it see the ROM image.
pub const CART_ROM_END: u16 = 0x8000;

/// Memory plus the handful of memory-mapped registers the run loop cares
/// about.
pub struct SystemBus {
    memory: Memory,
    /// Cartridge bytes hidden under the boot program until it unmaps.
    cartridge_head: Vec<u8>,
    boot_mapped: bool,
}

impl SystemBus {
    /// `cartridge` is the full image; only its first 0x100 bytes are kept
    /// for the boot unmap.
    pub fn new(memory: Memory, cartridge: &[u8], boot_mapped: bool) -> Self {
        let head_len = cartridge.len().min(BOOT_SIZE);
        Self {
            memory,
            cartridge_head: cartridge[..head_len].to_vec(),
            boot_mapped,
        }
    }

    #[inline]
    pub fn memory(&self) -> &Memory {
        &self.memory
    }

    #[inline]
    pub fn memory_mut(&mut self) -> &mut Memory {
        &mut self.memory
    }

    #[inline]
    pub fn boot_mapped(&self) -> bool {
        self.boot_mapped
    }

    fn unmap_boot(&mut self) -> Result<()> {
        if !self.boot_mapped {
            return Ok(());
        }
        self.memory.load_rom(&self.cartridge_head, 0)?;
        self.boot_mapped = false;
        log::debug!(
            "boot program unmapped, {} cartridge bytes now visible at 0x0000",
            self.cartridge_head.len()
        );
        Ok(())
    }
}

impl Bus for SystemBus {
    #[inline]
    fn read8(&mut self, addr: u16) -> Result<u8> {
        if addr < CART_ROM_END {
            self.memory.read_rom(addr as usize)
        } else {
            self.memory.read(addr as usize)
        }
    }

    fn write8(&mut self, addr: u16, value: u8) -> Result<()> {
        self.memory.write(addr as usize, value)?;
        match addr {
            DMA_REG => {
                let src = (value as usize) << 8;
                log::debug!("OAM DMA from 0x{src:04X}");
                self.memory.dma_copy(src)
            }
            BOOT_OFF_REG if value != 0 => self.unmap_boot(),
            _ => Ok(()),
        }
    }

    #[inline]
    fn fetch8(&mut self, addr: u16) -> Result<u8> {
        self.memory.read_rom(addr as usize)
    }

    #[inline]
    fn rom_extent(&self) -> usize {
        self.memory.rom_extent()
    }
}
