use pocketboy_cpu::interrupts::IF_ADDR;
use pocketboy_cpu::{Interrupt, Memory, Result};

pub const LCDC_ADDR: usize = 0xFF40;
pub const LY_ADDR: usize = 0xFF44;

pub const CYCLES_PER_LINE: u32 = 456;
pub const LINES_PER_FRAME: u32 = 154;
pub const VISIBLE_LINES: u32 = 144;
pub const CYCLES_PER_FRAME: u32 = CYCLES_PER_LINE * LINES_PER_FRAME;

/// Scanline timing of the display, reduced to what the CPU can observe:
/// the LY register and the VBlank interrupt request.
#[derive(Clone, Debug, Default)]
pub struct LcdTimer {
    /// Cycle position inside the current frame.
    counter: u32,
    frames: u64,
}

impl LcdTimer {
    pub fn new() -> Self {
        Self::default()
    }

    /// Completed frames, counted at the start of VBlank.
    #[inline]
    pub fn frames(&self) -> u64 {
        self.frames
    }

    /// Advance by `cycles` T-cycles, updating LY and requesting VBlank on the
    /// 143 -> 144 edge.
    pub fn advance(&mut self, memory: &mut Memory, cycles: u32) -> Result<()> {
        let lcdc = memory.read(LCDC_ADDR)?;
        if lcdc & 0x80 == 0 {
            // Display off: LY is held at 0 and timing restarts.
            self.counter = 0;
            return memory.write(LY_ADDR, 0);
        }

        let old_ly = self.counter / CYCLES_PER_LINE;
        self.counter = (self.counter + cycles) % CYCLES_PER_FRAME;
        let new_ly = self.counter / CYCLES_PER_LINE;
        memory.write(LY_ADDR, new_ly as u8)?;

        let entered_vblank = if new_ly >= old_ly {
            old_ly < VISIBLE_LINES && new_ly >= VISIBLE_LINES
        } else {
            // Wrapped into the next frame; VBlank was crossed if we started
            // before it.
            old_ly < VISIBLE_LINES
        };

        if entered_vblank {
            let if_reg = memory.read(IF_ADDR as usize)?;
            memory.write(IF_ADDR as usize, if_reg | Interrupt::VBlank.mask())?;
            self.frames += 1;
            log::debug!(
                "VBlank edge (LY {old_ly}->{new_ly}), frame {}, IF=0x{:02X}",
                self.frames,
                if_reg | Interrupt::VBlank.mask(),
            );
        }
        Ok(())
    }
}
