use pocketboy_cpu::interrupts::{IE_ADDR, IF_ADDR};
use pocketboy_cpu::{
    Bus, Cpu, CpuConfig, DecodeMode, Interrupt, Memory, Result, RunState, StartState,
};

use crate::bus::{SystemBus, BOOT_OFF_REG};
use crate::lcd::{LcdTimer, LCDC_ADDR};

/// I/O registers as the boot program leaves them, for runs that skip it.
const POST_BOOT_IO: [(u16, u8); 8] = [
    (0xFF26, 0x80), // NR52
    (0xFF24, 0x77), // NR50
    (0xFF25, 0xF3), // NR51
    (0xFF47, 0xFC), // BGP
    (0xFF48, 0xFF), // OBP0
    (0xFF49, 0xFF), // OBP1
    (LCDC_ADDR as u16, 0x91),
    (BOOT_OFF_REG, 0x01),
];

/// Why the run loop returned.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum StopReason {
    /// The fetch cursor left the loaded ROM image.
    EndOfRom,
    /// The CPU executed STOP.
    Stopped,
    /// The CPU halted and nothing the machine can raise would wake it.
    HaltedForever,
    CycleLimit,
    FrameLimit,
}

/// Optional bounds on a run.
#[derive(Clone, Copy, Debug, Default)]
pub struct Limits {
    pub max_cycles: Option<u64>,
    pub max_frames: Option<u64>,
}

/// CPU, bus and display timing wired together.
pub struct Machine {
    pub cpu: Cpu,
    pub bus: SystemBus,
    pub lcd: LcdTimer,
}

impl Machine {
    /// Start from the boot program, optionally replaced by `boot_image`,
    /// with `cartridge` attached behind it.
    pub fn with_boot(cartridge: &[u8], boot_image: Option<&[u8]>) -> Result<Self> {
        let mut memory = Memory::new();
        if let Some(image) = boot_image {
            memory.load_rom(image, 0)?;
        }
        memory.attach_cartridge(cartridge)?;

        let cpu = Cpu::new(CpuConfig::builder().start(StartState::Boot).build());
        Ok(Self {
            cpu,
            bus: SystemBus::new(memory, cartridge, true),
            lcd: LcdTimer::new(),
        })
    }

    /// Start directly at the cartridge entry point in the post-boot state.
    pub fn post_boot(cartridge: &[u8]) -> Result<Self> {
        let mut memory = Memory::blank();
        memory.load_rom(cartridge, 0)?;
        for (addr, value) in POST_BOOT_IO {
            memory.write(addr as usize, value)?;
        }

        let cpu = Cpu::new(CpuConfig::builder().start(StartState::PostBoot).build());
        Ok(Self {
            cpu,
            bus: SystemBus::new(memory, cartridge, false),
            lcd: LcdTimer::new(),
        })
    }

    /// Deliver or wake on a pending interrupt, then execute one step and
    /// forward its cycles to the display.
    pub fn step(&mut self) -> Result<u32> {
        let cycles = match self.poll_interrupts()? {
            Some(cycles) => cycles,
            None => {
                let pc = self.cpu.regs.pc.get();
                let opcode = if log::log_enabled!(log::Level::Trace) {
                    self.bus.fetch8(pc)?
                } else {
                    0
                };
                let cycles = self.cpu.execute_instruction(&mut self.bus)?;
                let regs = &self.cpu.regs;
                log::trace!(
                    "{pc:04X}: {opcode:02X} {cycles:>2}  AF={:04X} BC={:04X} DE={:04X} HL={:04X} SP={:04X}",
                    regs.af(),
                    regs.bc(),
                    regs.de(),
                    regs.hl(),
                    regs.sp,
                );
                cycles
            }
        };
        self.lcd.advance(self.bus.memory_mut(), cycles)?;
        Ok(cycles)
    }

    /// Returns the dispatch cycles if an interrupt was serviced.
    fn poll_interrupts(&mut self) -> Result<Option<u32>> {
        // STOP only ends on a joypad edge, which is not modelled.
        if self.cpu.run_state() == RunState::Stopped {
            return Ok(None);
        }
        let Some(interrupt) = self.cpu.pending_interrupt(&mut self.bus)? else {
            return Ok(None);
        };

        let between_instructions = self.cpu.decode_mode() == DecodeMode::Normal;
        if self.cpu.interrupt_state().is_interruptible() && between_instructions {
            return self.cpu.service_interrupt(&mut self.bus, interrupt).map(Some);
        }

        // With interrupts blocked a pending request still ends HALT.
        if self.cpu.run_state() == RunState::Halted {
            self.cpu.wake();
        }
        Ok(None)
    }

    /// Halted with no enabled request already raised, and VBlank (the only
    /// source this machine generates) either masked or with the display off.
    fn halted_forever(&self) -> Result<bool> {
        if self.cpu.run_state() != RunState::Halted {
            return Ok(false);
        }
        let memory = self.bus.memory();
        let ie = memory.read(IE_ADDR as usize)?;
        let if_reg = memory.read(IF_ADDR as usize)?;
        let lcd_on = memory.read(LCDC_ADDR)? & 0x80 != 0;

        let pending = Interrupt::highest_pending(if_reg, ie).is_some();
        let vblank_possible = lcd_on && ie & Interrupt::VBlank.mask() != 0;
        Ok(!pending && !vblank_possible)
    }

    /// Step until one of the stop conditions holds.
    pub fn run(&mut self, limits: Limits) -> Result<StopReason> {
        loop {
            match self.cpu.run_state() {
                RunState::Stopped => return Ok(StopReason::Stopped),
                RunState::Normal if !self.cpu.has_instruction_remaining(&self.bus) => {
                    return Ok(StopReason::EndOfRom)
                }
                _ => {}
            }
            if self.halted_forever()? {
                log::warn!(
                    "HALT at 0x{:04X} can never wake (IE=0x{:02X}, no source left to raise)",
                    self.cpu.regs.pc.get().wrapping_sub(1),
                    self.bus.memory().read(IE_ADDR as usize)?,
                );
                return Ok(StopReason::HaltedForever);
            }
            if limits.max_cycles.is_some_and(|max| self.cpu.cycles() >= max) {
                return Ok(StopReason::CycleLimit);
            }
            if limits.max_frames.is_some_and(|max| self.lcd.frames() >= max) {
                return Ok(StopReason::FrameLimit);
            }

            self.step()?;
        }
    }
}
