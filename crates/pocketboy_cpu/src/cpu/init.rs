use crate::config::{CpuConfig, StartState};
use crate::flags::Flags;
use crate::pc::ProgramCounter;

use super::{Cpu, DecodeMode, Registers, RunState};

impl Default for Cpu {
    fn default() -> Self {
        Self::new(CpuConfig::default())
    }
}

impl Cpu {
    pub fn new(config: CpuConfig) -> Self {
        let mut cpu = Self {
            regs: Registers::default(),
            interrupts: config.interrupts,
            run_state: RunState::Normal,
            mode: DecodeMode::Normal,
            cycles: 0,
        };
        cpu.apply_start_state(config.start);
        cpu
    }

    /// Return to `start` with interrupts blocked and the cycle counter cleared.
    pub fn reset(&mut self, start: StartState) {
        self.regs = Registers::default();
        self.interrupts.disable();
        self.run_state = RunState::Normal;
        self.mode = DecodeMode::Normal;
        self.cycles = 0;
        self.apply_start_state(start);
    }

    fn apply_start_state(&mut self, start: StartState) {
        match start {
            StartState::Boot => self.regs.pc.reset(),
            StartState::PostBoot => self.apply_post_boot_state(),
        }
    }

    /// Registers as the boot program leaves them when it hands control to
    /// the cartridge.
    fn apply_post_boot_state(&mut self) {
        self.regs.a = 0x01;
        self.regs.f = Flags::ZERO | Flags::HALF_CARRY | Flags::CARRY; // 0xB0
        self.regs.set_bc(0x0013);
        self.regs.set_de(0x00D8);
        self.regs.set_hl(0x014D);
        self.regs.sp = 0xFFFE;
        self.regs.pc = ProgramCounter::new(0x0100);
    }
}
