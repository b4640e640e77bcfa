use crate::error::{Error, Result};

use crate::cpu::{Bus, Cpu, RunState};

impl Cpu {
    /// STOP is two bytes; the second must be 0x00.
    pub(super) fn exec_stop<B: Bus>(&mut self, bus: &mut B) -> Result<u32> {
        let addr = self.regs.pc.get().wrapping_sub(1);
        let byte = self.fetch8(bus)?;
        if byte != 0x00 {
            return Err(Error::MalformedStop { addr, byte });
        }

        log::debug!("STOP at pc=0x{addr:04X}");
        self.run_state = RunState::Stopped;
        Ok(4)
    }

    pub(super) fn exec_halt(&mut self) -> u32 {
        log::debug!(
            "HALT at pc=0x{:04X} ({:?})",
            self.regs.pc.get().wrapping_sub(1),
            self.interrupts
        );
        self.run_state = RunState::Halted;
        4
    }

    pub(super) fn exec_di(&mut self) -> u32 {
        log::debug!("DI ({:?} -> Blocked)", self.interrupts);
        self.interrupts.disable();
        4
    }

    pub(super) fn exec_ei(&mut self) -> u32 {
        // Takes effect once the *next* instruction completes.
        self.interrupts.enable_after_next();
        log::debug!("EI, interrupts enabled after the next instruction");
        4
    }
}
