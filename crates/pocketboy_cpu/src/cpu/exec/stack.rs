use crate::error::Result;
use crate::regs::Register;

use crate::cpu::{Bus, Cpu};

impl Cpu {
    pub(super) fn exec_push_rr<B: Bus>(&mut self, bus: &mut B, opcode: u8) -> Result<u32> {
        debug_assert!(matches!(opcode, 0xC5 | 0xD5 | 0xE5 | 0xF5));

        let value = self.regs.read16(Register::pair_af(opcode >> 4));
        self.push_u16(bus, value)?;
        Ok(16)
    }

    pub(super) fn exec_pop_rr<B: Bus>(&mut self, bus: &mut B, opcode: u8) -> Result<u32> {
        debug_assert!(matches!(opcode, 0xC1 | 0xD1 | 0xE1 | 0xF1));

        let value = self.pop_u16(bus)?;
        self.regs.write16(Register::pair_af(opcode >> 4), value);
        Ok(12)
    }

    pub(super) fn exec_rst<B: Bus>(&mut self, bus: &mut B, opcode: u8) -> Result<u32> {
        debug_assert!(matches!(
            opcode,
            0xC7 | 0xCF | 0xD7 | 0xDF | 0xE7 | 0xEF | 0xF7 | 0xFF
        ));

        let ret = self.regs.pc.get();
        self.push_u16(bus, ret)?;
        self.regs.pc.jump((opcode & 0x38) as u16);
        Ok(16)
    }

    pub(super) fn exec_ret<B: Bus>(&mut self, bus: &mut B) -> Result<u32> {
        let addr = self.pop_u16(bus)?;
        self.regs.pc.jump(addr);
        Ok(16)
    }

    pub(super) fn exec_reti<B: Bus>(&mut self, bus: &mut B) -> Result<u32> {
        self.return_and_enable(bus)?;
        log::debug!("RETI: interrupts enabled, pc=0x{:04X}", self.regs.pc.get());
        Ok(16)
    }
}
