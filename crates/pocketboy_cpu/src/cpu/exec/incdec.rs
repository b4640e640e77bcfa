use crate::error::Result;
use crate::regs::Register;

use crate::cpu::{Bus, Cpu};

impl Cpu {
    pub(super) fn exec_inc8_reg<B: Bus>(&mut self, bus: &mut B, opcode: u8) -> Result<u32> {
        debug_assert!(
            matches!(opcode, 0x04 | 0x0C | 0x14 | 0x1C | 0x24 | 0x2C | 0x34 | 0x3C),
            "unexpected INC r opcode {opcode:#04x}"
        );

        let reg = Register::from_index(opcode >> 3);
        let value = self.read_operand(bus, reg)?;
        let result = self.alu_inc8(value);
        self.write_operand(bus, reg, result)?;

        Ok(if reg == Register::HlIndirect { 12 } else { 4 })
    }

    pub(super) fn exec_dec8_reg<B: Bus>(&mut self, bus: &mut B, opcode: u8) -> Result<u32> {
        debug_assert!(
            matches!(opcode, 0x05 | 0x0D | 0x15 | 0x1D | 0x25 | 0x2D | 0x35 | 0x3D),
            "unexpected DEC r opcode {opcode:#04x}"
        );

        let reg = Register::from_index(opcode >> 3);
        let value = self.read_operand(bus, reg)?;
        let result = self.alu_dec8(value);
        self.write_operand(bus, reg, result)?;

        Ok(if reg == Register::HlIndirect { 12 } else { 4 })
    }

    pub(super) fn exec_inc16_rr(&mut self, opcode: u8) -> u32 {
        debug_assert!(matches!(opcode, 0x03 | 0x13 | 0x23 | 0x33));
        let reg = Register::pair_sp(opcode >> 4);
        let value = self.regs.read16(reg).wrapping_add(1);
        self.regs.write16(reg, value);
        8
    }

    pub(super) fn exec_dec16_rr(&mut self, opcode: u8) -> u32 {
        debug_assert!(matches!(opcode, 0x0B | 0x1B | 0x2B | 0x3B));
        let reg = Register::pair_sp(opcode >> 4);
        let value = self.regs.read16(reg).wrapping_sub(1);
        self.regs.write16(reg, value);
        8
    }
}
