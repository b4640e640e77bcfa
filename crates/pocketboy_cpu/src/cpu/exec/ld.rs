use crate::bits::split16;
use crate::error::Result;
use crate::regs::Register;

use crate::cpu::{Bus, Cpu};

impl Cpu {
    pub(super) fn exec_ld_rr_d16<B: Bus>(&mut self, bus: &mut B, opcode: u8) -> Result<u32> {
        debug_assert!(matches!(opcode, 0x01 | 0x11 | 0x21 | 0x31));

        let value = self.fetch16(bus)?;
        let reg = Register::pair_sp(opcode >> 4);
        self.regs.write16(reg, value);

        Ok(12)
    }

    pub(super) fn exec_ld_r_d8<B: Bus>(&mut self, bus: &mut B, opcode: u8) -> Result<u32> {
        debug_assert!(matches!(
            opcode,
            0x06 | 0x0E | 0x16 | 0x1E | 0x26 | 0x2E | 0x36 | 0x3E
        ));

        let reg = Register::from_index(opcode >> 3);
        let value = self.fetch8(bus)?;
        self.write_operand(bus, reg, value)?;

        Ok(if reg == Register::HlIndirect { 12 } else { 8 })
    }

    pub(super) fn exec_ld_r_r<B: Bus>(&mut self, bus: &mut B, opcode: u8) -> Result<u32> {
        debug_assert!((0x40..=0x7F).contains(&opcode) && opcode != 0x76);

        let dst = Register::from_index(opcode >> 3);
        let src = Register::from_index(opcode);
        let value = self.read_operand(bus, src)?;
        self.write_operand(bus, dst, value)?;

        let touches_memory = dst == Register::HlIndirect || src == Register::HlIndirect;
        Ok(if touches_memory { 8 } else { 4 })
    }

    pub(super) fn exec_ld_a16_sp<B: Bus>(&mut self, bus: &mut B) -> Result<u32> {
        let addr = self.fetch16(bus)?;
        let (hi, lo) = split16(self.regs.sp);
        bus.write8(addr, lo)?;
        bus.write8(addr.wrapping_add(1), hi)?;
        Ok(20)
    }

    pub(super) fn exec_ldh_a8<B: Bus>(&mut self, bus: &mut B, opcode: u8) -> Result<u32> {
        debug_assert!(matches!(opcode, 0xE0 | 0xF0));

        let offset = self.fetch8(bus)? as u16;
        let addr = 0xFF00 | offset;
        match opcode {
            0xE0 => bus.write8(addr, self.regs.a)?,
            0xF0 => self.regs.a = bus.read8(addr)?,
            _ => unreachable!(),
        }
        Ok(12)
    }

    pub(super) fn exec_ldh_c<B: Bus>(&mut self, bus: &mut B, opcode: u8) -> Result<u32> {
        debug_assert!(matches!(opcode, 0xE2 | 0xF2));

        let addr = 0xFF00 | self.regs.c as u16;
        match opcode {
            0xE2 => bus.write8(addr, self.regs.a)?,
            0xF2 => self.regs.a = bus.read8(addr)?,
            _ => unreachable!(),
        }
        Ok(8)
    }

    pub(super) fn exec_ld_a16_a<B: Bus>(&mut self, bus: &mut B, opcode: u8) -> Result<u32> {
        debug_assert!(matches!(opcode, 0xEA | 0xFA));

        let addr = self.fetch16(bus)?;
        match opcode {
            0xEA => bus.write8(addr, self.regs.a)?,
            0xFA => self.regs.a = bus.read8(addr)?,
            _ => unreachable!(),
        }
        Ok(16)
    }

    /// Address for the `(BC)`, `(DE)`, `(HL+)` and `(HL-)` forms.
    fn indirect_addr(&self, opcode: u8) -> u16 {
        match (opcode >> 4) & 0x03 {
            0 => self.regs.bc(),
            1 => self.regs.de(),
            2 | 3 => self.regs.hl(),
            _ => unreachable!(),
        }
    }

    /// Apply the HL post-increment or post-decrement of `(HL+)`/`(HL-)`.
    fn post_step_hl(&mut self, opcode: u8) {
        match (opcode >> 4) & 0x03 {
            2 => self.regs.set_hl(self.regs.hl().wrapping_add(1)),
            3 => self.regs.set_hl(self.regs.hl().wrapping_sub(1)),
            _ => {}
        }
    }

    pub(super) fn exec_ld_indirect_a<B: Bus>(&mut self, bus: &mut B, opcode: u8) -> Result<u32> {
        debug_assert!(matches!(opcode, 0x02 | 0x12 | 0x22 | 0x32));

        let addr = self.indirect_addr(opcode);
        bus.write8(addr, self.regs.a)?;
        self.post_step_hl(opcode);
        Ok(8)
    }

    pub(super) fn exec_ld_a_indirect<B: Bus>(&mut self, bus: &mut B, opcode: u8) -> Result<u32> {
        debug_assert!(matches!(opcode, 0x0A | 0x1A | 0x2A | 0x3A));

        let addr = self.indirect_addr(opcode);
        self.regs.a = bus.read8(addr)?;
        self.post_step_hl(opcode);
        Ok(8)
    }

    pub(super) fn exec_ld_sp_hl(&mut self) -> u32 {
        self.regs.sp = self.regs.hl();
        8
    }

    /// LD HL, SP+r8. Flags come from the same 16-bit add as `ADD SP, r8`.
    pub(super) fn exec_ld_hl_sp_r8<B: Bus>(&mut self, bus: &mut B) -> Result<u32> {
        let offset = self.fetch8(bus)? as i8;
        let result = self.alu_add16(self.regs.sp, offset as i16 as u16);
        self.regs.set_hl(result);
        Ok(12)
    }
}

