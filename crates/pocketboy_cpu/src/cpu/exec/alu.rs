use crate::error::Result;
use crate::flags::Flags;
use crate::regs::Register;

use crate::cpu::{Bus, Cpu, Fill, ShiftDir};

impl Cpu {
    fn alu_dispatch(&mut self, operation: u8, value: u8) {
        match operation {
            0 => self.alu_add(value, false),
            1 => self.alu_add(value, true),
            2 => self.alu_sub(value, false),
            3 => self.alu_sub(value, true),
            4 => self.alu_and(value),
            5 => self.alu_xor(value),
            6 => self.alu_or(value),
            7 => self.alu_cp(value),
            _ => unreachable!(),
        }
    }

    pub(super) fn exec_alu_reg_group<B: Bus>(&mut self, bus: &mut B, opcode: u8) -> Result<u32> {
        debug_assert!((0x80..=0xBF).contains(&opcode));
        let src = Register::from_index(opcode);
        let value = self.read_operand(bus, src)?;
        self.alu_dispatch((opcode >> 3) & 0x07, value);

        Ok(if src == Register::HlIndirect { 8 } else { 4 })
    }

    pub(super) fn exec_alu_imm<B: Bus>(&mut self, bus: &mut B, opcode: u8) -> Result<u32> {
        debug_assert!(matches!(
            opcode,
            0xC6 | 0xCE | 0xD6 | 0xDE | 0xE6 | 0xEE | 0xF6 | 0xFE
        ));
        let value = self.fetch8(bus)?;
        self.alu_dispatch((opcode >> 3) & 0x07, value);
        Ok(8)
    }

    /// RLCA/RRCA/RLA/RRA. Same primitive as the CB forms, Z included.
    pub(super) fn exec_rotate_a(&mut self, opcode: u8) -> u32 {
        debug_assert!(matches!(opcode, 0x07 | 0x0F | 0x17 | 0x1F));

        let (dir, fill) = match opcode {
            0x07 => (ShiftDir::Left, Fill::Wrap),
            0x0F => (ShiftDir::Right, Fill::Wrap),
            0x17 => (ShiftDir::Left, Fill::Carry),
            0x1F => (ShiftDir::Right, Fill::Carry),
            _ => unreachable!(),
        };
        self.regs.a = self.alu_shift(self.regs.a, dir, fill);

        4
    }

    pub(super) fn exec_add_hl_rr(&mut self, opcode: u8) -> u32 {
        debug_assert!(matches!(opcode, 0x09 | 0x19 | 0x29 | 0x39));
        let value = self.regs.read16(Register::pair_sp(opcode >> 4));
        let result = self.alu_add16(self.regs.hl(), value);
        self.regs.set_hl(result);
        8
    }

    pub(super) fn exec_add_sp_r8<B: Bus>(&mut self, bus: &mut B) -> Result<u32> {
        let offset = self.fetch8(bus)? as i8;
        self.regs.sp = self.alu_add16(self.regs.sp, offset as i16 as u16);
        Ok(16)
    }

    pub(super) fn exec_daa(&mut self) -> u32 {
        self.alu_daa();
        4
    }

    pub(super) fn exec_cpl(&mut self) -> u32 {
        self.regs.a = !self.regs.a;
        self.regs.f.insert(Flags::SUBTRACT | Flags::HALF_CARRY);
        4
    }

    pub(super) fn exec_scf(&mut self) -> u32 {
        self.regs.f.remove(Flags::SUBTRACT | Flags::HALF_CARRY);
        self.regs.f.insert(Flags::CARRY);
        4
    }

    pub(super) fn exec_ccf(&mut self) -> u32 {
        self.regs.f.remove(Flags::SUBTRACT | Flags::HALF_CARRY);
        self.regs.f.toggle(Flags::CARRY);
        4
    }
}
