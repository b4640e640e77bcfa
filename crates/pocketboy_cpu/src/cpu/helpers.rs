use crate::bits::{pack16, split16};
use crate::error::Result;
use crate::regs::Register;

use super::{Bus, Cpu};

impl Cpu {
    /// Read an 8-bit operand, resolving `(HL)` to a memory access.
    #[inline]
    pub(super) fn read_operand<B: Bus>(&mut self, bus: &mut B, reg: Register) -> Result<u8> {
        match reg {
            Register::HlIndirect => bus.read8(self.regs.hl()),
            reg => Ok(self.regs.read8(reg)),
        }
    }

    /// Write an 8-bit operand, resolving `(HL)` to a memory access.
    #[inline]
    pub(super) fn write_operand<B: Bus>(&mut self, bus: &mut B, reg: Register, value: u8) -> Result<()> {
        match reg {
            Register::HlIndirect => bus.write8(self.regs.hl(), value),
            reg => {
                self.regs.write8(reg, value);
                Ok(())
            }
        }
    }

    /// Fetch the byte under the cursor; the cursor only moves on success.
    #[inline]
    pub(super) fn fetch8<B: Bus>(&mut self, bus: &mut B) -> Result<u8> {
        let byte = bus.fetch8(self.regs.pc.get())?;
        self.regs.pc.fetch_and_advance();
        Ok(byte)
    }

    /// Fetch a little-endian 16-bit operand.
    #[inline]
    pub(super) fn fetch16<B: Bus>(&mut self, bus: &mut B) -> Result<u16> {
        let lo = self.fetch8(bus)?;
        let hi = self.fetch8(bus)?;
        Ok(pack16(hi, lo))
    }

    /// Push: high byte at SP-1, low byte at SP-2, then SP -= 2.
    #[inline]
    pub(super) fn push_u16<B: Bus>(&mut self, bus: &mut B, value: u16) -> Result<()> {
        let (hi, lo) = split16(value);
        let sp = self.regs.sp;
        bus.write8(sp.wrapping_sub(1), hi)?;
        bus.write8(sp.wrapping_sub(2), lo)?;
        self.regs.sp = sp.wrapping_sub(2);
        Ok(())
    }

    /// Pop: low byte from SP, high byte from SP+1, then SP += 2.
    #[inline]
    pub(super) fn pop_u16<B: Bus>(&mut self, bus: &mut B) -> Result<u16> {
        let sp = self.regs.sp;
        let lo = bus.read8(sp)?;
        let hi = bus.read8(sp.wrapping_add(1))?;
        self.regs.sp = sp.wrapping_add(2);
        Ok(pack16(hi, lo))
    }

    /// Relative jump helper used by JR/JR cc.
    ///
    /// The displacement is relative to the address following the operand,
    /// and is consumed whether or not the branch is taken.
    pub(super) fn jr<B: Bus>(&mut self, bus: &mut B, cond: bool) -> Result<u32> {
        let offset = self.fetch8(bus)? as i8;
        if cond {
            self.regs.pc.jump_relative(offset);
            Ok(12)
        } else {
            Ok(8)
        }
    }

    /// Absolute jump helper used by JP a16 / JP cc,a16.
    pub(super) fn jp_cond<B: Bus>(&mut self, bus: &mut B, cond: bool) -> Result<u32> {
        let addr = self.fetch16(bus)?;
        if cond {
            self.regs.pc.jump(addr);
            Ok(16)
        } else {
            Ok(12)
        }
    }

    /// Call helper used by CALL a16 / CALL cc,a16.
    pub(super) fn call_cond<B: Bus>(&mut self, bus: &mut B, cond: bool) -> Result<u32> {
        let addr = self.fetch16(bus)?;
        if cond {
            let ret = self.regs.pc.get();
            self.push_u16(bus, ret)?;
            self.regs.pc.jump(addr);
            Ok(24)
        } else {
            Ok(12)
        }
    }

    /// Conditional return helper used by RET cc.
    pub(super) fn ret_cond<B: Bus>(&mut self, bus: &mut B, cond: bool) -> Result<u32> {
        if cond {
            let addr = self.pop_u16(bus)?;
            self.regs.pc.jump(addr);
            Ok(20)
        } else {
            Ok(8)
        }
    }

    /// Pop the return address and enable interrupts with no delay (RETI).
    pub(super) fn return_and_enable<B: Bus>(&mut self, bus: &mut B) -> Result<()> {
        let addr = self.pop_u16(bus)?;
        self.regs.pc.jump(addr);
        self.interrupts.enable_now();
        Ok(())
    }
}
