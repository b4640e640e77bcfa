use crate::error::Result;

use crate::cpu::{Bus, Cpu};

impl Cpu {
    #[inline]
    fn cc_condition(&self, cc: u8) -> bool {
        let flags = self.regs.f;
        match cc & 0x03 {
            0 => !flags.zero(),  // NZ
            1 => flags.zero(),   // Z
            2 => !flags.carry(), // NC
            3 => flags.carry(),  // C
            _ => unreachable!(),
        }
    }

    pub(super) fn exec_jr_cc<B: Bus>(&mut self, bus: &mut B, opcode: u8) -> Result<u32> {
        debug_assert!(matches!(opcode, 0x20 | 0x28 | 0x30 | 0x38));
        let cc = (opcode >> 3) & 0x03;
        self.jr(bus, self.cc_condition(cc))
    }

    pub(super) fn exec_jp_cc<B: Bus>(&mut self, bus: &mut B, opcode: u8) -> Result<u32> {
        debug_assert!(matches!(opcode, 0xC2 | 0xCA | 0xD2 | 0xDA));
        let cc = (opcode >> 3) & 0x03;
        self.jp_cond(bus, self.cc_condition(cc))
    }

    pub(super) fn exec_jp_hl(&mut self) -> u32 {
        let addr = self.regs.hl();
        self.regs.pc.jump(addr);
        4
    }

    pub(super) fn exec_call_cc<B: Bus>(&mut self, bus: &mut B, opcode: u8) -> Result<u32> {
        debug_assert!(matches!(opcode, 0xC4 | 0xCC | 0xD4 | 0xDC));
        let cc = (opcode >> 3) & 0x03;
        self.call_cond(bus, self.cc_condition(cc))
    }

    pub(super) fn exec_ret_cc<B: Bus>(&mut self, bus: &mut B, opcode: u8) -> Result<u32> {
        debug_assert!(matches!(opcode, 0xC0 | 0xC8 | 0xD0 | 0xD8));
        let cc = (opcode >> 3) & 0x03;
        self.ret_cond(bus, self.cc_condition(cc))
    }
}
