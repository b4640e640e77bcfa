use crate::bits::{test_bit, with_bit};
use crate::error::Result;
use crate::regs::Register;

use super::{swap, Bus, Cpu, Fill, ShiftDir};

impl Cpu {
    /// Execute a byte from the CB-prefixed table (bit operations, shifts
    /// and rotates).
    ///
    /// The prefix has already been charged, so the returned cycles are the
    /// remainder: 4 for a register, 12 for `(HL)` and 8 for `BIT b,(HL)`.
    /// All 256 entries are defined.
    pub(super) fn exec_cb<B: Bus>(&mut self, bus: &mut B, cb: u8) -> Result<u32> {
        let x = cb >> 6;
        let y = (cb >> 3) & 0x07;
        let target = Register::from_index(cb);
        let indirect = target == Register::HlIndirect;
        let value = self.read_operand(bus, target)?;

        match x {
            0 => {
                let result = match y {
                    0 => self.alu_shift(value, ShiftDir::Left, Fill::Wrap), // RLC
                    1 => self.alu_shift(value, ShiftDir::Right, Fill::Wrap), // RRC
                    2 => self.alu_shift(value, ShiftDir::Left, Fill::Carry), // RL
                    3 => self.alu_shift(value, ShiftDir::Right, Fill::Carry), // RR
                    4 => self.alu_shift(value, ShiftDir::Left, Fill::Zero), // SLA
                    5 => self.alu_shift(value, ShiftDir::Right, Fill::Sign), // SRA
                    6 => {
                        // SWAP
                        let (result, flags) = swap(value);
                        self.regs.f = flags;
                        result
                    }
                    7 => self.alu_shift(value, ShiftDir::Right, Fill::Zero), // SRL
                    _ => unreachable!(),
                };
                self.write_operand(bus, target, result)?;
                Ok(if indirect { 12 } else { 4 })
            }
            1 => {
                // BIT b, r: Z from the complement of the bit, N=0, H=1, C kept.
                let carry = self.regs.f.carry();
                self.regs.f.set_all(!test_bit(value, y), false, true, carry);
                Ok(if indirect { 8 } else { 4 })
            }
            2 | 3 => {
                // RES b, r / SET b, r
                let result = with_bit(value, y, x == 3);
                self.write_operand(bus, target, result)?;
                Ok(if indirect { 12 } else { 4 })
            }
            _ => unreachable!(),
        }
    }
}
