use crate::bits::{bit, test_bit, widen};
use crate::flags::Flags;

use super::Cpu;

/// 8-bit addition of two operands and an incoming carry (0 or 1).
///
/// Half-carry is the carry out of bit 3, carry the carry out of bit 7.
/// Every 8-bit add in the instruction set funnels through here.
#[inline]
pub fn add3(a: u8, b: u8, c: u8) -> (u8, Flags) {
    debug_assert!(c <= 1);
    let sum = widen(a) + widen(b) + widen(c);
    let result = sum as u8;
    let half = (a & 0x0F) + (b & 0x0F) + c > 0x0F;
    (result, Flags::new(result == 0, false, half, sum > 0xFF))
}

/// 8-bit subtraction `a - b - c` with an incoming borrow (0 or 1).
///
/// Half-carry is the borrow out of bit 4, carry the borrow out of bit 8.
#[inline]
pub fn sub3(a: u8, b: u8, c: u8) -> (u8, Flags) {
    debug_assert!(c <= 1);
    let subtrahend = widen(b) + widen(c);
    let result = widen(a).wrapping_sub(subtrahend) as u8;
    let half = (b & 0x0F) + c > (a & 0x0F);
    (result, Flags::new(result == 0, true, half, subtrahend > widen(a)))
}

/// 16-bit addition used by `ADD HL,rr`, `ADD SP,e` and `LD HL,SP+e`.
///
/// Half-carry is the carry out of bit 11, carry the carry out of bit 15 and
/// zero reflects the 16-bit sum.
#[inline]
pub fn add16(a: u16, b: u16) -> (u16, Flags) {
    let (result, carry) = a.overflowing_add(b);
    let half = (a & 0x0FFF) + (b & 0x0FFF) > 0x0FFF;
    (result, Flags::new(result == 0, false, half, carry))
}

/// Direction of a rotate or shift.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ShiftDir {
    Left,
    Right,
}

/// Source of the bit shifted in at the vacated end.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Fill {
    /// The bit that falls off the other end (RLC/RRC).
    Wrap,
    /// The incoming carry flag (RL/RR).
    Carry,
    /// Always zero (SLA/SRL).
    Zero,
    /// Copy of the old MSB; only meaningful shifting right (SRA).
    Sign,
}

/// Shared rotate/shift primitive.
///
/// N and H are cleared, Z reflects the result and C receives the bit that
/// was shifted out.
pub fn shift(value: u8, dir: ShiftDir, fill: Fill, carry_in: bool) -> (u8, Flags) {
    let (shifted, out, edge) = match dir {
        ShiftDir::Left => (value << 1, test_bit(value, 7), 0),
        ShiftDir::Right => (value >> 1, test_bit(value, 0), 7),
    };
    let incoming = match fill {
        Fill::Wrap => out,
        Fill::Carry => carry_in,
        Fill::Zero => false,
        Fill::Sign => test_bit(value, 7),
    };
    let result = shifted | (bit(incoming) << edge);
    (result, Flags::new(result == 0, false, false, out))
}

/// Exchange nibbles; only Z can end up set.
#[inline]
pub fn swap(value: u8) -> (u8, Flags) {
    let result = value.rotate_left(4);
    (result, Flags::new(result == 0, false, false, false))
}

impl Cpu {
    /// ADD/ADC on A. `use_carry` selects ADC.
    pub(super) fn alu_add(&mut self, value: u8, use_carry: bool) {
        let carry = bit(use_carry && self.regs.f.carry());
        let (result, flags) = add3(self.regs.a, value, carry);
        self.regs.a = result;
        self.regs.f = flags;
    }

    /// SUB/SBC on A. `use_carry` selects SBC.
    pub(super) fn alu_sub(&mut self, value: u8, use_carry: bool) {
        let carry = bit(use_carry && self.regs.f.carry());
        let (result, flags) = sub3(self.regs.a, value, carry);
        self.regs.a = result;
        self.regs.f = flags;
    }

    /// CP: SUB with the result discarded.
    pub(super) fn alu_cp(&mut self, value: u8) {
        let (_, flags) = sub3(self.regs.a, value, 0);
        self.regs.f = flags;
    }

    #[inline]
    pub(super) fn alu_and(&mut self, value: u8) {
        self.regs.a &= value;
        self.regs.f = Flags::new(self.regs.a == 0, false, true, false);
    }

    #[inline]
    pub(super) fn alu_or(&mut self, value: u8) {
        self.regs.a |= value;
        self.regs.f = Flags::new(self.regs.a == 0, false, false, false);
    }

    #[inline]
    pub(super) fn alu_xor(&mut self, value: u8) {
        self.regs.a ^= value;
        self.regs.f = Flags::new(self.regs.a == 0, false, false, false);
    }

    /// INC r: Z, N and H from the addition, C untouched.
    pub(super) fn alu_inc8(&mut self, value: u8) -> u8 {
        let carry = self.regs.f.carry();
        let (result, mut flags) = add3(value, 1, 0);
        flags.set(Flags::CARRY, carry);
        self.regs.f = flags;
        result
    }

    /// DEC r: Z, N and H from the subtraction, C untouched.
    pub(super) fn alu_dec8(&mut self, value: u8) -> u8 {
        let carry = self.regs.f.carry();
        let (result, mut flags) = sub3(value, 1, 0);
        flags.set(Flags::CARRY, carry);
        self.regs.f = flags;
        result
    }

    /// 16-bit add for the HL/SP forms; `value` is already sign-extended for
    /// the SP-relative ones.
    pub(super) fn alu_add16(&mut self, base: u16, value: u16) -> u16 {
        let (result, flags) = add16(base, value);
        self.regs.f = flags;
        result
    }

    /// Rotate or shift `value` and load the resulting flags.
    pub(super) fn alu_shift(&mut self, value: u8, dir: ShiftDir, fill: Fill) -> u8 {
        let (result, flags) = shift(value, dir, fill, self.regs.f.carry());
        self.regs.f = flags;
        result
    }

    /// DAA: decimal adjust A after a BCD add or subtract.
    ///
    /// Uses N, H and C from the previous operation. H is cleared, N kept,
    /// C set when a 0x60 correction applies (it never clears on its own).
    pub(super) fn alu_daa(&mut self) {
        let flags = self.regs.f;
        let mut a = self.regs.a;
        let mut adjust = 0u8;
        let mut carry = flags.carry();

        if flags.subtract() {
            if flags.half_carry() {
                adjust |= 0x06;
            }
            if carry {
                adjust |= 0x60;
            }
            a = a.wrapping_sub(adjust);
        } else {
            if flags.half_carry() || (a & 0x0F) > 0x09 {
                adjust |= 0x06;
            }
            if carry || a > 0x99 {
                adjust |= 0x60;
                carry = true;
            }
            a = a.wrapping_add(adjust);
        }

        self.regs.a = a;
        self.regs.f = Flags::new(a == 0, flags.subtract(), false, carry);
    }
}
