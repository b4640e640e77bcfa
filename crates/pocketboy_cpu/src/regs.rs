use crate::bits::{pack16, split16};
use crate::flags::Flags;
use crate::pc::ProgramCounter;

/// Operand tag used by the instruction decoder.
///
/// Covers the eight byte registers, the 16-bit views, and `HlIndirect`,
/// which is not storage at all: it stands for the byte in memory addressed
/// by HL and has to be resolved by the engine into a bus access.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Register {
    A,
    B,
    C,
    D,
    E,
    F,
    H,
    L,
    HlIndirect,
    AF,
    BC,
    DE,
    HL,
    SP,
    PC,
}

impl Register {
    /// Whether this tag names a 16-bit register.
    #[inline]
    pub fn is_wide(self) -> bool {
        matches!(
            self,
            Register::AF | Register::BC | Register::DE | Register::HL | Register::SP | Register::PC
        )
    }

    /// Decode the 3-bit register field used by the opcode tables:
    /// 0=B, 1=C, 2=D, 3=E, 4=H, 5=L, 6=(HL), 7=A.
    #[inline]
    pub fn from_index(index: u8) -> Self {
        match index & 0x07 {
            0 => Register::B,
            1 => Register::C,
            2 => Register::D,
            3 => Register::E,
            4 => Register::H,
            5 => Register::L,
            6 => Register::HlIndirect,
            7 => Register::A,
            _ => unreachable!(),
        }
    }

    /// Decode a 2-bit pair field where 3 selects SP (loads, INC/DEC, ADD HL).
    #[inline]
    pub fn pair_sp(index: u8) -> Self {
        match index & 0x03 {
            0 => Register::BC,
            1 => Register::DE,
            2 => Register::HL,
            3 => Register::SP,
            _ => unreachable!(),
        }
    }

    /// Decode a 2-bit pair field where 3 selects AF (PUSH/POP).
    #[inline]
    pub fn pair_af(index: u8) -> Self {
        match index & 0x03 {
            0 => Register::BC,
            1 => Register::DE,
            2 => Register::HL,
            3 => Register::AF,
            _ => unreachable!(),
        }
    }
}

/// Register file of the LR35902.
///
/// The pairs AF, BC, DE and HL are views over the byte registers, high
/// byte first; they have no storage of their own.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct Registers {
    pub a: u8,
    pub f: Flags,
    pub b: u8,
    pub c: u8,
    pub d: u8,
    pub e: u8,
    pub h: u8,
    pub l: u8,
    pub sp: u16,
    pub pc: ProgramCounter,
}

impl Registers {
    #[inline]
    pub fn af(&self) -> u16 {
        pack16(self.a, self.f.bits())
    }

    #[inline]
    pub fn set_af(&mut self, value: u16) {
        let (a, f) = split16(value);
        self.a = a;
        self.f = Flags::from_byte(f);
    }

    #[inline]
    pub fn bc(&self) -> u16 {
        pack16(self.b, self.c)
    }

    #[inline]
    pub fn set_bc(&mut self, value: u16) {
        (self.b, self.c) = split16(value);
    }

    #[inline]
    pub fn de(&self) -> u16 {
        pack16(self.d, self.e)
    }

    #[inline]
    pub fn set_de(&mut self, value: u16) {
        (self.d, self.e) = split16(value);
    }

    #[inline]
    pub fn hl(&self) -> u16 {
        pack16(self.h, self.l)
    }

    #[inline]
    pub fn set_hl(&mut self, value: u16) {
        (self.h, self.l) = split16(value);
    }

    /// Read a byte register.
    ///
    /// # Panics
    ///
    /// Panics if `reg` is a 16-bit register or `HlIndirect`; either means the
    /// decode table handed the wrong operand kind to an 8-bit operation.
    pub fn read8(&self, reg: Register) -> u8 {
        match reg {
            Register::A => self.a,
            Register::F => self.f.bits(),
            Register::B => self.b,
            Register::C => self.c,
            Register::D => self.d,
            Register::E => self.e,
            Register::H => self.h,
            Register::L => self.l,
            Register::HlIndirect => panic!("(HL) must be resolved through memory, not the register file"),
            wide => panic!("8-bit read of 16-bit register {wide:?}"),
        }
    }

    /// Write a byte register. Writes to F drop the low nibble.
    ///
    /// # Panics
    ///
    /// Same contract as [`Registers::read8`].
    pub fn write8(&mut self, reg: Register, value: u8) {
        match reg {
            Register::A => self.a = value,
            Register::F => self.f = Flags::from_byte(value),
            Register::B => self.b = value,
            Register::C => self.c = value,
            Register::D => self.d = value,
            Register::E => self.e = value,
            Register::H => self.h = value,
            Register::L => self.l = value,
            Register::HlIndirect => panic!("(HL) must be resolved through memory, not the register file"),
            wide => panic!("8-bit write of 16-bit register {wide:?}"),
        }
    }

    /// Read a 16-bit register or pair.
    ///
    /// # Panics
    ///
    /// Panics if `reg` is a byte register or `HlIndirect`.
    pub fn read16(&self, reg: Register) -> u16 {
        match reg {
            Register::AF => self.af(),
            Register::BC => self.bc(),
            Register::DE => self.de(),
            Register::HL => self.hl(),
            Register::SP => self.sp,
            Register::PC => self.pc.get(),
            narrow => panic!("16-bit read of 8-bit register {narrow:?}"),
        }
    }

    /// Write a 16-bit register or pair; both halves change together.
    ///
    /// # Panics
    ///
    /// Panics if `reg` is a byte register or `HlIndirect`.
    pub fn write16(&mut self, reg: Register, value: u16) {
        match reg {
            Register::AF => self.set_af(value),
            Register::BC => self.set_bc(value),
            Register::DE => self.set_de(value),
            Register::HL => self.set_hl(value),
            Register::SP => self.sp = value,
            Register::PC => self.pc.jump(value),
            narrow => panic!("16-bit write of 8-bit register {narrow:?}"),
        }
    }
}
