mod alu;
mod bus;
mod cb;
mod exec;
mod helpers;
mod init;

#[cfg(test)]
mod tests;

pub use alu::{add16, add3, shift, sub3, swap, Fill, ShiftDir};
pub use bus::Bus;

use crate::error::Result;
use crate::interrupts::{Interrupt, InterruptState, IE_ADDR, IF_ADDR};
use crate::regs::Registers;

/// Cycles charged by the 0xCB prefix byte on its own.
pub const PREFIX_CYCLES: u32 = 4;

/// Cycles reported while the CPU idles in HALT or STOP.
pub const IDLE_CYCLES: u32 = 4;

/// Cycles taken to push PC and jump to an interrupt vector.
pub const INTERRUPT_CYCLES: u32 = 20;

/// Low-power state of the CPU.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum RunState {
    #[default]
    Normal,
    Halted,
    Stopped,
}

/// Which opcode table the next fetched byte is decoded against.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum DecodeMode {
    #[default]
    Normal,
    /// A 0xCB prefix was just consumed.
    Extended,
}

/// The LR35902 instruction engine.
#[derive(Clone, Debug)]
pub struct Cpu {
    pub regs: Registers,
    pub interrupts: InterruptState,
    run_state: RunState,
    mode: DecodeMode,
    cycles: u64,
}

impl Cpu {
    #[inline]
    pub fn run_state(&self) -> RunState {
        self.run_state
    }

    #[inline]
    pub fn decode_mode(&self) -> DecodeMode {
        self.mode
    }

    #[inline]
    pub fn interrupt_state(&self) -> InterruptState {
        self.interrupts
    }

    /// Total cycles consumed since construction or the last reset.
    #[inline]
    pub fn cycles(&self) -> u64 {
        self.cycles
    }

    /// Whether the fetch cursor still points into the loaded ROM image.
    #[inline]
    pub fn has_instruction_remaining<B: Bus>(&self, bus: &B) -> bool {
        (self.regs.pc.get() as usize) < bus.rom_extent()
    }

    /// Decode and execute one opcode byte and return the cycles it took.
    ///
    /// A 0xCB prefix is its own step: it costs [`PREFIX_CYCLES`] and switches
    /// the decoder to the extended table for the following call. A halted or
    /// stopped CPU fetches nothing and reports [`IDLE_CYCLES`].
    pub fn execute_instruction<B: Bus>(&mut self, bus: &mut B) -> Result<u32> {
        if self.run_state != RunState::Normal {
            self.cycles += u64::from(IDLE_CYCLES);
            return Ok(IDLE_CYCLES);
        }

        let enable_pending = self.interrupts == InterruptState::PendingEnable;
        let opcode = self.fetch8(bus)?;

        let cycles = match self.mode {
            DecodeMode::Normal if opcode == 0xCB => {
                self.mode = DecodeMode::Extended;
                self.cycles += u64::from(PREFIX_CYCLES);
                return Ok(PREFIX_CYCLES);
            }
            DecodeMode::Normal => self.exec_opcode(bus, opcode)?,
            DecodeMode::Extended => {
                self.mode = DecodeMode::Normal;
                self.exec_cb(bus, opcode)?
            }
        };

        // An EI executed by this very instruction must wait for the next one.
        if enable_pending {
            self.interrupts.instruction_completed();
        }

        self.cycles += u64::from(cycles);
        Ok(cycles)
    }

    /// Highest-priority interrupt that is both requested and enabled,
    /// regardless of the interrupt-enable state.
    pub fn pending_interrupt<B: Bus>(&self, bus: &mut B) -> Result<Option<Interrupt>> {
        let if_reg = bus.read8(IF_ADDR)?;
        let ie_reg = bus.read8(IE_ADDR)?;
        Ok(Interrupt::highest_pending(if_reg, ie_reg))
    }

    /// Dispatch `interrupt`: push PC, jump to its vector, acknowledge it in
    /// IF, block further interrupts and leave any low-power state.
    pub fn service_interrupt<B: Bus>(&mut self, bus: &mut B, interrupt: Interrupt) -> Result<u32> {
        let pc = self.regs.pc.get();
        self.push_u16(bus, pc)?;

        let if_reg = bus.read8(IF_ADDR)?;
        bus.write8(IF_ADDR, if_reg & !interrupt.mask())?;

        self.regs.pc.jump(interrupt.vector());
        self.interrupts.disable();
        self.run_state = RunState::Normal;

        log::debug!(
            "interrupt {interrupt:?}: pc=0x{pc:04X} -> 0x{vector:04X} sp=0x{sp:04X}",
            vector = interrupt.vector(),
            sp = self.regs.sp,
        );

        self.cycles += u64::from(INTERRUPT_CYCLES);
        Ok(INTERRUPT_CYCLES)
    }

    /// Leave HALT or STOP without dispatching anything.
    pub fn wake(&mut self) {
        if self.run_state != RunState::Normal {
            log::debug!("wake from {:?} at pc=0x{:04X}", self.run_state, self.regs.pc.get());
            self.run_state = RunState::Normal;
        }
    }
}
