//! Cycle-counted emulation of the Game Boy CPU (LR35902).
//!
//! The crate is split the same way the hardware is: a register file with
//! its flag byte, a flat 64 KiB memory plus a separate ROM image that feeds
//! the instruction stream, the interrupt-enable state machine, and the
//! instruction engine that ties them together.
//!
//! ```no_run
//! use pocketboy_cpu::{Cpu, Memory};
//!
//! let mut memory = Memory::new();
//! let mut cpu = Cpu::default();
//! let mut elapsed = 0u64;
//! while cpu.has_instruction_remaining(&memory) {
//!     elapsed += u64::from(cpu.execute_instruction(&mut memory).unwrap());
//! }
//! assert_eq!(elapsed, cpu.cycles());
//! ```

pub mod bits;
pub mod boot;
pub mod config;
pub mod cpu;
pub mod error;
pub mod flags;
pub mod interrupts;
pub mod memory;
pub mod pc;
pub mod regs;

pub use config::{CpuConfig, StartState};
pub use cpu::{Bus, Cpu, DecodeMode, RunState};
pub use error::{AddressSpace, Error, Result};
pub use flags::Flags;
pub use interrupts::{Interrupt, InterruptState};
pub use memory::Memory;
pub use pc::ProgramCounter;
pub use regs::{Register, Registers};
