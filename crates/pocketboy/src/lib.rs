//! Headless run loop around the [`pocketboy_cpu`] core: wires the CPU to a
//! memory bus with the DMA and boot-unmap registers, keeps display timing so
//! VBlank interrupts arrive, and runs until the program ends or a limit is
//! reached.

pub mod bus;
pub mod lcd;
pub mod machine;

use std::path::{Path, PathBuf};

use anyhow::{bail, Context, Result};
use pocketboy_cpu::Registers;
use typed_builder::TypedBuilder;

use crate::machine::{Limits, Machine, StopReason};

#[derive(Clone, Debug, Default, TypedBuilder)]
pub struct RunConfig {
    /// Cartridge image; without one only the boot program runs.
    #[builder(default, setter(strip_option))]
    pub cartridge: Option<PathBuf>,
    /// Replacement for the built-in boot program.
    #[builder(default, setter(strip_option))]
    pub boot_image: Option<PathBuf>,
    /// Start at 0x0100 in the post-boot state.
    #[builder(default)]
    pub skip_boot: bool,
    #[builder(default)]
    pub max_cycles: Option<u64>,
    #[builder(default)]
    pub max_frames: Option<u64>,
}

/// Where a run ended up.
#[derive(Clone, Debug)]
pub struct RunSummary {
    pub reason: StopReason,
    pub cycles: u64,
    pub frames: u64,
    pub regs: Registers,
}

fn read_image(path: &Path, what: &str) -> Result<Vec<u8>> {
    std::fs::read(path).with_context(|| format!("failed to read {what} '{}'", path.display()))
}

pub fn run(config: &RunConfig) -> Result<RunSummary> {
    let cartridge = match &config.cartridge {
        Some(path) => read_image(path, "cartridge")?,
        None if config.skip_boot => bail!("--skip-boot needs a cartridge to start"),
        None => Vec::new(),
    };
    let boot_image = match &config.boot_image {
        Some(path) => Some(read_image(path, "boot image")?),
        None => None,
    };

    let mut machine = if config.skip_boot {
        Machine::post_boot(&cartridge)
    } else {
        Machine::with_boot(&cartridge, boot_image.as_deref())
    }
    .context("failed to load the ROM image")?;

    log::info!(
        "Running {} bytes of cartridge from PC=0x{:04X}",
        cartridge.len(),
        machine.cpu.regs.pc.get()
    );

    let limits = Limits {
        max_cycles: config.max_cycles,
        max_frames: config.max_frames,
    };
    let reason = machine.run(limits).with_context(|| {
        format!(
            "execution failed after {} cycles, PC=0x{:04X}",
            machine.cpu.cycles(),
            machine.cpu.regs.pc.get()
        )
    })?;

    let summary = RunSummary {
        reason,
        cycles: machine.cpu.cycles(),
        frames: machine.lcd.frames(),
        regs: machine.cpu.regs,
    };
    log::info!(
        "Stopped ({:?}) after {} cycles and {} frames",
        summary.reason,
        summary.cycles,
        summary.frames
    );
    Ok(summary)
}
