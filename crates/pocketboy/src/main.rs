use std::path::PathBuf;

use clap::Parser;
use pocketboy::RunConfig;

/// Run a Game Boy program on the pocketboy CPU core without a display.
#[derive(Parser, Debug)]
#[command(version, about, long_about = None)]
struct Cli {
    /// Cartridge ROM image
    cartridge: Option<PathBuf>,

    /// Boot program image to use instead of the built-in one
    #[arg(long, value_name = "FILE")]
    boot: Option<PathBuf>,

    /// Start at 0x0100 as if the boot program had already run
    #[arg(long, conflicts_with = "boot")]
    skip_boot: bool,

    /// Stop after this many cycles
    #[arg(long, value_name = "N")]
    max_cycles: Option<u64>,

    /// Stop after this many frames
    #[arg(long, value_name = "N")]
    max_frames: Option<u64>,

    /// Print the register file when the run ends
    #[arg(long)]
    dump_regs: bool,
}

fn main() {
    env_logger::init();
    let cli = Cli::parse();

    let config = RunConfig {
        cartridge: cli.cartridge,
        boot_image: cli.boot,
        skip_boot: cli.skip_boot,
        max_cycles: cli.max_cycles,
        max_frames: cli.max_frames,
    };

    match pocketboy::run(&config) {
        Ok(summary) => {
            println!(
                "{:?} after {} cycles, {} frames",
                summary.reason, summary.cycles, summary.frames
            );
            if cli.dump_regs {
                let regs = &summary.regs;
                println!(
                    "AF={:04X} BC={:04X} DE={:04X} HL={:04X} SP={:04X} PC={:04X}",
                    regs.af(),
                    regs.bc(),
                    regs.de(),
                    regs.hl(),
                    regs.sp,
                    regs.pc.get()
                );
            }
        }
        Err(err) => {
            log::error!("{err:#}");
            eprintln!("error: {err:#}");
            std::process::exit(1);
        }
    }
}
