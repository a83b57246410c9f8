use std::path::PathBuf;

use clap::Parser;
use log::info;

use chip8_vm_rs::{
    display_snapshot, load_quirks_profile, load_quirks_profile_from_env, run_emulator_app,
    run_emulator_headless, Chip8Error,
};

#[derive(Debug, Parser)]
#[command(name = "chip8-vm-rs")]
#[command(about = "Run a CHIP-8 program")]
struct Args {
    #[arg(long, default_value = "roms/chip8-test-suite.ch8")]
    rom: PathBuf,

    /// Falls back to CHIP8_QUIRKS, then "standard"
    #[arg(long, value_parser = ["standard", "original", "modern"])]
    quirks: Option<String>,

    /// Advance PC after each instruction instead of at fetch
    #[arg(long)]
    deferred_pc: bool,

    #[arg(long, default_value_t = 10)]
    scale: usize,

    #[arg(long, default_value_t = 700)]
    hz: usize,

    #[arg(long, default_value_t = 60)]
    fps: usize,

    #[arg(long, default_value_t = 2000)]
    max_cycles: usize,

    #[arg(long)]
    headless: bool,
}

fn main() -> Result<(), Chip8Error> {
    env_logger::init();

    let args = Args::parse();
    let (profile, quirks) = match args.quirks {
        Some(profile) => load_quirks_profile(&profile).map(|quirks| (profile, quirks)),
        None => load_quirks_profile_from_env(),
    }
    .map_err(|_| Chip8Error::InvalidArgument("quirks must be standard, original or modern"))?;
    let quirks = quirks.with_deferred_pc_increment(args.deferred_pc);
    info!("quirks profile {profile} ({quirks:?})");

    if args.headless {
        let state = run_emulator_headless(quirks, &args.rom, args.max_cycles, args.hz)?;
        println!("headless finished: pc=0x{:03x}", state.pc);
        print!("{}", display_snapshot(&state).to_ascii());
        return Ok(());
    }

    let _state = run_emulator_app(quirks, &args.rom, args.scale, args.hz, args.fps)?;
    Ok(())
}
