//! Command-line front end: run `.COM` programs or list their code.

use std::collections::BTreeMap;
use std::error::Error;
use std::fs;
use std::io::{self, Write};
use std::path::{Path, PathBuf};
use std::process;

use clap::{Parser, Subcommand};
use cpm_8080::{CpmConfig, CpmMachine};
use emu_core::{Observable, Value};
use intel_8080::disasm;

/// Run Intel 8080 CP/M programs.
#[derive(Parser)]
#[command(version, about)]
struct Args {
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Run a `.COM` program and print its console output
    Run {
        /// Program image, loaded at $0100
        file: PathBuf,
        /// Stop with an error after this many instructions
        #[arg(long)]
        max_instructions: Option<u64>,
        /// Print the final CPU state as JSON on stderr
        #[arg(long)]
        dump_state: bool,
    },
    /// Disassemble a binary image
    Disasm {
        /// Image to list
        file: PathBuf,
        /// Load address of the first byte (decimal, 0x.. or $..)
        #[arg(long, default_value = "0x0100", value_parser = parse_address)]
        origin: u16,
    },
}

fn main() {
    let args = Args::parse();

    let result = match args.command {
        Command::Run {
            file,
            max_instructions,
            dump_state,
        } => run(&file, max_instructions, dump_state),
        Command::Disasm { file, origin } => list(&file, origin),
    };

    if let Err(e) = result {
        eprintln!("Error: {e}");
        process::exit(1);
    }
}

fn read_image(path: &Path) -> Result<Vec<u8>, Box<dyn Error>> {
    fs::read(path).map_err(|e| format!("{}: {e}", path.display()).into())
}

fn run(path: &Path, max_instructions: Option<u64>, dump_state: bool) -> Result<(), Box<dyn Error>> {
    let image = read_image(path)?;

    let config = CpmConfig {
        max_instructions,
        ..CpmConfig::default()
    };
    let mut machine = CpmMachine::new(config);
    machine.load_com(&image)?;

    let result = {
        let mut stdout = io::stdout().lock();
        machine.run_to(&mut stdout)
    };

    if dump_state {
        eprintln!("{}", state_json(machine.cpu())?);
    }

    let report = result?;
    eprintln!(
        "\n{} after {} instructions, {} cycles",
        report.exit, report.instructions, report.cycles
    );
    Ok(())
}

/// Every observable path and its value, as a JSON object.
fn state_json(cpu: &impl Observable) -> serde_json::Result<String> {
    let state: BTreeMap<&str, Value> = cpu
        .query_paths()
        .iter()
        .filter_map(|&path| cpu.query(path).map(|value| (path, value)))
        .collect();
    serde_json::to_string_pretty(&state)
}

fn list(path: &Path, origin: u16) -> Result<(), Box<dyn Error>> {
    let image = read_image(path)?;

    let mut stdout = io::stdout().lock();
    for insn in disasm::disassemble(&image, origin) {
        writeln!(stdout, "{insn}")?;
    }
    Ok(())
}

/// Parse an address as decimal, `0x` hex or `$` hex.
fn parse_address(s: &str) -> Result<u16, String> {
    let hex = s
        .strip_prefix("0x")
        .or_else(|| s.strip_prefix("0X"))
        .or_else(|| s.strip_prefix('$'));
    let parsed = match hex {
        Some(digits) => u16::from_str_radix(digits, 16),
        None => s.parse(),
    };
    parsed.map_err(|e| format!("invalid address `{s}`: {e}"))
}
