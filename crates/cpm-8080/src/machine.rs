//! CP/M machine: CPU, memory and the BDOS trap.
//!
//! Memory layout:
//! - `$0000`: warm boot. Holds `HLT`; reaching it ends the run.
//! - `$0005`: BDOS entry. Holds `RET`; calls are trapped before it runs.
//! - `$0006-$0007`: top of TPA. Programs load SP from here.
//! - `$0100`: program load address.

use std::fmt;
use std::io::{self, Write};

use emu_core::{ADDRESS_SPACE, Bus, Cpu, LoadError, SimpleBus};
use intel_8080::I8080;
use intel_8080::flags::{FIXED, RESERVED};

use crate::{CpmConfig, ImageError, RunError};

/// Warm boot vector. Jumping here ends the program.
pub const WARM_BOOT: u16 = 0x0000;

/// BDOS entry point.
pub const BDOS_ENTRY: u16 = 0x0005;

/// Address of the top-of-TPA word.
const TPA_TOP_VECTOR: u16 = 0x0006;

/// First address past the vectors written by `load_com`.
const PAGE_ZERO_END: u16 = 0x0008;

const HLT: u8 = 0x76;
const RET: u8 = 0xC9;

/// BDOS function numbers (passed in C).
const BDOS_TERMINATE: u8 = 0;
const BDOS_CONSOLE_OUTPUT: u8 = 2;
const BDOS_PRINT_STRING: u8 = 9;

/// Why a run stopped.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Exit {
    /// Control reached the warm boot vector.
    WarmBoot,
    /// BDOS function 0 was called.
    Terminated,
    /// The CPU executed `HLT` somewhere other than the warm boot vector.
    Halted,
}

impl fmt::Display for Exit {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::WarmBoot => write!(f, "warm boot"),
            Self::Terminated => write!(f, "program terminated"),
            Self::Halted => write!(f, "halted"),
        }
    }
}

/// Summary of a finished run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RunReport {
    pub exit: Exit,
    /// Everything the program printed through the BDOS.
    pub output: String,
    pub instructions: u64,
    pub cycles: u64,
}

/// An 8080 with 64K of RAM set up as a CP/M transient program area.
pub struct CpmMachine {
    cpu: I8080,
    bus: SimpleBus,
    config: CpmConfig,
    /// Console output captured so far.
    console: String,
    /// Instructions executed since the last load.
    instructions: u64,
}

impl CpmMachine {
    #[must_use]
    pub fn new(config: CpmConfig) -> Self {
        Self {
            cpu: I8080::new(),
            bus: SimpleBus::new(),
            config,
            console: String::new(),
            instructions: 0,
        }
    }

    #[must_use]
    pub fn cpu(&self) -> &I8080 {
        &self.cpu
    }

    #[must_use]
    pub fn bus(&self) -> &SimpleBus {
        &self.bus
    }

    /// Console output captured so far, including from a run that failed.
    #[must_use]
    pub fn console(&self) -> &str {
        &self.console
    }

    #[must_use]
    pub fn instructions(&self) -> u64 {
        self.instructions
    }

    /// Clear memory, load a `.COM` image and point the CPU at it.
    ///
    /// The image is checked before anything is touched, so a rejected image
    /// leaves the previous program in place.
    pub fn load_com(&mut self, image: &[u8]) -> Result<(), ImageError> {
        let load_address = self.config.load_address;
        if load_address < PAGE_ZERO_END {
            return Err(ImageError::LoadAddressInPageZero { load_address });
        }
        if usize::from(load_address) + image.len() > ADDRESS_SPACE {
            return Err(LoadError::TooLarge {
                offset: load_address,
                len: image.len(),
            }
            .into());
        }

        self.bus.clear();
        self.cpu.reset();
        self.console.clear();
        self.instructions = 0;

        self.bus.load(load_address, image)?;
        self.bus.write(WARM_BOOT, HLT);
        self.bus.write(BDOS_ENTRY, RET);
        self.bus
            .load(TPA_TOP_VECTOR, &self.config.tpa_top.to_le_bytes())?;

        self.cpu.regs.pc = load_address;
        self.cpu.regs.sp = self.config.tpa_top;
        Ok(())
    }

    /// Run to completion, capturing console output.
    pub fn run(&mut self) -> Result<RunReport, RunError> {
        self.run_to(&mut io::sink())
    }

    /// Run to completion, writing console output to `console` as it is
    /// produced. Output is captured in the report as well.
    pub fn run_to<W: Write>(&mut self, console: &mut W) -> Result<RunReport, RunError> {
        loop {
            let pc = self.cpu.pc();

            if pc == WARM_BOOT {
                return Ok(self.report(Exit::WarmBoot));
            }

            if pc == BDOS_ENTRY {
                if self.bdos(console)? {
                    continue;
                }
                return Ok(self.report(Exit::Terminated));
            }

            if let Some(limit) = self
                .config
                .max_instructions
                .filter(|&limit| self.instructions >= limit)
            {
                return Err(RunError::InstructionLimit { limit });
            }

            self.cpu.try_step(&mut self.bus)?;
            self.instructions += 1;

            let flags = self.cpu.regs.f();
            if flags & (FIXED | RESERVED) != FIXED {
                return Err(RunError::FlagsCorrupted { pc, flags });
            }

            if self.cpu.is_halted() {
                return Ok(self.report(Exit::Halted));
            }
        }
    }

    /// Handle a BDOS call. Returns false if the program asked to terminate.
    fn bdos<W: Write>(&mut self, console: &mut W) -> Result<bool, RunError> {
        match self.cpu.regs.c {
            BDOS_TERMINATE => return Ok(false),
            BDOS_CONSOLE_OUTPUT => {
                let ch = self.cpu.regs.e;
                self.emit(console, &[ch])?;
            }
            BDOS_PRINT_STRING => {
                let text = self.dollar_string(self.cpu.regs.de());
                self.emit(console, &text)?;
            }
            // Other functions are accepted and do nothing.
            _ => {}
        }

        // Return to the caller as the RET at the entry point would.
        let sp = self.cpu.regs.sp;
        self.cpu.regs.pc = self.bus.peek_word(sp);
        self.cpu.regs.sp = sp.wrapping_add(2);
        Ok(true)
    }

    /// Bytes from `addr` up to the `$` terminator. A string with no
    /// terminator stops after one pass over memory.
    fn dollar_string(&self, addr: u16) -> Vec<u8> {
        let mut text = Vec::new();
        let mut addr = addr;
        for _ in 0..ADDRESS_SPACE {
            let ch = self.bus.peek(addr);
            if ch == b'$' {
                break;
            }
            text.push(ch);
            addr = addr.wrapping_add(1);
        }
        text
    }

    fn emit<W: Write>(&mut self, console: &mut W, bytes: &[u8]) -> io::Result<()> {
        self.console.extend(bytes.iter().map(|&b| char::from(b)));
        console.write_all(bytes)?;
        console.flush()
    }

    fn report(&self, exit: Exit) -> RunReport {
        RunReport {
            exit,
            output: self.console.clone(),
            instructions: self.instructions,
            cycles: self.cpu.total_cycles().get(),
        }
    }
}
