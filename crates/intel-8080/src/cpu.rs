//! 8080 CPU core with per-instruction execution.

mod execute;

use std::fmt;

use emu_core::{Bus, Cpu, IoBus, Observable, Ticks, Value};

use crate::flags::{FIXED, RESERVED};
use crate::registers::Registers;

/// Cost of one idle step while halted, the same as `HLT` itself.
const HALT_CYCLES: u32 = 7;

/// An opcode byte the CPU cannot decode.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct InvalidOpcode {
    pub opcode: u8,
    /// Address the opcode was fetched from. PC is left pointing here.
    pub pc: u16,
}

impl fmt::Display for InvalidOpcode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "invalid opcode ${:02X} at ${:04X}", self.opcode, self.pc)
    }
}

impl std::error::Error for InvalidOpcode {}

/// Intel 8080 CPU.
///
/// The CPU does not own memory. The bus is lent to `step()` for one
/// instruction at a time, so the host can inspect and patch memory between
/// instructions (loading images, trapping BDOS calls).
pub struct I8080 {
    /// Register file. Public so hosts can seed PC and SP.
    pub regs: Registers,

    /// Cycles consumed since creation or the last reset.
    total_cycles: Ticks,
    /// Decode failure from the most recent step, if it failed.
    last_fault: Option<InvalidOpcode>,
}

impl I8080 {
    /// Create a new 8080 in its reset state.
    #[must_use]
    pub fn new() -> Self {
        Self {
            regs: Registers::default(),
            total_cycles: Ticks::ZERO,
            last_fault: None,
        }
    }

    /// Total cycles consumed since creation or the last reset.
    #[must_use]
    pub const fn total_cycles(&self) -> Ticks {
        self.total_cycles
    }

    /// The decode failure from the most recent step, if it failed.
    #[must_use]
    pub const fn last_fault(&self) -> Option<InvalidOpcode> {
        self.last_fault
    }

    /// Execute one instruction, reporting decode failures as errors.
    ///
    /// On error nothing has changed: PC still points at the bad opcode.
    pub fn try_step<B: IoBus>(&mut self, bus: &mut B) -> Result<u32, InvalidOpcode> {
        if self.regs.halted {
            self.total_cycles += Ticks::new(u64::from(HALT_CYCLES));
            return Ok(HALT_CYCLES);
        }

        let op = bus.read(self.regs.pc);
        let cycles = self.execute(bus, op)?;
        self.total_cycles += Ticks::new(u64::from(cycles));

        debug_assert_eq!(
            self.regs.f() & (FIXED | RESERVED),
            FIXED,
            "flags byte corrupted after opcode ${op:02X}"
        );
        Ok(cycles)
    }

    /// Byte following the opcode.
    fn imm8<B: Bus>(&self, bus: &mut B) -> u8 {
        bus.read(self.regs.pc.wrapping_add(1))
    }

    /// Little-endian word following the opcode.
    fn imm16<B: Bus>(&self, bus: &mut B) -> u16 {
        let lo = bus.read(self.regs.pc.wrapping_add(1));
        let hi = bus.read(self.regs.pc.wrapping_add(2));
        u16::from_le_bytes([lo, hi])
    }

    /// Read a little-endian word from memory.
    fn read16<B: Bus>(bus: &mut B, addr: u16) -> u16 {
        let lo = bus.read(addr);
        let hi = bus.read(addr.wrapping_add(1));
        u16::from_le_bytes([lo, hi])
    }

    /// Write a little-endian word to memory.
    fn write16<B: Bus>(bus: &mut B, addr: u16, value: u16) {
        let [lo, hi] = value.to_le_bytes();
        bus.write(addr, lo);
        bus.write(addr.wrapping_add(1), hi);
    }

    /// Push a word: high byte first, stack grows down.
    fn push<B: Bus>(&mut self, bus: &mut B, value: u16) {
        let [lo, hi] = value.to_le_bytes();
        self.regs.sp = self.regs.sp.wrapping_sub(1);
        bus.write(self.regs.sp, hi);
        self.regs.sp = self.regs.sp.wrapping_sub(1);
        bus.write(self.regs.sp, lo);
    }

    /// Pop a word: low byte first.
    fn pop<B: Bus>(&mut self, bus: &mut B) -> u16 {
        let lo = bus.read(self.regs.sp);
        self.regs.sp = self.regs.sp.wrapping_add(1);
        let hi = bus.read(self.regs.sp);
        self.regs.sp = self.regs.sp.wrapping_add(1);
        u16::from_le_bytes([lo, hi])
    }

    /// Read an 8-bit register by its 3-bit code. Code 6 is memory at HL.
    fn get_reg8<B: Bus>(&self, bus: &mut B, r: u8) -> u8 {
        match r & 7 {
            0 => self.regs.b,
            1 => self.regs.c,
            2 => self.regs.d,
            3 => self.regs.e,
            4 => self.regs.h,
            5 => self.regs.l,
            6 => bus.read(self.regs.hl()),
            _ => self.regs.a,
        }
    }

    /// Write an 8-bit register by its 3-bit code. Code 6 is memory at HL.
    fn set_reg8<B: Bus>(&mut self, bus: &mut B, r: u8, value: u8) {
        match r & 7 {
            0 => self.regs.b = value,
            1 => self.regs.c = value,
            2 => self.regs.d = value,
            3 => self.regs.e = value,
            4 => self.regs.h = value,
            5 => self.regs.l = value,
            6 => bus.write(self.regs.hl(), value),
            _ => self.regs.a = value,
        }
    }

    /// Read a register pair by its 2-bit code (BC, DE, HL, SP).
    fn get_reg16(&self, rp: u8) -> u16 {
        match rp & 3 {
            0 => self.regs.bc(),
            1 => self.regs.de(),
            2 => self.regs.hl(),
            _ => self.regs.sp,
        }
    }

    /// Write a register pair by its 2-bit code (BC, DE, HL, SP).
    fn set_reg16(&mut self, rp: u8, value: u16) {
        match rp & 3 {
            0 => self.regs.set_bc(value),
            1 => self.regs.set_de(value),
            2 => self.regs.set_hl(value),
            _ => self.regs.sp = value,
        }
    }

    /// Read a register pair for PUSH/POP (BC, DE, HL, PSW).
    fn get_reg16_psw(&self, rp: u8) -> u16 {
        match rp & 3 {
            3 => self.regs.psw(),
            _ => self.get_reg16(rp),
        }
    }

    /// Write a register pair for PUSH/POP (BC, DE, HL, PSW).
    fn set_reg16_psw(&mut self, rp: u8, value: u16) {
        match rp & 3 {
            3 => self.regs.set_psw(value),
            _ => self.set_reg16(rp, value),
        }
    }

    /// Evaluate a 3-bit condition code: NZ, Z, NC, C, PO, PE, P, M.
    fn condition(&self, cc: u8) -> bool {
        let f = self.regs.flags;
        match cc & 7 {
            0 => !f.z,
            1 => f.z,
            2 => !f.cy,
            3 => f.cy,
            4 => !f.p,
            5 => f.p,
            6 => !f.s,
            _ => f.s,
        }
    }
}

impl Default for I8080 {
    fn default() -> Self {
        Self::new()
    }
}

impl Cpu for I8080 {
    type Registers = Registers;

    fn step<B: IoBus>(&mut self, bus: &mut B) -> u32 {
        self.last_fault = None;
        match self.try_step(bus) {
            Ok(cycles) => cycles,
            Err(fault) => {
                self.last_fault = Some(fault);
                0
            }
        }
    }

    fn reset(&mut self) {
        self.regs = Registers::default();
        self.total_cycles = Ticks::ZERO;
        self.last_fault = None;
    }

    fn pc(&self) -> u16 {
        self.regs.pc
    }

    fn registers(&self) -> Self::Registers {
        self.regs
    }

    fn is_halted(&self) -> bool {
        self.regs.halted
    }
}

/// All query paths supported by the 8080.
const I8080_QUERY_PATHS: &[&str] = &[
    // Registers
    "a", "f", "b", "c", "d", "e", "h", "l",
    // Register pairs
    "psw", "bc", "de", "hl",
    "sp", "pc",
    // Flags (individual)
    "flags.s", "flags.z", "flags.ac", "flags.p", "flags.cy",
    // CPU state
    "inte", "halted", "cycles",
];

impl Observable for I8080 {
    fn query(&self, path: &str) -> Option<Value> {
        let regs = &self.regs;
        match path {
            "a" => Some(regs.a.into()),
            "f" => Some(regs.f().into()),
            "b" => Some(regs.b.into()),
            "c" => Some(regs.c.into()),
            "d" => Some(regs.d.into()),
            "e" => Some(regs.e.into()),
            "h" => Some(regs.h.into()),
            "l" => Some(regs.l.into()),

            "psw" => Some(regs.psw().into()),
            "bc" => Some(regs.bc().into()),
            "de" => Some(regs.de().into()),
            "hl" => Some(regs.hl().into()),
            "sp" => Some(regs.sp.into()),
            "pc" => Some(regs.pc.into()),

            "flags.s" => Some(regs.flags.s.into()),
            "flags.z" => Some(regs.flags.z.into()),
            "flags.ac" => Some(regs.flags.ac.into()),
            "flags.p" => Some(regs.flags.p.into()),
            "flags.cy" => Some(regs.flags.cy.into()),

            "inte" => Some(regs.inte.into()),
            "halted" => Some(regs.halted.into()),
            "cycles" => Some(self.total_cycles.get().into()),

            _ => None,
        }
    }

    fn query_paths(&self) -> &'static [&'static str] {
        I8080_QUERY_PATHS
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use emu_core::SimpleBus;

    #[test]
    fn new_is_reset_state() {
        let cpu = I8080::new();
        let regs = cpu.registers();
        assert_eq!(
            (regs.a, regs.b, regs.c, regs.d, regs.e, regs.h, regs.l),
            (0, 0, 0, 0, 0, 0, 0)
        );
        assert_eq!(regs.pc, 0);
        assert_eq!(regs.sp, 0);
        assert_eq!(regs.f(), FIXED);
        assert!(!regs.inte);
        assert!(!regs.halted);
    }

    #[test]
    fn reset_clears_everything() {
        let mut cpu = I8080::new();
        let mut bus = SimpleBus::new();
        bus.load(0x0000, &[0x3E, 0x80, 0x37, 0xFB, 0x76]).expect("fits"); // MVI A; STC; EI; HLT
        for _ in 0..4 {
            cpu.step(&mut bus);
        }
        assert!(cpu.is_halted());
        assert!(cpu.total_cycles().get() > 0);

        cpu.reset();
        assert_eq!(cpu.registers(), Registers::default());
        assert_eq!(cpu.regs.f(), FIXED);
        assert_eq!(cpu.total_cycles(), Ticks::ZERO);
    }

    #[test]
    fn push_pop_order() {
        let mut cpu = I8080::new();
        let mut bus = SimpleBus::new();
        cpu.regs.sp = 0x2000;
        cpu.push(&mut bus, 0xBEEF);
        assert_eq!(cpu.regs.sp, 0x1FFE);
        assert_eq!(bus.peek(0x1FFF), 0xBE);
        assert_eq!(bus.peek(0x1FFE), 0xEF);
        assert_eq!(cpu.pop(&mut bus), 0xBEEF);
        assert_eq!(cpu.regs.sp, 0x2000);
    }

    #[test]
    fn stack_wraps_at_zero() {
        let mut cpu = I8080::new();
        let mut bus = SimpleBus::new();
        cpu.push(&mut bus, 0x1234);
        assert_eq!(cpu.regs.sp, 0xFFFE);
        assert_eq!(bus.peek(0xFFFF), 0x12);
        assert_eq!(cpu.pop(&mut bus), 0x1234);
        assert_eq!(cpu.regs.sp, 0x0000);
    }

    #[test]
    fn invalid_opcode_is_recorded() {
        let mut cpu = I8080::new();
        let mut bus = SimpleBus::new();
        bus.load(0x0040, &[0xDD]).expect("fits");
        cpu.regs.pc = 0x0040;

        assert_eq!(cpu.step(&mut bus), 0);
        assert_eq!(cpu.pc(), 0x0040);
        let fault = cpu.last_fault().expect("fault recorded");
        assert_eq!(fault, InvalidOpcode { opcode: 0xDD, pc: 0x0040 });
        assert_eq!(fault.to_string(), "invalid opcode $DD at $0040");
        assert_eq!(cpu.total_cycles(), Ticks::ZERO);
    }

    #[test]
    fn observable_paths_resolve() {
        let mut cpu = I8080::new();
        cpu.regs.set_hl(0x1234);
        cpu.regs.flags.cy = true;
        for path in cpu.query_paths() {
            assert!(cpu.query(path).is_some(), "{path}");
        }
        assert_eq!(cpu.query("hl"), Some(Value::U16(0x1234)));
        assert_eq!(cpu.query("f"), Some(Value::U8(0x03)));
        assert_eq!(cpu.query("flags.cy"), Some(Value::Bool(true)));
        assert_eq!(cpu.query("ix"), None);
    }
}
