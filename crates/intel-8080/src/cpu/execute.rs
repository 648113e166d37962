//! Instruction execution for the 8080.

use emu_core::IoBus;

use crate::alu;
use crate::flags::Flags;
use crate::opcodes::opcode;

use super::{I8080, InvalidOpcode};

/// Extra cycles for a conditional call or return whose condition holds.
const TAKEN_PENALTY: u32 = 6;

impl I8080 {
    /// Execute the instruction whose opcode `op` sits at PC.
    ///
    /// Instructions that fall through advance PC by their table length
    /// after executing. Control transfers set PC themselves and return
    /// early.
    pub(super) fn execute<B: IoBus>(&mut self, bus: &mut B, op: u8) -> Result<u32, InvalidOpcode> {
        let Some(info) = opcode(op) else {
            return Err(InvalidOpcode {
                opcode: op,
                pc: self.regs.pc,
            });
        };
        let cycles = u32::from(info.cycles);

        match op {
            // HLT (sits in the MOV block where MOV M,M would be)
            0x76 => {
                self.regs.halted = true;
            }

            // MOV r, r'
            0x40..=0x7F => {
                let value = self.get_reg8(bus, op);
                self.set_reg8(bus, op >> 3, value);
            }

            // ADD/ADC/SUB/SBB/ANA/XRA/ORA/CMP r
            0x80..=0xBF => {
                let value = self.get_reg8(bus, op);
                self.alu_a(op >> 3, value);
            }

            // NOP, including the undocumented aliases
            0x00 | 0x08 | 0x10 | 0x18 | 0x20 | 0x28 | 0x30 | 0x38 => {}

            // LXI rp, d16 (01=B, 11=D, 21=H, 31=SP)
            0x01 | 0x11 | 0x21 | 0x31 => {
                let value = self.imm16(bus);
                self.set_reg16(op >> 4, value);
            }

            // STAX B / STAX D
            0x02 | 0x12 => {
                let addr = self.get_reg16(op >> 4);
                bus.write(addr, self.regs.a);
            }

            // LDAX B / LDAX D
            0x0A | 0x1A => {
                let addr = self.get_reg16(op >> 4);
                self.regs.a = bus.read(addr);
            }

            // INX rp
            0x03 | 0x13 | 0x23 | 0x33 => {
                let rp = op >> 4;
                let value = self.get_reg16(rp).wrapping_add(1);
                self.set_reg16(rp, value);
            }

            // DCX rp
            0x0B | 0x1B | 0x2B | 0x3B => {
                let rp = op >> 4;
                let value = self.get_reg16(rp).wrapping_sub(1);
                self.set_reg16(rp, value);
            }

            // DAD rp
            0x09 | 0x19 | 0x29 | 0x39 => {
                let (result, carry) = alu::add16(self.regs.hl(), self.get_reg16(op >> 4));
                self.regs.set_hl(result);
                self.regs.flags.cy = carry;
            }

            // INR r (34 = INR M)
            0x04 | 0x0C | 0x14 | 0x1C | 0x24 | 0x2C | 0x34 | 0x3C => {
                let r = op >> 3;
                let result = alu::inc8(self.get_reg8(bus, r));
                self.set_reg8(bus, r, result.value);
                self.set_flags_keep_carry(result.flags);
            }

            // DCR r (35 = DCR M)
            0x05 | 0x0D | 0x15 | 0x1D | 0x25 | 0x2D | 0x35 | 0x3D => {
                let r = op >> 3;
                let result = alu::dec8(self.get_reg8(bus, r));
                self.set_reg8(bus, r, result.value);
                self.set_flags_keep_carry(result.flags);
            }

            // MVI r, d8 (36 = MVI M)
            0x06 | 0x0E | 0x16 | 0x1E | 0x26 | 0x2E | 0x36 | 0x3E => {
                let value = self.imm8(bus);
                self.set_reg8(bus, op >> 3, value);
            }

            // RLC
            0x07 => {
                let (value, carry) = alu::rlc(self.regs.a);
                self.regs.a = value;
                self.regs.flags.cy = carry;
            }

            // RRC
            0x0F => {
                let (value, carry) = alu::rrc(self.regs.a);
                self.regs.a = value;
                self.regs.flags.cy = carry;
            }

            // RAL
            0x17 => {
                let (value, carry) = alu::ral(self.regs.a, self.regs.flags.cy);
                self.regs.a = value;
                self.regs.flags.cy = carry;
            }

            // RAR
            0x1F => {
                let (value, carry) = alu::rar(self.regs.a, self.regs.flags.cy);
                self.regs.a = value;
                self.regs.flags.cy = carry;
            }

            // SHLD adr
            0x22 => {
                let addr = self.imm16(bus);
                Self::write16(bus, addr, self.regs.hl());
            }

            // LHLD adr
            0x2A => {
                let addr = self.imm16(bus);
                let value = Self::read16(bus, addr);
                self.regs.set_hl(value);
            }

            // DAA
            0x27 => {
                let result = alu::daa(self.regs.a, self.regs.flags);
                self.regs.a = result.value;
                self.regs.flags = result.flags;
            }

            // CMA
            0x2F => {
                self.regs.a = !self.regs.a;
            }

            // STA adr
            0x32 => {
                let addr = self.imm16(bus);
                bus.write(addr, self.regs.a);
            }

            // LDA adr
            0x3A => {
                let addr = self.imm16(bus);
                self.regs.a = bus.read(addr);
            }

            // STC
            0x37 => {
                self.regs.flags.cy = true;
            }

            // CMC
            0x3F => {
                self.regs.flags.cy = !self.regs.flags.cy;
            }

            // Rcc (C0=NZ, C8=Z, D0=NC, D8=C, E0=PO, E8=PE, F0=P, F8=M)
            0xC0 | 0xC8 | 0xD0 | 0xD8 | 0xE0 | 0xE8 | 0xF0 | 0xF8 => {
                if self.condition(op >> 3) {
                    self.regs.pc = self.pop(bus);
                    return Ok(cycles + TAKEN_PENALTY);
                }
            }

            // RET
            0xC9 => {
                self.regs.pc = self.pop(bus);
                return Ok(cycles);
            }

            // POP rp (C1=B, D1=D, E1=H, F1=PSW)
            0xC1 | 0xD1 | 0xE1 | 0xF1 => {
                let value = self.pop(bus);
                self.set_reg16_psw(op >> 4, value);
            }

            // PUSH rp (C5=B, D5=D, E5=H, F5=PSW)
            0xC5 | 0xD5 | 0xE5 | 0xF5 => {
                let value = self.get_reg16_psw(op >> 4);
                self.push(bus, value);
            }

            // Jcc adr: same cost taken or not
            0xC2 | 0xCA | 0xD2 | 0xDA | 0xE2 | 0xEA | 0xF2 | 0xFA => {
                if self.condition(op >> 3) {
                    self.regs.pc = self.imm16(bus);
                    return Ok(cycles);
                }
            }

            // JMP adr
            0xC3 => {
                self.regs.pc = self.imm16(bus);
                return Ok(cycles);
            }

            // Ccc adr
            0xC4 | 0xCC | 0xD4 | 0xDC | 0xE4 | 0xEC | 0xF4 | 0xFC => {
                if self.condition(op >> 3) {
                    self.call(bus);
                    return Ok(cycles + TAKEN_PENALTY);
                }
            }

            // CALL adr
            0xCD => {
                self.call(bus);
                return Ok(cycles);
            }

            // ADI/ACI/SUI/SBI/ANI/XRI/ORI/CPI d8
            0xC6 | 0xCE | 0xD6 | 0xDE | 0xE6 | 0xEE | 0xF6 | 0xFE => {
                let value = self.imm8(bus);
                self.alu_a(op >> 3, value);
            }

            // RST n
            0xC7 | 0xCF | 0xD7 | 0xDF | 0xE7 | 0xEF | 0xF7 | 0xFF => {
                let ret = self.regs.pc.wrapping_add(1);
                self.push(bus, ret);
                self.regs.pc = u16::from(op & 0x38);
                return Ok(cycles);
            }

            // OUT d8
            0xD3 => {
                let port = self.imm8(bus);
                bus.write_io(port, self.regs.a);
            }

            // IN d8
            0xDB => {
                let port = self.imm8(bus);
                self.regs.a = bus.read_io(port);
            }

            // XTHL
            0xE3 => {
                let sp = self.regs.sp;
                let top = Self::read16(bus, sp);
                Self::write16(bus, sp, self.regs.hl());
                self.regs.set_hl(top);
            }

            // PCHL
            0xE9 => {
                self.regs.pc = self.regs.hl();
                return Ok(cycles);
            }

            // XCHG
            0xEB => {
                let de = self.regs.de();
                self.regs.set_de(self.regs.hl());
                self.regs.set_hl(de);
            }

            // DI
            0xF3 => {
                self.regs.inte = false;
            }

            // SPHL
            0xF9 => {
                self.regs.sp = self.regs.hl();
            }

            // EI
            0xFB => {
                self.regs.inte = true;
            }

            _ => {
                return Err(InvalidOpcode {
                    opcode: op,
                    pc: self.regs.pc,
                });
            }
        }

        self.regs.pc = self.regs.pc.wrapping_add(u16::from(info.len));
        Ok(cycles)
    }

    /// Push the address of the next instruction and jump to the operand.
    fn call<B: IoBus>(&mut self, bus: &mut B) {
        let target = self.imm16(bus);
        let ret = self.regs.pc.wrapping_add(3);
        self.push(bus, ret);
        self.regs.pc = target;
    }

    /// Install new flags but keep CY, for `INR` and `DCR`.
    fn set_flags_keep_carry(&mut self, flags: Flags) {
        self.regs.flags = Flags {
            cy: self.regs.flags.cy,
            ..flags
        };
    }

    /// Accumulator operation selected by bits 5-3 of the opcode.
    fn alu_a(&mut self, op: u8, value: u8) {
        let a = self.regs.a;
        let carry = self.regs.flags.cy;
        let result = match op & 7 {
            0 => alu::add8(a, value, false),
            1 => alu::add8(a, value, carry),
            2 => alu::sub8(a, value, false),
            3 => alu::sub8(a, value, carry),
            4 => alu::and8(a, value),
            5 => alu::xor8(a, value),
            6 => alu::or8(a, value),
            _ => {
                self.regs.flags = alu::cp8(a, value);
                return;
            }
        };
        self.regs.a = result.value;
        self.regs.flags = result.flags;
    }
}
