//! Instruction listing.
//!
//! Decoding needs nothing but the bytes and the opcode table, so it works
//! on a plain slice: a file on disk or a window into a bus.

use std::fmt;

use crate::opcodes::opcode;

/// Immediate operand of a decoded instruction.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Operand {
    None,
    Byte(u8),
    Word(u16),
}

/// One decoded instruction.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Instruction {
    pub address: u16,
    pub opcode: u8,
    /// Length in bytes. Undecodable opcodes count as one byte.
    pub len: u8,
    /// Mnemonic template from the opcode table, or `???`.
    pub mnemonic: &'static str,
    pub operand: Operand,
}

impl Instruction {
    /// True if the opcode has a table entry.
    #[must_use]
    pub fn is_valid(&self) -> bool {
        opcode(self.opcode).is_some()
    }

    /// Assembler text with the operand filled in, e.g. `LXI SP,$FE00`.
    #[must_use]
    pub fn text(&self) -> String {
        match self.operand {
            Operand::None => self.mnemonic.to_string(),
            Operand::Byte(b) => self.mnemonic.replace("d8", &format!("${b:02X}")),
            Operand::Word(w) => self
                .mnemonic
                .replace("d16", &format!("${w:04X}"))
                .replace("adr", &format!("${w:04X}")),
        }
    }

    /// Raw instruction bytes.
    #[must_use]
    pub fn bytes(&self) -> Vec<u8> {
        let mut bytes = vec![self.opcode];
        match self.operand {
            Operand::None => {}
            Operand::Byte(b) => bytes.push(b),
            Operand::Word(w) => bytes.extend_from_slice(&w.to_le_bytes()),
        }
        bytes
    }
}

impl fmt::Display for Instruction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let hex: Vec<String> = self.bytes().iter().map(|b| format!("{b:02X}")).collect();
        write!(f, "{:04X}  {:<8}  {}", self.address, hex.join(" "), self.text())
    }
}

/// Decode the instruction at `offset` in `code`, which is loaded at
/// `address`. Operand bytes past the end of `code` read as zero.
#[must_use]
pub fn decode(code: &[u8], offset: usize, address: u16) -> Instruction {
    let byte_at = |i: usize| code.get(offset + i).copied().unwrap_or(0);
    let op = byte_at(0);

    let Some(info) = opcode(op) else {
        return Instruction {
            address,
            opcode: op,
            len: 1,
            mnemonic: "???",
            operand: Operand::None,
        };
    };

    let operand = match info.len {
        2 => Operand::Byte(byte_at(1)),
        3 => Operand::Word(u16::from_le_bytes([byte_at(1), byte_at(2)])),
        _ => Operand::None,
    };

    Instruction {
        address,
        opcode: op,
        len: info.len,
        mnemonic: info.mnemonic,
        operand,
    }
}

/// Decode every instruction in `code`, which is loaded at `origin`.
///
/// Undecodable bytes are listed as `???` and the walk carries on with the
/// next byte.
#[must_use]
pub fn disassemble(code: &[u8], origin: u16) -> Vec<Instruction> {
    let mut listing = Vec::new();
    let mut offset = 0;
    while offset < code.len() {
        let address = origin.wrapping_add(offset as u16);
        let insn = decode(code, offset, address);
        offset += usize::from(insn.len);
        listing.push(insn);
    }
    listing
}
