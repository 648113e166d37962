//! Opcode metadata table.
//!
//! One slot per opcode byte. Empty slots are the undocumented aliases
//! (`$CB`, `$D9`, `$DD`, `$ED`, `$FD`), which this CPU does not decode.

/// Static description of one instruction.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Opcode {
    /// Assembler mnemonic. Operand placeholders are `d8`, `d16` and `adr`.
    pub mnemonic: &'static str,
    /// Instruction length in bytes, including the opcode (1 to 3).
    pub len: u8,
    /// Base cost in clock cycles. Taken conditional calls and returns cost
    /// 6 more.
    pub cycles: u8,
}

const fn op(mnemonic: &'static str, len: u8, cycles: u8) -> Option<Opcode> {
    Some(Opcode {
        mnemonic,
        len,
        cycles,
    })
}

/// Look up an opcode. Returns `None` for bytes the CPU does not decode.
#[must_use]
pub fn opcode(byte: u8) -> Option<Opcode> {
    OPCODES[usize::from(byte)]
}

/// All 256 opcode slots, indexed by opcode byte.
#[rustfmt::skip]
pub static OPCODES: [Option<Opcode>; 256] = [
    // 00
    op("NOP", 1, 4), op("LXI B,d16", 3, 10), op("STAX B", 1, 7), op("INX B", 1, 5),
    op("INR B", 1, 5), op("DCR B", 1, 5), op("MVI B,d8", 2, 7), op("RLC", 1, 4),
    op("NOP", 1, 4), op("DAD B", 1, 10), op("LDAX B", 1, 7), op("DCX B", 1, 5),
    op("INR C", 1, 5), op("DCR C", 1, 5), op("MVI C,d8", 2, 7), op("RRC", 1, 4),
    // 10
    op("NOP", 1, 4), op("LXI D,d16", 3, 10), op("STAX D", 1, 7), op("INX D", 1, 5),
    op("INR D", 1, 5), op("DCR D", 1, 5), op("MVI D,d8", 2, 7), op("RAL", 1, 4),
    op("NOP", 1, 4), op("DAD D", 1, 10), op("LDAX D", 1, 7), op("DCX D", 1, 5),
    op("INR E", 1, 5), op("DCR E", 1, 5), op("MVI E,d8", 2, 7), op("RAR", 1, 4),
    // 20
    op("NOP", 1, 4), op("LXI H,d16", 3, 10), op("SHLD adr", 3, 16), op("INX H", 1, 5),
    op("INR H", 1, 5), op("DCR H", 1, 5), op("MVI H,d8", 2, 7), op("DAA", 1, 4),
    op("NOP", 1, 4), op("DAD H", 1, 10), op("LHLD adr", 3, 16), op("DCX H", 1, 5),
    op("INR L", 1, 5), op("DCR L", 1, 5), op("MVI L,d8", 2, 7), op("CMA", 1, 4),
    // 30
    op("NOP", 1, 4), op("LXI SP,d16", 3, 10), op("STA adr", 3, 13), op("INX SP", 1, 5),
    op("INR M", 1, 10), op("DCR M", 1, 10), op("MVI M,d8", 2, 10), op("STC", 1, 4),
    op("NOP", 1, 4), op("DAD SP", 1, 10), op("LDA adr", 3, 13), op("DCX SP", 1, 5),
    op("INR A", 1, 5), op("DCR A", 1, 5), op("MVI A,d8", 2, 7), op("CMC", 1, 4),
    // 40
    op("MOV B,B", 1, 5), op("MOV B,C", 1, 5), op("MOV B,D", 1, 5), op("MOV B,E", 1, 5),
    op("MOV B,H", 1, 5), op("MOV B,L", 1, 5), op("MOV B,M", 1, 7), op("MOV B,A", 1, 5),
    op("MOV C,B", 1, 5), op("MOV C,C", 1, 5), op("MOV C,D", 1, 5), op("MOV C,E", 1, 5),
    op("MOV C,H", 1, 5), op("MOV C,L", 1, 5), op("MOV C,M", 1, 7), op("MOV C,A", 1, 5),
    // 50
    op("MOV D,B", 1, 5), op("MOV D,C", 1, 5), op("MOV D,D", 1, 5), op("MOV D,E", 1, 5),
    op("MOV D,H", 1, 5), op("MOV D,L", 1, 5), op("MOV D,M", 1, 7), op("MOV D,A", 1, 5),
    op("MOV E,B", 1, 5), op("MOV E,C", 1, 5), op("MOV E,D", 1, 5), op("MOV E,E", 1, 5),
    op("MOV E,H", 1, 5), op("MOV E,L", 1, 5), op("MOV E,M", 1, 7), op("MOV E,A", 1, 5),
    // 60
    op("MOV H,B", 1, 5), op("MOV H,C", 1, 5), op("MOV H,D", 1, 5), op("MOV H,E", 1, 5),
    op("MOV H,H", 1, 5), op("MOV H,L", 1, 5), op("MOV H,M", 1, 7), op("MOV H,A", 1, 5),
    op("MOV L,B", 1, 5), op("MOV L,C", 1, 5), op("MOV L,D", 1, 5), op("MOV L,E", 1, 5),
    op("MOV L,H", 1, 5), op("MOV L,L", 1, 5), op("MOV L,M", 1, 7), op("MOV L,A", 1, 5),
    // 70
    op("MOV M,B", 1, 7), op("MOV M,C", 1, 7), op("MOV M,D", 1, 7), op("MOV M,E", 1, 7),
    op("MOV M,H", 1, 7), op("MOV M,L", 1, 7), op("HLT", 1, 7), op("MOV M,A", 1, 7),
    op("MOV A,B", 1, 5), op("MOV A,C", 1, 5), op("MOV A,D", 1, 5), op("MOV A,E", 1, 5),
    op("MOV A,H", 1, 5), op("MOV A,L", 1, 5), op("MOV A,M", 1, 7), op("MOV A,A", 1, 5),
    // 80
    op("ADD B", 1, 4), op("ADD C", 1, 4), op("ADD D", 1, 4), op("ADD E", 1, 4),
    op("ADD H", 1, 4), op("ADD L", 1, 4), op("ADD M", 1, 7), op("ADD A", 1, 4),
    op("ADC B", 1, 4), op("ADC C", 1, 4), op("ADC D", 1, 4), op("ADC E", 1, 4),
    op("ADC H", 1, 4), op("ADC L", 1, 4), op("ADC M", 1, 7), op("ADC A", 1, 4),
    // 90
    op("SUB B", 1, 4), op("SUB C", 1, 4), op("SUB D", 1, 4), op("SUB E", 1, 4),
    op("SUB H", 1, 4), op("SUB L", 1, 4), op("SUB M", 1, 7), op("SUB A", 1, 4),
    op("SBB B", 1, 4), op("SBB C", 1, 4), op("SBB D", 1, 4), op("SBB E", 1, 4),
    op("SBB H", 1, 4), op("SBB L", 1, 4), op("SBB M", 1, 7), op("SBB A", 1, 4),
    // A0
    op("ANA B", 1, 4), op("ANA C", 1, 4), op("ANA D", 1, 4), op("ANA E", 1, 4),
    op("ANA H", 1, 4), op("ANA L", 1, 4), op("ANA M", 1, 7), op("ANA A", 1, 4),
    op("XRA B", 1, 4), op("XRA C", 1, 4), op("XRA D", 1, 4), op("XRA E", 1, 4),
    op("XRA H", 1, 4), op("XRA L", 1, 4), op("XRA M", 1, 7), op("XRA A", 1, 4),
    // B0
    op("ORA B", 1, 4), op("ORA C", 1, 4), op("ORA D", 1, 4), op("ORA E", 1, 4),
    op("ORA H", 1, 4), op("ORA L", 1, 4), op("ORA M", 1, 7), op("ORA A", 1, 4),
    op("CMP B", 1, 4), op("CMP C", 1, 4), op("CMP D", 1, 4), op("CMP E", 1, 4),
    op("CMP H", 1, 4), op("CMP L", 1, 4), op("CMP M", 1, 7), op("CMP A", 1, 4),
    // C0
    op("RNZ", 1, 5), op("POP B", 1, 10), op("JNZ adr", 3, 10), op("JMP adr", 3, 10),
    op("CNZ adr", 3, 11), op("PUSH B", 1, 11), op("ADI d8", 2, 7), op("RST 0", 1, 11),
    op("RZ", 1, 5), op("RET", 1, 10), op("JZ adr", 3, 10), None,
    op("CZ adr", 3, 11), op("CALL adr", 3, 17), op("ACI d8", 2, 7), op("RST 1", 1, 11),
    // D0
    op("RNC", 1, 5), op("POP D", 1, 10), op("JNC adr", 3, 10), op("OUT d8", 2, 10),
    op("CNC adr", 3, 11), op("PUSH D", 1, 11), op("SUI d8", 2, 7), op("RST 2", 1, 11),
    op("RC", 1, 5), None, op("JC adr", 3, 10), op("IN d8", 2, 10),
    op("CC adr", 3, 11), None, op("SBI d8", 2, 7), op("RST 3", 1, 11),
    // E0
    op("RPO", 1, 5), op("POP H", 1, 10), op("JPO adr", 3, 10), op("XTHL", 1, 18),
    op("CPO adr", 3, 11), op("PUSH H", 1, 11), op("ANI d8", 2, 7), op("RST 4", 1, 11),
    op("RPE", 1, 5), op("PCHL", 1, 5), op("JPE adr", 3, 10), op("XCHG", 1, 5),
    op("CPE adr", 3, 11), None, op("XRI d8", 2, 7), op("RST 5", 1, 11),
    // F0
    op("RP", 1, 5), op("POP PSW", 1, 10), op("JP adr", 3, 10), op("DI", 1, 4),
    op("CP adr", 3, 11), op("PUSH PSW", 1, 11), op("ORI d8", 2, 7), op("RST 6", 1, 11),
    op("RM", 1, 5), op("SPHL", 1, 5), op("JM adr", 3, 10), op("EI", 1, 4),
    op("CM adr", 3, 11), None, op("CPI d8", 2, 7), op("RST 7", 1, 11),
];
