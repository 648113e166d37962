//! Behaviour tests for individual 8080 instructions.
//!
//! Each test runs a few hand-assembled bytes on a flat 64K bus and checks
//! registers, memory, flags and cycle counts.

use emu_core::{Bus, Cpu, IoBus, SimpleBus};
use intel_8080::{Flags, I8080};

/// Load `program` at `$0000` and return a fresh CPU and bus.
fn setup(program: &[u8]) -> (I8080, SimpleBus) {
    let mut bus = SimpleBus::new();
    bus.load(0x0000, program).expect("program fits");
    (I8080::new(), bus)
}

/// Run CPU until it halts, return instruction count.
fn run_until_halt(cpu: &mut I8080, bus: &mut SimpleBus) -> u64 {
    let mut count = 0;
    while !cpu.is_halted() && count < 10000 {
        let cycles = cpu.step(bus);
        assert_ne!(cycles, 0, "undecodable opcode at ${:04X}", cpu.pc());
        count += 1;
    }
    count
}

#[test]
fn test_nop() {
    let (mut cpu, mut bus) = setup(&[0x00, 0x76]); // NOP; HLT

    assert_eq!(cpu.step(&mut bus), 4);
    assert_eq!(cpu.pc(), 0x0001);
    assert_eq!(cpu.step(&mut bus), 7);
    assert_eq!(cpu.pc(), 0x0002);
    assert!(cpu.is_halted());
}

#[test]
fn test_mvi_and_lxi() {
    let (mut cpu, mut bus) = setup(&[
        0x3E, 0x42,       // MVI A,$42
        0x01, 0x34, 0x12, // LXI B,$1234
        0x11, 0x78, 0x56, // LXI D,$5678
        0x21, 0xBC, 0x9A, // LXI H,$9ABC
        0x31, 0x00, 0xF0, // LXI SP,$F000
        0x76,
    ]);

    run_until_halt(&mut cpu, &mut bus);

    let regs = cpu.registers();
    assert_eq!(regs.a, 0x42);
    assert_eq!(regs.bc(), 0x1234);
    assert_eq!(regs.de(), 0x5678);
    assert_eq!(regs.hl(), 0x9ABC);
    assert_eq!(regs.sp, 0xF000);
}

#[test]
fn test_mov_through_memory() {
    let (mut cpu, mut bus) = setup(&[
        0x21, 0x00, 0x20, // LXI H,$2000
        0x06, 0x99,       // MVI B,$99
        0x70,             // MOV M,B
        0x7E,             // MOV A,M
        0x4F,             // MOV C,A
        0x76,
    ]);

    run_until_halt(&mut cpu, &mut bus);

    assert_eq!(bus.peek(0x2000), 0x99);
    assert_eq!(cpu.regs.a, 0x99);
    assert_eq!(cpu.regs.c, 0x99);
}

#[test]
fn test_mov_timing() {
    let (mut cpu, mut bus) = setup(&[0x41, 0x46, 0x70]); // MOV B,C; MOV B,M; MOV M,B

    assert_eq!(cpu.step(&mut bus), 5);
    assert_eq!(cpu.step(&mut bus), 7);
    assert_eq!(cpu.step(&mut bus), 7);
}

#[test]
fn test_add_overflow_to_zero() {
    let (mut cpu, mut bus) = setup(&[0x3E, 0xFF, 0xC6, 0x01, 0x76]); // MVI A,$FF; ADI 1

    run_until_halt(&mut cpu, &mut bus);

    let flags = cpu.regs.flags;
    assert_eq!(cpu.regs.a, 0x00);
    assert!(flags.z);
    assert!(flags.cy);
    assert!(flags.ac);
    assert!(flags.p);
    assert!(!flags.s);
}

#[test]
fn test_daa_after_add() {
    // 0x9B is not valid BCD; DAA gives 01 with both carries set.
    let (mut cpu, mut bus) = setup(&[0x3E, 0x9B, 0x27, 0x76]);

    run_until_halt(&mut cpu, &mut bus);

    assert_eq!(cpu.regs.a, 0x01);
    assert!(cpu.regs.flags.cy);
    assert!(cpu.regs.flags.ac);
}

#[test]
fn test_daa_carry_is_carry_out_of_correction() {
    let (mut cpu, mut bus) = setup(&[
        0x3E, 0x99, // MVI A,$99
        0xC6, 0x99, // ADI $99  -> $32, CY and AC set
        0x27,       // DAA
        0x76,
    ]);

    cpu.step(&mut bus);
    cpu.step(&mut bus);
    assert_eq!(cpu.regs.a, 0x32);
    assert!(cpu.regs.flags.cy && cpu.regs.flags.ac);

    run_until_halt(&mut cpu, &mut bus);

    assert_eq!(cpu.regs.a, 0x98);
    assert!(!cpu.regs.flags.cy);
}

#[test]
fn test_daa_with_incoming_carry() {
    let (mut cpu, mut bus) = setup(&[0x27]);
    cpu.regs.a = 0x32;
    cpu.regs.flags = Flags {
        cy: true,
        ac: true,
        ..Flags::default()
    };

    assert_eq!(cpu.step(&mut bus), 4);

    assert_eq!(cpu.regs.a, 0x98);
    assert!(!cpu.regs.flags.cy);
    assert!(cpu.regs.flags.s);
}

#[test]
fn test_sbb_uses_borrow() {
    let (mut cpu, mut bus) = setup(&[
        0x37,       // STC
        0x3E, 0x10, // MVI A,$10
        0xDE, 0x0F, // SBI $0F
        0x76,
    ]);

    run_until_halt(&mut cpu, &mut bus);

    assert_eq!(cpu.regs.a, 0x00);
    assert!(cpu.regs.flags.z);
    assert!(!cpu.regs.flags.cy);
}

#[test]
fn test_cmp_leaves_accumulator() {
    let (mut cpu, mut bus) = setup(&[0x3E, 0x02, 0x06, 0x05, 0xB8, 0x76]); // CMP B

    run_until_halt(&mut cpu, &mut bus);

    assert_eq!(cpu.regs.a, 0x02);
    assert!(cpu.regs.flags.cy);
    assert!(!cpu.regs.flags.z);
}

#[test]
fn test_inr_dcr_memory() {
    let (mut cpu, mut bus) = setup(&[
        0x21, 0x00, 0x30, // LXI H,$3000
        0x36, 0xFF,       // MVI M,$FF
        0x37,             // STC
        0x34,             // INR M
        0x35,             // DCR M
        0x35,             // DCR M
        0x76,
    ]);

    cpu.step(&mut bus);
    assert_eq!(cpu.step(&mut bus), 10); // MVI M
    cpu.step(&mut bus);
    assert_eq!(cpu.step(&mut bus), 10); // INR M
    assert_eq!(bus.peek(0x3000), 0x00);
    assert!(cpu.regs.flags.z);
    assert!(cpu.regs.flags.cy, "INR leaves carry alone");

    run_until_halt(&mut cpu, &mut bus);
    assert_eq!(bus.peek(0x3000), 0xFE);
    assert!(cpu.regs.flags.s);
    assert!(cpu.regs.flags.cy);
}

#[test]
fn test_inx_dcx_wrap_without_flags() {
    let (mut cpu, mut bus) = setup(&[
        0x01, 0xFF, 0xFF, // LXI B,$FFFF
        0x03,             // INX B
        0x11, 0x00, 0x00, // LXI D,$0000
        0x1B,             // DCX D
        0x76,
    ]);

    run_until_halt(&mut cpu, &mut bus);

    assert_eq!(cpu.regs.bc(), 0x0000);
    assert_eq!(cpu.regs.de(), 0xFFFF);
    assert_eq!(cpu.regs.flags, Flags::default());
}

#[test]
fn test_dad_sets_only_carry() {
    let (mut cpu, mut bus) = setup(&[
        0x21, 0x00, 0x80, // LXI H,$8000
        0x01, 0x00, 0x80, // LXI B,$8000
        0x09,             // DAD B
        0x76,
    ]);

    run_until_halt(&mut cpu, &mut bus);

    assert_eq!(cpu.regs.hl(), 0x0000);
    assert!(cpu.regs.flags.cy);
    assert!(!cpu.regs.flags.z);
}

#[test]
fn test_dad_h_doubles() {
    let (mut cpu, mut bus) = setup(&[0x21, 0x34, 0x12, 0x29, 0x76]); // DAD H

    run_until_halt(&mut cpu, &mut bus);

    assert_eq!(cpu.regs.hl(), 0x2468);
    assert!(!cpu.regs.flags.cy);
}

#[test]
fn test_rotates() {
    let (mut cpu, mut bus) = setup(&[
        0x3E, 0x81, // MVI A,$81
        0x07,       // RLC   -> 03, CY
        0x0F,       // RRC   -> 81, CY
        0x1F,       // RAR   -> C0, CY
        0x17,       // RAL   -> 81, CY
        0x76,
    ]);

    cpu.step(&mut bus);
    cpu.step(&mut bus);
    assert_eq!(cpu.regs.a, 0x03);
    assert!(cpu.regs.flags.cy);
    cpu.step(&mut bus);
    assert_eq!(cpu.regs.a, 0x81);
    assert!(cpu.regs.flags.cy);
    cpu.step(&mut bus);
    assert_eq!(cpu.regs.a, 0xC0);
    assert!(cpu.regs.flags.cy);
    cpu.step(&mut bus);
    assert_eq!(cpu.regs.a, 0x81);
    assert!(cpu.regs.flags.cy);
}

#[test]
fn test_cma_stc_cmc() {
    let (mut cpu, mut bus) = setup(&[0x3E, 0x5A, 0x2F, 0x37, 0x3F, 0x76]);

    run_until_halt(&mut cpu, &mut bus);

    assert_eq!(cpu.regs.a, 0xA5);
    assert!(!cpu.regs.flags.cy);
    assert!(!cpu.regs.flags.z, "CMA changes no flags");
}

#[test]
fn test_sta_lda_stax_ldax() {
    let (mut cpu, mut bus) = setup(&[
        0x3E, 0x11,       // MVI A,$11
        0x32, 0x00, 0x40, // STA $4000
        0x01, 0x01, 0x40, // LXI B,$4001
        0x3E, 0x22,       // MVI A,$22
        0x02,             // STAX B
        0x3A, 0x00, 0x40, // LDA $4000
        0x47,             // MOV B,A
        0x11, 0x01, 0x40, // LXI D,$4001
        0x1A,             // LDAX D
        0x76,
    ]);

    run_until_halt(&mut cpu, &mut bus);

    assert_eq!(bus.peek(0x4000), 0x11);
    assert_eq!(bus.peek(0x4001), 0x22);
    assert_eq!(cpu.regs.b, 0x11);
    assert_eq!(cpu.regs.a, 0x22);
}

#[test]
fn test_shld_lhld() {
    let (mut cpu, mut bus) = setup(&[
        0x21, 0xCD, 0xAB, // LXI H,$ABCD
        0x22, 0x00, 0x50, // SHLD $5000
        0x21, 0x00, 0x00, // LXI H,0
        0x2A, 0x00, 0x50, // LHLD $5000
        0x76,
    ]);

    run_until_halt(&mut cpu, &mut bus);

    assert_eq!(bus.peek(0x5000), 0xCD);
    assert_eq!(bus.peek(0x5001), 0xAB);
    assert_eq!(cpu.regs.hl(), 0xABCD);
}

#[test]
fn test_xchg_xthl_sphl_pchl() {
    let (mut cpu, mut bus) = setup(&[
        0x21, 0x34, 0x12, // LXI H,$1234
        0x11, 0x78, 0x56, // LXI D,$5678
        0xEB,             // XCHG
        0x31, 0x00, 0x60, // LXI SP,$6000
        0xE3,             // XTHL
        0x76,
    ]);
    bus.load(0x6000, &[0xEF, 0xBE]).expect("fits");

    run_until_halt(&mut cpu, &mut bus);

    assert_eq!(cpu.regs.de(), 0x1234);
    assert_eq!(cpu.regs.hl(), 0xBEEF);
    assert_eq!(bus.peek_word(0x6000), 0x5678);
    assert_eq!(cpu.regs.sp, 0x6000);

    let (mut cpu, mut bus) = setup(&[
        0x21, 0x00, 0x70, // LXI H,$7000
        0xF9,             // SPHL
        0xE9,             // PCHL
    ]);
    bus.write(0x7000, 0x76);
    cpu.step(&mut bus);
    cpu.step(&mut bus);
    assert_eq!(cpu.regs.sp, 0x7000);
    assert_eq!(cpu.step(&mut bus), 5);
    assert_eq!(cpu.pc(), 0x7000);
}

#[test]
fn test_push_pop_pairs() {
    let (mut cpu, mut bus) = setup(&[
        0x31, 0x00, 0x80, // LXI SP,$8000
        0x01, 0x34, 0x12, // LXI B,$1234
        0xC5,             // PUSH B
        0xD1,             // POP D
        0x76,
    ]);

    run_until_halt(&mut cpu, &mut bus);

    assert_eq!(cpu.regs.de(), 0x1234);
    assert_eq!(cpu.regs.sp, 0x8000);
    assert_eq!(bus.peek(0x7FFF), 0x12);
    assert_eq!(bus.peek(0x7FFE), 0x34);
}

#[test]
fn test_pop_psw_normalises_flags() {
    let (mut cpu, mut bus) = setup(&[
        0x31, 0x00, 0x80, // LXI SP,$8000
        0xF1,             // POP PSW
        0xF5,             // PUSH PSW
        0x76,
    ]);
    // Flag byte with every bit set, then A.
    bus.load(0x8000, &[0xFF, 0x42]).expect("fits");

    run_until_halt(&mut cpu, &mut bus);

    assert_eq!(cpu.regs.a, 0x42);
    assert_eq!(cpu.regs.f(), 0xD7);
    assert_eq!(bus.peek(0x8000), 0xD7);
    assert_eq!(bus.peek(0x8001), 0x42);
}

#[test]
fn test_push_psw_sets_fixed_bit() {
    let (mut cpu, mut bus) = setup(&[
        0x31, 0x00, 0x80, // LXI SP,$8000
        0xF1,             // POP PSW
        0xF5,             // PUSH PSW
        0x76,
    ]);
    bus.load(0x8000, &[0x00, 0x00]).expect("fits");

    run_until_halt(&mut cpu, &mut bus);

    assert_eq!(bus.peek(0x8000), 0x02);
    assert_eq!(cpu.regs.psw(), 0x0002);
}

#[test]
fn test_call_ret() {
    let mut program = vec![
        0x31, 0x00, 0x80, // LXI SP,$8000
        0xCD, 0x10, 0x00, // CALL $0010
        0x76,             // HLT
    ];
    program.resize(0x10, 0x00);
    program.extend_from_slice(&[0x3E, 0x42, 0xC9]); // MVI A,$42; RET

    let (mut cpu, mut bus) = setup(&program);

    cpu.step(&mut bus);
    assert_eq!(cpu.step(&mut bus), 17);
    assert_eq!(cpu.pc(), 0x0010);
    assert_eq!(bus.peek_word(0x7FFE), 0x0006);

    cpu.step(&mut bus);
    assert_eq!(cpu.step(&mut bus), 10);
    assert_eq!(cpu.pc(), 0x0006);
    assert_eq!(cpu.regs.sp, 0x8000);

    run_until_halt(&mut cpu, &mut bus);
    assert_eq!(cpu.regs.a, 0x42);
}

#[test]
fn test_rst_pushes_next_address() {
    let mut program = vec![0x31, 0x00, 0x80, 0xEF]; // LXI SP,$8000; RST 5
    program.resize(0x28, 0x00);
    program.push(0x76);

    let (mut cpu, mut bus) = setup(&program);

    cpu.step(&mut bus);
    assert_eq!(cpu.step(&mut bus), 11);
    assert_eq!(cpu.pc(), 0x0028);
    assert_eq!(bus.peek_word(0x7FFE), 0x0004);
}

#[test]
fn test_jmp_and_conditional_jumps() {
    for (op, flags, taken) in condition_cases() {
        let (mut cpu, mut bus) = setup(&[op, 0x00, 0x12]);
        cpu.regs.flags = flags;

        assert_eq!(cpu.step(&mut bus), 10, "J{op:02X}");
        let expected = if taken { 0x1200 } else { 0x0003 };
        assert_eq!(cpu.pc(), expected, "J{op:02X} taken={taken}");
    }

    let (mut cpu, mut bus) = setup(&[0xC3, 0x00, 0x12]);
    assert_eq!(cpu.step(&mut bus), 10);
    assert_eq!(cpu.pc(), 0x1200);
}

#[test]
fn test_conditional_call_timing() {
    for (jump_op, flags, taken) in condition_cases() {
        // Ccc sits two above Jcc in each row.
        let op = jump_op + 2;
        let (mut cpu, mut bus) = setup(&[op, 0x00, 0x12]);
        cpu.regs.sp = 0x8000;
        cpu.regs.flags = flags;

        let cycles = cpu.step(&mut bus);
        if taken {
            assert_eq!(cycles, 17, "C{op:02X}");
            assert_eq!(cpu.pc(), 0x1200);
            assert_eq!(cpu.regs.sp, 0x7FFE);
            assert_eq!(bus.peek_word(0x7FFE), 0x0003);
        } else {
            assert_eq!(cycles, 11, "C{op:02X}");
            assert_eq!(cpu.pc(), 0x0003);
            assert_eq!(cpu.regs.sp, 0x8000);
        }
    }
}

#[test]
fn test_conditional_return_timing() {
    for (jump_op, flags, taken) in condition_cases() {
        // Rcc sits two below Jcc in each row.
        let op = jump_op - 2;
        let (mut cpu, mut bus) = setup(&[op]);
        bus.load(0x7FFE, &[0x00, 0x12]).expect("fits");
        cpu.regs.sp = 0x7FFE;
        cpu.regs.flags = flags;

        let cycles = cpu.step(&mut bus);
        if taken {
            assert_eq!(cycles, 11, "R{op:02X}");
            assert_eq!(cpu.pc(), 0x1200);
            assert_eq!(cpu.regs.sp, 0x8000);
        } else {
            assert_eq!(cycles, 5, "R{op:02X}");
            assert_eq!(cpu.pc(), 0x0001);
            assert_eq!(cpu.regs.sp, 0x7FFE);
        }
    }
}

/// Every Jcc opcode paired with flags that make it taken and not taken.
fn condition_cases() -> Vec<(u8, Flags, bool)> {
    let clear = Flags::default();
    let z = Flags { z: true, ..clear };
    let cy = Flags { cy: true, ..clear };
    let p = Flags { p: true, ..clear };
    let s = Flags { s: true, ..clear };

    vec![
        (0xC2, clear, true), // JNZ
        (0xC2, z, false),
        (0xCA, z, true), // JZ
        (0xCA, clear, false),
        (0xD2, clear, true), // JNC
        (0xD2, cy, false),
        (0xDA, cy, true), // JC
        (0xDA, clear, false),
        (0xE2, clear, true), // JPO
        (0xE2, p, false),
        (0xEA, p, true), // JPE
        (0xEA, clear, false),
        (0xF2, clear, true), // JP
        (0xF2, s, false),
        (0xFA, s, true), // JM
        (0xFA, clear, false),
    ]
}

#[test]
fn test_hlt_is_sticky() {
    let (mut cpu, mut bus) = setup(&[0x3E, 0x42, 0x76, 0x3E, 0x00]);

    run_until_halt(&mut cpu, &mut bus);
    assert_eq!(cpu.pc(), 0x0003);

    let before = cpu.registers();
    for _ in 0..5 {
        assert_eq!(cpu.step(&mut bus), 7);
    }
    let after = cpu.registers();
    assert_eq!(before, after);
    assert_eq!(after.a, 0x42);
}

#[test]
fn test_undocumented_gaps_do_nothing() {
    for op in [0xCB, 0xD9, 0xDD, 0xED, 0xFD] {
        let (mut cpu, mut bus) = setup(&[op]);

        assert_eq!(cpu.step(&mut bus), 0, "${op:02X}");
        assert_eq!(cpu.pc(), 0x0000);
        let fault = cpu.last_fault().expect("fault recorded");
        assert_eq!(fault.opcode, op);
        assert_eq!(fault.pc, 0x0000);
        assert_eq!(cpu.total_cycles().get(), 0);
    }
}

#[test]
fn test_undocumented_nops_execute() {
    let (mut cpu, mut bus) = setup(&[0x08, 0x10, 0x18, 0x20, 0x28, 0x30, 0x38, 0x76]);

    assert_eq!(run_until_halt(&mut cpu, &mut bus), 8);
    assert_eq!(cpu.total_cycles().get(), 7 * 4 + 7);
}

#[test]
fn test_ei_di() {
    let (mut cpu, mut bus) = setup(&[0xFB, 0xF3, 0x76]);

    cpu.step(&mut bus);
    assert!(cpu.regs.inte);
    cpu.step(&mut bus);
    assert!(!cpu.regs.inte);
}

/// Bus with recorded port traffic.
struct PortBus {
    mem: SimpleBus,
    input: u8,
    output: Vec<(u8, u8)>,
}

impl Bus for PortBus {
    fn read(&mut self, address: u16) -> u8 {
        self.mem.read(address)
    }

    fn write(&mut self, address: u16, value: u8) {
        self.mem.write(address, value);
    }
}

impl IoBus for PortBus {
    fn read_io(&mut self, port: u8) -> u8 {
        self.input ^ port
    }

    fn write_io(&mut self, port: u8, value: u8) {
        self.output.push((port, value));
    }
}

#[test]
fn test_in_out() {
    let mut bus = PortBus {
        mem: SimpleBus::new(),
        input: 0xF0,
        output: Vec::new(),
    };
    bus.mem
        .load(0x0000, &[0xDB, 0x0F, 0xD3, 0x20, 0x76]) // IN $0F; OUT $20; HLT
        .expect("fits");
    let mut cpu = I8080::new();

    assert_eq!(cpu.step(&mut bus), 10);
    assert_eq!(cpu.regs.a, 0xFF);
    assert_eq!(cpu.step(&mut bus), 10);
    assert_eq!(bus.output, [(0x20, 0xFF)]);
    assert_eq!(cpu.pc(), 0x0004);
}

#[test]
fn test_in_on_simple_bus_floats() {
    let (mut cpu, mut bus) = setup(&[0x3E, 0x55, 0xDB, 0x01, 0x76]);

    run_until_halt(&mut cpu, &mut bus);

    assert_eq!(cpu.regs.a, 0x00);
}

#[test]
fn test_total_cycles_accumulate() {
    let (mut cpu, mut bus) = setup(&[0x00, 0x3E, 0x01, 0x76]);

    run_until_halt(&mut cpu, &mut bus);

    assert_eq!(cpu.total_cycles().get(), 4 + 7 + 7);
}
