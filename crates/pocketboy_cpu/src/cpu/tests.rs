use super::*;
use crate::config::{CpuConfig, StartState};
use crate::error::{AddressSpace, Error};
use crate::flags::Flags;
use crate::memory::Memory;

/// Flat test bus: the program lives in its own ROM vector, data in 64 KiB RAM.
struct TestBus {
    ram: Box<[u8]>,
    rom: Vec<u8>,
}

impl TestBus {
    fn with_program(program: &[u8]) -> Self {
        Self {
            ram: vec![0; 0x10000].into_boxed_slice(),
            rom: program.to_vec(),
        }
    }
}

impl Bus for TestBus {
    fn read8(&mut self, addr: u16) -> Result<u8> {
        Ok(self.ram[addr as usize])
    }

    fn write8(&mut self, addr: u16, value: u8) -> Result<()> {
        self.ram[addr as usize] = value;
        Ok(())
    }

    fn fetch8(&mut self, addr: u16) -> Result<u8> {
        self.rom.get(addr as usize).copied().ok_or(Error::OutOfBounds {
            space: AddressSpace::Rom,
            addr: addr as usize,
            size: self.rom.len(),
        })
    }

    fn rom_extent(&self) -> usize {
        self.rom.len()
    }
}

fn setup(program: &[u8]) -> (Cpu, TestBus) {
    (Cpu::default(), TestBus::with_program(program))
}

fn step(cpu: &mut Cpu, bus: &mut TestBus) -> u32 {
    cpu.execute_instruction(bus).unwrap()
}

#[test]
fn add_register_without_carry() {
    // 0x0000: ADD A, B
    let (mut cpu, mut bus) = setup(&[0x80]);
    cpu.regs.a = 0x41;
    cpu.regs.b = 0x16;

    assert_eq!(step(&mut cpu, &mut bus), 4);
    assert_eq!(cpu.regs.a, 0x57);
    assert_eq!(cpu.regs.f, Flags::empty());
}

#[test]
fn add_register_sets_carry_out_of_bit_7() {
    // 0x0000: ADD A, B
    let (mut cpu, mut bus) = setup(&[0x80]);
    cpu.regs.a = 0xC0;
    cpu.regs.b = 0xC0;

    assert_eq!(step(&mut cpu, &mut bus), 4);
    assert_eq!(cpu.regs.a, 0x80);
    assert!(cpu.regs.f.carry());
    assert!(!cpu.regs.f.half_carry());
    assert!(!cpu.regs.f.zero());
    assert!(!cpu.regs.f.subtract());
}

#[test]
fn swap_a_through_the_prefix_latch() {
    // 0x0000: SWAP A
    let (mut cpu, mut bus) = setup(&[0xCB, 0x37]);
    cpu.regs.a = 0x41;
    cpu.regs.f = Flags::all();

    assert_eq!(step(&mut cpu, &mut bus), 4);
    assert_eq!(cpu.decode_mode(), DecodeMode::Extended);
    assert_eq!(cpu.regs.a, 0x41);

    assert_eq!(step(&mut cpu, &mut bus), 4);
    assert_eq!(cpu.decode_mode(), DecodeMode::Normal);
    assert_eq!(cpu.regs.a, 0x14);
    assert_eq!(cpu.regs.f, Flags::empty());
    assert_eq!(cpu.cycles(), 8);
    assert_eq!(cpu.regs.pc.get(), 2);
}

#[test]
fn ei_takes_effect_after_the_following_instruction() {
    // 0x0000: EI
    // 0x0001: NOP
    let (mut cpu, mut bus) = setup(&[0xFB, 0x00]);
    assert_eq!(cpu.interrupt_state(), InterruptState::Blocked);

    assert_eq!(step(&mut cpu, &mut bus), 4);
    assert_eq!(cpu.interrupt_state(), InterruptState::PendingEnable);

    assert_eq!(step(&mut cpu, &mut bus), 4);
    assert_eq!(cpu.interrupt_state(), InterruptState::Interruptible);
}

#[test]
fn prefix_byte_does_not_complete_an_instruction() {
    // 0x0000: EI
    // 0x0001: SWAP A
    let (mut cpu, mut bus) = setup(&[0xFB, 0xCB, 0x37]);

    step(&mut cpu, &mut bus);
    step(&mut cpu, &mut bus);
    assert_eq!(cpu.interrupt_state(), InterruptState::PendingEnable);

    step(&mut cpu, &mut bus);
    assert_eq!(cpu.interrupt_state(), InterruptState::Interruptible);
}

#[test]
fn di_cancels_a_pending_enable() {
    // 0x0000: EI
    // 0x0001: DI
    let (mut cpu, mut bus) = setup(&[0xFB, 0xF3]);
    step(&mut cpu, &mut bus);
    step(&mut cpu, &mut bus);
    assert_eq!(cpu.interrupt_state(), InterruptState::Blocked);
}

#[test]
fn reti_enables_immediately() {
    // 0x0000: RETI
    let (mut cpu, mut bus) = setup(&[0xD9]);
    cpu.regs.sp = 0xFFFC;
    bus.ram[0xFFFC] = 0x34;
    bus.ram[0xFFFD] = 0x12;

    assert_eq!(step(&mut cpu, &mut bus), 16);
    assert_eq!(cpu.regs.pc.get(), 0x1234);
    assert_eq!(cpu.regs.sp, 0xFFFE);
    assert_eq!(cpu.interrupt_state(), InterruptState::Interruptible);
}

#[test]
fn push_then_pop_round_trips() {
    // 0x0000: PUSH BC
    // 0x0001: POP DE
    let (mut cpu, mut bus) = setup(&[0xC5, 0xD1]);
    cpu.regs.sp = 0xFFFE;
    cpu.regs.set_bc(0xBEEF);

    assert_eq!(step(&mut cpu, &mut bus), 16);
    assert_eq!(cpu.regs.sp, 0xFFFC);
    assert_eq!(bus.ram[0xFFFD], 0xBE);
    assert_eq!(bus.ram[0xFFFC], 0xEF);

    assert_eq!(step(&mut cpu, &mut bus), 12);
    assert_eq!(cpu.regs.de(), 0xBEEF);
    assert_eq!(cpu.regs.sp, 0xFFFE);
}

#[test]
fn pop_af_drops_low_flag_bits() {
    // 0x0000: POP AF
    let (mut cpu, mut bus) = setup(&[0xF1]);
    cpu.regs.sp = 0xC000;
    bus.ram[0xC000] = 0xFF;
    bus.ram[0xC001] = 0x12;

    step(&mut cpu, &mut bus);
    assert_eq!(cpu.regs.af(), 0x12F0);
}

#[test]
fn relative_jumps_are_taken_from_the_next_instruction() {
    // 0x0000: JR -2 (to itself)
    let (mut cpu, mut bus) = setup(&[0x18, 0xFE]);
    assert_eq!(step(&mut cpu, &mut bus), 12);
    assert_eq!(cpu.regs.pc.get(), 0x0000);

    // 0x0000: JR -128 wraps below zero.
    let (mut cpu, mut bus) = setup(&[0x18, 0x80]);
    step(&mut cpu, &mut bus);
    assert_eq!(cpu.regs.pc.get(), 0xFF82);

    // 0x0000: JR +3
    let (mut cpu, mut bus) = setup(&[0x18, 0x03]);
    step(&mut cpu, &mut bus);
    assert_eq!(cpu.regs.pc.get(), 0x0005);
}

#[test]
fn conditional_branches_consume_operands_either_way() {
    // 0x0000: JR NZ, +5 (Z set: not taken)
    let (mut cpu, mut bus) = setup(&[0x20, 0x05]);
    cpu.regs.f = Flags::ZERO;
    assert_eq!(step(&mut cpu, &mut bus), 8);
    assert_eq!(cpu.regs.pc.get(), 2);

    // 0x0000: JP Z, 0x1234 (taken)
    let (mut cpu, mut bus) = setup(&[0xCA, 0x34, 0x12]);
    cpu.regs.f = Flags::ZERO;
    assert_eq!(step(&mut cpu, &mut bus), 16);
    assert_eq!(cpu.regs.pc.get(), 0x1234);

    // 0x0000: JP NC, 0x1234 (C set: not taken)
    let (mut cpu, mut bus) = setup(&[0xD2, 0x34, 0x12]);
    cpu.regs.f = Flags::CARRY;
    assert_eq!(step(&mut cpu, &mut bus), 12);
    assert_eq!(cpu.regs.pc.get(), 3);

    // 0x0000: CALL C, 0x0040 (not taken: SP untouched)
    let (mut cpu, mut bus) = setup(&[0xDC, 0x40, 0x00]);
    cpu.regs.sp = 0xFFFE;
    assert_eq!(step(&mut cpu, &mut bus), 12);
    assert_eq!(cpu.regs.pc.get(), 3);
    assert_eq!(cpu.regs.sp, 0xFFFE);

    // 0x0000: RET Z (not taken)
    let (mut cpu, mut bus) = setup(&[0xC8]);
    assert_eq!(step(&mut cpu, &mut bus), 8);
    assert_eq!(cpu.regs.pc.get(), 1);
}

#[test]
fn call_and_return() {
    // 0x0000: CALL 0x0010
    // 0x0010: RET NZ
    let mut program = vec![0xCD, 0x10, 0x00];
    program.resize(0x10, 0x00);
    program.push(0xC0);
    let (mut cpu, mut bus) = setup(&program);
    cpu.regs.sp = 0xFFFE;

    assert_eq!(step(&mut cpu, &mut bus), 24);
    assert_eq!(cpu.regs.pc.get(), 0x0010);
    assert_eq!(cpu.regs.sp, 0xFFFC);
    assert_eq!(bus.ram[0xFFFD], 0x00);
    assert_eq!(bus.ram[0xFFFC], 0x03);

    assert_eq!(step(&mut cpu, &mut bus), 20);
    assert_eq!(cpu.regs.pc.get(), 0x0003);
    assert_eq!(cpu.regs.sp, 0xFFFE);
}

#[test]
fn rst_pushes_return_address() {
    // 0x0000: NOP
    // 0x0001: RST 38h
    let (mut cpu, mut bus) = setup(&[0x00, 0xFF]);
    cpu.regs.sp = 0xD000;

    step(&mut cpu, &mut bus);
    assert_eq!(step(&mut cpu, &mut bus), 16);
    assert_eq!(cpu.regs.pc.get(), 0x0038);
    assert_eq!(bus.ram[0xCFFE], 0x02);
    assert_eq!(bus.ram[0xCFFF], 0x00);
}

#[test]
fn jp_hl() {
    // 0x0000: JP (HL)
    let (mut cpu, mut bus) = setup(&[0xE9]);
    cpu.regs.set_hl(0x4000);
    assert_eq!(step(&mut cpu, &mut bus), 4);
    assert_eq!(cpu.regs.pc.get(), 0x4000);
}

#[test]
fn hl_post_increment_and_decrement() {
    // 0x0000: LD (HL+), A
    // 0x0001: LD (HL-), A
    // 0x0002: LD A, (HL-)
    let (mut cpu, mut bus) = setup(&[0x22, 0x32, 0x3A]);
    cpu.regs.a = 0x42;
    cpu.regs.set_hl(0xC000);

    assert_eq!(step(&mut cpu, &mut bus), 8);
    assert_eq!(bus.ram[0xC000], 0x42);
    assert_eq!(cpu.regs.hl(), 0xC001);

    step(&mut cpu, &mut bus);
    assert_eq!(bus.ram[0xC001], 0x42);
    assert_eq!(cpu.regs.hl(), 0xC000);

    bus.ram[0xC000] = 0x99;
    step(&mut cpu, &mut bus);
    assert_eq!(cpu.regs.a, 0x99);
    assert_eq!(cpu.regs.hl(), 0xBFFF);
}

#[test]
fn memory_operands_cost_extra_cycles() {
    // 0x0000: LD (HL), 0x99
    // 0x0002: LD B, (HL)
    // 0x0003: LD C, B
    // 0x0004: LD (HL), C
    let (mut cpu, mut bus) = setup(&[0x36, 0x99, 0x46, 0x48, 0x71]);
    cpu.regs.set_hl(0xC000);

    assert_eq!(step(&mut cpu, &mut bus), 12);
    assert_eq!(bus.ram[0xC000], 0x99);
    assert_eq!(step(&mut cpu, &mut bus), 8);
    assert_eq!(cpu.regs.b, 0x99);
    assert_eq!(step(&mut cpu, &mut bus), 4);
    assert_eq!(cpu.regs.c, 0x99);
    assert_eq!(step(&mut cpu, &mut bus), 8);
}

#[test]
fn loads_do_not_touch_flags() {
    // 0x0000: LD A, 0x00
    // 0x0002: LD BC, 0x0000
    let (mut cpu, mut bus) = setup(&[0x3E, 0x00, 0x01, 0x00, 0x00]);
    cpu.regs.f = Flags::SUBTRACT | Flags::CARRY;
    step(&mut cpu, &mut bus);
    step(&mut cpu, &mut bus);
    assert_eq!(cpu.regs.f, Flags::SUBTRACT | Flags::CARRY);
}

#[test]
fn high_page_loads() {
    // 0x0000: LDH (0x80), A
    // 0x0002: LD C, 0x81
    // 0x0004: LD A, (C)
    let (mut cpu, mut bus) = setup(&[0xE0, 0x80, 0x0E, 0x81, 0xF2]);
    cpu.regs.a = 0x5A;
    bus.ram[0xFF81] = 0xA5;

    assert_eq!(step(&mut cpu, &mut bus), 12);
    assert_eq!(bus.ram[0xFF80], 0x5A);
    step(&mut cpu, &mut bus);
    assert_eq!(step(&mut cpu, &mut bus), 8);
    assert_eq!(cpu.regs.a, 0xA5);
}

#[test]
fn absolute_address_loads() {
    // 0x0000: LD (0xC100), SP
    // 0x0003: LD (0xC200), A
    // 0x0006: LD A, (0xC100)
    let (mut cpu, mut bus) = setup(&[0x08, 0x00, 0xC1, 0xEA, 0x00, 0xC2, 0xFA, 0x00, 0xC1]);
    cpu.regs.sp = 0xABCD;
    cpu.regs.a = 0x11;

    assert_eq!(step(&mut cpu, &mut bus), 20);
    assert_eq!(bus.ram[0xC100], 0xCD);
    assert_eq!(bus.ram[0xC101], 0xAB);

    assert_eq!(step(&mut cpu, &mut bus), 16);
    assert_eq!(bus.ram[0xC200], 0x11);

    assert_eq!(step(&mut cpu, &mut bus), 16);
    assert_eq!(cpu.regs.a, 0xCD);
}

#[test]
fn sp_and_hl_transfers() {
    // 0x0000: LD SP, HL
    let (mut cpu, mut bus) = setup(&[0xF9]);
    cpu.regs.set_hl(0xDFF0);
    assert_eq!(step(&mut cpu, &mut bus), 8);
    assert_eq!(cpu.regs.sp, 0xDFF0);
}

#[test]
fn add_hl_uses_16_bit_carries() {
    // 0x0000: ADD HL, BC
    let (mut cpu, mut bus) = setup(&[0x09]);
    cpu.regs.set_hl(0x0FFF);
    cpu.regs.set_bc(0x0001);
    cpu.regs.f = Flags::SUBTRACT;

    assert_eq!(step(&mut cpu, &mut bus), 8);
    assert_eq!(cpu.regs.hl(), 0x1000);
    assert_eq!(cpu.regs.f, Flags::HALF_CARRY);

    // 0x0000: ADD HL, HL
    let (mut cpu, mut bus) = setup(&[0x29]);
    cpu.regs.set_hl(0x8000);
    step(&mut cpu, &mut bus);
    assert_eq!(cpu.regs.hl(), 0x0000);
    assert_eq!(cpu.regs.f, Flags::ZERO | Flags::CARRY);
}

#[test]
fn add_sp_signed_immediate() {
    // 0x0000: ADD SP, +8
    let (mut cpu, mut bus) = setup(&[0xE8, 0x08]);
    cpu.regs.sp = 0xFFF8;
    assert_eq!(step(&mut cpu, &mut bus), 16);
    assert_eq!(cpu.regs.sp, 0x0000);
    assert_eq!(cpu.regs.f, Flags::ZERO | Flags::HALF_CARRY | Flags::CARRY);

    // 0x0000: ADD SP, -2
    let (mut cpu, mut bus) = setup(&[0xE8, 0xFE]);
    cpu.regs.sp = 0x1000;
    step(&mut cpu, &mut bus);
    assert_eq!(cpu.regs.sp, 0x0FFE);
    assert_eq!(cpu.regs.f, Flags::CARRY);
}

#[test]
fn ld_hl_sp_offset_keeps_sp() {
    // 0x0000: LD HL, SP+2
    let (mut cpu, mut bus) = setup(&[0xF8, 0x02]);
    cpu.regs.sp = 0xFFF8;
    cpu.regs.f = Flags::all();

    assert_eq!(step(&mut cpu, &mut bus), 12);
    assert_eq!(cpu.regs.hl(), 0xFFFA);
    assert_eq!(cpu.regs.sp, 0xFFF8);
    assert_eq!(cpu.regs.f, Flags::empty());
}

#[test]
fn inc_and_dec_leave_carry_alone() {
    // 0x0000: INC A
    // 0x0001: DEC A
    // 0x0002: DEC B
    let (mut cpu, mut bus) = setup(&[0x3C, 0x3D, 0x05]);
    cpu.regs.a = 0x0F;
    cpu.regs.b = 0x01;
    cpu.regs.f = Flags::CARRY;

    assert_eq!(step(&mut cpu, &mut bus), 4);
    assert_eq!(cpu.regs.a, 0x10);
    assert_eq!(cpu.regs.f, Flags::HALF_CARRY | Flags::CARRY);

    step(&mut cpu, &mut bus);
    assert_eq!(cpu.regs.a, 0x0F);
    assert_eq!(cpu.regs.f, Flags::SUBTRACT | Flags::HALF_CARRY | Flags::CARRY);

    step(&mut cpu, &mut bus);
    assert_eq!(cpu.regs.b, 0x00);
    assert_eq!(cpu.regs.f, Flags::ZERO | Flags::SUBTRACT | Flags::CARRY);
}

#[test]
fn inc_memory_at_hl() {
    // 0x0000: INC (HL)
    let (mut cpu, mut bus) = setup(&[0x34]);
    cpu.regs.set_hl(0xC000);
    bus.ram[0xC000] = 0xFF;

    assert_eq!(step(&mut cpu, &mut bus), 12);
    assert_eq!(bus.ram[0xC000], 0x00);
    assert_eq!(cpu.regs.f, Flags::ZERO | Flags::HALF_CARRY);
    // HL itself is untouched.
    assert_eq!(cpu.regs.hl(), 0xC000);
}

#[test]
fn wide_inc_and_dec_touch_no_flags() {
    // 0x0000: INC BC
    // 0x0001: DEC SP
    let (mut cpu, mut bus) = setup(&[0x03, 0x3B]);
    cpu.regs.set_bc(0xFFFF);
    cpu.regs.sp = 0x0000;

    assert_eq!(step(&mut cpu, &mut bus), 8);
    assert_eq!(cpu.regs.bc(), 0x0000);
    assert_eq!(step(&mut cpu, &mut bus), 8);
    assert_eq!(cpu.regs.sp, 0xFFFF);
    assert_eq!(cpu.regs.f, Flags::empty());
}

#[test]
fn subtract_family() {
    // 0x0000: SUB 0x3E
    let (mut cpu, mut bus) = setup(&[0xD6, 0x3E]);
    cpu.regs.a = 0x3E;
    assert_eq!(step(&mut cpu, &mut bus), 8);
    assert_eq!(cpu.regs.a, 0x00);
    assert_eq!(cpu.regs.f, Flags::ZERO | Flags::SUBTRACT);

    // 0x0000: CP 0x40
    let (mut cpu, mut bus) = setup(&[0xFE, 0x40]);
    cpu.regs.a = 0x3C;
    step(&mut cpu, &mut bus);
    assert_eq!(cpu.regs.a, 0x3C);
    assert_eq!(cpu.regs.f, Flags::SUBTRACT | Flags::CARRY);

    // 0x0000: SBC A, 0x0F
    let (mut cpu, mut bus) = setup(&[0xDE, 0x0F]);
    cpu.regs.a = 0x10;
    cpu.regs.f = Flags::CARRY;
    step(&mut cpu, &mut bus);
    assert_eq!(cpu.regs.a, 0x00);
    assert_eq!(cpu.regs.f, Flags::ZERO | Flags::SUBTRACT | Flags::HALF_CARRY);

    // 0x0000: SUB (HL)
    let (mut cpu, mut bus) = setup(&[0x96]);
    cpu.regs.a = 0x01;
    cpu.regs.set_hl(0xC000);
    bus.ram[0xC000] = 0x02;
    assert_eq!(step(&mut cpu, &mut bus), 8);
    assert_eq!(cpu.regs.a, 0xFF);
    assert_eq!(cpu.regs.f, Flags::SUBTRACT | Flags::HALF_CARRY | Flags::CARRY);
}

#[test]
fn add_with_carry() {
    // 0x0000: ADC A, 0x0F
    let (mut cpu, mut bus) = setup(&[0xCE, 0x0F]);
    cpu.regs.a = 0xE1;
    cpu.regs.f = Flags::CARRY;
    step(&mut cpu, &mut bus);
    assert_eq!(cpu.regs.a, 0xF1);
    assert_eq!(cpu.regs.f, Flags::HALF_CARRY);

    // 0x0000: ADC A, C (carry clear behaves like ADD)
    let (mut cpu, mut bus) = setup(&[0x89]);
    cpu.regs.a = 0xFF;
    cpu.regs.c = 0x01;
    step(&mut cpu, &mut bus);
    assert_eq!(cpu.regs.a, 0x00);
    assert_eq!(cpu.regs.f, Flags::ZERO | Flags::HALF_CARRY | Flags::CARRY);
}

#[test]
fn logical_operations() {
    // 0x0000: AND 0x0F
    // 0x0002: OR 0xF0
    // 0x0004: XOR A
    let (mut cpu, mut bus) = setup(&[0xE6, 0x0F, 0xF6, 0xF0, 0xAF]);
    cpu.regs.a = 0x5A;
    cpu.regs.f = Flags::CARRY;

    step(&mut cpu, &mut bus);
    assert_eq!(cpu.regs.a, 0x0A);
    assert_eq!(cpu.regs.f, Flags::HALF_CARRY);

    step(&mut cpu, &mut bus);
    assert_eq!(cpu.regs.a, 0xFA);
    assert_eq!(cpu.regs.f, Flags::empty());

    assert_eq!(step(&mut cpu, &mut bus), 4);
    assert_eq!(cpu.regs.a, 0x00);
    assert_eq!(cpu.regs.f, Flags::ZERO);
}

#[test]
fn accumulator_rotates_set_zero_from_result() {
    // 0x0000: RLCA
    let (mut cpu, mut bus) = setup(&[0x07]);
    cpu.regs.a = 0x85;
    assert_eq!(step(&mut cpu, &mut bus), 4);
    assert_eq!(cpu.regs.a, 0x0B);
    assert_eq!(cpu.regs.f, Flags::CARRY);

    // 0x0000: RRA
    let (mut cpu, mut bus) = setup(&[0x1F]);
    cpu.regs.a = 0x01;
    step(&mut cpu, &mut bus);
    assert_eq!(cpu.regs.a, 0x00);
    assert_eq!(cpu.regs.f, Flags::ZERO | Flags::CARRY);

    // 0x0000: RLA
    let (mut cpu, mut bus) = setup(&[0x17]);
    cpu.regs.a = 0x40;
    cpu.regs.f = Flags::CARRY;
    step(&mut cpu, &mut bus);
    assert_eq!(cpu.regs.a, 0x81);
    assert_eq!(cpu.regs.f, Flags::empty());
}

#[test]
fn daa_corrects_bcd_addition() {
    // 0x0000: ADD A, 0x27
    // 0x0002: DAA
    let (mut cpu, mut bus) = setup(&[0xC6, 0x27, 0x27]);
    cpu.regs.a = 0x15;
    step(&mut cpu, &mut bus);
    assert_eq!(cpu.regs.a, 0x3C);
    assert_eq!(step(&mut cpu, &mut bus), 4);
    assert_eq!(cpu.regs.a, 0x42);
    assert_eq!(cpu.regs.f, Flags::empty());

    // 0x0000: ADD A, 0x01
    // 0x0002: DAA
    let (mut cpu, mut bus) = setup(&[0xC6, 0x01, 0x27]);
    cpu.regs.a = 0x99;
    step(&mut cpu, &mut bus);
    step(&mut cpu, &mut bus);
    assert_eq!(cpu.regs.a, 0x00);
    assert_eq!(cpu.regs.f, Flags::ZERO | Flags::CARRY);

    // 0x0000: ADD A, 0x09 (half carry out of the low digit)
    // 0x0002: DAA
    let (mut cpu, mut bus) = setup(&[0xC6, 0x09, 0x27]);
    cpu.regs.a = 0x09;
    step(&mut cpu, &mut bus);
    assert_eq!(cpu.regs.a, 0x12);
    step(&mut cpu, &mut bus);
    assert_eq!(cpu.regs.a, 0x18);
}

#[test]
fn daa_corrects_bcd_subtraction() {
    // 0x0000: SUB 0x15
    // 0x0002: DAA
    let (mut cpu, mut bus) = setup(&[0xD6, 0x15, 0x27]);
    cpu.regs.a = 0x42;
    step(&mut cpu, &mut bus);
    assert_eq!(cpu.regs.a, 0x2D);
    step(&mut cpu, &mut bus);
    assert_eq!(cpu.regs.a, 0x27);
    assert_eq!(cpu.regs.f, Flags::SUBTRACT);

    // 0x0000: SUB 0x20 (borrow out of the high digit)
    // 0x0002: DAA
    let (mut cpu, mut bus) = setup(&[0xD6, 0x20, 0x27]);
    cpu.regs.a = 0x10;
    step(&mut cpu, &mut bus);
    step(&mut cpu, &mut bus);
    assert_eq!(cpu.regs.a, 0x90);
    assert_eq!(cpu.regs.f, Flags::SUBTRACT | Flags::CARRY);
}

#[test]
fn daa_derives_its_correction_from_a_and_keeps_carry() {
    // 0x0000: DAA on 0x9A with no flags: both digits out of range.
    let (mut cpu, mut bus) = setup(&[0x27]);
    cpu.regs.a = 0x9A;
    cpu.regs.f = Flags::empty();
    step(&mut cpu, &mut bus);
    assert_eq!(cpu.regs.a, 0x00);
    assert_eq!(cpu.regs.f, Flags::ZERO | Flags::CARRY);

    // 0x0000: DAA with C already set adds 0x60 and C stays set even though
    // the adjusted value itself does not overflow.
    let (mut cpu, mut bus) = setup(&[0x27]);
    cpu.regs.a = 0x00;
    cpu.regs.f = Flags::CARRY;
    step(&mut cpu, &mut bus);
    assert_eq!(cpu.regs.a, 0x60);
    assert_eq!(cpu.regs.f, Flags::CARRY);
}

#[test]
fn complement_and_carry_flag_ops() {
    // 0x0000: CPL
    // 0x0001: SCF
    // 0x0002: CCF
    let (mut cpu, mut bus) = setup(&[0x2F, 0x37, 0x3F]);
    cpu.regs.a = 0x35;
    cpu.regs.f = Flags::ZERO;

    step(&mut cpu, &mut bus);
    assert_eq!(cpu.regs.a, 0xCA);
    assert_eq!(cpu.regs.f, Flags::ZERO | Flags::SUBTRACT | Flags::HALF_CARRY);

    step(&mut cpu, &mut bus);
    assert_eq!(cpu.regs.f, Flags::ZERO | Flags::CARRY);

    step(&mut cpu, &mut bus);
    assert_eq!(cpu.regs.f, Flags::ZERO);
}

#[test]
fn cb_bit_test() {
    // 0x0000: BIT 7, H
    let (mut cpu, mut bus) = setup(&[0xCB, 0x7C]);
    cpu.regs.h = 0x7F;
    cpu.regs.f = Flags::SUBTRACT | Flags::CARRY;
    step(&mut cpu, &mut bus);
    assert_eq!(step(&mut cpu, &mut bus), 4);
    assert_eq!(cpu.regs.f, Flags::ZERO | Flags::HALF_CARRY | Flags::CARRY);
    assert_eq!(cpu.regs.h, 0x7F);

    // 0x0000: BIT 0, (HL)
    let (mut cpu, mut bus) = setup(&[0xCB, 0x46]);
    cpu.regs.set_hl(0xC000);
    bus.ram[0xC000] = 0x01;
    step(&mut cpu, &mut bus);
    assert_eq!(step(&mut cpu, &mut bus), 8);
    assert_eq!(cpu.regs.f, Flags::HALF_CARRY);
    assert_eq!(cpu.cycles(), 12);
}

#[test]
fn cb_set_and_reset_memory() {
    // 0x0000: SET 3, (HL)
    // 0x0002: RES 7, (HL)
    let (mut cpu, mut bus) = setup(&[0xCB, 0xDE, 0xCB, 0xBE]);
    cpu.regs.set_hl(0xC000);
    bus.ram[0xC000] = 0x80;
    cpu.regs.f = Flags::ZERO;

    step(&mut cpu, &mut bus);
    assert_eq!(step(&mut cpu, &mut bus), 12);
    assert_eq!(bus.ram[0xC000], 0x88);

    step(&mut cpu, &mut bus);
    step(&mut cpu, &mut bus);
    assert_eq!(bus.ram[0xC000], 0x08);
    assert_eq!(cpu.regs.f, Flags::ZERO);
    assert_eq!(cpu.cycles(), 32);
}

#[test]
fn cb_rotates_and_shifts() {
    // 0x0000: RL C
    // 0x0002: SRA D
    // 0x0004: SRL E
    // 0x0006: SLA (HL)
    let (mut cpu, mut bus) = setup(&[0xCB, 0x11, 0xCB, 0x2A, 0xCB, 0x3B, 0xCB, 0x26]);
    cpu.regs.c = 0x80;
    cpu.regs.d = 0x81;
    cpu.regs.e = 0x02;
    cpu.regs.set_hl(0xC000);
    bus.ram[0xC000] = 0x40;
    cpu.regs.f = Flags::empty();

    step(&mut cpu, &mut bus);
    step(&mut cpu, &mut bus);
    assert_eq!(cpu.regs.c, 0x00);
    assert_eq!(cpu.regs.f, Flags::ZERO | Flags::CARRY);

    step(&mut cpu, &mut bus);
    step(&mut cpu, &mut bus);
    assert_eq!(cpu.regs.d, 0xC0);
    assert_eq!(cpu.regs.f, Flags::CARRY);

    step(&mut cpu, &mut bus);
    step(&mut cpu, &mut bus);
    assert_eq!(cpu.regs.e, 0x01);
    assert_eq!(cpu.regs.f, Flags::empty());

    step(&mut cpu, &mut bus);
    assert_eq!(step(&mut cpu, &mut bus), 12);
    assert_eq!(bus.ram[0xC000], 0x80);
    assert_eq!(cpu.regs.f, Flags::empty());
}

#[test]
fn unknown_opcodes_fail_without_mutation() {
    for opcode in [0xD3, 0xDB, 0xDD, 0xE3, 0xE4, 0xEB, 0xEC, 0xED, 0xF4, 0xFC, 0xFD] {
        let (mut cpu, mut bus) = setup(&[opcode]);
        cpu.regs.a = 0x12;
        cpu.regs.sp = 0xFFFE;
        let before = cpu.regs;

        let err = cpu.execute_instruction(&mut bus).unwrap_err();
        assert_eq!(
            err,
            Error::UnknownOpcode {
                opcode,
                extended: false,
                addr: 0,
            }
        );
        assert_eq!(cpu.cycles(), 0);
        assert_eq!(cpu.regs.a, before.a);
        assert_eq!(cpu.regs.f, before.f);
        assert_eq!(cpu.regs.sp, before.sp);
        assert_eq!(cpu.regs.pc.get(), 1);
    }
}

#[test]
fn truncated_operand_fails_without_mutation() {
    // 0x0000: JP 0x??00, high byte missing
    let (mut cpu, mut bus) = setup(&[0xC3, 0x00]);
    cpu.regs.set_hl(0xBEEF);
    cpu.regs.sp = 0xFFFE;
    let before = cpu.regs;

    let err = cpu.execute_instruction(&mut bus).unwrap_err();
    assert_eq!(
        err,
        Error::OutOfBounds {
            space: AddressSpace::Rom,
            addr: 2,
            size: 2,
        }
    );
    assert_eq!(cpu.cycles(), 0);
    assert_eq!(cpu.regs.pc.get(), 2);
    cpu.regs.pc = before.pc;
    assert_eq!(cpu.regs, before);
    assert_eq!(cpu.interrupt_state(), InterruptState::Blocked);

    // 0x0000: LD BC, d16 with no operand bytes at all
    let (mut cpu, mut bus) = setup(&[0x01]);
    let err = cpu.execute_instruction(&mut bus).unwrap_err();
    assert!(matches!(
        err,
        Error::OutOfBounds {
            space: AddressSpace::Rom,
            addr: 1,
            ..
        }
    ));
    assert_eq!(cpu.regs.bc(), 0);
    assert_eq!(cpu.regs.pc.get(), 1);
    assert_eq!(cpu.cycles(), 0);
}

#[test]
fn stop_requires_trailing_zero() {
    // 0x0000: STOP 0x01
    let (mut cpu, mut bus) = setup(&[0x10, 0x01]);
    let err = cpu.execute_instruction(&mut bus).unwrap_err();
    assert_eq!(err, Error::MalformedStop { addr: 0, byte: 1 });
    assert_eq!(cpu.run_state(), RunState::Normal);

    // 0x0000: STOP
    // 0x0002: NOP
    let (mut cpu, mut bus) = setup(&[0x10, 0x00, 0x00]);
    assert_eq!(step(&mut cpu, &mut bus), 4);
    assert_eq!(cpu.run_state(), RunState::Stopped);

    // Stopped: nothing is fetched.
    assert_eq!(step(&mut cpu, &mut bus), IDLE_CYCLES);
    assert_eq!(cpu.regs.pc.get(), 2);
}

#[test]
fn halt_idles_until_woken() {
    // 0x0000: HALT
    // 0x0001: INC A
    let (mut cpu, mut bus) = setup(&[0x76, 0x3C]);

    assert_eq!(step(&mut cpu, &mut bus), 4);
    assert_eq!(cpu.run_state(), RunState::Halted);

    assert_eq!(step(&mut cpu, &mut bus), 4);
    assert_eq!(cpu.regs.pc.get(), 1);
    assert_eq!(cpu.regs.a, 0);

    cpu.wake();
    step(&mut cpu, &mut bus);
    assert_eq!(cpu.regs.a, 1);
    assert_eq!(cpu.cycles(), 12);
}

#[test]
fn servicing_an_interrupt_pushes_pc_and_jumps_to_its_vector() {
    let (mut cpu, mut bus) = setup(&[0x76]);
    cpu.regs.sp = 0xFFFE;
    cpu.interrupts = InterruptState::Interruptible;
    step(&mut cpu, &mut bus);
    assert_eq!(cpu.run_state(), RunState::Halted);

    bus.ram[0xFF0F] = 0x05;
    bus.ram[0xFFFF] = 0x1F;
    let pending = cpu.pending_interrupt(&mut bus).unwrap();
    assert_eq!(pending, Some(Interrupt::VBlank));

    assert_eq!(cpu.service_interrupt(&mut bus, Interrupt::VBlank).unwrap(), 20);
    assert_eq!(cpu.regs.pc.get(), 0x0040);
    assert_eq!(cpu.regs.sp, 0xFFFC);
    assert_eq!(bus.ram[0xFFFD], 0x00);
    assert_eq!(bus.ram[0xFFFC], 0x01);
    assert_eq!(bus.ram[0xFF0F], 0x04);
    assert_eq!(cpu.interrupt_state(), InterruptState::Blocked);
    assert_eq!(cpu.run_state(), RunState::Normal);

    assert_eq!(cpu.pending_interrupt(&mut bus).unwrap(), Some(Interrupt::Timer));
}

#[test]
fn instruction_stream_ends_at_rom_extent() {
    let (mut cpu, mut bus) = setup(&[0x00, 0x00]);
    assert!(cpu.has_instruction_remaining(&bus));
    step(&mut cpu, &mut bus);
    assert!(cpu.has_instruction_remaining(&bus));
    step(&mut cpu, &mut bus);
    assert!(!cpu.has_instruction_remaining(&bus));
}

#[test]
fn reset_returns_to_start_state() {
    let (mut cpu, mut bus) = setup(&[0xFB, 0x3C]);
    step(&mut cpu, &mut bus);
    step(&mut cpu, &mut bus);

    cpu.reset(StartState::PostBoot);
    assert_eq!(cpu.regs.pc.get(), 0x0100);
    assert_eq!(cpu.regs.af(), 0x01B0);
    assert_eq!(cpu.interrupt_state(), InterruptState::Blocked);
    assert_eq!(cpu.cycles(), 0);
}

#[test]
fn boot_program_hands_over_in_post_boot_state() {
    let mut memory = Memory::new();
    let mut cpu = Cpu::default();

    let mut steps = 0;
    while cpu.regs.pc.get() != 0x0100 {
        cpu.execute_instruction(&mut memory).unwrap();
        steps += 1;
        assert!(steps < 100_000, "boot program did not finish");
    }

    let expected = Cpu::new(CpuConfig::builder().start(StartState::PostBoot).build());
    assert_eq!(cpu.regs, expected.regs);
    assert_eq!(memory.read(0xFF50), Ok(0x01));
    assert_eq!(memory.read(0xFF40), Ok(0x91));
    assert_eq!(memory.read(0xFF47), Ok(0xFC));
    assert!(!cpu.has_instruction_remaining(&memory));
}
