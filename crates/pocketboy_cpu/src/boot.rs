//! Built-in boot program.
//!
//! A small stand-in for the console's boot ROM: it sets up the stack,
//! clears video and sprite memory, programs the LCD, palette and sound
//! registers, leaves the register file in the documented post-boot state
//! and then unmaps itself by writing to 0xFF50 from the last four bytes,
//! so execution falls through to the cartridge entry point at 0x0100.

pub const BOOT_SIZE: usize = 0x100;

/// Address the cartridge image is attached at once the boot program is in place.
pub const CARTRIDGE_ENTRY: usize = 0x100;

#[rustfmt::skip]
const PROLOGUE: [u8; 0x47] = [
    0x31, 0xFE, 0xFF,       // 0x00: LD SP, $FFFE
    0xAF,                   // 0x03: XOR A
    0x21, 0xFF, 0x9F,       // 0x04: LD HL, $9FFF
    0x32,                   // 0x07: LD (HL-), A
    0xCB, 0x7C,             // 0x08: BIT 7, H
    0x20, 0xFB,             // 0x0A: JR NZ, $07
    0x21, 0x00, 0xFE,       // 0x0C: LD HL, $FE00
    0x06, 0xA0,             // 0x0F: LD B, $A0
    0x22,                   // 0x11: LD (HL+), A
    0x05,                   // 0x12: DEC B
    0x20, 0xFC,             // 0x13: JR NZ, $11
    0x3E, 0x80,             // 0x15: LD A, $80
    0xE0, 0x26,             // 0x17: LDH (NR52), A
    0x3E, 0x77,             // 0x19: LD A, $77
    0xE0, 0x24,             // 0x1B: LDH (NR50), A
    0x3E, 0xF3,             // 0x1D: LD A, $F3
    0xE0, 0x25,             // 0x1F: LDH (NR51), A
    0x3E, 0xFC,             // 0x21: LD A, $FC
    0xE0, 0x47,             // 0x23: LDH (BGP), A
    0x3E, 0xFF,             // 0x25: LD A, $FF
    0xE0, 0x48,             // 0x27: LDH (OBP0), A
    0xE0, 0x49,             // 0x29: LDH (OBP1), A
    0xAF,                   // 0x2B: XOR A
    0xE0, 0x42,             // 0x2C: LDH (SCY), A
    0xE0, 0x43,             // 0x2E: LDH (SCX), A
    0xE0, 0x0F,             // 0x30: LDH (IF), A
    0x3E, 0x91,             // 0x32: LD A, $91
    0xE0, 0x40,             // 0x34: LDH (LCDC), A
    0x01, 0xB0, 0x01,       // 0x36: LD BC, $01B0
    0xC5,                   // 0x39: PUSH BC
    0xF1,                   // 0x3A: POP AF
    0x01, 0x13, 0x00,       // 0x3B: LD BC, $0013
    0x11, 0xD8, 0x00,       // 0x3E: LD DE, $00D8
    0x21, 0x4D, 0x01,       // 0x41: LD HL, $014D
    0x31, 0xFE, 0xFF,       // 0x44: LD SP, $FFFE
];

#[rustfmt::skip]
const EPILOGUE: [u8; 4] = [
    0x3E, 0x01,             // 0xFC: LD A, $01
    0xE0, 0x50,             // 0xFE: LDH ($50), A
];

/// The assembled program; everything between prologue and epilogue is NOP.
pub const BOOT_PROGRAM: [u8; BOOT_SIZE] = assemble();

const fn assemble() -> [u8; BOOT_SIZE] {
    let mut image = [0u8; BOOT_SIZE];
    let mut i = 0;
    while i < PROLOGUE.len() {
        image[i] = PROLOGUE[i];
        i += 1;
    }
    let tail = BOOT_SIZE - EPILOGUE.len();
    let mut j = 0;
    while j < EPILOGUE.len() {
        image[tail + j] = EPILOGUE[j];
        j += 1;
    }
    image
}
