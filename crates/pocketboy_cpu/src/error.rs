use std::fmt;

use thiserror::Error;

/// Which byte array a bounds violation was reported against.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum AddressSpace {
    /// The 64 KiB runtime memory used for data loads and stores.
    Memory,
    /// The ROM image that supplies the instruction stream.
    Rom,
}

impl fmt::Display for AddressSpace {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            AddressSpace::Memory => f.write_str("memory"),
            AddressSpace::Rom => f.write_str("ROM"),
        }
    }
}

/// Fatal conditions surfaced by the CPU core.
///
/// None of these are recoverable locally: the run loop is expected to stop
/// and report the failing address or opcode.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum Error {
    #[error("{space} access at {addr:#X} is outside the {size:#X}-byte window")]
    OutOfBounds {
        space: AddressSpace,
        addr: usize,
        size: usize,
    },

    #[error("loading {len} bytes at ROM offset {offset:#X} overflows the {size:#X}-byte image")]
    RomOverflow {
        offset: usize,
        len: usize,
        size: usize,
    },

    #[error("unknown {}opcode {opcode:#04X} at PC={addr:#06X}", table_prefix(.extended))]
    UnknownOpcode { opcode: u8, extended: bool, addr: u16 },

    #[error("STOP at PC={addr:#06X} must be followed by 0x00, found {byte:#04X}")]
    MalformedStop { addr: u16, byte: u8 },
}

pub type Result<T> = std::result::Result<T, Error>;

fn table_prefix(extended: &bool) -> &'static str {
    if *extended {
        "CB-prefixed "
    } else {
        ""
    }
}
