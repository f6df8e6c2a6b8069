use num_enum::{IntoPrimitive, TryFromPrimitive};
use serde::{Deserialize, Serialize};
use strum::{Display, EnumIter, EnumString};

/// Named RAM cells the VM runtime reserves for itself.
#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    Hash,
    Serialize,
    Deserialize,
    IntoPrimitive,
    TryFromPrimitive,
    EnumString,
    EnumIter,
    Display,
)]
#[repr(u16)]
pub enum Reg {
    SP = 0,
    LCL = 1,
    ARG = 2,
    THIS = 3,
    THAT = 4,
    R13 = 13,
    R14 = 14,
    R15 = 15,
}

impl Reg {
    pub fn addr(self) -> u16 {
        self.into()
    }
}

/// First RAM cell of the `temp` segment.
pub const TEMP_BASE: u16 = 5;
pub const TEMP_SIZE: u16 = 8;

/// First RAM cell of the `pointer` segment (`THIS`, `THAT`).
pub const POINTER_BASE: u16 = 3;

/// Stack base set up by the bootstrap.
pub const STACK_BASE: u16 = 256;

/// First cell the assembler hands out to variables.
pub const VAR_BASE: u16 = 16;

pub const SCREEN: u16 = 0x4000;
pub const KBD: u16 = 0x6000;
