use crate::alu::Comp;
use num_enum::{IntoPrimitive, TryFromPrimitive};
use strum::{Display, EnumString};

/// The `dest` field of a C-instruction. Discriminants are the `d1 d2 d3` bits (A, D, M).
#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    Hash,
    Default,
    IntoPrimitive,
    TryFromPrimitive,
    EnumString,
    Display,
)]
#[repr(u8)]
pub enum Dest {
    #[default]
    #[strum(to_string = "")]
    NULL = 0b000,
    M = 0b001,
    D = 0b010,
    #[strum(to_string = "MD", serialize = "DM")]
    MD = 0b011,
    A = 0b100,
    #[strum(to_string = "AM", serialize = "MA")]
    AM = 0b101,
    #[strum(to_string = "AD", serialize = "DA")]
    AD = 0b110,
    #[strum(
        to_string = "AMD",
        serialize = "ADM",
        serialize = "MAD",
        serialize = "MDA",
        serialize = "DAM",
        serialize = "DMA"
    )]
    AMD = 0b111,
}

impl Dest {
    pub fn parse(s: &str) -> Result<Self, String> {
        match s.parse::<Self>() {
            Ok(d) => Ok(d),
            Err(_) => Err(format!("Undefined dest: {s}")),
        }
    }

    pub fn a(self) -> bool {
        u8::from(self) & 0b100 != 0
    }
    pub fn d(self) -> bool {
        u8::from(self) & 0b010 != 0
    }
    pub fn m(self) -> bool {
        u8::from(self) & 0b001 != 0
    }
}

/// The `jump` field of a C-instruction. Discriminants are the `j1 j2 j3` bits (<0, =0, >0).
#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    Hash,
    Default,
    IntoPrimitive,
    TryFromPrimitive,
    EnumString,
    Display,
)]
#[repr(u8)]
pub enum Jump {
    #[default]
    #[strum(to_string = "")]
    NULL = 0b000,
    JGT = 0b001,
    JEQ = 0b010,
    JGE = 0b011,
    JLT = 0b100,
    JNE = 0b101,
    JLE = 0b110,
    JMP = 0b111,
}

impl Jump {
    pub fn parse(s: &str) -> Result<Self, String> {
        match s.parse::<Self>() {
            Ok(j) => Ok(j),
            Err(_) => Err(format!("Undefined jump: {s}")),
        }
    }

    /// Whether the jump is taken for the ALU output `out`, read as a signed word.
    pub fn test(self, out: u16) -> bool {
        let bits = u8::from(self);
        let out = out as i16;
        (bits & 0b100 != 0 && out < 0)
            || (bits & 0b010 != 0 && out == 0)
            || (bits & 0b001 != 0 && out > 0)
    }
}

/// A machine instruction with every symbol resolved.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Op {
    A(u16),
    C(Dest, Comp, Jump),
}

impl Op {
    pub fn to_bin(self) -> u16 {
        match self {
            Op::A(imm) => imm & 0x7FFF,
            Op::C(dest, comp, jump) => {
                0b111u16 << 13
                    | (u8::from(comp) as u16) << 6
                    | (u8::from(dest) as u16) << 3
                    | u8::from(jump) as u16
            }
        }
    }

    pub fn from_bin(bin: u16) -> Result<Op, String> {
        if bin & 0x8000 == 0 {
            return Ok(Op::A(bin));
        }
        let comp = Comp::try_from(((bin >> 6) & 0b1111111) as u8)
            .map_err(|_| format!("Undefined comp bits in 0x{:04X}", bin))?;
        let dest = Dest::try_from(((bin >> 3) & 0b111) as u8)
            .map_err(|_| format!("Undefined dest bits in 0x{:04X}", bin))?;
        let jump = Jump::try_from((bin & 0b111) as u8)
            .map_err(|_| format!("Undefined jump bits in 0x{:04X}", bin))?;
        Ok(Op::C(dest, comp, jump))
    }
}
