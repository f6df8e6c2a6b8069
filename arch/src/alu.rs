use num_enum::{IntoPrimitive, TryFromPrimitive};
use strum::{Display, EnumString};

/// The `comp` field of a C-instruction. Discriminants are the `a c1..c6` bits.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, IntoPrimitive, TryFromPrimitive, EnumString, Display,
)]
#[repr(u8)]
pub enum Comp {
    #[strum(to_string = "0")]
    Zero = 0b0101010,
    #[strum(to_string = "1")]
    One = 0b0111111,
    #[strum(to_string = "-1")]
    NegOne = 0b0111010,
    #[strum(to_string = "D")]
    D = 0b0001100,
    #[strum(to_string = "A")]
    A = 0b0110000,
    #[strum(to_string = "M")]
    M = 0b1110000,
    #[strum(to_string = "!D")]
    NotD = 0b0001101,
    #[strum(to_string = "!A")]
    NotA = 0b0110001,
    #[strum(to_string = "!M")]
    NotM = 0b1110001,
    #[strum(to_string = "-D")]
    NegD = 0b0001111,
    #[strum(to_string = "-A")]
    NegA = 0b0110011,
    #[strum(to_string = "-M")]
    NegM = 0b1110011,
    #[strum(to_string = "D+1", serialize = "1+D")]
    DPlusOne = 0b0011111,
    #[strum(to_string = "A+1", serialize = "1+A")]
    APlusOne = 0b0110111,
    #[strum(to_string = "M+1", serialize = "1+M")]
    MPlusOne = 0b1110111,
    #[strum(to_string = "D-1")]
    DMinusOne = 0b0001110,
    #[strum(to_string = "A-1")]
    AMinusOne = 0b0110010,
    #[strum(to_string = "M-1")]
    MMinusOne = 0b1110010,
    #[strum(to_string = "D+A", serialize = "A+D")]
    DPlusA = 0b0000010,
    #[strum(to_string = "D+M", serialize = "M+D")]
    DPlusM = 0b1000010,
    #[strum(to_string = "D-A")]
    DMinusA = 0b0010011,
    #[strum(to_string = "D-M")]
    DMinusM = 0b1010011,
    #[strum(to_string = "A-D")]
    AMinusD = 0b0000111,
    #[strum(to_string = "M-D")]
    MMinusD = 0b1000111,
    #[strum(to_string = "D&A", serialize = "A&D")]
    DAndA = 0b0000000,
    #[strum(to_string = "D&M", serialize = "M&D")]
    DAndM = 0b1000000,
    #[strum(to_string = "D|A", serialize = "A|D")]
    DOrA = 0b0010101,
    #[strum(to_string = "D|M", serialize = "M|D")]
    DOrM = 0b1010101,
}

impl Comp {
    pub fn parse(s: &str) -> Result<Self, String> {
        match s.parse::<Self>() {
            Ok(c) => Ok(c),
            Err(_) => Err(format!("Undefined comp: {s}")),
        }
    }
}

macro_rules! boo {
    ($cond:expr) => {
        if $cond {
            0xFFFF
        } else {
            0x0000
        }
    };
}

/// Evaluates `comp` with 16-bit wraparound arithmetic.
pub fn eval(comp: Comp, d: u16, a: u16, m: u16) -> u16 {
    use Comp::*;
    match comp {
        Zero => 0,
        One => 1,
        NegOne => boo!(true),
        D => d,
        A => a,
        M => m,
        NotD => !d,
        NotA => !a,
        NotM => !m,
        NegD => d.wrapping_neg(),
        NegA => a.wrapping_neg(),
        NegM => m.wrapping_neg(),
        DPlusOne => d.wrapping_add(1),
        APlusOne => a.wrapping_add(1),
        MPlusOne => m.wrapping_add(1),
        DMinusOne => d.wrapping_sub(1),
        AMinusOne => a.wrapping_sub(1),
        MMinusOne => m.wrapping_sub(1),
        DPlusA => d.wrapping_add(a),
        DPlusM => d.wrapping_add(m),
        DMinusA => d.wrapping_sub(a),
        DMinusM => d.wrapping_sub(m),
        AMinusD => a.wrapping_sub(d),
        MMinusD => m.wrapping_sub(d),
        DAndA => d & a,
        DAndM => d & m,
        DOrA => d | a,
        DOrM => d | m,
    }
}
