use crate::error::Error;
use arch::inst::Addr;
use arch::reg::{Reg, POINTER_BASE, TEMP_BASE, TEMP_SIZE};
use strum::{Display, EnumString};

/// A named region of VM memory.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, EnumString, Display)]
#[strum(serialize_all = "lowercase")]
pub enum Segment {
    Constant,
    Local,
    Argument,
    This,
    That,
    Pointer,
    Temp,
    Static,
}

/// Where a segment cell lives once resolved.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Address {
    /// Not a cell: the value itself.
    Immediate(u16),
    /// `RAM[base] + index`
    Indirect(Reg, u16),
    /// A fixed RAM cell.
    Direct(u16),
    /// A cell the assembler allocates for the symbol.
    Symbol(String),
}

impl Segment {
    pub fn parse(s: &str) -> Result<Self, Error> {
        s.parse::<Self>()
            .map_err(|_| Error::UnknownSegment(s.to_string()))
    }

    /// Resolves `index` in this segment. `unit` qualifies `static` cells.
    pub fn resolve(self, index: u16, unit: &str) -> Result<Address, Error> {
        match self {
            Segment::Constant => match index {
                i if i <= Addr::MAX_LIT => Ok(Address::Immediate(i)),
                i => Err(Error::InvalidOperation(format!(
                    "constant {} does not fit in 15 bits",
                    i
                ))),
            },
            Segment::Local => Ok(Address::Indirect(Reg::LCL, index)),
            Segment::Argument => Ok(Address::Indirect(Reg::ARG, index)),
            Segment::This => Ok(Address::Indirect(Reg::THIS, index)),
            Segment::That => Ok(Address::Indirect(Reg::THAT, index)),
            Segment::Pointer => match index {
                0 | 1 => Ok(Address::Direct(POINTER_BASE + index)),
                i => Err(Error::InvalidOperation(format!("pointer {} is out of 0..=1", i))),
            },
            Segment::Temp => match index {
                i if i < TEMP_SIZE => Ok(Address::Direct(TEMP_BASE + i)),
                i => Err(Error::InvalidOperation(format!(
                    "temp {} is out of 0..{}",
                    i, TEMP_SIZE
                ))),
            },
            Segment::Static => Ok(Address::Symbol(format!("{}.{}", unit, index))),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parse_names() {
        assert_eq!(Segment::parse("local").unwrap(), Segment::Local);
        assert_eq!(Segment::parse("static").unwrap(), Segment::Static);
        assert!(matches!(
            Segment::parse("heap"),
            Err(Error::UnknownSegment(s)) if s == "heap"
        ));
        assert!(matches!(Segment::parse("Local"), Err(Error::UnknownSegment(_))));
    }

    #[test]
    fn resolve_each_segment() {
        let unit = "Main";
        assert_eq!(Segment::Constant.resolve(7, unit).unwrap(), Address::Immediate(7));
        assert_eq!(
            Segment::Argument.resolve(2, unit).unwrap(),
            Address::Indirect(Reg::ARG, 2)
        );
        assert_eq!(
            Segment::That.resolve(5, unit).unwrap(),
            Address::Indirect(Reg::THAT, 5)
        );
        assert_eq!(Segment::Pointer.resolve(1, unit).unwrap(), Address::Direct(4));
        assert_eq!(Segment::Temp.resolve(7, unit).unwrap(), Address::Direct(12));
        assert_eq!(
            Segment::Static.resolve(3, unit).unwrap(),
            Address::Symbol("Main.3".to_string())
        );
    }

    #[test]
    fn statics_are_private_per_unit() {
        let a = Segment::Static.resolve(0, "A").unwrap();
        let b = Segment::Static.resolve(0, "B").unwrap();
        assert_ne!(a, b);
        assert_eq!(a, Segment::Static.resolve(0, "A").unwrap());
    }

    #[test]
    fn out_of_range() {
        assert!(matches!(
            Segment::Pointer.resolve(2, "Main"),
            Err(Error::InvalidOperation(_))
        ));
        assert!(matches!(
            Segment::Temp.resolve(8, "Main"),
            Err(Error::InvalidOperation(_))
        ));
        assert!(matches!(
            Segment::Constant.resolve(32768, "Main"),
            Err(Error::InvalidOperation(_))
        ));
    }
}
