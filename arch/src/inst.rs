use crate::{
    alu::Comp,
    op::{Dest, Jump},
    reg::Reg,
};
use color_print::cformat;
use std::fmt;

/// Operand of an A-instruction.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum Addr {
    Lit(u16),
    Reg(Reg),
    Sym(String),
}

impl Addr {
    /// Largest literal an A-instruction can carry.
    pub const MAX_LIT: u16 = 0x7FFF;

    pub fn parse(s: &str) -> Result<Self, String> {
        if s.chars().all(|c| c.is_ascii_digit()) && !s.is_empty() {
            return match s.parse::<u16>() {
                Ok(v) if v <= Self::MAX_LIT => Ok(Addr::Lit(v)),
                _ => Err(format!("Literal out of range: {s}")),
            };
        }
        if let Ok(reg) = s.parse::<Reg>() {
            return Ok(Addr::Reg(reg));
        }
        if is_symbol(s) {
            Ok(Addr::Sym(s.to_string()))
        } else {
            Err(format!("Invalid symbol: `{s}`"))
        }
    }
}

impl fmt::Display for Addr {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Addr::Lit(v) => write!(f, "{}", v),
            Addr::Reg(r) => write!(f, "{}", r),
            Addr::Sym(s) => write!(f, "{}", s),
        }
    }
}

impl From<u16> for Addr {
    fn from(v: u16) -> Self {
        Addr::Lit(v)
    }
}

impl From<Reg> for Addr {
    fn from(r: Reg) -> Self {
        Addr::Reg(r)
    }
}

impl From<String> for Addr {
    fn from(s: String) -> Self {
        Addr::Sym(s)
    }
}

impl From<&str> for Addr {
    fn from(s: &str) -> Self {
        Addr::Sym(s.to_string())
    }
}

/// One line of assembly.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum Inst {
    /// `@addr`
    At(Addr),
    /// `dest=comp;jump`
    Calc(Dest, Comp, Jump),
    /// `(name)`
    Label(String),
}

impl Inst {
    pub fn at(addr: impl Into<Addr>) -> Self {
        Inst::At(addr.into())
    }

    pub fn set(dest: Dest, comp: Comp) -> Self {
        Inst::Calc(dest, comp, Jump::NULL)
    }

    pub fn jump(comp: Comp, jump: Jump) -> Self {
        Inst::Calc(Dest::NULL, comp, jump)
    }

    pub fn label(name: impl Into<String>) -> Self {
        Inst::Label(name.into())
    }

    pub fn is_label(&self) -> bool {
        matches!(self, Inst::Label(_))
    }

    /// Parses one source line. Comments and blank lines yield `None`.
    pub fn parse(line: &str) -> Result<Option<Inst>, String> {
        let code = match line.split_once("//") {
            Some((code, _)) => code,
            None => line,
        };
        let code: String = code.split_whitespace().collect();
        if code.is_empty() {
            return Ok(None);
        }

        if let Some(rest) = code.strip_prefix('(') {
            let name = rest
                .strip_suffix(')')
                .ok_or(format!("Unclosed label: `{code}`"))?;
            if !is_symbol(name) {
                return Err(format!("Invalid symbol: `{name}`"));
            }
            return Ok(Some(Inst::Label(name.to_string())));
        }

        if let Some(rest) = code.strip_prefix('@') {
            return Ok(Some(Inst::At(Addr::parse(rest)?)));
        }

        let (body, jump) = match code.split_once(';') {
            Some((body, jump)) => (body, Jump::parse(jump)?),
            None => (code.as_str(), Jump::NULL),
        };
        let (dest, comp) = match body.split_once('=') {
            Some((dest, comp)) => (Dest::parse(dest)?, Comp::parse(comp)?),
            None => (Dest::NULL, Comp::parse(body)?),
        };
        Ok(Some(Inst::Calc(dest, comp, jump)))
    }

    pub fn cformat(&self) -> String {
        match self {
            Inst::At(addr) => cformat!("<y>@{}</>", addr),
            Inst::Calc(dest, comp, jump) => {
                let dest = match dest {
                    Dest::NULL => String::new(),
                    d => cformat!("<r>{}</>=", d),
                };
                let jump = match jump {
                    Jump::NULL => String::new(),
                    j => cformat!(";<m>{}</>", j),
                };
                cformat!("{}<b>{}</>{}", dest, comp, jump)
            }
            Inst::Label(name) => cformat!("<g>({})</>", name),
        }
    }
}

impl fmt::Display for Inst {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Inst::At(addr) => write!(f, "@{}", addr),
            Inst::Calc(dest, comp, jump) => {
                if *dest != Dest::NULL {
                    write!(f, "{}=", dest)?;
                }
                write!(f, "{}", comp)?;
                if *jump != Jump::NULL {
                    write!(f, ";{}", jump)?;
                }
                Ok(())
            }
            Inst::Label(name) => write!(f, "({})", name),
        }
    }
}

fn is_symbol(s: &str) -> bool {
    match s.chars().next() {
        Some(head) if !head.is_ascii_digit() => s
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || matches!(c, '_' | '.' | '$' | ':')),
        _ => false,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    macro_rules! test_inst {
        ($($name:ident: $text:expr => $inst:expr,)*) => {
            $(
                #[test]
                fn $name() {
                    let inst = $inst;
                    assert_eq!(Inst::parse($text), Ok(Some(inst.clone())));
                    assert_eq!(inst.to_string(), $text);
                }
            )*
        }
    }

    test_inst! {
        test_at_lit: "@256" => Inst::at(256u16),
        test_at_reg: "@SP" => Inst::at(Reg::SP),
        test_at_sym: "@Main.0" => Inst::at("Main.0"),
        test_at_label: "@$RET.1" => Inst::at("$RET.1"),
        test_set: "AM=M-1" => Inst::set(Dest::AM, Comp::MMinusOne),
        test_jump: "D;JGT" => Inst::jump(Comp::D, Jump::JGT),
        test_full: "D=D-1;JNE" => Inst::Calc(Dest::D, Comp::DMinusOne, Jump::JNE),
        test_label: "($Sys.init)" => Inst::label("$Sys.init"),
    }

    #[test]
    fn parse_skips_comments() {
        assert_eq!(Inst::parse("   // nothing"), Ok(None));
        assert_eq!(Inst::parse(""), Ok(None));
        assert_eq!(
            Inst::parse("  M = M + D  // add"),
            Ok(Some(Inst::set(Dest::M, Comp::DPlusM)))
        );
    }

    #[test]
    fn parse_errors() {
        assert!(Inst::parse("@40000").is_err());
        assert!(Inst::parse("@1abc").is_err());
        assert!(Inst::parse("(LOOP").is_err());
        assert!(Inst::parse("X=D").is_err());
        assert!(Inst::parse("D;JXX").is_err());
    }

    #[test]
    fn lowercase_reg_is_symbol() {
        assert_eq!(Inst::parse("@sp"), Ok(Some(Inst::at("sp"))));
    }
}
