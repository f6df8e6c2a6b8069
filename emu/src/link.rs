use crate::error::Error;
use arch::inst::{Addr, Inst};
use arch::op::Op;
use arch::reg::{Reg, KBD, SCREEN, VAR_BASE};
use indexmap::IndexMap;
use once_cell::sync::Lazy;
use strum::IntoEnumIterator;

pub const ROM_SIZE: usize = 0x8000;

/// Symbols every program may use without defining them.
pub static PREDEFINED: Lazy<IndexMap<String, u16>> = Lazy::new(|| {
    let mut map = IndexMap::new();
    for reg in Reg::iter() {
        map.insert(reg.to_string(), reg.addr());
    }
    for i in 0..16 {
        map.insert(format!("R{}", i), i);
    }
    map.insert("SCREEN".to_string(), SCREEN);
    map.insert("KBD".to_string(), KBD);
    map
});

/// Reads assembly text.
pub fn parse(source: &str) -> Result<Vec<Inst>, Error> {
    let mut code = vec![];
    for (idx, line) in source.lines().enumerate() {
        let inst = Inst::parse(line).map_err(|msg| Error::SyntaxError {
            row: idx + 1,
            text: line.trim().to_string(),
            msg,
        })?;
        code.extend(inst);
    }
    Ok(code)
}

#[derive(Debug, Default)]
pub struct Linked {
    pub rom: Vec<Op>,
    /// Label -> ROM address
    pub labels: IndexMap<String, u16>,
    /// Variable -> RAM address, in allocation order
    pub vars: IndexMap<String, u16>,
}

impl Linked {
    /// Address bound to `name`, whatever kind of symbol it is.
    pub fn symbol(&self, name: &str) -> Option<u16> {
        self.labels
            .get(name)
            .or_else(|| self.vars.get(name))
            .or_else(|| PREDEFINED.get(name))
            .copied()
    }

    /// The ROM as a `.hack` image.
    pub fn to_hack(&self) -> String {
        self.rom
            .iter()
            .map(|op| format!("{:016b}\n", op.to_bin()))
            .collect()
    }
}

/// Reads a `.hack` image: one 16-digit binary word per line.
pub fn load_hack(source: &str) -> Result<Vec<Op>, Error> {
    let mut rom = vec![];
    for (idx, line) in source.lines().enumerate() {
        let text = line.trim();
        if text.is_empty() {
            continue;
        }
        let syntax = |msg: String| Error::SyntaxError {
            row: idx + 1,
            text: text.to_string(),
            msg,
        };
        if text.len() != 16 || !text.chars().all(|c| c == '0' || c == '1') {
            return Err(syntax("Expected 16 binary digits".to_string()));
        }
        let bin = u16::from_str_radix(text, 2).map_err(|e| syntax(e.to_string()))?;
        rom.push(Op::from_bin(bin).map_err(syntax)?);
    }
    if rom.len() > ROM_SIZE {
        return Err(Error::RomOverflow(rom.len()));
    }
    Ok(rom)
}

/// Resolves every symbol in `code` and drops the labels.
pub fn link(code: &[Inst]) -> Result<Linked, Error> {
    let mut linked = Linked::default();

    // 1. Collect labels
    let mut pc = 0;
    for inst in code {
        match inst {
            Inst::Label(name) => {
                if linked.labels.insert(name.clone(), pc as u16).is_some() {
                    return Err(Error::RedefinedLabel(name.clone()));
                }
            }
            _ => pc += 1,
        }
    }
    if pc > ROM_SIZE {
        return Err(Error::RomOverflow(pc));
    }

    // 2. Resolve symbols, allocating variables on first use
    let mut next = VAR_BASE;
    for inst in code {
        let op = match inst {
            Inst::Label(_) => continue,
            Inst::Calc(dest, comp, jump) => Op::C(*dest, *comp, *jump),
            Inst::At(Addr::Lit(v)) => Op::A(*v),
            Inst::At(Addr::Reg(r)) => Op::A(r.addr()),
            Inst::At(Addr::Sym(s)) => {
                let addr = match linked.labels.get(s).or_else(|| PREDEFINED.get(s)) {
                    Some(addr) => *addr,
                    None => *linked.vars.entry(s.clone()).or_insert_with(|| {
                        next += 1;
                        next - 1
                    }),
                };
                Op::A(addr)
            }
        };
        linked.rom.push(op);
    }

    Ok(linked)
}
