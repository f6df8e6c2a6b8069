use arch::inst::Inst;
use arch::op::Op;
use arch::reg::Reg;
use color_print::{cformat, cprintln};
use indexmap::IndexMap;
use serde::Deserialize;
use std::fs::File;
use std::io::BufReader;

use super::Hook;
use crate::error::Error;
use crate::link::Linked;
use crate::model::State;

/// Registers shown when a config names none.
const DEFAULT_REGS: [Reg; 5] = [Reg::SP, Reg::LCL, Reg::ARG, Reg::THIS, Reg::THAT];

#[derive(Debug)]
pub struct Dump {
    file: Option<String>,
    all: bool,
    list: IndexMap<u16, Config>,
}

/// ROM address or symbol a config is attached to.
#[derive(Debug, PartialEq, Eq, Hash, Deserialize)]
#[serde(untagged)]
enum Key {
    Addr(u16),
    Symbol(String),
}

#[derive(Debug, Default, Clone, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct Config {
    pub stack: bool,
    pub regs: Vec<Reg>,
    pub ram: Vec<u16>,
}

impl Dump {
    pub fn arg(file: Option<String>, all: bool, linked: &Linked) -> Result<Self, Error> {
        let list = match &file {
            Some(fname) => {
                let f = File::open(fname).map_err(|e| Error::FileOpen(fname.clone(), e))?;
                let raw: IndexMap<Key, Config> = serde_yaml::from_reader(BufReader::new(f))
                    .map_err(|e| Error::DumpConfig(fname.clone(), e))?;
                resolve(raw, linked)?
            }
            None => IndexMap::new(),
        };
        Ok(Self { file, all, list })
    }

    /// Parses a YAML dump config, binding label keys through `linked`.
    pub fn parse(yaml: &str, linked: &Linked) -> Result<IndexMap<u16, Config>, Error> {
        let raw: IndexMap<Key, Config> = serde_yaml::from_str(yaml)
            .map_err(|e| Error::DumpConfig("<str>".to_string(), e))?;
        resolve(raw, linked)
    }
}

fn resolve(raw: IndexMap<Key, Config>, linked: &Linked) -> Result<IndexMap<u16, Config>, Error> {
    let mut list = IndexMap::new();
    for (key, cfg) in raw {
        let addr = match key {
            Key::Addr(addr) => addr,
            Key::Symbol(name) => match linked.symbol(&name) {
                Some(addr) => addr,
                None => return Err(Error::UnknownSymbol(name)),
            },
        };
        list.insert(addr, cfg);
    }
    Ok(list)
}

impl Hook for Dump {
    fn init(&mut self, state: State) -> State {
        if self.all {
            println!(" * Dump all");
        }
        if let Some(fname) = &self.file {
            println!(" * Dump[{}] {:?}", self.list.len(), fname);
        }
        state
    }

    fn exec(&mut self, time: u64, addr: u16, op: Op, cpu: State) -> State {
        if let Some(cfg) = self.list.get(&addr) {
            print_op(time, addr, op);
            let regs = match cfg.regs.as_slice() {
                [] => &DEFAULT_REGS[..],
                regs => regs,
            };
            print_reg(&cpu, regs);
            if cfg.stack {
                print_stack(&cpu);
            }
            print_ram(&cpu, &cfg.ram);
        } else if self.all {
            print_op(time, addr, op);
            print_reg(&cpu, &DEFAULT_REGS);
        }
        cpu
    }
}

pub fn op_cformat(op: Op) -> String {
    match op {
        Op::A(imm) => cformat!("<y>@{}</>", imm),
        Op::C(dest, comp, jump) => Inst::Calc(dest, comp, jump).cformat(),
    }
}

fn print_op(time: u64, addr: u16, op: Op) {
    cprintln!(
        "[{:0>6}] <dim>{:0>4X}: {:0>4X}</> {}",
        time,
        addr,
        op.to_bin(),
        op_cformat(op)
    );
}

pub fn print_reg(cpu: &State, regs: &[Reg]) {
    let mut line = format!(
        " | pc: {:0>4X} | a: {:0>4X} | d: {:0>4X} |",
        cpu.pc(),
        cpu.a(),
        cpu.d()
    );
    for reg in regs {
        line.push_str(&format!(" {}: {:0>4X} |", reg, cpu.get(*reg)));
    }
    println!("{}", line);
}

pub fn print_stack(cpu: &State) {
    println!(" +-[stack]-----+");
    for (i, val) in cpu.stack().iter().enumerate() {
        println!(" | {:0>4X} : {:0>4X} | {:>6}", 256 + i, val, *val as i16);
    }
    println!(" +-------------+");
}

fn print_ram(cpu: &State, addrs: &[u16]) {
    for addr in addrs {
        println!(" | {:0>4X} : {:0>4X} |", addr, cpu.get(*addr));
    }
}
