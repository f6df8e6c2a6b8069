//! Calling convention.
//!
//! `call f n` pushes a frame below the callee's `LCL`:
//!
//! ```text
//! ARG  -> arg 0 .. arg n-1
//!         return address    LCL - 5
//!         saved LCL         LCL - 4
//!         saved ARG         LCL - 3
//!         saved THIS        LCL - 2
//!         saved THAT        LCL - 1
//! LCL  -> local 0 .. local k-1
//! ```

use crate::error::Error;
use crate::label::{Fresh, Labels};
use crate::segment::Segment;
use crate::translate::{pop, push, push_d};
use arch::alu::Comp;
use arch::inst::{Addr, Inst};
use arch::op::{Dest, Jump};
use arch::reg::{Reg, STACK_BASE};

/// Frame pointer while returning.
const FRAME: Reg = Reg::R14;
/// Return address while returning.
const RETURN: Reg = Reg::R15;
/// Locals left to zero in a function prologue.
const COUNTER: Reg = Reg::R13;

/// One cell of a call frame.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Slot {
    Return,
    Saved(Reg),
}

pub struct Frame;

impl Frame {
    /// Slots in the order `call` pushes them.
    pub const LAYOUT: [Slot; 5] = [
        Slot::Return,
        Slot::Saved(Reg::LCL),
        Slot::Saved(Reg::ARG),
        Slot::Saved(Reg::THIS),
        Slot::Saved(Reg::THAT),
    ];

    pub const SIZE: u16 = Self::LAYOUT.len() as u16;

    /// Each slot with its distance below the callee's `LCL`.
    pub fn slots() -> impl DoubleEndedIterator<Item = (Slot, u16)> {
        Self::LAYOUT
            .into_iter()
            .enumerate()
            .map(|(i, slot)| (slot, Self::SIZE - i as u16))
    }
}

/// Label of a function's first instruction.
pub fn entry(function: &str) -> String {
    format!("${}", function)
}

fn literal(n: u16, what: &str) -> Result<u16, Error> {
    if n > Addr::MAX_LIT {
        return Err(Error::InvalidOperation(format!(
            "{} {} does not fit in 15 bits",
            what, n
        )));
    }
    Ok(n)
}

fn name(function: &str) -> Result<&str, Error> {
    match function {
        "" => Err(Error::MissingOperand("function name".to_string())),
        f => Ok(f),
    }
}

pub fn call(function: &str, n_args: u16, labels: &mut Labels) -> Result<Vec<Inst>, Error> {
    let function = name(function)?;
    let n_args = literal(n_args, "argument count")?;
    let ret = labels.fresh(Fresh::RET);

    let mut code = vec![];
    for (slot, _) in Frame::slots() {
        match slot {
            Slot::Return => code.extend([Inst::at(ret.as_str()), Inst::set(Dest::D, Comp::A)]),
            Slot::Saved(reg) => code.extend([Inst::at(reg), Inst::set(Dest::D, Comp::M)]),
        }
        code.extend(push_d());
    }

    // ARG = SP - n_args - SIZE
    code.extend([
        Inst::at(Reg::SP),
        Inst::set(Dest::D, Comp::M),
        Inst::at(n_args),
        Inst::set(Dest::D, Comp::DMinusA),
        Inst::at(Frame::SIZE),
        Inst::set(Dest::D, Comp::DMinusA),
        Inst::at(Reg::ARG),
        Inst::set(Dest::M, Comp::D),
    ]);
    // LCL = SP
    code.extend([
        Inst::at(Reg::SP),
        Inst::set(Dest::D, Comp::M),
        Inst::at(Reg::LCL),
        Inst::set(Dest::M, Comp::D),
    ]);
    code.extend([
        Inst::at(entry(function)),
        Inst::jump(Comp::Zero, Jump::JMP),
        Inst::label(ret),
    ]);
    Ok(code)
}

/// Entry label, then `n_vars` zeroed locals.
pub fn function(function: &str, n_vars: u16, labels: &mut Labels) -> Result<Vec<Inst>, Error> {
    let function = name(function)?;
    let n_vars = literal(n_vars, "local count")?;

    let mut code = vec![Inst::label(entry(function))];
    if n_vars == 0 {
        return Ok(code);
    }

    let init = labels.fresh(Fresh::Init);
    code.extend([
        Inst::at(n_vars),
        Inst::set(Dest::D, Comp::A),
        Inst::at(COUNTER),
        Inst::set(Dest::M, Comp::D),
        Inst::label(init.as_str()),
    ]);
    code.extend(push(Segment::Constant, 0, function)?);
    code.extend([
        Inst::at(COUNTER),
        Inst::set(Dest::MD, Comp::MMinusOne),
        Inst::at(init),
        Inst::jump(Comp::D, Jump::JGT),
    ]);
    Ok(code)
}

pub fn ret() -> Result<Vec<Inst>, Error> {
    let load = |offset: u16, into: Reg| {
        [
            Inst::at(FRAME),
            Inst::set(Dest::D, Comp::M),
            Inst::at(offset),
            Inst::set(Dest::A, Comp::DMinusA),
            Inst::set(Dest::D, Comp::M),
            Inst::at(into),
            Inst::set(Dest::M, Comp::D),
        ]
    };

    let mut code = vec![
        Inst::at(Reg::LCL),
        Inst::set(Dest::D, Comp::M),
        Inst::at(FRAME),
        Inst::set(Dest::M, Comp::D),
    ];

    // The return address is read before the return value lands on ARG 0,
    // which is the same cell when the callee takes no arguments.
    let mut restore = vec![];
    for (slot, offset) in Frame::slots().rev() {
        match slot {
            Slot::Return => code.extend(load(offset, RETURN)),
            Slot::Saved(reg) => restore.extend(load(offset, reg)),
        }
    }

    code.extend(pop(Segment::Argument, 0, "")?);
    // SP = ARG + 1
    code.extend([
        Inst::at(Reg::ARG),
        Inst::set(Dest::D, Comp::MPlusOne),
        Inst::at(Reg::SP),
        Inst::set(Dest::M, Comp::D),
    ]);
    code.extend(restore);
    code.extend([
        Inst::at(RETURN),
        Inst::set(Dest::A, Comp::M),
        Inst::jump(Comp::Zero, Jump::JMP),
    ]);
    Ok(code)
}

/// `SP = 256`, then `call entry 0`.
pub fn bootstrap(entry: &str, labels: &mut Labels) -> Result<Vec<Inst>, Error> {
    let mut code = vec![
        Inst::at(STACK_BASE),
        Inst::set(Dest::D, Comp::A),
        Inst::at(Reg::SP),
        Inst::set(Dest::M, Comp::D),
    ];
    code.extend(call(entry, 0, labels)?);
    Ok(code)
}
