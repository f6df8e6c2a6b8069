use crate::command::{ArithOp, Command};
use crate::error::Error;
use crate::frame;
use crate::label::{Fresh, Labels};
use crate::segment::{Address, Segment};
use arch::alu::Comp;
use arch::inst::Inst;
use arch::op::{Dest, Jump};
use arch::reg::Reg;

/// Scratch cell holding a `pop` destination.
const SCRATCH: Reg = Reg::R13;

/// Where the translator currently is.
#[derive(Debug, Clone, Copy)]
pub struct Context<'a> {
    /// Qualifies `static` cells.
    pub unit: &'a str,
    /// Qualifies `label`, `goto` and `if-goto` targets.
    pub function: Option<&'a str>,
}

impl<'a> Context<'a> {
    pub fn new(unit: &'a str) -> Self {
        Context {
            unit,
            function: None,
        }
    }

    pub fn within(self, function: &'a str) -> Self {
        Context {
            function: Some(function),
            ..self
        }
    }

    /// `label` as seen from the current function. Before the first
    /// `function` of a unit it lives in `{unit}$top`, which no function
    /// name can spell since source names never contain `$`.
    pub fn scope(&self, label: &str) -> Result<String, Error> {
        if label.is_empty() {
            return Err(Error::MissingOperand("label".to_string()));
        }
        match self.function {
            Some(function) => Ok(format!("{}.{}", function, label)),
            None => Ok(format!("{}$top.{}", self.unit, label)),
        }
    }
}

/// Translates one command into assembly.
pub fn translate(cmd: &Command, ctx: &Context, labels: &mut Labels) -> Result<Vec<Inst>, Error> {
    match cmd {
        Command::Arith(op) => Ok(arith(*op, labels)),
        Command::Push(seg, index) => push(*seg, *index, ctx.unit),
        Command::Pop(seg, index) => pop(*seg, *index, ctx.unit),
        Command::Label(label) => Ok(vec![Inst::label(ctx.scope(label)?)]),
        Command::Goto(label) => Ok(vec![
            Inst::at(ctx.scope(label)?),
            Inst::jump(Comp::Zero, Jump::JMP),
        ]),
        Command::IfGoto(label) => {
            let target = ctx.scope(label)?;
            let mut code = pop_d();
            code.extend([Inst::at(target), Inst::jump(Comp::D, Jump::JNE)]);
            Ok(code)
        }
        Command::Function(name, n_vars) => frame::function(name, *n_vars, labels),
        Command::Call(name, n_args) => frame::call(name, *n_args, labels),
        Command::Return => frame::ret(),
    }
}

// ----------------------------------------------------------------------------
// Stack primitives

/// `*SP = D; SP++`
pub(crate) fn push_d() -> Vec<Inst> {
    vec![
        Inst::at(Reg::SP),
        Inst::set(Dest::A, Comp::M),
        Inst::set(Dest::M, Comp::D),
        Inst::at(Reg::SP),
        Inst::set(Dest::M, Comp::MPlusOne),
    ]
}

/// `SP--; D = *SP`, leaving `A` at the popped cell.
pub(crate) fn pop_d() -> Vec<Inst> {
    vec![
        Inst::at(Reg::SP),
        Inst::set(Dest::AM, Comp::MMinusOne),
        Inst::set(Dest::D, Comp::M),
    ]
}

// ----------------------------------------------------------------------------
// Arithmetic

fn arith(op: ArithOp, labels: &mut Labels) -> Vec<Inst> {
    match op {
        ArithOp::Add => binary(Comp::DPlusM),
        ArithOp::Sub => binary(Comp::MMinusD),
        ArithOp::And => binary(Comp::DAndM),
        ArithOp::Or => binary(Comp::DOrM),
        ArithOp::Neg => unary(Comp::NegM),
        ArithOp::Not => unary(Comp::NotM),
        ArithOp::Eq => compare(labels.fresh(Fresh::EQ), Jump::JEQ),
        ArithOp::Gt => compare(labels.fresh(Fresh::GT), Jump::JGT),
        ArithOp::Lt => compare(labels.fresh(Fresh::LT), Jump::JLT),
    }
}

/// `y = pop; x = top; top = x op y`
fn binary(comp: Comp) -> Vec<Inst> {
    let mut code = pop_d();
    code.extend([
        Inst::set(Dest::A, Comp::AMinusOne),
        Inst::set(Dest::M, comp),
    ]);
    code
}

fn unary(comp: Comp) -> Vec<Inst> {
    vec![
        Inst::at(Reg::SP),
        Inst::set(Dest::A, Comp::MMinusOne),
        Inst::set(Dest::M, comp),
    ]
}

/// `top = (x - y) <jump> 0 ? -1 : 0`
fn compare(label: String, jump: Jump) -> Vec<Inst> {
    let mut code = pop_d();
    code.extend([
        Inst::set(Dest::A, Comp::AMinusOne),
        Inst::set(Dest::D, Comp::MMinusD),
        Inst::set(Dest::M, Comp::NegOne),
        Inst::at(label.as_str()),
        Inst::jump(Comp::D, jump),
        Inst::at(Reg::SP),
        Inst::set(Dest::A, Comp::MMinusOne),
        Inst::set(Dest::M, Comp::Zero),
        Inst::label(label),
    ]);
    code
}

// ----------------------------------------------------------------------------
// Memory access

pub(crate) fn push(seg: Segment, index: u16, unit: &str) -> Result<Vec<Inst>, Error> {
    let mut code = match seg.resolve(index, unit)? {
        Address::Immediate(value) => vec![Inst::at(value), Inst::set(Dest::D, Comp::A)],
        Address::Indirect(base, index) => vec![
            Inst::at(base),
            Inst::set(Dest::D, Comp::M),
            Inst::at(index),
            Inst::set(Dest::A, Comp::DPlusA),
            Inst::set(Dest::D, Comp::M),
        ],
        Address::Direct(addr) => vec![Inst::at(addr), Inst::set(Dest::D, Comp::M)],
        Address::Symbol(sym) => vec![Inst::at(sym), Inst::set(Dest::D, Comp::M)],
    };
    code.extend(push_d());
    Ok(code)
}

pub(crate) fn pop(seg: Segment, index: u16, unit: &str) -> Result<Vec<Inst>, Error> {
    // The destination goes to SCRATCH first: computing it needs D and A,
    // which the pop itself overwrites.
    let mut code = match seg.resolve(index, unit)? {
        Address::Immediate(value) => {
            return Err(Error::InvalidOperation(format!(
                "cannot pop into constant {}",
                value
            )))
        }
        Address::Indirect(base, index) => vec![
            Inst::at(base),
            Inst::set(Dest::D, Comp::M),
            Inst::at(index),
            Inst::set(Dest::D, Comp::DPlusA),
        ],
        Address::Direct(addr) => vec![Inst::at(addr), Inst::set(Dest::D, Comp::A)],
        Address::Symbol(sym) => vec![Inst::at(sym), Inst::set(Dest::D, Comp::A)],
    };
    code.extend([Inst::at(SCRATCH), Inst::set(Dest::M, Comp::D)]);
    code.extend(pop_d());
    code.extend([
        Inst::at(SCRATCH),
        Inst::set(Dest::A, Comp::M),
        Inst::set(Dest::M, Comp::D),
    ]);
    Ok(code)
}
