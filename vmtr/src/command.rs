use crate::error::Error;
use crate::segment::Segment;
use strum::{Display, EnumString};

#[derive(Debug, Clone, Copy, PartialEq, Eq, EnumString, Display)]
#[strum(serialize_all = "lowercase")]
pub enum ArithOp {
    Add,
    Sub,
    Neg,
    Eq,
    Gt,
    Lt,
    And,
    Or,
    Not,
}

/// One classified VM instruction.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    Arith(ArithOp),
    Push(Segment, u16),
    Pop(Segment, u16),
    Label(String),
    Goto(String),
    IfGoto(String),
    Function(String, u16),
    Call(String, u16),
    Return,
}

impl Command {
    /// Parses one comment-free, non-empty line.
    pub fn parse(code: &str) -> Result<Command, Error> {
        let words: Vec<&str> = code.split_whitespace().collect();
        let (op, args) = words
            .split_first()
            .ok_or(Error::MissingOperand("command".to_string()))?;

        // Get argument by index and parse it
        // Example: arg!(0, segment) -> Segment
        macro_rules! arg {
            (@parse segment, $arg:expr) => {
                Segment::parse($arg)?
            };
            (@parse index, $arg:expr) => {
                parse_number($arg)?
            };
            (@parse count, $arg:expr) => {
                parse_number($arg)?
            };
            (@parse $what:ident, $arg:expr) => {
                parse_ident($arg)?
            };
            ($index:expr, $what:ident) => {{
                let arg = args
                    .get($index)
                    .ok_or(Error::MissingOperand(stringify!($what).to_string()))?;
                arg!(@parse $what, arg)
            }};
        }

        let (cmd, arity) = match *op {
            "push" => (Command::Push(arg!(0, segment), arg!(1, index)), 2),
            "pop" => (Command::Pop(arg!(0, segment), arg!(1, index)), 2),
            "label" => (Command::Label(arg!(0, label)), 1),
            "goto" => (Command::Goto(arg!(0, label)), 1),
            "if-goto" => (Command::IfGoto(arg!(0, label)), 1),
            "function" => (Command::Function(arg!(0, name), arg!(1, count)), 2),
            "call" => (Command::Call(arg!(0, name), arg!(1, count)), 2),
            "return" => (Command::Return, 0),
            op => match op.parse::<ArithOp>() {
                Ok(a) => (Command::Arith(a), 0),
                Err(_) => return Err(Error::UnknownCommand(op.to_string())),
            },
        };

        match args.get(arity) {
            Some(extra) => Err(Error::UnexpectedOperand(extra.to_string())),
            None => Ok(cmd),
        }
    }
}

fn parse_number(s: &str) -> Result<u16, Error> {
    s.parse::<u16>()
        .map_err(|_| Error::InvalidNumber(s.to_string()))
}

/// `$` starts every generated label, so source names may not use it.
fn parse_ident(s: &str) -> Result<String, Error> {
    match s.contains('$') {
        true => Err(Error::InvalidOperation(format!(
            "`$` is reserved for generated labels: `{}`",
            s
        ))),
        false => Ok(s.to_string()),
    }
}

/// A parsed command with the place it came from.
#[derive(Debug, Clone)]
pub struct Line {
    /// 1-based row in the source.
    pub row: usize,
    /// Source text without comments.
    pub text: String,
    pub command: Command,
}

/// One source file worth of commands.
#[derive(Debug, Clone)]
pub struct Unit {
    pub name: String,
    pub lines: Vec<Line>,
}

impl Unit {
    pub fn new(name: impl Into<String>, lines: Vec<Line>) -> Self {
        Unit {
            name: name.into(),
            lines,
        }
    }

    /// Strips comments and blank lines from `source`, then parses what remains.
    pub fn parse(name: &str, source: &str) -> Result<Unit, Error> {
        let mut lines = vec![];
        for (idx, raw) in source.lines().enumerate() {
            let code = match raw.split_once("//") {
                Some((code, _)) => code,
                None => raw,
            };
            let text = code.split_whitespace().collect::<Vec<_>>().join(" ");
            if text.is_empty() {
                continue;
            }
            let command = Command::parse(&text).map_err(|e| e.at(name, idx + 1, &text))?;
            lines.push(Line {
                row: idx + 1,
                text,
                command,
            });
        }
        Ok(Unit::new(name, lines))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    macro_rules! case {
        ($name:ident, $code:expr, $cmd:expr) => {
            #[test]
            fn $name() {
                assert_eq!(Command::parse($code).unwrap(), $cmd);
            }
        };
    }

    case!(push_constant, "push constant 7", Command::Push(Segment::Constant, 7));
    case!(pop_local, "pop local 2", Command::Pop(Segment::Local, 2));
    case!(add, "add", Command::Arith(ArithOp::Add));
    case!(not, "not", Command::Arith(ArithOp::Not));
    case!(if_goto, "if-goto LOOP", Command::IfGoto("LOOP".to_string()));
    case!(
        function,
        "function Main.fib 2",
        Command::Function("Main.fib".to_string(), 2)
    );
    case!(call, "call Math.multiply 2", Command::Call("Math.multiply".to_string(), 2));
    case!(ret, "return", Command::Return);

    macro_rules! fails {
        ($name:ident, $code:expr, $err:pat) => {
            #[test]
            fn $name() {
                let err = Command::parse($code).unwrap_err();
                assert!(matches!(err, $err), "{:?}", err);
            }
        };
    }

    fails!(unknown_command, "mul", Error::UnknownCommand(_));
    fails!(missing_segment, "push", Error::MissingOperand(_));
    fails!(missing_index, "pop local", Error::MissingOperand(_));
    fails!(missing_label, "goto", Error::MissingOperand(_));
    fails!(missing_count, "function Main.main", Error::MissingOperand(_));
    fails!(unknown_segment, "push heap 0", Error::UnknownSegment(_));
    fails!(bad_index, "push local x", Error::InvalidNumber(_));
    fails!(extra_operand, "add 1", Error::UnexpectedOperand(_));
    fails!(extra_after_push, "push constant 1 2", Error::UnexpectedOperand(_));
    fails!(reserved_in_label, "label Main$top", Error::InvalidOperation(_));
    fails!(reserved_in_function, "function EQ$1 0", Error::InvalidOperation(_));
    fails!(reserved_in_call, "call $Sys.init 0", Error::InvalidOperation(_));

    #[test]
    fn unit_strips_comments() {
        let src = "// header\n\npush constant 1   // one\n  add\n";
        let unit = Unit::parse("Main", src).unwrap();
        assert_eq!(unit.name, "Main");
        assert_eq!(unit.lines.len(), 2);
        assert_eq!(unit.lines[0].row, 3);
        assert_eq!(unit.lines[0].text, "push constant 1");
        assert_eq!(unit.lines[1].command, Command::Arith(ArithOp::Add));
    }

    #[test]
    fn unit_error_has_location() {
        let err = Unit::parse("Main", "push constant 1\n\nfoo bar\n").unwrap_err();
        match err {
            Error::At { unit, row, text, source } => {
                assert_eq!(unit, "Main");
                assert_eq!(row, 3);
                assert_eq!(text, "foo bar");
                assert!(matches!(*source, Error::UnknownCommand(_)));
            }
            e => panic!("unexpected error: {:?}", e),
        }
    }
}
