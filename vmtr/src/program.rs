use crate::command::{Command, Unit};
use crate::error::Error;
use crate::frame;
use crate::label::Labels;
use crate::translate::{translate, Context};
use arch::inst::Inst;

/// Entry text of the startup code.
pub const BOOTSTRAP: &str = "BOOTSTRAP";

#[derive(Debug, Clone)]
pub struct Options {
    /// Emit `SP = 256; call <entry> 0` before the first unit.
    pub bootstrap: bool,
    pub entry: String,
}

impl Default for Options {
    fn default() -> Self {
        Options {
            bootstrap: true,
            entry: "Sys.init".to_string(),
        }
    }
}

/// Where one source line landed in the output.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Entry {
    /// `None` for the bootstrap.
    pub unit: Option<String>,
    pub row: usize,
    pub text: String,
    /// Index of the first output line, labels included.
    pub line: usize,
    /// Number of output lines.
    pub len: usize,
}

#[derive(Debug, Default)]
pub struct Program {
    pub code: Vec<Inst>,
    pub entries: Vec<Entry>,
}

impl Program {
    /// Each entry with the instructions it produced.
    pub fn blocks(&self) -> impl Iterator<Item = (&Entry, &[Inst])> {
        self.entries
            .iter()
            .map(move |e| (e, &self.code[e.line..e.line + e.len]))
    }

    /// Number of ROM words the program occupies.
    pub fn rom_size(&self) -> usize {
        self.code.iter().filter(|i| !i.is_label()).count()
    }
}

pub struct Assembler {
    options: Options,
    labels: Labels,
    program: Program,
}

impl Assembler {
    pub fn new(options: Options) -> Self {
        Assembler {
            options,
            labels: Labels::new(),
            program: Program::default(),
        }
    }

    /// Translates `units` in order into one program. Stops at the first error.
    pub fn assemble(mut self, units: &[Unit]) -> Result<Program, Error> {
        if self.options.bootstrap {
            let entry = self.options.entry.clone();
            let code = frame::bootstrap(&entry, &mut self.labels)
                .map_err(|e| e.at(BOOTSTRAP, 0, &format!("call {} 0", entry)))?;
            self.emit(None, 0, BOOTSTRAP, code);
        }

        for unit in units {
            let mut ctx = Context::new(&unit.name);
            for line in &unit.lines {
                if let Command::Function(name, _) = &line.command {
                    ctx = ctx.within(name);
                }
                let code = translate(&line.command, &ctx, &mut self.labels)
                    .map_err(|e| e.at(&unit.name, line.row, &line.text))?;
                self.emit(Some(&unit.name), line.row, &line.text, code);
            }
        }

        Ok(self.program)
    }

    fn emit(&mut self, unit: Option<&str>, row: usize, text: &str, code: Vec<Inst>) {
        self.program.entries.push(Entry {
            unit: unit.map(str::to_string),
            row,
            text: text.to_string(),
            line: self.program.code.len(),
            len: code.len(),
        });
        self.program.code.extend(code);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;

    fn bare() -> Options {
        Options {
            bootstrap: false,
            ..Options::default()
        }
    }

    #[test]
    fn entries_index_output_lines() {
        let unit = Unit::parse("Main", "push constant 1\nlabel L\npush constant 2\nadd\n").unwrap();
        let program = Assembler::new(bare()).assemble(&[unit]).unwrap();
        let lines: Vec<_> = program.entries.iter().map(|e| e.line).collect();
        assert_eq!(lines, [0, 7, 8, 15]);
        assert_eq!(program.code.len(), 20);
        assert_eq!(program.rom_size(), 19);
        assert_eq!(program.entries[1].text, "label L");
        assert_eq!(program.entries[1].unit.as_deref(), Some("Main"));
    }

    #[test]
    fn bootstrap_comes_first() {
        let unit = Unit::parse("Sys", "function Sys.init 0\nlabel END\ngoto END\n").unwrap();
        let program = Assembler::new(Options::default()).assemble(&[unit]).unwrap();
        let first = &program.entries[0];
        assert_eq!(first.text, BOOTSTRAP);
        assert_eq!(first.unit, None);
        assert_eq!(first.line, 0);
        assert_eq!(program.entries[1].line, first.len);
        assert!(program.code.contains(&Inst::label("Sys.init.END")));
    }

    #[test]
    fn custom_entry() {
        let options = Options {
            bootstrap: true,
            entry: "Main.main".to_string(),
        };
        let program = Assembler::new(options).assemble(&[]).unwrap();
        assert!(program.code.contains(&Inst::at("$Main.main")));
    }

    #[test]
    fn context_resets_per_unit() {
        let a = Unit::parse("A", "function A.f 0\nlabel X\n").unwrap();
        let b = Unit::parse("B", "label X\nfunction B.g 0\nlabel X\n").unwrap();
        let program = Assembler::new(bare()).assemble(&[a, b]).unwrap();
        let labels: Vec<_> = program.code.iter().filter(|i| i.is_label()).collect();
        assert_eq!(
            labels,
            [
                &Inst::label("$A.f"),
                &Inst::label("A.f.X"),
                &Inst::label("B$top.X"),
                &Inst::label("$B.g"),
                &Inst::label("B.g.X"),
            ]
        );
    }

    #[test]
    fn labels_are_unique_across_units() {
        let src = "function F.f 2\npush constant 1\npush constant 2\neq\ncall F.f 0\nlt\ngt\nreturn\n";
        let a = Unit::parse("A", &src.replace('F', "A")).unwrap();
        let b = Unit::parse("B", &src.replace('F', "B")).unwrap();
        let program = Assembler::new(Options::default()).assemble(&[a, b]).unwrap();
        let mut seen = HashSet::new();
        for inst in &program.code {
            if let Inst::Label(name) = inst {
                assert!(seen.insert(name.clone()), "duplicate label {}", name);
            }
        }
    }

    #[test]
    fn unit_level_label_does_not_shadow_function_label() {
        let unit = Unit::parse("Main", "label f.L\nfunction Main.f 0\nlabel L\n").unwrap();
        let program = Assembler::new(bare()).assemble(&[unit]).unwrap();
        let labels: Vec<_> = program.code.iter().filter(|i| i.is_label()).collect();
        assert_eq!(
            labels,
            [
                &Inst::label("Main$top.f.L"),
                &Inst::label("$Main.f"),
                &Inst::label("Main.f.L"),
            ]
        );
    }

    #[test]
    fn error_has_location() {
        let a = Unit::parse("A", "push constant 1\n").unwrap();
        let b = Unit::parse("B", "push constant 1\n\npop constant 0\n").unwrap();
        let err = Assembler::new(bare()).assemble(&[a, b]).unwrap_err();
        match err {
            Error::At { unit, row, text, source } => {
                assert_eq!(unit, "B");
                assert_eq!(row, 3);
                assert_eq!(text, "pop constant 0");
                assert!(matches!(*source, Error::InvalidOperation(_)));
            }
            e => panic!("unexpected error: {:?}", e),
        }
    }
}
