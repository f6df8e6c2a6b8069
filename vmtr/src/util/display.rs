use crate::program::Program;
use color_print::cprintln;

/// The `.asm` output: each entry as a comment, then its instructions.
pub fn render_asm(program: &Program) -> String {
    let mut out = String::new();
    for (entry, code) in program.blocks() {
        out.push_str(&format!("// {:<30} | LINE {}\n", entry.text, entry.line));
        for inst in code {
            out.push_str(&format!("{}\n", inst));
        }
        out.push('\n');
    }
    out
}

/// One line per entry with the index of its first output line.
pub fn render_summary(program: &Program) -> String {
    program
        .entries
        .iter()
        .map(|e| format!("{:<30} | LINE {}\n", e.text, e.line))
        .collect()
}

pub fn dump(program: &Program) {
    println!("+-------+--------------------------------------------------------------");
    for (entry, code) in program.blocks() {
        match &entry.unit {
            Some(unit) => cprintln!(
                "+-------+ <s>{}</> <dim>{}:{}</>",
                entry.text,
                unit,
                entry.row
            ),
            None => cprintln!("+-------+ <r,s>{}</>", entry.text),
        }
        for (i, inst) in code.iter().enumerate() {
            cprintln!("| {:>5} : {}", entry.line + i, inst.cformat());
        }
    }
    println!("+-------+--------------------------------------------------------------");
}
