use clap::Parser;
use color_print::cprintln;
use std::fs::File;
use std::io::Read;

use arch::reg::Reg;
use hackemu::hooks::dump::{print_reg, print_stack, Dump};
use hackemu::hooks::Hook;
use hackemu::{link, load_hack, parse, Error, Linked, State};

#[derive(Parser, Debug)]
#[clap(
    name = "Hack Emulator",
    author = "kanade-k-1228",
    version = "v1.0.0",
    about = "Emulator for the Hack ISA"
)]
struct Args {
    #[arg(short = 't', long)]
    tmax: Option<u64>,

    #[arg(short, long)]
    dump_cfg: Option<String>,

    #[arg(short = 'a', long)]
    dump_all: bool,

    /// Initial stack pointer, for programs without startup code
    #[arg(short, long)]
    sp: Option<u16>,

    /// Write the linked ROM as a `.hack` image
    #[arg(short = 'o', long)]
    hack: Option<String>,

    /// `.asm` source, or a `.hack` image
    #[arg(default_value = "main.asm")]
    input_file: String,
}

fn main() {
    let args = Args::parse();
    println!("Hack Emulator by kanade-k-1228");
    if let Err(e) = run(args) {
        cprintln!("<red,bold>error</>: {}", e);
        if let Error::SyntaxError { text, .. } = &e {
            cprintln!("      <blue>|</> {}", text);
        }
        std::process::exit(1);
    }
}

fn run(args: Args) -> Result<(), Error> {
    println!("+-----------------------------------------------+");
    println!("| {:<45} |", args.input_file);
    println!("+-----------------------------------------------+");

    // ------------------------------------------------------------------------
    // Load and link
    let source = {
        let name = &args.input_file;
        let mut file = File::open(name).map_err(|e| Error::FileOpen(name.clone(), e))?;
        let mut text = String::new();
        file.read_to_string(&mut text)
            .map_err(|e| Error::FileRead(name.clone(), e))?;
        text
    };
    let linked = match args.input_file.ends_with(".hack") {
        true => Linked {
            rom: load_hack(&source)?,
            ..Default::default()
        },
        false => link(&parse(&source)?)?,
    };
    println!(
        " * ROM: {} words, {} labels, {} variables",
        linked.rom.len(),
        linked.labels.len(),
        linked.vars.len()
    );

    if let Some(name) = &args.hack {
        std::fs::write(name, linked.to_hack()).map_err(|e| Error::FileWrite(name.clone(), e))?;
        println!("  > {}", name);
    }

    // ------------------------------------------------------------------------
    // Initialize state machine model
    let mut state = State::new(linked.rom.clone());
    if let Some(sp) = args.sp {
        state.set(Reg::SP, sp);
    }

    // ------------------------------------------------------------------------
    // Initialize hooks
    println!("[INIT]");
    let mut hooks: Vec<Box<dyn Hook>> =
        vec![Box::new(Dump::arg(args.dump_cfg, args.dump_all, &linked)?)];
    state = hooks.iter_mut().fold(state, |state, hook| hook.init(state));

    // ------------------------------------------------------------------------
    // Main loop
    let mut steps = 0;
    for time in 0..args.tmax.unwrap_or(u64::MAX) {
        let Some((addr, op)) = state.exec() else {
            break;
        };
        steps = time + 1;
        state = hooks
            .iter_mut()
            .fold(state, |state, hook| hook.exec(time, addr, op, state));
        if state.is_terminated() {
            break;
        }
    }

    // Exit
    println!("=================================================");
    match state.is_terminated() {
        true => cprintln!("<g,s>Halted</> after {} steps", steps),
        false => cprintln!("<y,s>Stopped</> at tmax = {} steps", steps),
    }
    print_reg(&state, &[Reg::SP, Reg::LCL, Reg::ARG, Reg::THIS, Reg::THAT]);
    print_stack(&state);
    Ok(())
}
