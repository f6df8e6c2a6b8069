#![allow(dead_code)]

use arch::alu::Comp;
use arch::inst::Inst;
use arch::op::Jump;
use arch::reg::Reg;
use hackemu::{link, Linked, State};
use vmtr::{Assembler, Options, Unit};

pub const TMAX: u64 = 1_000_000;

/// Base pointers preset for programs run without startup code.
pub const LCL: u16 = 300;
pub const ARG: u16 = 400;
pub const THIS: u16 = 3000;
pub const THAT: u16 = 3010;

pub fn units(sources: &[(&str, &str)]) -> Vec<Unit> {
    sources
        .iter()
        .map(|(name, src)| Unit::parse(name, src).unwrap())
        .collect()
}

fn boot(code: Vec<Inst>) -> (State, Linked) {
    let linked = link(&code).unwrap();
    let state = State::new(linked.rom.clone());
    (state, linked)
}

fn finish(state: &mut State) {
    state.run(TMAX);
    assert!(state.is_terminated(), "program did not halt");
}

/// Runs `src` as straight-line code with the stack at 256 and fixed
/// segment bases.
pub fn run_bare(sources: &[(&str, &str)]) -> (State, Linked) {
    let options = Options {
        bootstrap: false,
        ..Options::default()
    };
    let mut code = Assembler::new(options).assemble(&units(sources)).unwrap().code;
    code.extend([
        Inst::label("END"),
        Inst::at("END"),
        Inst::jump(Comp::Zero, Jump::JMP),
    ]);
    let (mut state, linked) = boot(code);
    state.set(Reg::SP, 256);
    state.set(Reg::LCL, LCL);
    state.set(Reg::ARG, ARG);
    state.set(Reg::THIS, THIS);
    state.set(Reg::THAT, THAT);
    finish(&mut state);
    (state, linked)
}

/// Runs a program with startup code. RAM above the stack base starts dirty.
pub fn run_program(sources: &[(&str, &str)]) -> (State, Linked) {
    let program = Assembler::new(Options::default())
        .assemble(&units(sources))
        .unwrap();
    let (mut state, linked) = boot(program.code);
    state.fill(256, 2048, 0xBEEF);
    finish(&mut state);
    (state, linked)
}

/// Stack of a single-unit bare run.
pub fn stack_of(src: &str) -> Vec<u16> {
    let (state, _) = run_bare(&[("Main", src)]);
    state.stack().to_vec()
}
