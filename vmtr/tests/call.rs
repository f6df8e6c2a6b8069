mod common;

use arch::reg::Reg;
use common::run_program;

const SYS: &str = "
function Sys.init 0
    push constant 3000
    pop pointer 0
    push constant 4000
    pop pointer 1
    push constant 11
    push constant 22
    call Main.add 2
label END
    goto END
";

const MAIN: &str = "
function Main.add 2
    push local 0
    push local 1
    add
    push argument 0
    add
    push argument 1
    add
    push constant 1000
    pop pointer 0
    push constant 2000
    pop pointer 1
    return
";

#[test]
fn return_restores_caller() {
    let (state, _) = run_program(&[("Main", MAIN), ("Sys", SYS)]);
    // Sys.init frame: ARG = 256, LCL = 261
    assert_eq!(state.get(Reg::LCL), 261);
    assert_eq!(state.get(Reg::ARG), 256);
    assert_eq!(state.get(Reg::THIS), 3000);
    assert_eq!(state.get(Reg::THAT), 4000);
    // two args pushed at 261, 262; result replaces them
    assert_eq!(state.get(Reg::SP), 262);
    assert_eq!(state.get(261u16), 33);
}

#[test]
fn callee_sees_frame() {
    let sys = "
function Sys.init 0
    push constant 5
    push constant 6
    push constant 7
    call Main.peek 3
label END
    goto END
";
    // Copies its arguments and the OR of its locals into statics.
    let main = "
function Main.peek 3
    push argument 0
    push argument 1
    push argument 2
    pop static 2
    pop static 1
    pop static 0
    push local 0
    push local 1
    push local 2
    or
    or
    pop static 3
    push constant 0
    return
";
    let (state, linked) = run_program(&[("Main", main), ("Sys", sys)]);
    let stat = |i: u16| state.get(linked.symbol(&format!("Main.{}", i)).unwrap());
    assert_eq!([stat(0), stat(1), stat(2)], [5, 6, 7]);
    // locals were dirty before the call
    assert_eq!(stat(3), 0);
    assert_eq!(state.get(Reg::SP), 262);
}

#[test]
fn return_without_arguments_overwrites_return_slot() {
    let sys = "
function Sys.init 0
    push constant 42
    call Main.test 0
label END
    goto END
";
    let main = "
function Main.test 2
    push argument 0
    return
";
    let (state, linked) = run_program(&[("Main", main), ("Sys", sys)]);
    // ARG of Main.test is the slot its return address was saved in
    assert_eq!(state.get(Reg::SP), 263);
    assert_eq!(state.get(261u16), 42);
    assert_eq!(state.get(262u16), linked.labels["$RET.2"]);
    assert_eq!(state.get(Reg::LCL), 261);
    assert_eq!(state.get(Reg::ARG), 256);
}

#[test]
fn return_value_replaces_argument() {
    let sys = "
function Sys.init 0
    push constant 42
    call Main.id 1
label END
    goto END
";
    let main = "
function Main.id 0
    push argument 0
    return
";
    let (state, _) = run_program(&[("Main", main), ("Sys", sys)]);
    assert_eq!(state.get(Reg::SP), 262);
    assert_eq!(state.get(261u16), 42);
}

#[test]
fn recursion() {
    let sys = "
function Sys.init 0
    push constant 10
    call Main.fib 1
label END
    goto END
";
    let main = "
// fib(n) = n < 2 ? n : fib(n - 1) + fib(n - 2)
function Main.fib 0
    push argument 0
    push constant 2
    lt
    if-goto BASE
    push argument 0
    push constant 1
    sub
    call Main.fib 1
    push argument 0
    push constant 2
    sub
    call Main.fib 1
    add
    return
label BASE
    push argument 0
    return
";
    let (state, _) = run_program(&[("Main", main), ("Sys", sys)]);
    assert_eq!(state.get(Reg::SP), 262);
    assert_eq!(state.get(261u16), 55);
}

#[test]
fn bootstrap_frame() {
    let sys = "function Sys.init 0\nlabel END\ngoto END\n";
    let (state, linked) = run_program(&[("Sys", sys)]);
    assert_eq!(state.get(Reg::SP), 261);
    assert_eq!(state.get(Reg::LCL), 261);
    assert_eq!(state.get(Reg::ARG), 256);
    assert_eq!(state.get(256u16), linked.labels["$RET.1"]);
}
