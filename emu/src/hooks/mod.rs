pub mod dump;

use crate::model::State;
use arch::op::Op;

/// Side effects run around the CPU loop. `exec` sees the state after the
/// instruction at `addr` has executed.
pub trait Hook {
    fn init(&mut self, state: State) -> State;
    fn exec(&mut self, time: u64, addr: u16, op: Op, state: State) -> State;
}
