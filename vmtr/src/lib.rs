pub mod command;
pub mod error;
pub mod frame;
pub mod label;
pub mod program;
pub mod segment;
pub mod translate;
pub mod util;

pub use command::{Command, Unit};
pub use error::Error;
pub use program::{Assembler, Options, Program};
