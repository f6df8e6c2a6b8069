pub mod error;
pub mod hooks;
pub mod link;
pub mod model;

pub use error::Error;
pub use link::{link, load_hack, parse, Linked};
pub use model::State;
