//! Terminal presentation layer.

pub mod commands;
pub mod terminal;

pub use commands::ClientCommand;
pub use terminal::{run, TerminalInput};
