pub mod command;
pub mod reader;

pub use command::Command;
pub use reader::{ReaderController, Reply};
