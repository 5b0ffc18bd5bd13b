mod command;
mod error;
mod parser;
mod span;

pub use command::*;
pub use error::*;
pub use parser::*;
pub use span::*;
