mod builtin;
mod config;
mod context;
mod environment;
mod error;
mod interpreter;
mod parser;
mod reader;
mod repl;
mod value;

#[cfg(test)]
mod test_utils;

pub use builtin::Builtin;
pub use config::Config;
pub use context::EvaluationContext;
pub use environment::{Environment, EnvironmentRef};
pub use error::LispyError;
pub use interpreter::{apply, evaluate};
pub use parser::{parse, Node};
pub use reader::read;
pub use repl::{Editor, LineSource, Lines, Repl};
pub use value::{Function, Lambda, Value};
