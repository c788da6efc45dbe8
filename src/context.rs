use log::debug;

use crate::{
    builtin::builtin_environment,
    environment::EnvironmentRef,
    error::LispyError,
    interpreter::evaluate,
    parser::{parse, Node},
    reader::read,
    value::Value,
};


/// An evaluation context that takes source lines or parse trees and
/// evaluates them to give values.
///
/// The context owns the global scope, so definitions made by one call are
/// visible to every later call on the same context.
pub struct EvaluationContext {
    env: EnvironmentRef,
}

impl EvaluationContext {
    pub fn new() -> Self {
        Self { env: builtin_environment() }
    }

    /// Parses and evaluates a single line of input. Only malformed input is
    /// an `Err`, evaluation failures come back as [`Value::Error`].
    pub fn evaluate_str(&mut self, input: &str) -> Result<Value, LispyError> {
        let node = parse(input).inspect_err(|error| debug!("rejected {:?}: {}", input, error))?;
        Ok(self.evaluate_node(&node))
    }

    pub fn evaluate_node(&mut self, node: &Node) -> Value {
        let expression = read(node);
        debug!("evaluating {}", expression);
        evaluate(&self.env, expression)
    }

    /// The global scope
    pub fn environment(&self) -> &EnvironmentRef {
        &self.env
    }
}

impl Default for EvaluationContext {
    fn default() -> Self {
        Self::new()
    }
}
