use log::trace;

use crate::{
    environment::{Environment, EnvironmentRef},
    value::{Function, Lambda, Value},
};

const VARIADIC_FORMAT_ERROR: &str = "Function format invalid. Symbol '&' not followed by single symbol.";


fn evaluate_sexpr(env: &EnvironmentRef, children: Vec<Value>) -> Value {
    // Every child is reduced before anything is combined, the first error
    // (left to right) replaces the whole expression
    let mut expression = Value::SExpr(children.into_iter()
        .map(|child| evaluate(env, child))
        .collect());

    if let Some(index) = expression.children().iter().position(Value::is_error) {
        return expression.take(index);
    }

    match expression.children().len() {
        0 => return expression,
        1 => return expression.take(0),
        _ => {}
    }

    match expression.pop(0) {
        Value::Function(function) => apply(env, function, expression),
        other => Value::error(format!(
            "S-expression starts with incorrect type! Got {}, Expected Function.",
            other.type_name()
        )),
    }
}

/// Applies `function` to the S-expression of already evaluated `args`.
pub fn apply(env: &EnvironmentRef, function: Function, args: Value) -> Value {
    match function {
        Function::Builtin(builtin) => builtin.apply(env, args),
        Function::Lambda(lambda) => call(lambda, args),
    }
}

// Binds arguments to formals one by one in a fresh copy of the lambda's
// scope. A `&` formal collects every remaining argument into a Q-expression
// bound to the single formal after it. Running out of arguments early
// yields a new lambda over the formals still unbound.
fn call(lambda: Lambda, mut args: Value) -> Value {
    let Lambda { mut formals, body, env } = lambda;
    let scope = Environment::fork(&env);

    let given = args.children().len();
    let total = formals.len();
    trace!("calling lambda over {{{}}} with {} arguments", formals.join(" "), given);

    while !args.children().is_empty() {
        if formals.is_empty() {
            return Value::error(format!(
                "Function passed too many arguments. Got {}, Expected {}.",
                given, total
            ));
        }

        let formal = formals.remove(0);
        if formal == "&" {
            if formals.len() != 1 {
                return Value::error(VARIADIC_FORMAT_ERROR);
            }
            let rest = formals.remove(0);
            let remaining = std::mem::replace(&mut args, Value::SExpr(Vec::new()));
            Environment::put(&scope, &rest, remaining.into_qexpr());
            break;
        }

        Environment::put(&scope, &formal, args.pop(0));
    }

    // Arguments ran out right before a variadic tail, it collects nothing
    if formals.first().is_some_and(|formal| formal == "&") {
        if formals.len() != 2 {
            return Value::error(VARIADIC_FORMAT_ERROR);
        }
        let rest = formals.remove(1);
        formals.clear();
        Environment::put(&scope, &rest, Value::QExpr(Vec::new()));
    }

    if formals.is_empty() {
        evaluate(&scope, Value::SExpr(body))
    } else {
        Value::Function(Function::Lambda(Lambda { formals, body, env: scope }))
    }
}

/// Reduces `value` in `env`.
///
/// Symbols are looked up, S-expressions are evaluated and applied, and
/// everything else evaluates to itself.
pub fn evaluate(env: &EnvironmentRef, value: Value) -> Value {
    match value {
        Value::Symbol(name) => Environment::get(env, &name),
        Value::SExpr(children) => evaluate_sexpr(env, children),
        other => other,
    }
}
