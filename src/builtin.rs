use log::trace;

use crate::{
    environment::{Environment, EnvironmentRef},
    interpreter::evaluate,
    value::{Function, Lambda, Value},
};

/// The primitive operations of the language.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Builtin {
    List,
    Head,
    Tail,
    Eval,
    Join,
    Add,
    Sub,
    Mul,
    Div,
    Def,
    Put,
    Lambda,
}

impl Builtin {
    pub const ALL: [Builtin; 12] = [
        Self::List, Self::Head, Self::Tail, Self::Eval, Self::Join,
        Self::Add, Self::Sub, Self::Mul, Self::Div,
        Self::Def, Self::Put, Self::Lambda,
    ];

    /// The symbol the builtin is bound to in the global scope
    pub fn name(self) -> &'static str {
        match self {
            Self::List => "list",
            Self::Head => "head",
            Self::Tail => "tail",
            Self::Eval => "eval",
            Self::Join => "join",
            Self::Add => "+",
            Self::Sub => "-",
            Self::Mul => "*",
            Self::Div => "/",
            Self::Def => "def",
            Self::Put => "=",
            Self::Lambda => "\\",
        }
    }

    /// Runs the primitive. `args` is the S-expression of evaluated
    /// arguments and `env` the scope the call happens in.
    pub fn apply(self, env: &EnvironmentRef, args: Value) -> Value {
        trace!("applying builtin '{}' to {}", self.name(), args);
        match self {
            Self::List => builtin_list(args),
            Self::Head => builtin_head(args),
            Self::Tail => builtin_tail(args),
            Self::Eval => builtin_eval(env, args),
            Self::Join => builtin_join(args),
            Self::Add | Self::Sub | Self::Mul | Self::Div => builtin_op(self, args),
            Self::Def | Self::Put => builtin_var(self, env, args),
            Self::Lambda => builtin_lambda(env, args),
        }
    }
}

// Guards in the order arguments are validated: count, type, contents.
// Each returns the error value from the enclosing builtin.
macro_rules! check_count {
    ($name:expr, $args:expr, $expected:expr) => {{
        let got = $args.children().len();
        if got != $expected {
            return Value::error(format!(
                "Function '{}' passed incorrect number of arguments. Got {}, Expected {}.",
                $name, got, $expected
            ));
        }
    }};
}

macro_rules! check_type {
    ($name:expr, $args:expr, $index:expr, $pattern:pat, $expected:expr) => {{
        let argument = &$args.children()[$index];
        if !matches!(argument, $pattern) {
            return Value::error(format!(
                "Function '{}' passed incorrect type for argument {}. Got {}, Expected {}.",
                $name, $index, argument.type_name(), $expected
            ));
        }
    }};
}

macro_rules! check_not_empty {
    ($name:expr, $args:expr, $index:expr) => {{
        if $args.children()[$index].children().is_empty() {
            return Value::error(format!("Function '{}' passed {{}} for argument {}.", $name, $index));
        }
    }};
}

fn builtin_list(args: Value) -> Value {
    args.into_qexpr()
}

fn builtin_head(args: Value) -> Value {
    check_count!("head", args, 1);
    check_type!("head", args, 0, Value::QExpr(_), "Q-Expression");
    check_not_empty!("head", args, 0);

    let list = args.take(0);
    Value::QExpr(vec![list.take(0)])
}

fn builtin_tail(args: Value) -> Value {
    check_count!("tail", args, 1);
    check_type!("tail", args, 0, Value::QExpr(_), "Q-Expression");
    check_not_empty!("tail", args, 0);

    let mut list = args.take(0);
    list.pop(0);
    list
}

fn builtin_eval(env: &EnvironmentRef, args: Value) -> Value {
    check_count!("eval", args, 1);
    check_type!("eval", args, 0, Value::QExpr(_), "Q-Expression");

    evaluate(env, args.take(0).into_sexpr())
}

fn builtin_join(mut args: Value) -> Value {
    for index in 0..args.children().len() {
        check_type!("join", args, index, Value::QExpr(_), "Q-Expression");
    }
    if args.children().is_empty() {
        return Value::QExpr(Vec::new());
    }

    let mut joined = args.pop(0);
    while !args.children().is_empty() {
        joined = joined.join(args.pop(0));
    }
    joined
}

fn builtin_op(op: Builtin, args: Value) -> Value {
    if args.children().is_empty() {
        return Value::error(format!(
            "Function '{}' passed incorrect number of arguments. Got 0, Expected at least 1.",
            op.name()
        ));
    }

    let mut numbers = Vec::with_capacity(args.children().len());
    for argument in args.children() {
        match argument {
            Value::Number(number) => numbers.push(*number),
            _ => return Value::error("Cannot operate on non-number!"),
        }
    }

    let (first, rest) = (numbers[0], &numbers[1..]);
    if op == Builtin::Sub && rest.is_empty() {
        return first.checked_neg().map_or_else(overflow, Value::Number);
    }

    let mut result = first;
    for &number in rest {
        let next = match op {
            Builtin::Add => result.checked_add(number),
            Builtin::Sub => result.checked_sub(number),
            Builtin::Mul => result.checked_mul(number),
            Builtin::Div if number == 0 => return Value::error("Division by zero!"),
            Builtin::Div => result.checked_div(number),
            _ => unreachable!("builtin_op only handles arithmetic"),
        };
        match next {
            Some(next) => result = next,
            None => return overflow(),
        }
    }
    Value::Number(result)
}

fn overflow() -> Value {
    Value::error("Integer overflow!")
}

// Shared by `def` (global scope) and `=` (current scope)
fn builtin_var(op: Builtin, env: &EnvironmentRef, mut args: Value) -> Value {
    let name = op.name();
    if args.children().is_empty() {
        return Value::error(format!(
            "Function '{}' passed incorrect number of arguments. Got 0, Expected at least 1.",
            name
        ));
    }
    check_type!(name, args, 0, Value::QExpr(_), "Q-Expression");

    let symbols = args.pop(0);
    let mut names = Vec::with_capacity(symbols.children().len());
    for symbol in symbols.children() {
        match symbol {
            Value::Symbol(symbol) => names.push(symbol.clone()),
            other => return Value::error(format!(
                "Function '{}' cannot define non-symbol. Got {}, Expected Symbol.",
                name, other.type_name()
            )),
        }
    }

    let values = args.children().len();
    if names.len() != values {
        return Value::error(format!(
            "Function '{}' passed too many arguments for symbols. Got {}, Expected {}.",
            name, values, names.len()
        ));
    }

    for symbol in names {
        let value = args.pop(0);
        match op {
            Builtin::Def => Environment::define(env, &symbol, value),
            _ => Environment::put(env, &symbol, value),
        }
    }
    Value::SExpr(Vec::new())
}

fn builtin_lambda(env: &EnvironmentRef, args: Value) -> Value {
    check_count!("\\", args, 2);
    check_type!("\\", args, 0, Value::QExpr(_), "Q-Expression");
    check_type!("\\", args, 1, Value::QExpr(_), "Q-Expression");

    let mut formals = Vec::with_capacity(args.children()[0].children().len());
    for formal in args.children()[0].children() {
        match formal {
            Value::Symbol(symbol) => formals.push(symbol.clone()),
            other => return Value::error(format!(
                "Cannot define non-symbol. Got {}, Expected Symbol.",
                other.type_name()
            )),
        }
    }

    let Value::QExpr(body) = args.take(1) else {
        unreachable!("argument 1 was checked to be a Q-expression")
    };
    Value::Function(Function::Lambda(Lambda {
        formals,
        body,
        env: Environment::capture(env),
    }))
}

/// The global scope with every builtin bound to its name
pub(crate) fn builtin_environment() -> EnvironmentRef {
    let env = Environment::root();
    for builtin in Builtin::ALL {
        Environment::put(&env, builtin.name(), Value::Function(Function::Builtin(builtin)));
    }
    env
}
