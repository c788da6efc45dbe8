use core::fmt;

use itertools::Itertools;

use crate::{builtin::Builtin, environment::EnvironmentRef};


/// Every runtime datum of the language.
///
/// Values are independently owned trees: children live directly inside
/// their parent list, so dropping a value releases everything below it.
/// The only shared piece is the environment captured by a [`Lambda`].
#[derive(Clone)]
pub enum Value {
    Number(i64),
    Error(String),
    Symbol(String),
    SExpr(Vec<Value>),
    QExpr(Vec<Value>),
    Function(Function),
}

#[derive(Clone)]
pub enum Function {
    Builtin(Builtin),
    Lambda(Lambda),
}

/// A user defined function.
///
/// `formals` holds the names still waiting for an argument, which may end
/// in the `& rest` pair. `env` carries the bindings made so far (by partial
/// application) on top of a copy of the local scope the lambda was written
/// in, and links to the global scope.
#[derive(Clone)]
pub struct Lambda {
    pub(crate) formals: Vec<String>,
    pub(crate) body: Vec<Value>,
    pub(crate) env: EnvironmentRef,
}

impl Value {
    pub fn error(message: impl Into<String>) -> Self {
        Self::Error(message.into())
    }

    pub fn symbol(name: impl Into<String>) -> Self {
        Self::Symbol(name.into())
    }

    pub fn type_name(&self) -> &'static str {
        match self {
            Self::Number(_) => "Number",
            Self::Error(_) => "Error",
            Self::Symbol(_) => "Symbol",
            Self::SExpr(_) => "S-Expression",
            Self::QExpr(_) => "Q-Expression",
            Self::Function(_) => "Function",
        }
    }

    pub fn is_error(&self) -> bool {
        matches!(self, Self::Error(_))
    }

    /// The children of an S- or Q-expression, empty for everything else
    pub fn children(&self) -> &[Value] {
        match self {
            Self::SExpr(children) | Self::QExpr(children) => children,
            _ => &[],
        }
    }

    fn children_mut(&mut self) -> &mut Vec<Value> {
        match self {
            Self::SExpr(children) | Self::QExpr(children) => children,
            other => panic!("expected a list value, found {}", other.type_name()),
        }
    }

    /// Removes the child at `index`, shifting the following children left.
    ///
    /// # Panics
    /// When `self` is not a list or `index` is out of bounds.
    pub fn pop(&mut self, index: usize) -> Value {
        self.children_mut().remove(index)
    }

    /// Extracts the child at `index` and drops the rest of the list.
    pub fn take(mut self, index: usize) -> Value {
        self.pop(index)
    }

    /// Appends all children of `other` onto `self`, in order.
    pub fn join(mut self, mut other: Value) -> Value {
        let moved = std::mem::take(other.children_mut());
        self.children_mut().extend(moved);
        self
    }

    /// Re-tags a list as a Q-expression
    pub fn into_qexpr(self) -> Value {
        match self {
            Self::SExpr(children) | Self::QExpr(children) => Self::QExpr(children),
            other => other,
        }
    }

    /// Re-tags a list as an S-expression
    pub fn into_sexpr(self) -> Value {
        match self {
            Self::SExpr(children) | Self::QExpr(children) => Self::SExpr(children),
            other => other,
        }
    }
}

impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Number(number) => write!(f, "{}", number),
            Self::Error(message) => write!(f, "Error: {}", message),
            Self::Symbol(name) => f.write_str(name),
            Self::SExpr(children) => write!(f, "({})", children.iter().join(" ")),
            Self::QExpr(children) => write!(f, "{{{}}}", children.iter().join(" ")),
            Self::Function(function) => fmt::Display::fmt(function, f),
        }
    }
}

impl fmt::Debug for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Display::fmt(self, f)
    }
}

impl fmt::Display for Function {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Builtin(_) => write!(f, "<builtin>"),
            Self::Lambda(lambda) => write!(
                f,
                "(\\ {{{}}} {{{}}})",
                lambda.formals.iter().join(" "),
                lambda.body.iter().join(" ")
            ),
        }
    }
}

impl fmt::Debug for Function {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Builtin(builtin) => write!(f, "Builtin({})", builtin.name()),
            Self::Lambda(lambda) => write!(f, "Lambda({})", lambda.formals.iter().join(" ")),
        }
    }
}
