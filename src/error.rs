use core::{error::Error, fmt};

/// Errors raised at the parse boundary, before any evaluation happens.
///
/// Evaluation errors are never reported through this type, they are
/// ordinary [`Value::Error`](crate::Value::Error) values.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LispyError {
    UnexpectedCharacter { offset: usize, found: String },
    UnexpectedToken { offset: usize, found: String, expected: &'static str },
    UnexpectedEnd { offset: usize, expected: &'static str },
    TrailingInput { offset: usize, found: String },
    TooDeep { offset: usize, limit: usize },
}

impl LispyError {
    pub fn offset(&self) -> usize {
        match self {
            Self::UnexpectedCharacter { offset, .. }
            | Self::UnexpectedToken { offset, .. }
            | Self::UnexpectedEnd { offset, .. }
            | Self::TrailingInput { offset, .. }
            | Self::TooDeep { offset, .. } => *offset,
        }
    }

    pub fn kind(&self) -> &'static str {
        match self {
            Self::UnexpectedCharacter { .. } => "UnexpectedCharacter",
            Self::UnexpectedToken { .. } => "UnexpectedToken",
            Self::UnexpectedEnd { .. } => "UnexpectedEnd",
            Self::TrailingInput { .. } => "TrailingInput",
            Self::TooDeep { .. } => "TooDeep",
        }
    }
}

impl fmt::Display for LispyError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        // Columns are 1-based, the input is always a single line
        write!(f, "<stdin>:1:{}: error: ", self.offset() + 1)?;
        match self {
            Self::UnexpectedCharacter { found, .. } => write!(f, "unexpected character '{}'", found),
            Self::UnexpectedToken { found, expected, .. } => write!(f, "unexpected '{}', expected {}", found, expected),
            Self::UnexpectedEnd { expected, .. } => write!(f, "unexpected end of input, expected {}", expected),
            Self::TrailingInput { found, .. } => write!(f, "unexpected '{}', expected end of input", found),
            Self::TooDeep { limit, .. } => write!(f, "expressions nested more than {} levels deep", limit),
        }
    }
}

impl Error for LispyError {}
