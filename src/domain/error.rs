//! Domain-level errors (no external dependencies)

use std::fmt;

use thiserror::Error;

/// Malformed formula text. Parsing never succeeds partially.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum SyntaxError {
    #[error("empty formula")]
    Empty,

    #[error("unknown token '{found}' at position {position}")]
    UnknownToken { found: String, position: usize },

    #[error("unbalanced parenthesis at position {position}")]
    UnbalancedParen { position: usize },

    #[error("unexpected '{found}' at position {position}")]
    UnexpectedToken { found: String, position: usize },

    #[error("unexpected end of formula")]
    UnexpectedEnd,

    #[error("trailing input '{found}' at position {position}")]
    TrailingInput { found: String, position: usize },

    #[error("formula nested deeper than {limit} levels at position {position}")]
    TooDeep { limit: usize, position: usize },
}

impl SyntaxError {
    /// Character offset the error points at, if any.
    pub fn position(&self) -> Option<usize> {
        match self {
            SyntaxError::UnknownToken { position, .. }
            | SyntaxError::UnbalancedParen { position }
            | SyntaxError::UnexpectedToken { position, .. }
            | SyntaxError::TrailingInput { position, .. }
            | SyntaxError::TooDeep { position, .. } => Some(*position),
            SyntaxError::Empty | SyntaxError::UnexpectedEnd => None,
        }
    }
}

/// Which defensive bound a runaway branch ran into.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Ceiling {
    Iterations(usize),
    Worlds(usize),
}

impl fmt::Display for Ceiling {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Ceiling::Iterations(n) => write!(f, "max_iterations={}", n),
            Ceiling::Worlds(n) => write!(f, "max_worlds={}", n),
        }
    }
}

/// Domain errors represent the only two ways a check can fail to reach a verdict.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum DomainError {
    #[error("syntax error: {0}")]
    Syntax(#[from] SyntaxError),

    /// A branch exceeded the defensive ceiling. This is an engine defect,
    /// never a logical verdict.
    #[error("internal loop fault: branch exceeded {ceiling} (after {iterations} rule applications, {worlds} worlds)")]
    LoopFault {
        ceiling: Ceiling,
        iterations: usize,
        worlds: usize,
    },
}

/// Result type for domain operations.
pub type DomainResult<T> = Result<T, DomainError>;
