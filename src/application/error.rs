//! Application-level errors (wraps domain errors)

use thiserror::Error;

use crate::domain::{DomainError, SyntaxError};

/// Application errors wrap domain errors and add application-level context.
#[derive(Error, Debug)]
pub enum ApplicationError {
    #[error("{0}")]
    Domain(#[from] DomainError),

    #[error("config error: {message}")]
    Config { message: String },

    #[error("{context}")]
    Io {
        context: String,
        #[source]
        source: std::io::Error,
    },
}

impl From<SyntaxError> for ApplicationError {
    fn from(e: SyntaxError) -> Self {
        ApplicationError::Domain(DomainError::Syntax(e))
    }
}

impl ApplicationError {
    pub fn is_loop_fault(&self) -> bool {
        matches!(
            self,
            ApplicationError::Domain(DomainError::LoopFault { .. })
        )
    }
}

/// Result type for application layer operations.
pub type ApplicationResult<T> = Result<T, ApplicationError>;
