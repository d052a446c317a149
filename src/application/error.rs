//! Application-level errors (wraps domain and lookup errors)

use thiserror::Error;

use crate::domain::DomainError;
use crate::infrastructure::traits::LookupError;

/// Application errors wrap domain errors and add application-level context.
#[derive(Error, Debug)]
pub enum ApplicationError {
    #[error("{0}")]
    Domain(#[from] DomainError),

    #[error(transparent)]
    Lookup(#[from] LookupError),

    #[error("invalid root id: {0:?}")]
    InvalidRootId(String),

    #[error("block hierarchy below {root} is deeper than {max_depth} levels")]
    DepthLimitExceeded { root: String, max_depth: usize },

    #[error("config error: {message}")]
    Config { message: String },
}

/// Result type for application layer operations.
pub type ApplicationResult<T> = Result<T, ApplicationError>;
