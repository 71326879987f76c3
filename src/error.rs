//! Request-level errors.

use thiserror::Error;

/// Why a search or path request could not be answered.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ResolveError {
    /// The literal path does not exist, or no search combination was produced.
    #[error("{0}")]
    NotFound(String),

    /// A path was requested together with search parameters.
    #[error("cannot combine search parameters with a node path")]
    Conflict,

    /// Invalid multi-value syntax or an otherwise unusable query.
    #[error("malformed query: {0}")]
    Malformed(String),
}

pub type ResolveResult<T> = Result<T, ResolveError>;
