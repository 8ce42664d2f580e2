//! Domain error model.

use thiserror::Error;

/// Result alias for fallible domain operations.
pub type DomainResult<T> = Result<T, DomainError>;

/// Deterministic domain-level failure.
///
/// Only failures that are a property of the input belong here (bad values,
/// unparseable identifiers). Infrastructure and transport faults live in
/// their own layers.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum DomainError {
    /// Input failed a structural or semantic check.
    #[error("invalid input: {0}")]
    Validation(String),

    /// An identifier could not be parsed.
    #[error("malformed id: {0}")]
    InvalidId(String),
}

impl DomainError {
    pub fn validation(msg: impl Into<String>) -> Self {
        Self::Validation(msg.into())
    }

    pub fn invalid_id(msg: impl Into<String>) -> Self {
        Self::InvalidId(msg.into())
    }
}
