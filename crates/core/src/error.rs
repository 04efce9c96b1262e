//! Domain error model.

use thiserror::Error;

/// Result type used across the domain layer.
pub type DomainResult<T> = Result<T, DomainError>;

/// Domain-level error.
///
/// All failures here are deterministic: the same bad input fails the same
/// way every time, before any partial output is produced. There is no
/// retry or partial-success state.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum DomainError {
    /// A generator or query parameter was malformed (impossible date window,
    /// empty magnitude range, zero-quantity flow movement).
    #[error("invalid parameter: {0}")]
    InvalidParameter(String),

    /// A balance query named a product absent from an explicit registry.
    #[error("unknown entity: {0}")]
    UnknownEntity(String),

    /// An identifier was invalid (e.g. parse failure).
    #[error("invalid identifier: {0}")]
    InvalidId(String),
}

impl DomainError {
    pub fn invalid_parameter(msg: impl Into<String>) -> Self {
        Self::InvalidParameter(msg.into())
    }

    pub fn unknown_entity(msg: impl Into<String>) -> Self {
        Self::UnknownEntity(msg.into())
    }

    pub fn invalid_id(msg: impl Into<String>) -> Self {
        Self::InvalidId(msg.into())
    }
}
