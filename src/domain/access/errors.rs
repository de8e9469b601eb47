//! Access-specific error types.
//!
//! Access checks never fail for "not found"; that is the `invalid` outcome.
//! The only error is an unavailable store.

use crate::domain::foundation::{DomainError, ErrorCode};

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AccessError {
    /// Store could not be read, so no outcome can be given.
    Unavailable(String),
}

impl AccessError {
    pub fn unavailable(message: impl Into<String>) -> Self {
        AccessError::Unavailable(message.into())
    }

    pub fn code(&self) -> ErrorCode {
        match self {
            AccessError::Unavailable(_) => ErrorCode::DatabaseError,
        }
    }

    pub fn message(&self) -> String {
        match self {
            AccessError::Unavailable(msg) => format!("Access check unavailable: {}", msg),
        }
    }
}

impl std::fmt::Display for AccessError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.message())
    }
}

impl std::error::Error for AccessError {}

impl From<DomainError> for AccessError {
    fn from(err: DomainError) -> Self {
        AccessError::Unavailable(err.to_string())
    }
}

impl From<AccessError> for DomainError {
    fn from(err: AccessError) -> Self {
        DomainError::new(err.code(), err.message())
    }
}
