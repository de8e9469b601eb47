//! Member-specific error types.
//!
//! # HTTP Status Mapping
//!
//! | Error | HTTP Status |
//! |-------|-------------|
//! | NotFound | 404 |
//! | IntakeExists | 409 |
//! | ValidationFailed | 400 |
//! | InvalidWindow | 400 |
//! | Infrastructure | 500 |

use crate::domain::foundation::{DomainError, ErrorCode, MemberId, ValidationError};
use crate::domain::subscription::SubscriptionError;

/// Member-specific errors.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MemberError {
    /// Member was not found.
    NotFound(MemberId),

    /// Create-only intake record already on file.
    IntakeExists { member_id: MemberId, form: String },

    /// Validation failed.
    ValidationFailed { field: String, message: String },

    /// Subscription window ends before it starts.
    InvalidWindow(String),

    /// Infrastructure error.
    Infrastructure(String),
}

impl MemberError {
    pub fn not_found(id: MemberId) -> Self {
        MemberError::NotFound(id)
    }

    pub fn intake_exists(member_id: MemberId, form: impl Into<String>) -> Self {
        MemberError::IntakeExists {
            member_id,
            form: form.into(),
        }
    }

    pub fn validation(field: impl Into<String>, message: impl Into<String>) -> Self {
        MemberError::ValidationFailed {
            field: field.into(),
            message: message.into(),
        }
    }

    pub fn infrastructure(message: impl Into<String>) -> Self {
        MemberError::Infrastructure(message.into())
    }

    /// Returns the error code for this error.
    pub fn code(&self) -> ErrorCode {
        match self {
            MemberError::NotFound(_) => ErrorCode::MemberNotFound,
            MemberError::IntakeExists { .. } => ErrorCode::IntakeRecordExists,
            MemberError::ValidationFailed { .. } => ErrorCode::ValidationFailed,
            MemberError::InvalidWindow(_) => ErrorCode::InvalidDateRange,
            MemberError::Infrastructure(_) => ErrorCode::DatabaseError,
        }
    }

    /// Returns a user-friendly error message.
    pub fn message(&self) -> String {
        match self {
            MemberError::NotFound(id) => format!("Member not found: {}", id),
            MemberError::IntakeExists { member_id, form } => {
                format!("Member {} already has a {} on file", member_id, form)
            }
            MemberError::ValidationFailed { field, message } => {
                format!("Validation failed for '{}': {}", field, message)
            }
            MemberError::InvalidWindow(msg) => msg.clone(),
            MemberError::Infrastructure(msg) => format!("Error: {}", msg),
        }
    }
}

impl std::fmt::Display for MemberError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.message())
    }
}

impl std::error::Error for MemberError {}

impl From<ValidationError> for MemberError {
    fn from(err: ValidationError) -> Self {
        MemberError::ValidationFailed {
            field: err.field().to_string(),
            message: err.to_string(),
        }
    }
}

impl From<DomainError> for MemberError {
    fn from(err: DomainError) -> Self {
        match err.code {
            ErrorCode::ValidationFailed
            | ErrorCode::EmptyField
            | ErrorCode::OutOfRange
            | ErrorCode::InvalidFormat => MemberError::ValidationFailed {
                field: err
                    .details
                    .get("field")
                    .cloned()
                    .unwrap_or_else(|| "unknown".to_string()),
                message: err.message,
            },
            _ => MemberError::Infrastructure(err.to_string()),
        }
    }
}

impl From<SubscriptionError> for MemberError {
    fn from(err: SubscriptionError) -> Self {
        match err {
            SubscriptionError::MemberNotFound(id) => MemberError::NotFound(id),
            SubscriptionError::InvalidWindow { .. } => MemberError::InvalidWindow(err.message()),
            SubscriptionError::ValidationFailed { field, message } => {
                MemberError::ValidationFailed { field, message }
            }
            other => MemberError::Infrastructure(other.message()),
        }
    }
}

impl From<MemberError> for DomainError {
    fn from(err: MemberError) -> Self {
        DomainError::new(err.code(), err.message())
    }
}
