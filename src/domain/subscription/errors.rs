//! Subscription-specific error types.
//!
//! # HTTP Status Mapping
//!
//! | Error | HTTP Status |
//! |-------|-------------|
//! | MemberNotFound | 404 |
//! | NotFound | 404 |
//! | InvalidWindow | 400 |
//! | ValidationFailed | 400 |
//! | Infrastructure | 500 |

use crate::domain::foundation::{DomainError, ErrorCode, MemberId, Timestamp, ValidationError};

/// Subscription-specific errors.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SubscriptionError {
    /// The member being renewed does not exist.
    MemberNotFound(MemberId),

    /// No subscription exists for this member.
    NotFound(MemberId),

    /// Walk-in window ends before it starts.
    InvalidWindow { start: Timestamp, end: Timestamp },

    /// Validation failed.
    ValidationFailed { field: String, message: String },

    /// Store unavailable or write failed.
    Infrastructure(String),
}

impl SubscriptionError {
    pub fn member_not_found(id: MemberId) -> Self {
        SubscriptionError::MemberNotFound(id)
    }

    pub fn not_found(id: MemberId) -> Self {
        SubscriptionError::NotFound(id)
    }

    pub fn invalid_window(start: Timestamp, end: Timestamp) -> Self {
        SubscriptionError::InvalidWindow { start, end }
    }

    pub fn validation(field: impl Into<String>, message: impl Into<String>) -> Self {
        SubscriptionError::ValidationFailed {
            field: field.into(),
            message: message.into(),
        }
    }

    pub fn infrastructure(message: impl Into<String>) -> Self {
        SubscriptionError::Infrastructure(message.into())
    }

    /// Returns the error code for this error.
    pub fn code(&self) -> ErrorCode {
        match self {
            SubscriptionError::MemberNotFound(_) => ErrorCode::MemberNotFound,
            SubscriptionError::NotFound(_) => ErrorCode::SubscriptionNotFound,
            SubscriptionError::InvalidWindow { .. } => ErrorCode::InvalidDateRange,
            SubscriptionError::ValidationFailed { .. } => ErrorCode::ValidationFailed,
            SubscriptionError::Infrastructure(_) => ErrorCode::DatabaseError,
        }
    }

    /// Returns a user-friendly error message.
    pub fn message(&self) -> String {
        match self {
            SubscriptionError::MemberNotFound(id) => format!("Member not found: {}", id),
            SubscriptionError::NotFound(id) => format!("No subscription found for member: {}", id),
            SubscriptionError::InvalidWindow { start, end } => format!(
                "Subscription end {} is before start {}",
                end.as_datetime().to_rfc3339(),
                start.as_datetime().to_rfc3339()
            ),
            SubscriptionError::ValidationFailed { field, message } => {
                format!("Validation failed for '{}': {}", field, message)
            }
            SubscriptionError::Infrastructure(msg) => format!("Error: {}", msg),
        }
    }
}

impl std::fmt::Display for SubscriptionError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.message())
    }
}

impl std::error::Error for SubscriptionError {}

impl From<ValidationError> for SubscriptionError {
    fn from(err: ValidationError) -> Self {
        SubscriptionError::ValidationFailed {
            field: err.field().to_string(),
            message: err.to_string(),
        }
    }
}

impl From<DomainError> for SubscriptionError {
    fn from(err: DomainError) -> Self {
        match err.code {
            ErrorCode::ValidationFailed
            | ErrorCode::EmptyField
            | ErrorCode::OutOfRange
            | ErrorCode::InvalidFormat => SubscriptionError::ValidationFailed {
                field: err
                    .details
                    .get("field")
                    .cloned()
                    .unwrap_or_else(|| "unknown".to_string()),
                message: err.message,
            },
            _ => SubscriptionError::Infrastructure(err.to_string()),
        }
    }
}

impl From<SubscriptionError> for DomainError {
    fn from(err: SubscriptionError) -> Self {
        DomainError::new(err.code(), err.message())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn member() -> MemberId {
        MemberId::parse("BCF-1001").unwrap()
    }

    #[test]
    fn member_not_found_maps_to_member_code() {
        let err = SubscriptionError::member_not_found(member());
        assert_eq!(err.code(), ErrorCode::MemberNotFound);
        assert!(err.message().contains("BCF-1001"));
    }

    #[test]
    fn invalid_window_maps_to_date_range_code() {
        let start = Timestamp::parse_rfc3339("2024-03-10T00:00:00Z").unwrap();
        let end = start.add_days(-1);
        let err = SubscriptionError::invalid_window(start, end);
        assert_eq!(err.code(), ErrorCode::InvalidDateRange);
        assert!(err.message().contains("2024-03-09"));
    }

    #[test]
    fn validation_error_converts_with_field() {
        let err: SubscriptionError = ValidationError::out_of_range("months", 1, 120, 0).into();
        assert!(matches!(
            err,
            SubscriptionError::ValidationFailed { ref field, .. } if field == "months"
        ));
    }

    #[test]
    fn database_domain_error_becomes_infrastructure() {
        let err: SubscriptionError = DomainError::database("connection reset").into();
        assert!(matches!(err, SubscriptionError::Infrastructure(_)));
        assert_eq!(err.code(), ErrorCode::DatabaseError);
    }

    #[test]
    fn converts_back_into_domain_error() {
        let err: DomainError = SubscriptionError::not_found(member()).into();
        assert_eq!(err.code, ErrorCode::SubscriptionNotFound);
    }
}
