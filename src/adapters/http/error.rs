//! Error responses for the HTTP adapter.
//!
//! # HTTP Status Mapping
//!
//! | Error code | HTTP Status |
//! |------------|-------------|
//! | validation codes, `INVALID_DATE_RANGE` | 400 |
//! | `*_NOT_FOUND` | 404 |
//! | `MEMBER_EXISTS`, `INTAKE_RECORD_EXISTS`, `SESSION_EXISTS` | 409 |
//! | access check unavailable | 503 |
//! | `DATABASE_ERROR`, `INTERNAL_ERROR` | 500 |

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde::Serialize;
use tracing::error;

use crate::domain::access::AccessError;
use crate::domain::foundation::{DomainError, ErrorCategory, ErrorCode, ValidationError};
use crate::domain::member::MemberError;
use crate::domain::subscription::SubscriptionError;

/// Standard error response body.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ErrorResponse {
    /// Error code for programmatic handling.
    pub code: String,
    /// Human-readable error message.
    pub message: String,
}

impl ErrorResponse {
    pub fn new(code: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            code: code.into(),
            message: message.into(),
        }
    }
}

/// Error returned by every HTTP handler.
#[derive(Debug)]
pub struct ApiError {
    status: StatusCode,
    code: ErrorCode,
    message: String,
}

impl ApiError {
    fn from_code(code: ErrorCode, message: String) -> Self {
        Self {
            status: status_for(code),
            code,
            message,
        }
    }

    pub fn status(&self) -> StatusCode {
        self.status
    }
}

fn status_for(code: ErrorCode) -> StatusCode {
    match code.category() {
        ErrorCategory::Invalid => StatusCode::BAD_REQUEST,
        ErrorCategory::NotFound => StatusCode::NOT_FOUND,
        ErrorCategory::Conflict => StatusCode::CONFLICT,
        ErrorCategory::Infrastructure => StatusCode::INTERNAL_SERVER_ERROR,
    }
}

impl From<MemberError> for ApiError {
    fn from(err: MemberError) -> Self {
        Self::from_code(err.code(), err.message())
    }
}

impl From<SubscriptionError> for ApiError {
    fn from(err: SubscriptionError) -> Self {
        Self::from_code(err.code(), err.message())
    }
}

impl From<AccessError> for ApiError {
    fn from(err: AccessError) -> Self {
        Self {
            status: StatusCode::SERVICE_UNAVAILABLE,
            code: err.code(),
            message: err.message(),
        }
    }
}

impl From<DomainError> for ApiError {
    fn from(err: DomainError) -> Self {
        Self::from_code(err.code, err.message)
    }
}

impl From<ValidationError> for ApiError {
    fn from(err: ValidationError) -> Self {
        DomainError::from(err).into()
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        if self.status.is_server_error() {
            error!(code = %self.code, message = %self.message, "Request failed");
        }
        let body = ErrorResponse::new(self.code.to_string(), self.message);
        (self.status, Json(body)).into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::foundation::MemberId;

    fn id() -> MemberId {
        MemberId::parse("BCF-1001").unwrap()
    }

    #[test]
    fn not_found_maps_to_404() {
        let err = ApiError::from(MemberError::not_found(id()));
        assert_eq!(err.status(), StatusCode::NOT_FOUND);
    }

    #[test]
    fn intake_conflict_maps_to_409() {
        let err = ApiError::from(MemberError::intake_exists(id(), "liability waiver"));
        assert_eq!(err.status(), StatusCode::CONFLICT);
    }

    #[test]
    fn validation_maps_to_400() {
        let err = ApiError::from(SubscriptionError::validation("months", "must be positive"));
        assert_eq!(err.status(), StatusCode::BAD_REQUEST);
    }

    #[test]
    fn access_outage_maps_to_503() {
        let err = ApiError::from(AccessError::unavailable("connection refused"));
        assert_eq!(err.status(), StatusCode::SERVICE_UNAVAILABLE);
    }

    #[test]
    fn store_failure_maps_to_500() {
        let err = ApiError::from(DomainError::database("disk full"));
        assert_eq!(err.status(), StatusCode::INTERNAL_SERVER_ERROR);
    }

    #[test]
    fn error_body_carries_code_and_message() {
        let response = ErrorResponse::new("MEMBER_NOT_FOUND", "Member not found: BCF-1001");
        let json = serde_json::to_value(&response).unwrap();
        assert_eq!(json["code"], "MEMBER_NOT_FOUND");
        assert_eq!(json["message"], "Member not found: BCF-1001");
    }
}
