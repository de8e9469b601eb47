//! Foundation module - Shared domain primitives.
//!
//! Contains value objects, identifiers, calendar math, and error types
//! that form the vocabulary of the membership desk domain.

mod calendar;
mod errors;
mod ids;
pub mod patch;
mod timestamp;

pub use calendar::LocalCalendar;
pub use errors::{DomainError, ErrorCategory, ErrorCode, ValidationError};
pub use ids::{HistoryEntryId, MemberId, ScanLogId};
pub use timestamp::Timestamp;
