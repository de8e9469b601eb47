//! Attendance repository port.
//!
//! Scan logs are append-only. Active sessions are keyed by member; at most
//! one exists per member and its presence is what "checked in" means.

use crate::domain::attendance::{ActiveSession, ScanLog, ScanLogFilter};
use crate::domain::foundation::{DomainError, MemberId};
use async_trait::async_trait;

#[async_trait]
pub trait AttendanceRepository: Send + Sync {
    /// Appends a scan log.
    async fn append_scan_log(&self, log: &ScanLog) -> Result<(), DomainError>;

    /// Logs matching the filter, newest first.
    async fn list_scan_logs(&self, filter: &ScanLogFilter) -> Result<Vec<ScanLog>, DomainError>;

    /// Returns `None` if the member is not checked in.
    async fn find_session(&self, member_id: &MemberId)
        -> Result<Option<ActiveSession>, DomainError>;

    /// Active sessions, most recent check-in first.
    async fn list_sessions(&self) -> Result<Vec<ActiveSession>, DomainError>;

    /// # Errors
    ///
    /// - `SessionExists` if the member is already checked in
    async fn start_session(&self, session: &ActiveSession) -> Result<(), DomainError>;

    /// Removes and returns the member's session, `None` if there was none.
    async fn end_session(&self, member_id: &MemberId)
        -> Result<Option<ActiveSession>, DomainError>;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn attendance_repository_is_object_safe() {
        fn _accepts_dyn(_repo: &dyn AttendanceRepository) {}
    }
}
