//! Scan log and session queries for the desk screens.

use std::sync::Arc;

use tracing::warn;

use crate::domain::attendance::{ActiveSession, ScanLog, ScanLogFilter};
use crate::domain::foundation::{LocalCalendar, MemberId, Timestamp};
use crate::ports::AttendanceRepository;

#[derive(Debug, Clone, Default)]
pub struct ListScansQuery {
    pub member_id: Option<MemberId>,
    /// Only scans from the current local day.
    pub today: bool,
}

pub struct ListScansHandler {
    attendance: Arc<dyn AttendanceRepository>,
    calendar: LocalCalendar,
}

impl ListScansHandler {
    pub fn new(attendance: Arc<dyn AttendanceRepository>, calendar: LocalCalendar) -> Self {
        Self {
            attendance,
            calendar,
        }
    }

    pub async fn handle(&self, query: ListScansQuery) -> Vec<ScanLog> {
        self.handle_at(query, Timestamp::now()).await
    }

    /// Newest first. An unreadable store yields an empty list.
    pub async fn handle_at(&self, query: ListScansQuery, now: Timestamp) -> Vec<ScanLog> {
        let mut filter = match &query.member_id {
            Some(id) => ScanLogFilter::for_code(id.as_str()),
            None => ScanLogFilter::default(),
        };
        if query.today {
            match (
                self.calendar.start_of_day(now),
                self.calendar.start_of_next_day(now),
            ) {
                (Ok(from), Ok(until)) => filter = filter.between(from, until),
                (Err(e), _) | (_, Err(e)) => {
                    warn!(reason = %e, "Could not compute today's bounds, listing all scans");
                }
            }
        }

        match self.attendance.list_scan_logs(&filter).await {
            Ok(logs) => logs,
            Err(e) => {
                warn!(error = %e, "Failed to list scan logs");
                Vec::new()
            }
        }
    }

    /// Members currently inside, most recent check-in first.
    pub async fn active_sessions(&self) -> Vec<ActiveSession> {
        match self.attendance.list_sessions().await {
            Ok(sessions) => sessions,
            Err(e) => {
                warn!(error = %e, "Failed to list active sessions");
                Vec::new()
            }
        }
    }
}
