//! Per-member attendance report.
//!
//! Scan logs are paired into visits in chronological order: a check-in opens
//! a visit and the next check-out closes it. A check-in that follows another
//! unmatched check-in replaces it, and a check-out with nothing open is
//! ignored.

use chrono::Duration;
use serde::Serialize;

use crate::domain::foundation::{MemberId, Timestamp};

use super::{ScanAction, ScanLog};

/// One stay at the gym.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Visit {
    pub check_in: Timestamp,
    /// `None` while the member is still inside.
    pub check_out: Option<Timestamp>,
    pub duration_seconds: Option<i64>,
    /// Human readable duration, e.g. `"1 hour 5 minutes"`.
    pub duration: Option<String>,
}

impl Visit {
    fn closed(check_in: Timestamp, check_out: Timestamp) -> Self {
        let elapsed = check_out.duration_since(&check_in);
        Self {
            check_in,
            check_out: Some(check_out),
            duration_seconds: Some(elapsed.num_seconds()),
            duration: Some(format_duration(elapsed)),
        }
    }

    fn open(check_in: Timestamp) -> Self {
        Self {
            check_in,
            check_out: None,
            duration_seconds: None,
            duration: None,
        }
    }

    pub fn is_open(&self) -> bool {
        self.check_out.is_none()
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct AttendanceReport {
    pub member_id: MemberId,
    pub member_name: String,
    pub visits: Vec<Visit>,
    /// Sum over closed visits.
    pub total_seconds: i64,
    pub total: String,
}

impl AttendanceReport {
    /// Builds the report from a member's scan logs in any order.
    pub fn from_logs(member_id: MemberId, member_name: impl Into<String>, logs: &[ScanLog]) -> Self {
        let mut sorted: Vec<&ScanLog> = logs.iter().collect();
        sorted.sort_by_key(|log| log.timestamp);

        let mut visits = Vec::new();
        let mut open: Option<Timestamp> = None;
        for log in sorted {
            match log.action {
                ScanAction::CheckIn => open = Some(log.timestamp),
                ScanAction::CheckOut => {
                    if let Some(check_in) = open.take() {
                        visits.push(Visit::closed(check_in, log.timestamp));
                    }
                }
                ScanAction::NotApplicable => {}
            }
        }
        if let Some(check_in) = open {
            visits.push(Visit::open(check_in));
        }

        let total_seconds: i64 = visits.iter().filter_map(|v| v.duration_seconds).sum();
        Self {
            member_id,
            member_name: member_name.into(),
            visits,
            total_seconds,
            total: format_duration(Duration::seconds(total_seconds)),
        }
    }
}

/// Formats as hours, minutes and seconds, omitting zero units.
///
/// Always shows at least the seconds, so zero renders as `"0 seconds"`.
pub fn format_duration(elapsed: Duration) -> String {
    let total = elapsed.num_seconds().max(0);
    let hours = total / 3600;
    let minutes = (total % 3600) / 60;
    let seconds = total % 60;

    let mut parts = Vec::new();
    if hours > 0 {
        parts.push(unit(hours, "hour"));
    }
    if minutes > 0 {
        parts.push(unit(minutes, "minute"));
    }
    if seconds > 0 || parts.is_empty() {
        parts.push(unit(seconds, "second"));
    }
    parts.join(" ")
}

fn unit(n: i64, name: &str) -> String {
    if n == 1 {
        format!("1 {}", name)
    } else {
        format!("{} {}s", n, name)
    }
}
