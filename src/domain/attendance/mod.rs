//! Attendance domain module.
//!
//! Scan logs, active sessions, and the visit report derived from them.

mod report;
mod scan_log;
mod session;

pub use report::{format_duration, AttendanceReport, Visit};
pub use scan_log::{ScanAction, ScanLog, ScanLogFilter, ScanStatus};
pub use session::ActiveSession;
