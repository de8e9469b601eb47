//! Access and attendance handlers.
//!
//! ## Commands
//! - Recording a scan (validate, apply the session change, log)
//!
//! ## Queries
//! - Access validation for a scanned code
//! - Scan logs and active sessions
//! - Attendance report for a member

mod attendance_report;
mod list_scans;
mod record_scan;
mod validate_access;

// Commands
pub use record_scan::{RecordScanCommand, RecordScanHandler, ScanReport};

// Queries
pub use attendance_report::{AttendanceReportHandler, AttendanceReportQuery};
pub use list_scans::{ListScansHandler, ListScansQuery};
pub use validate_access::ValidateAccessHandler;
