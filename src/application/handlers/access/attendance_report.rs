//! AttendanceReportHandler - Query handler for a member's visits.

use std::sync::Arc;

use tracing::warn;

use crate::domain::attendance::{AttendanceReport, ScanLogFilter};
use crate::domain::foundation::MemberId;
use crate::domain::member::MemberError;
use crate::ports::{AttendanceRepository, MemberRepository};

#[derive(Debug, Clone)]
pub struct AttendanceReportQuery {
    pub member_id: MemberId,
}

pub struct AttendanceReportHandler {
    members: Arc<dyn MemberRepository>,
    attendance: Arc<dyn AttendanceRepository>,
}

impl AttendanceReportHandler {
    pub fn new(members: Arc<dyn MemberRepository>, attendance: Arc<dyn AttendanceRepository>) -> Self {
        Self {
            members,
            attendance,
        }
    }

    /// Pairs the member's check-ins and check-outs into visits.
    ///
    /// Unknown members are an error; unreadable logs give an empty report.
    pub async fn handle(&self, query: AttendanceReportQuery) -> Result<AttendanceReport, MemberError> {
        let member = self
            .members
            .find_by_id(&query.member_id)
            .await?
            .ok_or_else(|| MemberError::not_found(query.member_id.clone()))?;

        let filter = ScanLogFilter::for_code(member.id.as_str());
        let logs = match self.attendance.list_scan_logs(&filter).await {
            Ok(logs) => logs,
            Err(e) => {
                warn!(error = %e, member_id = %member.id, "Failed to load scan logs for report");
                Vec::new()
            }
        };

        Ok(AttendanceReport::from_logs(member.id, member.name, &logs))
    }
}
