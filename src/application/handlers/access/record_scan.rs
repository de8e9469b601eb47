//! RecordScanHandler - Command handler for a scan at the desk.
//!
//! Validates the code, applies the session change for the desk mode, and
//! appends a scan log entry.

use std::sync::Arc;

use serde::Serialize;
use tracing::{info, warn};

use crate::domain::access::{
    AccessError, AccessValidation, DeskMode, ScanDecision, SessionChange,
};
use crate::domain::attendance::{ActiveSession, ScanAction, ScanLog, ScanStatus};
use crate::domain::foundation::{ErrorCode, Timestamp};
use crate::ports::AttendanceRepository;

use super::ValidateAccessHandler;

#[derive(Debug, Clone)]
pub struct RecordScanCommand {
    pub code: String,
    /// Falls back to the station's configured mode.
    pub mode: Option<DeskMode>,
}

impl RecordScanCommand {
    pub fn new(code: impl Into<String>) -> Self {
        Self {
            code: code.into(),
            mode: None,
        }
    }

    pub fn with_mode(mut self, mode: DeskMode) -> Self {
        self.mode = Some(mode);
        self
    }
}

/// What happened for one scan.
#[derive(Debug, Clone, Serialize)]
pub struct ScanReport {
    pub validation: AccessValidation,
    pub action: ScanAction,
    pub status: ScanStatus,
    /// Stored log entry; `None` when the entry was dropped.
    pub log: Option<ScanLog>,
}

pub struct RecordScanHandler {
    validator: Arc<ValidateAccessHandler>,
    attendance: Arc<dyn AttendanceRepository>,
    default_mode: DeskMode,
}

impl RecordScanHandler {
    pub fn new(
        validator: Arc<ValidateAccessHandler>,
        attendance: Arc<dyn AttendanceRepository>,
        default_mode: DeskMode,
    ) -> Self {
        Self {
            validator,
            attendance,
            default_mode,
        }
    }

    pub async fn handle(&self, cmd: RecordScanCommand) -> Result<ScanReport, AccessError> {
        self.handle_at(cmd, Timestamp::now()).await
    }

    pub async fn handle_at(
        &self,
        cmd: RecordScanCommand,
        now: Timestamp,
    ) -> Result<ScanReport, AccessError> {
        let code = cmd.code.trim();
        let mode = cmd.mode.unwrap_or(self.default_mode);

        // 1. Validate
        let validation = self.validator.handle_at(code, now).await?;

        // 2. Apply the session change
        let decision = ScanDecision::decide(validation.outcome, mode);
        let decision = self.apply(&validation, decision, now).await?;

        // 3. Log the scan
        let log = ScanLog::new(
            code,
            validation.member_name(),
            now,
            decision.action,
            decision.status,
        );
        let log = self.append(log).await;

        info!(
            code = code,
            mode = %mode,
            outcome = ?validation.outcome,
            action = decision.action.as_str(),
            "Scan recorded"
        );

        Ok(ScanReport {
            validation,
            action: decision.action,
            status: decision.status,
            log,
        })
    }

    async fn apply(
        &self,
        validation: &AccessValidation,
        decision: ScanDecision,
        now: Timestamp,
    ) -> Result<ScanDecision, AccessError> {
        let Some(member) = validation.member.as_ref() else {
            return Ok(decision);
        };

        match decision.change {
            SessionChange::Keep => Ok(decision),
            SessionChange::Start => {
                let session = ActiveSession::start(member.id.clone(), member.name.clone(), now);
                match self.attendance.start_session(&session).await {
                    Ok(()) => Ok(decision),
                    // Another desk checked the member in first.
                    Err(e) if e.code == ErrorCode::SessionExists => {
                        warn!(member_id = %member.id, "Session already open, check-in not recorded");
                        Ok(ScanDecision {
                            change: SessionChange::Keep,
                            action: ScanAction::NotApplicable,
                            status: ScanStatus::Success,
                        })
                    }
                    Err(e) => Err(e.into()),
                }
            }
            SessionChange::End => match self.attendance.end_session(&member.id).await? {
                Some(_) => Ok(decision),
                // Another desk checked the member out first.
                None => {
                    warn!(
                        member_id = %member.id,
                        "No open session to end, check-out not recorded"
                    );
                    Ok(ScanDecision {
                        change: SessionChange::Keep,
                        action: ScanAction::NotApplicable,
                        status: ScanStatus::Success,
                    })
                }
            },
        }
    }

    // Log entries that fail validation or storage are dropped, not surfaced.
    async fn append(&self, log: ScanLog) -> Option<ScanLog> {
        if let Err(e) = log.validate() {
            warn!(reason = %e, "Dropping malformed scan log");
            return None;
        }
        match self.attendance.append_scan_log(&log).await {
            Ok(()) => Some(log),
            Err(e) => {
                warn!(error = %e, code = %log.scanned_code, "Failed to store scan log");
                None
            }
        }
    }
}
