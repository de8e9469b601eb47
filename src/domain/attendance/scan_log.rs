//! Append-only log of desk scans.

use serde::{Deserialize, Serialize};

use crate::domain::foundation::{ScanLogId, Timestamp, ValidationError};

/// What a scan did to the member's session.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum ScanAction {
    CheckIn,
    CheckOut,
    /// Scan was logged but the session did not change.
    NotApplicable,
}

impl ScanAction {
    pub fn as_str(&self) -> &'static str {
        match self {
            ScanAction::CheckIn => "check-in",
            ScanAction::CheckOut => "check-out",
            ScanAction::NotApplicable => "not-applicable",
        }
    }

    pub fn parse(s: &str) -> Result<Self, ValidationError> {
        match s.to_ascii_lowercase().as_str() {
            "check-in" => Ok(ScanAction::CheckIn),
            "check-out" => Ok(ScanAction::CheckOut),
            "not-applicable" => Ok(ScanAction::NotApplicable),
            other => Err(ValidationError::invalid_format(
                "action",
                format!("unknown scan action '{}'", other),
            )),
        }
    }
}

/// Result of the access check behind a scan.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum ScanStatus {
    Success,
    Expired,
    Invalid,
}

impl ScanStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            ScanStatus::Success => "success",
            ScanStatus::Expired => "expired",
            ScanStatus::Invalid => "invalid",
        }
    }

    pub fn parse(s: &str) -> Result<Self, ValidationError> {
        match s.to_ascii_lowercase().as_str() {
            "success" => Ok(ScanStatus::Success),
            "expired" => Ok(ScanStatus::Expired),
            "invalid" => Ok(ScanStatus::Invalid),
            other => Err(ValidationError::invalid_format(
                "status",
                format!("unknown scan status '{}'", other),
            )),
        }
    }
}

/// One scan at the desk.
///
/// `scanned_code` is the raw text read from the card, which is not
/// necessarily a valid member id.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ScanLog {
    pub id: ScanLogId,
    pub scanned_code: String,
    pub member_name: String,
    pub timestamp: Timestamp,
    pub action: ScanAction,
    pub status: ScanStatus,
}

impl ScanLog {
    pub fn new(
        scanned_code: impl Into<String>,
        member_name: impl Into<String>,
        timestamp: Timestamp,
        action: ScanAction,
        status: ScanStatus,
    ) -> Self {
        Self {
            id: ScanLogId::new(),
            scanned_code: scanned_code.into(),
            member_name: member_name.into(),
            timestamp,
            action,
            status,
        }
    }

    /// A log without a scanned code cannot be attributed to anyone.
    pub fn validate(&self) -> Result<(), ValidationError> {
        if self.scanned_code.trim().is_empty() {
            return Err(ValidationError::empty_field("scanned_code"));
        }
        Ok(())
    }
}

/// Selection of scan logs. Empty filter matches everything.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ScanLogFilter {
    pub scanned_code: Option<String>,
    pub from: Option<Timestamp>,
    /// Exclusive upper bound.
    pub until: Option<Timestamp>,
}

impl ScanLogFilter {
    pub fn for_code(code: impl Into<String>) -> Self {
        Self {
            scanned_code: Some(code.into()),
            ..Default::default()
        }
    }

    pub fn between(mut self, from: Timestamp, until: Timestamp) -> Self {
        self.from = Some(from);
        self.until = Some(until);
        self
    }

    pub fn matches(&self, log: &ScanLog) -> bool {
        self.scanned_code
            .as_deref()
            .map_or(true, |code| log.scanned_code == code)
            && self.from.map_or(true, |from| log.timestamp >= from)
            && self.until.map_or(true, |until| log.timestamp < until)
    }
}
