//! What the desk does with a validated scan.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::domain::attendance::{ScanAction, ScanStatus};
use crate::domain::foundation::ValidationError;

use super::AccessOutcome;

/// Operating mode of a scanning station.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum DeskMode {
    /// Entrance scanner: only starts sessions.
    CheckIn,
    /// Exit scanner: only ends sessions.
    CheckOut,
    /// Single scanner: starts or ends depending on the current session.
    #[default]
    Toggle,
}

impl DeskMode {
    pub fn as_str(&self) -> &'static str {
        match self {
            DeskMode::CheckIn => "check-in",
            DeskMode::CheckOut => "check-out",
            DeskMode::Toggle => "toggle",
        }
    }
}

impl fmt::Display for DeskMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for DeskMode {
    type Err = ValidationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "check-in" | "checkin" => Ok(DeskMode::CheckIn),
            "check-out" | "checkout" => Ok(DeskMode::CheckOut),
            "toggle" => Ok(DeskMode::Toggle),
            other => Err(ValidationError::invalid_format(
                "mode",
                format!("unknown desk mode '{}'", other),
            )),
        }
    }
}

/// Session change to apply for a scan.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SessionChange {
    Start,
    End,
    Keep,
}

/// Session change plus the log entry describing it.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ScanDecision {
    pub change: SessionChange,
    pub action: ScanAction,
    pub status: ScanStatus,
}

impl ScanDecision {
    /// Maps an access outcome to what the desk records in `mode`.
    pub fn decide(outcome: AccessOutcome, mode: DeskMode) -> Self {
        use SessionChange::*;

        match (outcome, mode) {
            (AccessOutcome::Invalid, _) => Self::keep(ScanStatus::Invalid),
            (AccessOutcome::Expired, _) => Self::keep(ScanStatus::Expired),
            (AccessOutcome::AlreadyCheckedIn, DeskMode::CheckIn) => Self::keep(ScanStatus::Success),
            (AccessOutcome::AlreadyCheckedIn, DeskMode::CheckOut | DeskMode::Toggle) => Self {
                change: End,
                action: ScanAction::CheckOut,
                status: ScanStatus::Success,
            },
            (AccessOutcome::Granted, DeskMode::CheckOut) => Self::keep(ScanStatus::Success),
            (AccessOutcome::Granted, DeskMode::CheckIn | DeskMode::Toggle) => Self {
                change: Start,
                action: ScanAction::CheckIn,
                status: ScanStatus::Success,
            },
        }
    }

    fn keep(status: ScanStatus) -> Self {
        Self {
            change: SessionChange::Keep,
            action: ScanAction::NotApplicable,
            status,
        }
    }
}
