//! How a subscription window was derived.

use serde::{Deserialize, Serialize};

use crate::domain::foundation::ValidationError;

/// Longest regular plan the desk sells, in months.
pub const MAX_PLAN_MONTHS: u32 = 120;

/// Origin of a subscription's start/end dates.
///
/// All three shapes share one record; only the derivation of the window
/// differs.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum SubscriptionKind {
    /// Fixed plan of whole calendar months starting now.
    Regular { months: u32 },

    /// Day pass ending at the next local midnight.
    Daily,

    /// Arbitrary caller-chosen window.
    WalkIn,
}

impl SubscriptionKind {
    /// Validated regular plan.
    pub fn regular(months: u32) -> Result<Self, ValidationError> {
        if months == 0 || months > MAX_PLAN_MONTHS {
            return Err(ValidationError::out_of_range(
                "months",
                1,
                MAX_PLAN_MONTHS as i64,
                months as i64,
            ));
        }
        Ok(SubscriptionKind::Regular { months })
    }

    /// Plan duration label shown on the member card, none for walk-ins.
    pub fn plan_duration(&self) -> Option<String> {
        match self {
            SubscriptionKind::Regular { months: 1 } => Some("1 month".to_string()),
            SubscriptionKind::Regular { months } => Some(format!("{} months", months)),
            SubscriptionKind::Daily => Some("daily".to_string()),
            SubscriptionKind::WalkIn => None,
        }
    }

    /// Recovers the kind from a stored plan duration label.
    ///
    /// Rows written without a kind column fall back to this.
    pub fn from_plan_duration(label: Option<&str>) -> Self {
        match label.map(str::trim) {
            Some("daily") => SubscriptionKind::Daily,
            Some(label) => label
                .split_whitespace()
                .next()
                .and_then(|n| n.parse().ok())
                .map(|months| SubscriptionKind::Regular { months })
                .unwrap_or(SubscriptionKind::WalkIn),
            None => SubscriptionKind::WalkIn,
        }
    }
}
