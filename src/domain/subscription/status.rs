//! Subscription status and the labels stored alongside it.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::domain::foundation::ValidationError;

/// Lifecycle status of a subscription record.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SubscriptionStatus {
    /// Paid up; access depends on the end date.
    Active,

    /// Marked as ended. No access.
    Expired,

    /// Stopped before its end date. No access.
    Cancelled,
}

impl SubscriptionStatus {
    /// Stored label.
    pub fn as_str(&self) -> &'static str {
        match self {
            SubscriptionStatus::Active => "active",
            SubscriptionStatus::Expired => "expired",
            SubscriptionStatus::Cancelled => "cancelled",
        }
    }
}

impl fmt::Display for SubscriptionStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for SubscriptionStatus {
    type Err = ValidationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "active" => Ok(SubscriptionStatus::Active),
            "expired" => Ok(SubscriptionStatus::Expired),
            "cancelled" => Ok(SubscriptionStatus::Cancelled),
            other => Err(ValidationError::invalid_format(
                "status",
                format!("unknown subscription status '{}'", other),
            )),
        }
    }
}

/// Whether the subscription was a first sign-up, a renewal, or a walk-in.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum MembershipType {
    #[serde(rename = "new")]
    New,
    #[serde(rename = "renewal")]
    Renewal,
    #[serde(rename = "walk-in")]
    WalkIn,
}

impl MembershipType {
    /// Stored label.
    pub fn as_str(&self) -> &'static str {
        match self {
            MembershipType::New => "new",
            MembershipType::Renewal => "renewal",
            MembershipType::WalkIn => "walk-in",
        }
    }
}

impl FromStr for MembershipType {
    type Err = ValidationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "new" => Ok(MembershipType::New),
            "renewal" => Ok(MembershipType::Renewal),
            "walk-in" => Ok(MembershipType::WalkIn),
            other => Err(ValidationError::invalid_format(
                "membership_type",
                format!("unknown membership type '{}'", other),
            )),
        }
    }
}

/// Payment state recorded at the desk.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum PaymentStatus {
    #[serde(rename = "paid")]
    Paid,
    #[default]
    #[serde(rename = "not paid")]
    NotPaid,
}

impl PaymentStatus {
    /// Stored label.
    pub fn as_str(&self) -> &'static str {
        match self {
            PaymentStatus::Paid => "paid",
            PaymentStatus::NotPaid => "not paid",
        }
    }
}

impl FromStr for PaymentStatus {
    type Err = ValidationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "paid" => Ok(PaymentStatus::Paid),
            "not paid" => Ok(PaymentStatus::NotPaid),
            other => Err(ValidationError::invalid_format(
                "payment_status",
                format!("unknown payment status '{}'", other),
            )),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn status_labels_round_trip_through_from_str() {
        for status in [
            SubscriptionStatus::Active,
            SubscriptionStatus::Expired,
            SubscriptionStatus::Cancelled,
        ] {
            assert_eq!(status.as_str().parse::<SubscriptionStatus>().unwrap(), status);
        }
    }

    #[test]
    fn unknown_status_is_rejected() {
        assert!("paused".parse::<SubscriptionStatus>().is_err());
    }

    #[test]
    fn membership_type_uses_hyphenated_walk_in_label() {
        let json = serde_json::to_string(&MembershipType::WalkIn).unwrap();
        assert_eq!(json, "\"walk-in\"");
        assert_eq!("walk-in".parse::<MembershipType>().unwrap(), MembershipType::WalkIn);
    }

    #[test]
    fn payment_status_defaults_to_not_paid() {
        assert_eq!(PaymentStatus::default(), PaymentStatus::NotPaid);
        let json = serde_json::to_string(&PaymentStatus::NotPaid).unwrap();
        assert_eq!(json, "\"not paid\"");
    }
}
