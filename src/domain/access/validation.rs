//! Outcome of checking a scanned code against members and subscriptions.

use serde::{Deserialize, Serialize};

use crate::domain::member::Member;
use crate::domain::subscription::Subscription;

/// The four possible answers to "may this person come in?".
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum AccessOutcome {
    Granted,
    Expired,
    Invalid,
    AlreadyCheckedIn,
}

impl AccessOutcome {
    /// Message shown on the desk display.
    pub fn message(&self) -> &'static str {
        match self {
            AccessOutcome::Granted => "Access Granted",
            AccessOutcome::Expired => "Subscription Expired",
            AccessOutcome::Invalid => "Invalid QR Code - User not found",
            AccessOutcome::AlreadyCheckedIn => "Already Checked In",
        }
    }

    /// True for outcomes backed by an active subscription.
    pub fn is_valid(&self) -> bool {
        matches!(self, AccessOutcome::Granted | AccessOutcome::AlreadyCheckedIn)
    }
}

/// Access check result with whatever was resolved along the way.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct AccessValidation {
    pub outcome: AccessOutcome,
    pub message: String,
    pub member: Option<Member>,
    pub subscription: Option<Subscription>,
}

impl AccessValidation {
    pub fn invalid() -> Self {
        Self::new(AccessOutcome::Invalid, None, None)
    }

    pub fn expired(member: Member, subscription: Option<Subscription>) -> Self {
        Self::new(AccessOutcome::Expired, Some(member), subscription)
    }

    pub fn granted(member: Member, subscription: Subscription) -> Self {
        Self::new(AccessOutcome::Granted, Some(member), Some(subscription))
    }

    pub fn already_checked_in(member: Member, subscription: Subscription) -> Self {
        Self::new(
            AccessOutcome::AlreadyCheckedIn,
            Some(member),
            Some(subscription),
        )
    }

    fn new(
        outcome: AccessOutcome,
        member: Option<Member>,
        subscription: Option<Subscription>,
    ) -> Self {
        Self {
            outcome,
            message: outcome.message().to_string(),
            member,
            subscription,
        }
    }

    pub fn is_valid(&self) -> bool {
        self.outcome.is_valid()
    }

    /// Name to show and log, empty when nobody was resolved.
    pub fn member_name(&self) -> &str {
        self.member.as_ref().map_or("", |m| m.name.as_str())
    }
}
