//! Subscription plan chosen at the desk.

use serde::Deserialize;

use crate::domain::foundation::{LocalCalendar, MemberId, Timestamp};
use crate::domain::subscription::{Subscription, SubscriptionError, SubscriptionKind};

/// Plan selected on the registration or renewal form.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum SubscriptionPlan {
    /// Whole calendar months, starting now unless a start date is given.
    Regular {
        months: u32,
        #[serde(default)]
        start: Option<Timestamp>,
    },

    /// Day pass, starting now unless a start is given.
    Daily {
        #[serde(default)]
        start: Option<Timestamp>,
    },

    /// Caller-chosen window, starting now unless a start is given.
    WalkIn {
        #[serde(default)]
        start: Option<Timestamp>,
        end: Timestamp,
    },
}

impl SubscriptionPlan {
    /// Builds the subscription for `member_id`.
    ///
    /// Walk-in windows that end before they start are rejected here, before
    /// anything is persisted.
    pub fn build(
        &self,
        member_id: MemberId,
        now: Timestamp,
        calendar: &LocalCalendar,
    ) -> Result<Subscription, SubscriptionError> {
        let subscription = match *self {
            SubscriptionPlan::Regular { months, start } => Subscription::create_regular_starting(
                member_id,
                months,
                start.unwrap_or(now),
                now,
                calendar,
            )?,
            SubscriptionPlan::Daily { start } => {
                Subscription::create_daily(member_id, start.unwrap_or(now), now, calendar)?
            }
            SubscriptionPlan::WalkIn { start, end } => {
                let subscription =
                    Subscription::create_walk_in(member_id, start.unwrap_or(now), end, now);
                subscription.validate_window()?;
                subscription
            }
        };
        Ok(subscription)
    }

    /// Checks the caller's input without building anything.
    pub fn validate(&self, now: Timestamp) -> Result<(), SubscriptionError> {
        match *self {
            SubscriptionPlan::WalkIn { start, end } => {
                let start = start.unwrap_or(now);
                if end.is_before(&start) {
                    return Err(SubscriptionError::invalid_window(start, end));
                }
                Ok(())
            }
            SubscriptionPlan::Regular { months, .. } => {
                SubscriptionKind::regular(months)?;
                Ok(())
            }
            SubscriptionPlan::Daily { .. } => Ok(()),
        }
    }

    pub fn is_walk_in(&self) -> bool {
        matches!(self, SubscriptionPlan::WalkIn { .. })
    }
}
