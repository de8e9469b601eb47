//! Subscription aggregate.
//!
//! A member holds at most one live subscription. Replacing it goes through
//! the store's upsert, which archives the previous record first, so the
//! constructors here only compute the new window.
//!
//! # Design Decisions
//!
//! - **One record, three shapes**: regular, daily and walk-in subscriptions
//!   differ only in how the window is derived, recorded as [`SubscriptionKind`]
//! - **Local calendar**: month arithmetic and midnight run in the gym's fixed
//!   UTC offset, see [`LocalCalendar`]
//! - **Explicit clock**: every time-dependent query takes `now`

use serde::{Deserialize, Serialize};

use crate::domain::foundation::{LocalCalendar, MemberId, Timestamp, ValidationError};

use super::{
    MembershipType, PaymentStatus, SubscriptionError, SubscriptionKind, SubscriptionStatus,
};

const MILLIS_PER_DAY: i64 = 24 * 60 * 60 * 1000;

/// Subscription aggregate.
///
/// # Invariants
///
/// - `member_id` is unique among live subscriptions
/// - `end_date >= start_date` for regular and daily subscriptions
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Subscription {
    /// Member who owns the subscription.
    pub member_id: MemberId,

    /// How the window was derived.
    pub kind: SubscriptionKind,

    /// First instant of access.
    pub start_date: Timestamp,

    /// Last instant of access (inclusive).
    pub end_date: Timestamp,

    pub status: SubscriptionStatus,

    pub membership_type: MembershipType,

    /// Whether the member asked for coaching.
    pub coaching_preference: bool,

    pub payment_status: PaymentStatus,

    pub payment_date: Option<Timestamp>,

    pub created_at: Timestamp,
}

impl Subscription {
    /// Regular plan of `months` calendar months starting at `now`.
    ///
    /// The day of month is kept, clamped to the length of the target month.
    pub fn create_regular(
        member_id: MemberId,
        months: u32,
        now: Timestamp,
        calendar: &LocalCalendar,
    ) -> Result<Self, ValidationError> {
        Self::create_regular_starting(member_id, months, now, now, calendar)
    }

    /// Regular plan starting at a chosen date, as entered on the sign-up form.
    pub fn create_regular_starting(
        member_id: MemberId,
        months: u32,
        start: Timestamp,
        now: Timestamp,
        calendar: &LocalCalendar,
    ) -> Result<Self, ValidationError> {
        let kind = SubscriptionKind::regular(months)?;
        let end_date = calendar.add_months(start, months)?;
        Ok(Self::active(member_id, kind, start, end_date, now))
    }

    /// Day pass ending at local midnight after `start`'s calendar date.
    pub fn create_daily(
        member_id: MemberId,
        start: Timestamp,
        now: Timestamp,
        calendar: &LocalCalendar,
    ) -> Result<Self, ValidationError> {
        let end_date = calendar.start_of_next_day(start)?;
        Ok(Self::active(
            member_id,
            SubscriptionKind::Daily,
            start,
            end_date,
            now,
        ))
    }

    /// Walk-in subscription with a caller-chosen window.
    ///
    /// The window is not checked here; use [`Subscription::validate_window`]
    /// before persisting caller input.
    pub fn create_walk_in(
        member_id: MemberId,
        start: Timestamp,
        end: Timestamp,
        now: Timestamp,
    ) -> Self {
        let mut subscription = Self::active(member_id, SubscriptionKind::WalkIn, start, end, now);
        subscription.membership_type = MembershipType::WalkIn;
        subscription
    }

    fn active(
        member_id: MemberId,
        kind: SubscriptionKind,
        start_date: Timestamp,
        end_date: Timestamp,
        now: Timestamp,
    ) -> Self {
        Self {
            member_id,
            kind,
            start_date,
            end_date,
            status: SubscriptionStatus::Active,
            membership_type: MembershipType::New,
            coaching_preference: false,
            payment_status: PaymentStatus::NotPaid,
            payment_date: None,
            created_at: now,
        }
    }

    /// Sets the membership type.
    pub fn with_membership_type(mut self, membership_type: MembershipType) -> Self {
        self.membership_type = membership_type;
        self
    }

    /// Records the payment state taken at the desk.
    pub fn with_payment(mut self, status: PaymentStatus, date: Option<Timestamp>) -> Self {
        self.payment_status = status;
        self.payment_date = date;
        self
    }

    /// Records the coaching preference.
    pub fn with_coaching(mut self, coaching: bool) -> Self {
        self.coaching_preference = coaching;
        self
    }

    /// Plan duration label (`"1 month"`, `"daily"`, ...).
    pub fn plan_duration(&self) -> Option<String> {
        self.kind.plan_duration()
    }

    /// Rejects windows that end before they start.
    pub fn validate_window(&self) -> Result<(), SubscriptionError> {
        if self.end_date.is_before(&self.start_date) {
            return Err(SubscriptionError::invalid_window(
                self.start_date,
                self.end_date,
            ));
        }
        Ok(())
    }

    /// True if the status is active and `now` is not past the end date.
    pub fn is_active_at(&self, now: Timestamp) -> bool {
        self.status == SubscriptionStatus::Active && self.end_date >= now
    }

    /// Whole days left until the end date, rounded up, never negative.
    pub fn remaining_days_at(&self, now: Timestamp) -> u32 {
        let millis = self.end_date.duration_since(&now).num_milliseconds();
        if millis <= 0 {
            return 0;
        }
        let days = (millis + MILLIS_PER_DAY - 1) / MILLIS_PER_DAY;
        u32::try_from(days).unwrap_or(u32::MAX)
    }

    /// Active with between 1 and `threshold_days` days left.
    pub fn is_expiring_soon_at(&self, now: Timestamp, threshold_days: u32) -> bool {
        if self.status != SubscriptionStatus::Active {
            return false;
        }
        let remaining = self.remaining_days_at(now);
        remaining > 0 && remaining <= threshold_days
    }
}
