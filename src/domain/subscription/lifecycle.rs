//! Status queries over an optional subscription.
//!
//! Callers usually hold the result of a store lookup, so these take
//! `Option<&Subscription>` and treat a missing subscription as inactive with
//! zero days left.

use crate::domain::foundation::{MemberId, Timestamp};

use super::Subscription;

/// Default threshold for "expiring soon" checks.
pub const DEFAULT_EXPIRING_THRESHOLD_DAYS: u32 = 3;

/// Threshold used by the member listing.
pub const LISTING_EXPIRING_THRESHOLD_DAYS: u32 = 7;

/// True if the subscription exists, is active, and has not ended.
pub fn is_active(subscription: Option<&Subscription>) -> bool {
    is_active_at(subscription, Timestamp::now())
}

pub fn is_active_at(subscription: Option<&Subscription>, now: Timestamp) -> bool {
    subscription.is_some_and(|s| s.is_active_at(now))
}

/// Days left, rounded up; zero when there is no subscription.
pub fn remaining_days(subscription: Option<&Subscription>) -> u32 {
    remaining_days_at(subscription, Timestamp::now())
}

pub fn remaining_days_at(subscription: Option<&Subscription>, now: Timestamp) -> u32 {
    subscription.map_or(0, |s| s.remaining_days_at(now))
}

/// True if active with between 1 and `threshold_days` days left.
pub fn is_expiring_soon(subscription: Option<&Subscription>, threshold_days: u32) -> bool {
    is_expiring_soon_at(subscription, Timestamp::now(), threshold_days)
}

pub fn is_expiring_soon_at(
    subscription: Option<&Subscription>,
    now: Timestamp,
    threshold_days: u32,
) -> bool {
    subscription.is_some_and(|s| s.is_expiring_soon_at(now, threshold_days))
}

/// Members whose subscription is expiring soon, in input order.
pub fn expiring_member_ids<'a>(
    subscriptions: impl IntoIterator<Item = &'a Subscription>,
    now: Timestamp,
    threshold_days: u32,
) -> Vec<MemberId> {
    subscriptions
        .into_iter()
        .filter(|s| s.is_expiring_soon_at(now, threshold_days))
        .map(|s| s.member_id.clone())
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::foundation::LocalCalendar;
    use crate::domain::subscription::SubscriptionStatus;
    use proptest::prelude::*;

    fn member(n: u64) -> MemberId {
        MemberId::from_parts("BCF", n).unwrap()
    }

    fn base() -> Timestamp {
        Timestamp::parse_rfc3339("2024-03-01T00:00:00Z").unwrap()
    }

    fn ending(n: u64, end: Timestamp) -> Subscription {
        Subscription::create_walk_in(member(n), end.add_days(-30), end, base())
    }

    #[test]
    fn missing_subscription_is_inactive_with_no_days() {
        assert!(!is_active_at(None, base()));
        assert_eq!(remaining_days_at(None, base()), 0);
        assert!(!is_expiring_soon_at(None, base(), DEFAULT_EXPIRING_THRESHOLD_DAYS));
    }

    #[test]
    fn wall_clock_forms_agree_for_far_future_end() {
        let sub = ending(1, Timestamp::now().add_days(400));
        assert!(is_active(Some(&sub)));
        assert!(remaining_days(Some(&sub)) >= 399);
        assert!(!is_expiring_soon(Some(&sub), LISTING_EXPIRING_THRESHOLD_DAYS));
    }

    #[test]
    fn expiring_member_ids_filters_by_threshold() {
        let now = base();
        let mut cancelled = ending(4, now.add_days(1));
        cancelled.status = SubscriptionStatus::Cancelled;
        let subs = vec![
            ending(1, now.add_days(2)),
            ending(2, now.add_days(10)),
            ending(3, now.add_days(-1)),
            cancelled,
            ending(5, now.add_days(3)),
        ];

        let ids = expiring_member_ids(&subs, now, 3);

        assert_eq!(ids, vec![member(1), member(5)]);
    }

    proptest! {
        #[test]
        fn remaining_days_is_zero_iff_end_not_after_now(offset_minutes in -100_000i64..100_000) {
            let end = base().add(chrono::Duration::minutes(offset_minutes));
            let sub = ending(1, end);
            let days = sub.remaining_days_at(base());
            prop_assert_eq!(days == 0, offset_minutes <= 0);
        }

        #[test]
        fn inactive_status_is_never_active(offset_days in -400i64..400) {
            let mut sub = ending(1, base().add_days(offset_days));
            sub.status = SubscriptionStatus::Expired;
            prop_assert!(!is_active_at(Some(&sub), base()));
        }

        #[test]
        fn active_iff_end_not_before_now(offset_minutes in -100_000i64..100_000) {
            let sub = ending(1, base().add(chrono::Duration::minutes(offset_minutes)));
            prop_assert_eq!(is_active_at(Some(&sub), base()), offset_minutes >= 0);
        }

        #[test]
        fn daily_pass_never_outlives_a_day(
            offset_minutes in -720i32..=840,
            minute_of_day in 0i64..1440,
        ) {
            let calendar = LocalCalendar::from_offset_minutes(offset_minutes).unwrap();
            let start = calendar
                .start_of_day(base())
                .unwrap()
                .add(chrono::Duration::minutes(minute_of_day));
            let sub = Subscription::create_daily(member(1), start, start, &calendar).unwrap();

            prop_assert!(sub.end_date.is_after(&sub.start_date));
            prop_assert!(sub.end_date.duration_since(&sub.start_date) <= chrono::Duration::days(1));
            prop_assert_eq!(sub.end_date, calendar.start_of_next_day(start).unwrap());
        }

        #[test]
        fn regular_end_is_never_before_start(months in 1u32..=120, offset_days in 0i64..1500) {
            let now = base().add_days(offset_days);
            let sub = Subscription::create_regular(
                member(1),
                months,
                now,
                &LocalCalendar::from_offset_minutes(480).unwrap(),
            )
            .unwrap();
            prop_assert!(sub.end_date.is_after(&sub.start_date));
            prop_assert!(sub.validate_window().is_ok());
        }
    }
}
