//! Subscription domain module.
//!
//! Window computation for regular, daily and walk-in subscriptions, the
//! status queries built on top of them, and the archived history records.

mod aggregate;
mod errors;
mod history;
mod kind;
pub mod lifecycle;
mod status;

pub use aggregate::Subscription;
pub use errors::SubscriptionError;
pub use history::SubscriptionHistoryEntry;
pub use kind::{SubscriptionKind, MAX_PLAN_MONTHS};
pub use lifecycle::{
    expiring_member_ids, is_active, is_active_at, is_expiring_soon, is_expiring_soon_at,
    remaining_days, remaining_days_at, DEFAULT_EXPIRING_THRESHOLD_DAYS,
    LISTING_EXPIRING_THRESHOLD_DAYS,
};
pub use status::{MembershipType, PaymentStatus, SubscriptionStatus};
