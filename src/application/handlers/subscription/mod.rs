//! Subscription handlers.
//!
//! ## Commands
//! - Renewing a subscription (regular, daily, walk-in)
//!
//! ## Queries
//! - Members with subscriptions expiring soon
//! - Archived subscription history

mod list_expiring;
mod list_history;
mod plan;
mod renew_subscription;

pub use plan::SubscriptionPlan;

// Commands
pub use renew_subscription::{
    RenewSubscriptionCommand, RenewSubscriptionHandler, RenewSubscriptionResult,
};

// Queries
pub use list_expiring::{ListExpiringHandler, ListExpiringQuery, ListExpiringResult};
pub use list_history::{ListHistoryHandler, ListHistoryQuery};
