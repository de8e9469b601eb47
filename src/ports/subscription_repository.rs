//! Subscription repository port.
//!
//! # Upsert-with-archive
//!
//! A member has at most one live subscription. [`SubscriptionRepository::upsert`]
//! is the only way to write one: if a subscription already exists for the
//! member it is appended to history verbatim and then overwritten, otherwise
//! the new record is inserted. Archive and overwrite are a single atomic
//! step, so history has no gaps and is never rewritten.

use crate::domain::foundation::{DomainError, MemberId};
use crate::domain::subscription::{Subscription, SubscriptionHistoryEntry};
use async_trait::async_trait;

#[async_trait]
pub trait SubscriptionRepository: Send + Sync {
    /// Live subscription of a member.
    ///
    /// Returns `None` if the member has none.
    async fn find_by_member(
        &self,
        member_id: &MemberId,
    ) -> Result<Option<Subscription>, DomainError>;

    /// Every live subscription.
    async fn list_all(&self) -> Result<Vec<Subscription>, DomainError>;

    /// Inserts or replaces the member's subscription, archiving the old one.
    ///
    /// Returns the history entry written, if a record was replaced. A
    /// replacement keeps the live record's `created_at`.
    ///
    /// # Errors
    ///
    /// - `DatabaseError` on persistence failure; nothing is written
    async fn upsert(
        &self,
        subscription: &Subscription,
    ) -> Result<Option<SubscriptionHistoryEntry>, DomainError>;

    /// Archived subscriptions, newest first, optionally for one member.
    async fn list_history(
        &self,
        member_id: Option<&MemberId>,
    ) -> Result<Vec<SubscriptionHistoryEntry>, DomainError>;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn subscription_repository_is_object_safe() {
        fn _accepts_dyn(_repo: &dyn SubscriptionRepository) {}
    }
}
