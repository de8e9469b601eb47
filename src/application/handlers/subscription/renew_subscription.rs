//! RenewSubscriptionHandler - Command handler for subscription renewals.

use std::sync::Arc;

use tracing::info;

use crate::domain::foundation::{LocalCalendar, MemberId, Timestamp};
use crate::domain::subscription::{
    MembershipType, PaymentStatus, Subscription, SubscriptionError, SubscriptionHistoryEntry,
};
use crate::ports::{MemberRepository, SubscriptionRepository};

use super::SubscriptionPlan;

/// Command to replace a member's subscription with a new one.
#[derive(Debug, Clone)]
pub struct RenewSubscriptionCommand {
    pub member_id: MemberId,
    pub plan: SubscriptionPlan,
    /// Keeps the previous preference when not given.
    pub coaching_preference: Option<bool>,
    pub payment_status: PaymentStatus,
    pub payment_date: Option<Timestamp>,
}

impl RenewSubscriptionCommand {
    pub fn new(member_id: MemberId, plan: SubscriptionPlan) -> Self {
        Self {
            member_id,
            plan,
            coaching_preference: None,
            payment_status: PaymentStatus::NotPaid,
            payment_date: None,
        }
    }

    pub fn paid(mut self, date: Timestamp) -> Self {
        self.payment_status = PaymentStatus::Paid;
        self.payment_date = Some(date);
        self
    }

    pub fn with_coaching(mut self, coaching: bool) -> Self {
        self.coaching_preference = Some(coaching);
        self
    }
}

/// Result of a renewal.
#[derive(Debug, Clone)]
pub struct RenewSubscriptionResult {
    pub subscription: Subscription,
    /// The record that was replaced, if any.
    pub archived: Option<SubscriptionHistoryEntry>,
}

/// Handler for renewals. Every renewal goes through the store's
/// upsert-with-archive.
pub struct RenewSubscriptionHandler {
    members: Arc<dyn MemberRepository>,
    subscriptions: Arc<dyn SubscriptionRepository>,
    calendar: LocalCalendar,
}

impl RenewSubscriptionHandler {
    pub fn new(
        members: Arc<dyn MemberRepository>,
        subscriptions: Arc<dyn SubscriptionRepository>,
        calendar: LocalCalendar,
    ) -> Self {
        Self {
            members,
            subscriptions,
            calendar,
        }
    }

    pub async fn handle(
        &self,
        cmd: RenewSubscriptionCommand,
    ) -> Result<RenewSubscriptionResult, SubscriptionError> {
        let now = Timestamp::now();

        // 1. Reject bad input before touching the store
        cmd.plan.validate(now)?;

        // 2. The member must exist
        if self.members.find_by_id(&cmd.member_id).await?.is_none() {
            return Err(SubscriptionError::member_not_found(cmd.member_id));
        }

        // 3. Build the new record
        let previous = self.subscriptions.find_by_member(&cmd.member_id).await?;
        let coaching = cmd
            .coaching_preference
            .or_else(|| previous.as_ref().map(|s| s.coaching_preference))
            .unwrap_or(false);
        let membership_type = if cmd.plan.is_walk_in() {
            MembershipType::WalkIn
        } else {
            MembershipType::Renewal
        };
        let mut subscription = cmd
            .plan
            .build(cmd.member_id.clone(), now, &self.calendar)?
            .with_membership_type(membership_type)
            .with_payment(cmd.payment_status, cmd.payment_date)
            .with_coaching(coaching);
        if let Some(previous) = &previous {
            subscription.created_at = previous.created_at;
        }

        // 4. Archive and replace
        let archived = self.subscriptions.upsert(&subscription).await?;

        info!(
            member_id = %subscription.member_id,
            kind = ?subscription.kind,
            end_date = %subscription.end_date.as_datetime(),
            archived = archived.is_some(),
            "Subscription renewed"
        );

        Ok(RenewSubscriptionResult {
            subscription,
            archived,
        })
    }

    /// Renews for `months` calendar months from now.
    pub async fn renew_regular(
        &self,
        member_id: MemberId,
        months: u32,
    ) -> Result<Subscription, SubscriptionError> {
        let plan = SubscriptionPlan::Regular {
            months,
            start: None,
        };
        Ok(self
            .handle(RenewSubscriptionCommand::new(member_id, plan))
            .await?
            .subscription)
    }

    /// Renews with a day pass.
    pub async fn renew_daily(
        &self,
        member_id: MemberId,
        start: Option<Timestamp>,
    ) -> Result<Subscription, SubscriptionError> {
        let plan = SubscriptionPlan::Daily { start };
        Ok(self
            .handle(RenewSubscriptionCommand::new(member_id, plan))
            .await?
            .subscription)
    }

    /// Renews as a walk-in from now until `end`.
    pub async fn renew_walk_in(
        &self,
        member_id: MemberId,
        end: Timestamp,
    ) -> Result<Subscription, SubscriptionError> {
        let plan = SubscriptionPlan::WalkIn { start: None, end };
        Ok(self
            .handle(RenewSubscriptionCommand::new(member_id, plan))
            .await?
            .subscription)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::adapters::memory::InMemoryStore;
    use crate::domain::member::{Member, MemberProfile};
    use crate::domain::subscription::{SubscriptionKind, SubscriptionStatus};
    use crate::ports::MemberIdAllocator;

    async fn setup() -> (InMemoryStore, RenewSubscriptionHandler, MemberId) {
        let store = InMemoryStore::default();
        let id = store.next_member_id().await.unwrap();
        let member = Member::register(id.clone(), "Ana", MemberProfile::default(), Timestamp::now()).unwrap();
        store.save(&member).await.unwrap();
        let handler = RenewSubscriptionHandler::new(
            Arc::new(store.clone()),
            Arc::new(store.clone()),
            LocalCalendar::utc(),
        );
        (store, handler, id)
    }

    #[tokio::test]
    async fn first_renewal_inserts_without_archive() {
        let (store, handler, id) = setup().await;

        let result = handler
            .handle(RenewSubscriptionCommand::new(
                id.clone(),
                SubscriptionPlan::Regular { months: 1, start: None },
            ))
            .await
            .unwrap();

        assert!(result.archived.is_none());
        assert_eq!(result.subscription.membership_type, MembershipType::Renewal);
        assert_eq!(result.subscription.status, SubscriptionStatus::Active);
        assert_eq!(store.history_count().await, 0);
    }

    #[tokio::test]
    async fn renewal_archives_previous_subscription() {
        let (store, handler, id) = setup().await;
        let first = handler.renew_regular(id.clone(), 1).await.unwrap();

        let result = handler
            .handle(
                RenewSubscriptionCommand::new(id.clone(), SubscriptionPlan::Regular { months: 6, start: None })
                    .paid(Timestamp::now()),
            )
            .await
            .unwrap();

        assert_eq!(result.archived.unwrap().subscription, first);
        assert_eq!(result.subscription.payment_status, PaymentStatus::Paid);
        assert_eq!(store.find_by_member(&id).await.unwrap(), Some(result.subscription));
        assert_eq!(store.history_count().await, 1);
    }

    #[tokio::test]
    async fn renewal_keeps_the_original_creation_time() {
        let (store, handler, id) = setup().await;
        let first = handler.renew_regular(id.clone(), 1).await.unwrap();

        let renewed = handler.renew_regular(id.clone(), 3).await.unwrap();

        assert_eq!(renewed.created_at, first.created_at);
        let live = store.find_by_member(&id).await.unwrap().unwrap();
        assert_eq!(live.created_at, first.created_at);
        assert_eq!(live.end_date, renewed.end_date);
    }

    #[tokio::test]
    async fn coaching_preference_carries_over() {
        let (_store, handler, id) = setup().await;
        handler
            .handle(
                RenewSubscriptionCommand::new(id.clone(), SubscriptionPlan::Daily { start: None })
                    .with_coaching(true),
            )
            .await
            .unwrap();

        let next = handler.renew_daily(id, None).await.unwrap();

        assert!(next.coaching_preference);
        assert_eq!(next.kind, SubscriptionKind::Daily);
    }

    #[tokio::test]
    async fn walk_in_renewal_is_marked_walk_in() {
        let (_store, handler, id) = setup().await;
        let sub = handler
            .renew_walk_in(id, Timestamp::now().add_days(5))
            .await
            .unwrap();
        assert_eq!(sub.membership_type, MembershipType::WalkIn);
        assert_eq!(sub.kind, SubscriptionKind::WalkIn);
    }

    #[tokio::test]
    async fn walk_in_ending_in_the_past_is_rejected_before_writing() {
        let (store, handler, id) = setup().await;
        let err = handler
            .renew_walk_in(id.clone(), Timestamp::now().add_days(-1))
            .await
            .unwrap_err();
        assert!(matches!(err, SubscriptionError::InvalidWindow { .. }));
        assert!(store.find_by_member(&id).await.unwrap().is_none());
    }

    #[tokio::test]
    async fn unknown_member_is_rejected() {
        let (_store, handler, _id) = setup().await;
        let err = handler
            .renew_regular(MemberId::parse("BCF-4242").unwrap(), 1)
            .await
            .unwrap_err();
        assert!(matches!(err, SubscriptionError::MemberNotFound(_)));
    }

    #[tokio::test]
    async fn store_failure_is_surfaced() {
        let (store, handler, id) = setup().await;
        store.set_unavailable(true);
        let err = handler.renew_regular(id, 1).await.unwrap_err();
        assert!(matches!(err, SubscriptionError::Infrastructure(_)));
    }
}
