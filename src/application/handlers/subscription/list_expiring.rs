//! ListExpiringHandler - Query handler for members whose subscription ends soon.

use std::sync::Arc;

use tracing::warn;

use crate::domain::foundation::{MemberId, Timestamp};
use crate::domain::subscription::expiring_member_ids;
use crate::ports::SubscriptionRepository;

/// Query for members expiring within a threshold.
#[derive(Debug, Clone, Default)]
pub struct ListExpiringQuery {
    /// Falls back to the configured default when not given.
    pub threshold_days: Option<u32>,
}

#[derive(Debug, Clone)]
pub struct ListExpiringResult {
    pub threshold_days: u32,
    pub member_ids: Vec<MemberId>,
}

pub struct ListExpiringHandler {
    subscriptions: Arc<dyn SubscriptionRepository>,
    default_threshold_days: u32,
}

impl ListExpiringHandler {
    pub fn new(subscriptions: Arc<dyn SubscriptionRepository>, default_threshold_days: u32) -> Self {
        Self {
            subscriptions,
            default_threshold_days,
        }
    }

    /// Never fails; an unreadable store yields an empty list.
    pub async fn handle(&self, query: ListExpiringQuery) -> ListExpiringResult {
        let threshold_days = query.threshold_days.unwrap_or(self.default_threshold_days);
        let subscriptions = match self.subscriptions.list_all().await {
            Ok(subs) => subs,
            Err(e) => {
                warn!(error = %e, "Failed to list subscriptions, reporting none expiring");
                Vec::new()
            }
        };

        ListExpiringResult {
            threshold_days,
            member_ids: expiring_member_ids(&subscriptions, Timestamp::now(), threshold_days),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::adapters::memory::InMemoryStore;
    use crate::domain::subscription::Subscription;

    fn walk_in(n: u64, days_left: i64) -> Subscription {
        let now = Timestamp::now();
        Subscription::create_walk_in(
            MemberId::from_parts("BCF", n).unwrap(),
            now.add_days(-10),
            now.add_days(days_left).add(chrono::Duration::minutes(-1)),
            now,
        )
    }

    #[tokio::test]
    async fn uses_default_threshold() {
        let store = InMemoryStore::default();
        store.upsert(&walk_in(1, 2)).await.unwrap();
        store.upsert(&walk_in(2, 5)).await.unwrap();
        let handler = ListExpiringHandler::new(Arc::new(store), 3);

        let result = handler.handle(ListExpiringQuery::default()).await;

        assert_eq!(result.threshold_days, 3);
        assert_eq!(result.member_ids, vec![MemberId::parse("BCF-1").unwrap()]);
    }

    #[tokio::test]
    async fn explicit_threshold_widens_the_window() {
        let store = InMemoryStore::default();
        store.upsert(&walk_in(1, 2)).await.unwrap();
        store.upsert(&walk_in(2, 7)).await.unwrap();
        store.upsert(&walk_in(3, 9)).await.unwrap();
        let handler = ListExpiringHandler::new(Arc::new(store), 3);

        let result = handler
            .handle(ListExpiringQuery {
                threshold_days: Some(7),
            })
            .await;

        assert_eq!(result.member_ids.len(), 2);
    }

    #[tokio::test]
    async fn unreadable_store_yields_empty_list() {
        let store = InMemoryStore::default();
        store.upsert(&walk_in(1, 2)).await.unwrap();
        store.set_unavailable(true);
        let handler = ListExpiringHandler::new(Arc::new(store), 3);

        assert!(handler.handle(ListExpiringQuery::default()).await.member_ids.is_empty());
    }
}
