//! ListHistoryHandler - Query handler for archived subscriptions.

use std::sync::Arc;

use tracing::warn;

use crate::domain::foundation::MemberId;
use crate::domain::subscription::SubscriptionHistoryEntry;
use crate::ports::SubscriptionRepository;

#[derive(Debug, Clone, Default)]
pub struct ListHistoryQuery {
    pub member_id: Option<MemberId>,
}

pub struct ListHistoryHandler {
    subscriptions: Arc<dyn SubscriptionRepository>,
}

impl ListHistoryHandler {
    pub fn new(subscriptions: Arc<dyn SubscriptionRepository>) -> Self {
        Self { subscriptions }
    }

    /// Newest first. An unreadable store yields an empty list.
    pub async fn handle(&self, query: ListHistoryQuery) -> Vec<SubscriptionHistoryEntry> {
        match self.subscriptions.list_history(query.member_id.as_ref()).await {
            Ok(entries) => entries,
            Err(e) => {
                warn!(error = %e, member_id = ?query.member_id, "Failed to list subscription history");
                Vec::new()
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::adapters::memory::InMemoryStore;
    use crate::domain::foundation::{LocalCalendar, Timestamp};
    use crate::domain::subscription::Subscription;

    #[tokio::test]
    async fn returns_entries_for_member() {
        let store = InMemoryStore::default();
        let id = MemberId::parse("BCF-1001").unwrap();
        let cal = LocalCalendar::utc();
        for months in [1, 6, 12] {
            let sub = Subscription::create_regular(id.clone(), months, Timestamp::now(), &cal).unwrap();
            store.upsert(&sub).await.unwrap();
        }
        let handler = ListHistoryHandler::new(Arc::new(store));

        let entries = handler
            .handle(ListHistoryQuery {
                member_id: Some(id),
            })
            .await;

        assert_eq!(entries.len(), 2);
        assert_eq!(entries[0].subscription.plan_duration().as_deref(), Some("6 months"));
        assert_eq!(entries[1].subscription.plan_duration().as_deref(), Some("1 month"));
    }

    #[tokio::test]
    async fn unreadable_store_yields_empty_list() {
        let store = InMemoryStore::default();
        store.set_unavailable(true);
        let handler = ListHistoryHandler::new(Arc::new(store));
        assert!(handler.handle(ListHistoryQuery::default()).await.is_empty());
    }
}
