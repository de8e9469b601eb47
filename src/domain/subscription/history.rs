//! Archived subscription records.

use serde::{Deserialize, Serialize};

use crate::domain::foundation::{HistoryEntryId, MemberId, Timestamp};

use super::Subscription;

/// Snapshot of a subscription taken just before it was replaced.
///
/// Entries are append-only and never mutated.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SubscriptionHistoryEntry {
    pub id: HistoryEntryId,

    /// The replaced record, verbatim.
    pub subscription: Subscription,

    pub archived_at: Timestamp,
}

impl SubscriptionHistoryEntry {
    /// Archives `subscription` as of `archived_at`.
    pub fn archive(subscription: Subscription, archived_at: Timestamp) -> Self {
        Self {
            id: HistoryEntryId::new(),
            subscription,
            archived_at,
        }
    }

    pub fn member_id(&self) -> &MemberId {
        &self.subscription.member_id
    }
}
