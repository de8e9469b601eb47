//! ListMembersHandler - Query handler for the member table.

use std::collections::HashMap;
use std::sync::Arc;

use serde::Serialize;
use tracing::{debug, warn};

use crate::domain::foundation::{MemberId, Timestamp};
use crate::domain::member::Member;
use crate::domain::subscription::{lifecycle, Subscription};
use crate::ports::{MemberRepository, SubscriptionRepository};

/// Read-through subscription lookup scoped to one request.
///
/// Each member's subscription is fetched at most once. Failed reads are not
/// cached and show up as "no subscription".
pub struct SubscriptionLookup {
    subscriptions: Arc<dyn SubscriptionRepository>,
    cache: HashMap<MemberId, Option<Subscription>>,
}

impl SubscriptionLookup {
    pub fn new(subscriptions: Arc<dyn SubscriptionRepository>) -> Self {
        Self {
            subscriptions,
            cache: HashMap::new(),
        }
    }

    pub async fn get(&mut self, member_id: &MemberId) -> Option<Subscription> {
        if let Some(cached) = self.cache.get(member_id) {
            return cached.clone();
        }
        match self.subscriptions.find_by_member(member_id).await {
            Ok(found) => {
                self.cache.insert(member_id.clone(), found.clone());
                found
            }
            Err(e) => {
                warn!(error = %e, member_id = %member_id, "Subscription lookup failed");
                None
            }
        }
    }

    pub fn cached(&self) -> usize {
        self.cache.len()
    }
}

/// One row of the member table.
#[derive(Debug, Clone, Serialize)]
pub struct MemberSummary {
    pub member: Member,
    pub subscription: Option<Subscription>,
    pub is_active: bool,
    pub remaining_days: u32,
    pub expiring_soon: bool,
}

pub struct ListMembersHandler {
    members: Arc<dyn MemberRepository>,
    subscriptions: Arc<dyn SubscriptionRepository>,
    threshold_days: u32,
}

impl ListMembersHandler {
    pub fn new(
        members: Arc<dyn MemberRepository>,
        subscriptions: Arc<dyn SubscriptionRepository>,
        threshold_days: u32,
    ) -> Self {
        Self {
            members,
            subscriptions,
            threshold_days,
        }
    }

    /// Newest members first. An unreadable store yields an empty table.
    pub async fn handle(&self) -> Vec<MemberSummary> {
        let members = match self.members.list().await {
            Ok(members) => members,
            Err(e) => {
                warn!(error = %e, "Failed to list members");
                return Vec::new();
            }
        };

        let now = Timestamp::now();
        let mut lookup = SubscriptionLookup::new(self.subscriptions.clone());
        let mut rows = Vec::with_capacity(members.len());
        for member in members {
            let subscription = lookup.get(&member.id).await;
            let sub = subscription.as_ref();
            rows.push(MemberSummary {
                is_active: lifecycle::is_active_at(sub, now),
                remaining_days: lifecycle::remaining_days_at(sub, now),
                expiring_soon: lifecycle::is_expiring_soon_at(sub, now, self.threshold_days),
                subscription,
                member,
            });
        }

        debug!(rows = rows.len(), lookups = lookup.cached(), "Member table built");
        rows
    }
}
