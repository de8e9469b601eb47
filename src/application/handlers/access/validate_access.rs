//! ValidateAccessHandler - Query handler for "may this code come in?".

use std::sync::Arc;

use tracing::debug;

use crate::domain::access::{AccessError, AccessValidation};
use crate::domain::foundation::{MemberId, Timestamp};
use crate::domain::subscription::lifecycle;
use crate::ports::{AttendanceRepository, MemberRepository, SubscriptionRepository};

/// Checks a scanned code. Never changes session state.
pub struct ValidateAccessHandler {
    members: Arc<dyn MemberRepository>,
    subscriptions: Arc<dyn SubscriptionRepository>,
    attendance: Arc<dyn AttendanceRepository>,
}

impl ValidateAccessHandler {
    pub fn new(
        members: Arc<dyn MemberRepository>,
        subscriptions: Arc<dyn SubscriptionRepository>,
        attendance: Arc<dyn AttendanceRepository>,
    ) -> Self {
        Self {
            members,
            subscriptions,
            attendance,
        }
    }

    pub async fn handle(&self, code: &str) -> Result<AccessValidation, AccessError> {
        self.handle_at(code, Timestamp::now()).await
    }

    /// Resolves the code to exactly one outcome.
    ///
    /// # Errors
    ///
    /// `AccessError::Unavailable` when the store cannot be read. An outage is
    /// never reported as an invalid code.
    pub async fn handle_at(
        &self,
        code: &str,
        now: Timestamp,
    ) -> Result<AccessValidation, AccessError> {
        // 1. Malformed codes cannot belong to anyone
        let member_id = match MemberId::parse(code.trim()) {
            Ok(id) => id,
            Err(e) => {
                debug!(code = code, reason = %e, "Scanned code is not a member id");
                return Ok(AccessValidation::invalid());
            }
        };

        // 2. Resolve the member
        let Some(member) = self.members.find_by_id(&member_id).await? else {
            return Ok(AccessValidation::invalid());
        };

        // 3. Subscription must be active right now
        let subscription = self.subscriptions.find_by_member(&member_id).await?;
        let subscription = match subscription {
            Some(sub) if lifecycle::is_active_at(Some(&sub), now) => sub,
            other => return Ok(AccessValidation::expired(member, other)),
        };

        // 4. Already inside?
        if self.attendance.find_session(&member_id).await?.is_some() {
            return Ok(AccessValidation::already_checked_in(member, subscription));
        }

        Ok(AccessValidation::granted(member, subscription))
    }
}
