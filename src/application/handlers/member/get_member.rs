//! GetMemberHandler - Query handler for a member's full record.

use std::sync::Arc;

use serde::Serialize;

use crate::domain::attendance::ActiveSession;
use crate::domain::foundation::{MemberId, Timestamp};
use crate::domain::member::{
    EmergencyContact, LiabilityWaiver, MedicalHistory, Member, MemberError,
};
use crate::domain::subscription::{lifecycle, Subscription};
use crate::ports::{AttendanceRepository, IntakeRepository, MemberRepository, SubscriptionRepository};

#[derive(Debug, Clone)]
pub struct GetMemberQuery {
    pub member_id: MemberId,
}

/// Everything the desk shows on a member's page.
#[derive(Debug, Clone, Serialize)]
pub struct MemberDetail {
    pub member: Member,
    pub subscription: Option<Subscription>,
    pub is_active: bool,
    pub remaining_days: u32,
    pub medical_history: Option<MedicalHistory>,
    pub emergency_contact: Option<EmergencyContact>,
    pub liability_waiver: Option<LiabilityWaiver>,
    pub session: Option<ActiveSession>,
}

pub struct GetMemberHandler {
    members: Arc<dyn MemberRepository>,
    subscriptions: Arc<dyn SubscriptionRepository>,
    intake: Arc<dyn IntakeRepository>,
    attendance: Arc<dyn AttendanceRepository>,
}

impl GetMemberHandler {
    pub fn new(
        members: Arc<dyn MemberRepository>,
        subscriptions: Arc<dyn SubscriptionRepository>,
        intake: Arc<dyn IntakeRepository>,
        attendance: Arc<dyn AttendanceRepository>,
    ) -> Self {
        Self {
            members,
            subscriptions,
            intake,
            attendance,
        }
    }

    pub async fn handle(&self, query: GetMemberQuery) -> Result<MemberDetail, MemberError> {
        let id = &query.member_id;
        let member = self
            .members
            .find_by_id(id)
            .await?
            .ok_or_else(|| MemberError::not_found(id.clone()))?;

        let subscription = self.subscriptions.find_by_member(id).await?;
        let now = Timestamp::now();

        Ok(MemberDetail {
            is_active: lifecycle::is_active_at(subscription.as_ref(), now),
            remaining_days: lifecycle::remaining_days_at(subscription.as_ref(), now),
            medical_history: self.intake.find_medical_history(id).await?,
            emergency_contact: self.intake.find_emergency_contact(id).await?,
            liability_waiver: self.intake.find_liability_waiver(id).await?,
            session: self.attendance.find_session(id).await?,
            member,
            subscription,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::adapters::memory::InMemoryStore;
    use crate::domain::foundation::LocalCalendar;
    use crate::domain::member::MemberProfile;

    fn handler(store: &InMemoryStore) -> GetMemberHandler {
        GetMemberHandler::new(
            Arc::new(store.clone()),
            Arc::new(store.clone()),
            Arc::new(store.clone()),
            Arc::new(store.clone()),
        )
    }

    #[tokio::test]
    async fn detail_includes_subscription_and_session() {
        let store = InMemoryStore::default();
        let id = MemberId::parse("BCF-1001").unwrap();
        let now = Timestamp::now();
        store
            .save(&Member::register(id.clone(), "Ana", MemberProfile::default(), now).unwrap())
            .await
            .unwrap();
        store
            .upsert(&Subscription::create_regular(id.clone(), 1, now, &LocalCalendar::utc()).unwrap())
            .await
            .unwrap();
        store
            .start_session(&ActiveSession::start(id.clone(), "Ana", now))
            .await
            .unwrap();

        let detail = handler(&store)
            .handle(GetMemberQuery { member_id: id })
            .await
            .unwrap();

        assert!(detail.is_active);
        assert!(detail.remaining_days >= 28);
        assert!(detail.session.is_some());
        assert!(detail.medical_history.is_none());
    }

    #[tokio::test]
    async fn member_without_subscription_is_inactive() {
        let store = InMemoryStore::default();
        let id = MemberId::parse("BCF-1001").unwrap();
        store
            .save(&Member::register(id.clone(), "Ana", MemberProfile::default(), Timestamp::now()).unwrap())
            .await
            .unwrap();

        let detail = handler(&store)
            .handle(GetMemberQuery { member_id: id })
            .await
            .unwrap();

        assert!(!detail.is_active);
        assert_eq!(detail.remaining_days, 0);
    }

    #[tokio::test]
    async fn unknown_member_is_not_found() {
        let store = InMemoryStore::default();
        let err = handler(&store)
            .handle(GetMemberQuery {
                member_id: MemberId::parse("BCF-1001").unwrap(),
            })
            .await
            .unwrap_err();
        assert!(matches!(err, MemberError::NotFound(_)));
    }
}
