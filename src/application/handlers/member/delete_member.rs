//! DeleteMemberHandler - Command handler for removing a member.

use std::sync::Arc;

use tracing::info;

use crate::domain::foundation::MemberId;
use crate::domain::member::MemberError;
use crate::ports::MemberRepository;

#[derive(Debug, Clone)]
pub struct DeleteMemberCommand {
    pub member_id: MemberId,
}

/// Removes the member with their live subscription, intake records and any
/// open session. History and scan logs are kept.
pub struct DeleteMemberHandler {
    members: Arc<dyn MemberRepository>,
}

impl DeleteMemberHandler {
    pub fn new(members: Arc<dyn MemberRepository>) -> Self {
        Self { members }
    }

    pub async fn handle(&self, cmd: DeleteMemberCommand) -> Result<(), MemberError> {
        if !self.members.delete(&cmd.member_id).await? {
            return Err(MemberError::not_found(cmd.member_id));
        }
        info!(member_id = %cmd.member_id, "Member deleted");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::adapters::memory::InMemoryStore;
    use crate::domain::foundation::{LocalCalendar, Timestamp};
    use crate::domain::member::{Member, MemberProfile};
    use crate::domain::subscription::Subscription;
    use crate::ports::SubscriptionRepository;

    #[tokio::test]
    async fn deletes_member_and_keeps_history() {
        let store = InMemoryStore::default();
        let id = MemberId::parse("BCF-1001").unwrap();
        let now = Timestamp::now();
        store
            .save(&Member::register(id.clone(), "Ana", MemberProfile::default(), now).unwrap())
            .await
            .unwrap();
        let cal = LocalCalendar::utc();
        store.upsert(&Subscription::create_regular(id.clone(), 1, now, &cal).unwrap()).await.unwrap();
        store.upsert(&Subscription::create_regular(id.clone(), 6, now, &cal).unwrap()).await.unwrap();
        let handler = DeleteMemberHandler::new(Arc::new(store.clone()));

        handler
            .handle(DeleteMemberCommand {
                member_id: id.clone(),
            })
            .await
            .unwrap();

        assert!(store.find_by_id(&id).await.unwrap().is_none());
        assert!(store.find_by_member(&id).await.unwrap().is_none());
        assert_eq!(store.list_history(Some(&id)).await.unwrap().len(), 1);
    }

    #[tokio::test]
    async fn deleting_twice_reports_not_found() {
        let store = InMemoryStore::default();
        let handler = DeleteMemberHandler::new(Arc::new(store));
        let err = handler
            .handle(DeleteMemberCommand {
                member_id: MemberId::parse("BCF-1001").unwrap(),
            })
            .await
            .unwrap_err();
        assert!(matches!(err, MemberError::NotFound(_)));
    }
}
