//! UpdateMemberHandler - Command handler for partial member edits.

use std::sync::Arc;

use tracing::info;

use crate::domain::foundation::{MemberId, Timestamp};
use crate::domain::member::{Member, MemberError, MemberUpdate};
use crate::ports::MemberRepository;

#[derive(Debug, Clone)]
pub struct UpdateMemberCommand {
    pub member_id: MemberId,
    pub update: MemberUpdate,
}

pub struct UpdateMemberHandler {
    members: Arc<dyn MemberRepository>,
}

impl UpdateMemberHandler {
    pub fn new(members: Arc<dyn MemberRepository>) -> Self {
        Self { members }
    }

    /// Applies only the supplied fields. `updated_at` is refreshed even for
    /// an empty update.
    pub async fn handle(&self, cmd: UpdateMemberCommand) -> Result<Member, MemberError> {
        let member = self
            .members
            .update(&cmd.member_id, cmd.update, Timestamp::now())
            .await?
            .ok_or_else(|| MemberError::not_found(cmd.member_id.clone()))?;

        info!(member_id = %member.id, "Member updated");
        Ok(member)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::adapters::memory::InMemoryStore;
    use crate::domain::member::MemberProfile;

    async fn setup() -> (InMemoryStore, UpdateMemberHandler, Member) {
        let store = InMemoryStore::default();
        let profile = MemberProfile {
            email: Some("ana@example.com".to_string()),
            phone: Some("0917 555 0101".to_string()),
            ..Default::default()
        };
        let created = Timestamp::parse_rfc3339("2024-01-01T00:00:00Z").unwrap();
        let member = Member::register(MemberId::parse("BCF-1001").unwrap(), "Ana", profile, created).unwrap();
        store.save(&member).await.unwrap();
        (store.clone(), UpdateMemberHandler::new(Arc::new(store)), member)
    }

    #[tokio::test]
    async fn only_supplied_fields_change() {
        let (_store, handler, member) = setup().await;

        let updated = handler
            .handle(UpdateMemberCommand {
                member_id: member.id.clone(),
                update: MemberUpdate {
                    phone: Some(Some("0917 555 0202".to_string())),
                    ..Default::default()
                },
            })
            .await
            .unwrap();

        assert_eq!(updated.profile.phone.as_deref(), Some("0917 555 0202"));
        assert_eq!(updated.profile.email, member.profile.email);
        assert_eq!(updated.name, "Ana");
        assert!(updated.updated_at.is_after(&member.updated_at));
    }

    #[tokio::test]
    async fn explicit_null_clears_field() {
        let (store, handler, member) = setup().await;
        let update: MemberUpdate = serde_json::from_str(r#"{"email": null}"#).unwrap();

        handler
            .handle(UpdateMemberCommand {
                member_id: member.id.clone(),
                update,
            })
            .await
            .unwrap();

        let stored = store.find_by_id(&member.id).await.unwrap().unwrap();
        assert_eq!(stored.profile.email, None);
        assert!(stored.profile.phone.is_some());
    }

    #[tokio::test]
    async fn empty_update_still_refreshes_timestamp() {
        let (_store, handler, member) = setup().await;
        let updated = handler
            .handle(UpdateMemberCommand {
                member_id: member.id.clone(),
                update: MemberUpdate::default(),
            })
            .await
            .unwrap();
        assert!(updated.updated_at.is_after(&member.updated_at));
    }

    #[tokio::test]
    async fn unknown_member_is_not_found() {
        let (_store, handler, _member) = setup().await;
        let err = handler
            .handle(UpdateMemberCommand {
                member_id: MemberId::parse("BCF-4242").unwrap(),
                update: MemberUpdate::default(),
            })
            .await
            .unwrap_err();
        assert!(matches!(err, MemberError::NotFound(_)));
    }

    #[tokio::test]
    async fn invalid_update_leaves_member_untouched() {
        let (store, handler, member) = setup().await;
        let err = handler
            .handle(UpdateMemberCommand {
                member_id: member.id.clone(),
                update: MemberUpdate {
                    name: Some("   ".to_string()),
                    phone: Some(None),
                    ..Default::default()
                },
            })
            .await
            .unwrap_err();

        assert!(matches!(err, MemberError::ValidationFailed { .. }));
        assert_eq!(store.find_by_id(&member.id).await.unwrap().unwrap(), member);
    }
}
