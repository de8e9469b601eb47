//! In-Memory Record Store Adapter
//!
//! Implements every store port over a single lock-guarded state, so
//! multi-record writes (upsert with archive, cascading deletes) are atomic.
//! Useful for testing and development.

use async_trait::async_trait;
use std::collections::HashMap;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use tokio::sync::RwLock;

use crate::domain::attendance::{ActiveSession, ScanLog, ScanLogFilter};
use crate::domain::foundation::{DomainError, ErrorCode, MemberId, Timestamp};
use crate::domain::member::{EmergencyContact, LiabilityWaiver, MedicalHistory, Member, MemberUpdate};
use crate::domain::subscription::{Subscription, SubscriptionHistoryEntry};
use crate::ports::{
    AttendanceRepository, IntakeRepository, MemberIdAllocator, MemberRepository,
    SubscriptionRepository,
};

#[derive(Debug, Default)]
struct StoreState {
    counter: u64,
    members: HashMap<MemberId, Member>,
    subscriptions: HashMap<MemberId, Subscription>,
    history: Vec<SubscriptionHistoryEntry>,
    medical: HashMap<MemberId, MedicalHistory>,
    contacts: HashMap<MemberId, EmergencyContact>,
    waivers: HashMap<MemberId, LiabilityWaiver>,
    scan_logs: Vec<ScanLog>,
    sessions: HashMap<MemberId, ActiveSession>,
}

/// In-memory record store.
///
/// Cloning shares the underlying state.
#[derive(Debug, Clone)]
pub struct InMemoryStore {
    prefix: String,
    state: Arc<RwLock<StoreState>>,
    unavailable: Arc<AtomicBool>,
}

impl InMemoryStore {
    /// Creates an empty store. The first allocated id is `prefix-(seed + 1)`.
    pub fn new(prefix: impl Into<String>, counter_seed: u64) -> Self {
        Self {
            prefix: prefix.into(),
            state: Arc::new(RwLock::new(StoreState {
                counter: counter_seed,
                ..Default::default()
            })),
            unavailable: Arc::new(AtomicBool::new(false)),
        }
    }

    /// Makes every call fail with `DatabaseError` until switched back.
    pub fn set_unavailable(&self, unavailable: bool) {
        self.unavailable.store(unavailable, Ordering::SeqCst);
    }

    /// Clear all stored data (useful for tests). The counter is kept.
    pub async fn clear(&self) {
        let mut state = self.state.write().await;
        let counter = state.counter;
        *state = StoreState {
            counter,
            ..Default::default()
        };
    }

    /// Number of archived subscriptions.
    pub async fn history_count(&self) -> usize {
        self.state.read().await.history.len()
    }

    fn check(&self) -> Result<(), DomainError> {
        if self.unavailable.load(Ordering::SeqCst) {
            return Err(DomainError::database("store unavailable"));
        }
        Ok(())
    }
}

impl Default for InMemoryStore {
    fn default() -> Self {
        Self::new("BCF", 1000)
    }
}

#[async_trait]
impl MemberIdAllocator for InMemoryStore {
    async fn next_member_id(&self) -> Result<MemberId, DomainError> {
        self.check()?;
        let mut state = self.state.write().await;
        state.counter += 1;
        Ok(MemberId::from_parts(&self.prefix, state.counter)?)
    }
}

#[async_trait]
impl MemberRepository for InMemoryStore {
    async fn save(&self, member: &Member) -> Result<(), DomainError> {
        self.check()?;
        let mut state = self.state.write().await;
        if state.members.contains_key(&member.id) {
            return Err(DomainError::new(
                ErrorCode::MemberExists,
                format!("Member {} already exists", member.id),
            ));
        }
        state.members.insert(member.id.clone(), member.clone());
        Ok(())
    }

    async fn update(
        &self,
        id: &MemberId,
        update: MemberUpdate,
        now: Timestamp,
    ) -> Result<Option<Member>, DomainError> {
        self.check()?;
        let mut state = self.state.write().await;
        let Some(member) = state.members.get_mut(id) else {
            return Ok(None);
        };
        member.apply(update, now)?;
        Ok(Some(member.clone()))
    }

    async fn find_by_id(&self, id: &MemberId) -> Result<Option<Member>, DomainError> {
        self.check()?;
        Ok(self.state.read().await.members.get(id).cloned())
    }

    async fn list(&self) -> Result<Vec<Member>, DomainError> {
        self.check()?;
        let state = self.state.read().await;
        let mut members: Vec<Member> = state.members.values().cloned().collect();
        members.sort_by(|a, b| {
            b.created_at
                .cmp(&a.created_at)
                .then_with(|| b.id.number().cmp(&a.id.number()))
        });
        Ok(members)
    }

    async fn delete(&self, id: &MemberId) -> Result<bool, DomainError> {
        self.check()?;
        let mut state = self.state.write().await;
        if state.members.remove(id).is_none() {
            return Ok(false);
        }
        state.subscriptions.remove(id);
        state.medical.remove(id);
        state.contacts.remove(id);
        state.waivers.remove(id);
        state.sessions.remove(id);
        Ok(true)
    }
}

#[async_trait]
impl SubscriptionRepository for InMemoryStore {
    async fn find_by_member(
        &self,
        member_id: &MemberId,
    ) -> Result<Option<Subscription>, DomainError> {
        self.check()?;
        Ok(self.state.read().await.subscriptions.get(member_id).cloned())
    }

    async fn list_all(&self) -> Result<Vec<Subscription>, DomainError> {
        self.check()?;
        let state = self.state.read().await;
        let mut subs: Vec<Subscription> = state.subscriptions.values().cloned().collect();
        subs.sort_by(|a, b| a.member_id.cmp(&b.member_id));
        Ok(subs)
    }

    async fn upsert(
        &self,
        subscription: &Subscription,
    ) -> Result<Option<SubscriptionHistoryEntry>, DomainError> {
        self.check()?;
        let mut state = self.state.write().await;
        let mut stored = subscription.clone();
        if let Some(previous) = state.subscriptions.get(&subscription.member_id) {
            stored.created_at = previous.created_at;
        }
        let archived = state
            .subscriptions
            .insert(subscription.member_id.clone(), stored)
            .map(|previous| SubscriptionHistoryEntry::archive(previous, Timestamp::now()));
        if let Some(entry) = &archived {
            state.history.push(entry.clone());
        }
        Ok(archived)
    }

    async fn list_history(
        &self,
        member_id: Option<&MemberId>,
    ) -> Result<Vec<SubscriptionHistoryEntry>, DomainError> {
        self.check()?;
        let state = self.state.read().await;
        // Insertion order is archive order.
        Ok(state
            .history
            .iter()
            .rev()
            .filter(|entry| member_id.map_or(true, |id| entry.member_id() == id))
            .cloned()
            .collect())
    }
}

fn exists(member_id: &MemberId, form: &str) -> DomainError {
    DomainError::new(
        ErrorCode::IntakeRecordExists,
        format!("Member {} already has a {}", member_id, form),
    )
    .with_detail("form", form)
}

fn missing(member_id: &MemberId, form: &str) -> DomainError {
    DomainError::new(
        ErrorCode::MemberNotFound,
        format!("No {} on file for member {}", form, member_id),
    )
    .with_detail("form", form)
}

#[async_trait]
impl IntakeRepository for InMemoryStore {
    async fn find_medical_history(
        &self,
        member_id: &MemberId,
    ) -> Result<Option<MedicalHistory>, DomainError> {
        self.check()?;
        Ok(self.state.read().await.medical.get(member_id).cloned())
    }

    async fn save_medical_history(&self, history: &MedicalHistory) -> Result<(), DomainError> {
        self.check()?;
        let mut state = self.state.write().await;
        if state.medical.contains_key(&history.member_id) {
            return Err(exists(&history.member_id, "medical history"));
        }
        state.medical.insert(history.member_id.clone(), history.clone());
        Ok(())
    }

    async fn update_medical_history(&self, history: &MedicalHistory) -> Result<(), DomainError> {
        self.check()?;
        let mut state = self.state.write().await;
        match state.medical.get_mut(&history.member_id) {
            Some(slot) => {
                *slot = history.clone();
                Ok(())
            }
            None => Err(missing(&history.member_id, "medical history")),
        }
    }

    async fn find_emergency_contact(
        &self,
        member_id: &MemberId,
    ) -> Result<Option<EmergencyContact>, DomainError> {
        self.check()?;
        Ok(self.state.read().await.contacts.get(member_id).cloned())
    }

    async fn save_emergency_contact(&self, contact: &EmergencyContact) -> Result<(), DomainError> {
        self.check()?;
        let mut state = self.state.write().await;
        if state.contacts.contains_key(&contact.member_id) {
            return Err(exists(&contact.member_id, "emergency contact"));
        }
        state.contacts.insert(contact.member_id.clone(), contact.clone());
        Ok(())
    }

    async fn update_emergency_contact(
        &self,
        contact: &EmergencyContact,
    ) -> Result<(), DomainError> {
        self.check()?;
        let mut state = self.state.write().await;
        match state.contacts.get_mut(&contact.member_id) {
            Some(slot) => {
                *slot = contact.clone();
                Ok(())
            }
            None => Err(missing(&contact.member_id, "emergency contact")),
        }
    }

    async fn find_liability_waiver(
        &self,
        member_id: &MemberId,
    ) -> Result<Option<LiabilityWaiver>, DomainError> {
        self.check()?;
        Ok(self.state.read().await.waivers.get(member_id).cloned())
    }

    async fn save_liability_waiver(&self, waiver: &LiabilityWaiver) -> Result<(), DomainError> {
        self.check()?;
        let mut state = self.state.write().await;
        if state.waivers.contains_key(&waiver.member_id) {
            return Err(exists(&waiver.member_id, "liability waiver"));
        }
        state.waivers.insert(waiver.member_id.clone(), waiver.clone());
        Ok(())
    }
}

#[async_trait]
impl AttendanceRepository for InMemoryStore {
    async fn append_scan_log(&self, log: &ScanLog) -> Result<(), DomainError> {
        self.check()?;
        self.state.write().await.scan_logs.push(log.clone());
        Ok(())
    }

    async fn list_scan_logs(&self, filter: &ScanLogFilter) -> Result<Vec<ScanLog>, DomainError> {
        self.check()?;
        let state = self.state.read().await;
        let mut logs: Vec<ScanLog> = state
            .scan_logs
            .iter()
            .filter(|log| filter.matches(log))
            .cloned()
            .collect();
        // Stable sort keeps append order for equal timestamps; reverse of
        // that is newest first.
        logs.reverse();
        logs.sort_by(|a, b| b.timestamp.cmp(&a.timestamp));
        Ok(logs)
    }

    async fn find_session(
        &self,
        member_id: &MemberId,
    ) -> Result<Option<ActiveSession>, DomainError> {
        self.check()?;
        Ok(self.state.read().await.sessions.get(member_id).cloned())
    }

    async fn list_sessions(&self) -> Result<Vec<ActiveSession>, DomainError> {
        self.check()?;
        let state = self.state.read().await;
        let mut sessions: Vec<ActiveSession> = state.sessions.values().cloned().collect();
        sessions.sort_by(|a, b| b.check_in_time.cmp(&a.check_in_time));
        Ok(sessions)
    }

    async fn start_session(&self, session: &ActiveSession) -> Result<(), DomainError> {
        self.check()?;
        let mut state = self.state.write().await;
        if state.sessions.contains_key(&session.member_id) {
            return Err(DomainError::new(
                ErrorCode::SessionExists,
                format!("Member {} is already checked in", session.member_id),
            ));
        }
        state
            .sessions
            .insert(session.member_id.clone(), session.clone());
        Ok(())
    }

    async fn end_session(
        &self,
        member_id: &MemberId,
    ) -> Result<Option<ActiveSession>, DomainError> {
        self.check()?;
        Ok(self.state.write().await.sessions.remove(member_id))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::attendance::{ScanAction, ScanStatus};
    use crate::domain::foundation::LocalCalendar;
    use crate::domain::member::MemberProfile;
    use crate::domain::subscription::MembershipType;

    fn ts(s: &str) -> Timestamp {
        Timestamp::parse_rfc3339(s).unwrap()
    }

    async fn member(store: &InMemoryStore, name: &str) -> Member {
        let id = store.next_member_id().await.unwrap();
        let member = Member::register(id, name, MemberProfile::default(), Timestamp::now()).unwrap();
        store.save(&member).await.unwrap();
        member
    }

    // ════════════════════════════════════════════════════════════════════════════
    // Id allocation
    // ════════════════════════════════════════════════════════════════════════════

    #[tokio::test]
    async fn first_id_follows_seed() {
        let store = InMemoryStore::new("BCF", 1000);
        assert_eq!(store.next_member_id().await.unwrap().as_str(), "BCF-1001");
        assert_eq!(store.next_member_id().await.unwrap().as_str(), "BCF-1002");
    }

    #[tokio::test]
    async fn concurrent_allocations_are_distinct() {
        let store = InMemoryStore::default();
        let handles: Vec<_> = (0..50)
            .map(|_| {
                let store = store.clone();
                tokio::spawn(async move { store.next_member_id().await.unwrap() })
            })
            .collect();

        let mut ids = std::collections::HashSet::new();
        for handle in handles {
            assert!(ids.insert(handle.await.unwrap()));
        }
        assert_eq!(ids.len(), 50);
    }

    // ════════════════════════════════════════════════════════════════════════════
    // Members
    // ════════════════════════════════════════════════════════════════════════════

    #[tokio::test]
    async fn duplicate_member_is_rejected() {
        let store = InMemoryStore::default();
        let ana = member(&store, "Ana").await;
        let err = store.save(&ana).await.unwrap_err();
        assert_eq!(err.code, ErrorCode::MemberExists);
    }

    #[tokio::test]
    async fn update_missing_member_returns_none() {
        let store = InMemoryStore::default();
        let id = MemberId::parse("BCF-9999").unwrap();
        let result = store
            .update(&id, MemberUpdate::default(), Timestamp::now())
            .await
            .unwrap();
        assert!(result.is_none());
    }

    #[tokio::test]
    async fn list_is_newest_first() {
        let store = InMemoryStore::default();
        let first = member(&store, "Ana").await;
        let second = member(&store, "Ben").await;
        let listed = store.list().await.unwrap();
        assert_eq!(listed[0].id, second.id);
        assert_eq!(listed[1].id, first.id);
    }

    #[tokio::test]
    async fn delete_cascades_to_live_records_but_keeps_logs() {
        let store = InMemoryStore::default();
        let ana = member(&store, "Ana").await;
        let now = Timestamp::now();
        let sub = Subscription::create_regular(ana.id.clone(), 1, now, &LocalCalendar::utc()).unwrap();
        store.upsert(&sub).await.unwrap();
        store.upsert(&sub).await.unwrap();
        store
            .start_session(&ActiveSession::start(ana.id.clone(), "Ana", now))
            .await
            .unwrap();
        store
            .append_scan_log(&ScanLog::new(ana.id.as_str(), "Ana", now, ScanAction::CheckIn, ScanStatus::Success))
            .await
            .unwrap();

        assert!(store.delete(&ana.id).await.unwrap());

        assert!(store.find_by_id(&ana.id).await.unwrap().is_none());
        assert!(store.find_by_member(&ana.id).await.unwrap().is_none());
        assert!(store.find_session(&ana.id).await.unwrap().is_none());
        assert_eq!(store.list_history(Some(&ana.id)).await.unwrap().len(), 1);
        assert_eq!(
            store.list_scan_logs(&ScanLogFilter::default()).await.unwrap().len(),
            1
        );
        assert!(!store.delete(&ana.id).await.unwrap());
    }

    // ════════════════════════════════════════════════════════════════════════════
    // Upsert-with-archive
    // ════════════════════════════════════════════════════════════════════════════

    #[tokio::test]
    async fn first_upsert_inserts_without_history() {
        let store = InMemoryStore::default();
        let ana = member(&store, "Ana").await;
        let sub = Subscription::create_regular(ana.id.clone(), 1, Timestamp::now(), &LocalCalendar::utc()).unwrap();

        let archived = store.upsert(&sub).await.unwrap();

        assert!(archived.is_none());
        assert_eq!(store.history_count().await, 0);
        assert_eq!(store.find_by_member(&ana.id).await.unwrap(), Some(sub));
    }

    #[tokio::test]
    async fn second_upsert_archives_previous_record_verbatim() {
        let store = InMemoryStore::default();
        let ana = member(&store, "Ana").await;
        let cal = LocalCalendar::utc();
        let first = Subscription::create_regular(ana.id.clone(), 1, ts("2024-01-01T00:00:00Z"), &cal).unwrap();
        let second = Subscription::create_regular(ana.id.clone(), 6, ts("2024-02-01T00:00:00Z"), &cal)
            .unwrap()
            .with_membership_type(MembershipType::Renewal);

        store.upsert(&first).await.unwrap();
        let archived = store.upsert(&second).await.unwrap().unwrap();

        assert_eq!(archived.subscription, first);
        let history = store.list_history(Some(&ana.id)).await.unwrap();
        assert_eq!(history.len(), 1);
        assert_eq!(history[0].subscription, first);
        let live = store.find_by_member(&ana.id).await.unwrap().unwrap();
        assert_eq!(live.created_at, first.created_at);
        assert_eq!(
            live,
            Subscription {
                created_at: first.created_at,
                ..second
            }
        );
        assert_eq!(store.list_all().await.unwrap().len(), 1);
    }

    #[tokio::test]
    async fn history_is_newest_first_and_filterable() {
        let store = InMemoryStore::default();
        let ana = member(&store, "Ana").await;
        let ben = member(&store, "Ben").await;
        let cal = LocalCalendar::utc();
        for months in 1..=3 {
            for id in [&ana.id, &ben.id] {
                let sub = Subscription::create_regular(id.clone(), months, Timestamp::now(), &cal).unwrap();
                store.upsert(&sub).await.unwrap();
            }
        }

        let ana_history = store.list_history(Some(&ana.id)).await.unwrap();
        assert_eq!(ana_history.len(), 2);
        assert_eq!(ana_history[0].subscription.plan_duration().as_deref(), Some("2 months"));
        assert_eq!(store.list_history(None).await.unwrap().len(), 4);
    }

    // ════════════════════════════════════════════════════════════════════════════
    // Intake
    // ════════════════════════════════════════════════════════════════════════════

    #[tokio::test]
    async fn waiver_is_create_only() {
        let store = InMemoryStore::default();
        let ana = member(&store, "Ana").await;
        let date = chrono::NaiveDate::from_ymd_opt(2024, 3, 1).unwrap();
        let waiver = LiabilityWaiver::sign(ana.id.clone(), "Ana", date, true, Timestamp::now()).unwrap();

        store.save_liability_waiver(&waiver).await.unwrap();
        let err = store.save_liability_waiver(&waiver).await.unwrap_err();

        assert_eq!(err.code, ErrorCode::IntakeRecordExists);
    }

    #[tokio::test]
    async fn updating_missing_contact_fails() {
        let store = InMemoryStore::default();
        let ana = member(&store, "Ana").await;
        let contact = EmergencyContact::record(ana.id.clone(), "Maria", "0917", Timestamp::now()).unwrap();
        assert!(store.update_emergency_contact(&contact).await.is_err());
        store.save_emergency_contact(&contact).await.unwrap();
        assert!(store.update_emergency_contact(&contact).await.is_ok());
    }

    // ════════════════════════════════════════════════════════════════════════════
    // Attendance
    // ════════════════════════════════════════════════════════════════════════════

    #[tokio::test]
    async fn one_session_per_member() {
        let store = InMemoryStore::default();
        let ana = member(&store, "Ana").await;
        let session = ActiveSession::start(ana.id.clone(), "Ana", Timestamp::now());

        store.start_session(&session).await.unwrap();
        let err = store.start_session(&session).await.unwrap_err();
        assert_eq!(err.code, ErrorCode::SessionExists);

        assert_eq!(store.end_session(&ana.id).await.unwrap(), Some(session));
        assert_eq!(store.end_session(&ana.id).await.unwrap(), None);
    }

    #[tokio::test]
    async fn scan_logs_are_newest_first() {
        let store = InMemoryStore::default();
        for (code, at) in [
            ("BCF-1001", "2024-03-10T08:00:00Z"),
            ("BCF-1002", "2024-03-10T09:00:00Z"),
            ("BCF-1001", "2024-03-10T10:00:00Z"),
        ] {
            store
                .append_scan_log(&ScanLog::new(code, "", ts(at), ScanAction::CheckIn, ScanStatus::Success))
                .await
                .unwrap();
        }

        let logs = store
            .list_scan_logs(&ScanLogFilter::for_code("BCF-1001"))
            .await
            .unwrap();

        assert_eq!(logs.len(), 2);
        assert_eq!(logs[0].timestamp, ts("2024-03-10T10:00:00Z"));
    }

    #[tokio::test]
    async fn unavailable_store_fails_every_call() {
        let store = InMemoryStore::default();
        store.set_unavailable(true);
        let err = store.list().await.unwrap_err();
        assert_eq!(err.code, ErrorCode::DatabaseError);
        store.set_unavailable(false);
        assert!(store.list().await.is_ok());
    }
}
