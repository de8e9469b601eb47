//! ScanInputHandler - Drives the scan buffer from a key event stream.
//!
//! Each accepted code is validated and recorded through
//! [`RecordScanHandler`]; the outcome is published to the desk display and
//! cleared again once the display window has passed.

use std::sync::Arc;

use serde::Serialize;
use tokio::sync::{mpsc, watch};
use tokio::time::{self, Instant};
use tracing::{debug, error};

use crate::application::handlers::access::{RecordScanCommand, RecordScanHandler, ScanReport};
use crate::domain::access::DeskMode;
use crate::domain::scanner::{KeyEvent, ScanBuffer, ScanTimings};

/// What the desk display should show next.
#[derive(Debug, Clone, Serialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum DeskUpdate {
    /// A scan was accepted and recorded.
    Scanned(ScanReport),
    /// A scan was accepted but the store could not be reached.
    Unavailable { code: String, message: String },
    /// The display window passed; back to idle.
    Cleared,
}

/// Single-stream scan driver. One event is processed at a time.
pub struct ScanInputHandler {
    recorder: Arc<RecordScanHandler>,
    timings: ScanTimings,
    mode: DeskMode,
}

impl ScanInputHandler {
    pub fn new(recorder: Arc<RecordScanHandler>, timings: ScanTimings, mode: DeskMode) -> Self {
        Self {
            recorder,
            timings,
            mode,
        }
    }

    /// Run until the event stream closes or shutdown is signalled.
    pub async fn run(
        &self,
        mut events: mpsc::Receiver<KeyEvent>,
        updates: mpsc::Sender<DeskUpdate>,
        mut shutdown: watch::Receiver<bool>,
    ) {
        let mut buffer = ScanBuffer::new(self.timings);

        loop {
            let deadline = buffer.display_deadline();

            tokio::select! {
                changed = shutdown.changed() => {
                    // A dropped sender counts as shutdown.
                    if changed.is_err() || *shutdown.borrow() {
                        debug!("Scan input handler shutting down");
                        return;
                    }
                }

                event = events.recv() => {
                    let Some(event) = event else {
                        debug!("Key event stream closed");
                        return;
                    };
                    // Keys queued during a slow lookup keep their arrival time.
                    if let Some(code) = buffer.push(event) {
                        let update = self.process(code).await;
                        if updates.send(update).await.is_err() {
                            return;
                        }
                    }
                }

                _ = time::sleep_until(deadline.unwrap_or_else(Instant::now)), if deadline.is_some() => {
                    if buffer.expire_display(Instant::now()) && updates.send(DeskUpdate::Cleared).await.is_err() {
                        return;
                    }
                }
            }
        }
    }

    async fn process(&self, code: String) -> DeskUpdate {
        debug!(code = %code, "Scan accepted");
        let cmd = RecordScanCommand::new(code.clone()).with_mode(self.mode);
        match self.recorder.handle(cmd).await {
            Ok(report) => DeskUpdate::Scanned(report),
            Err(e) => {
                error!(code = %code, error = %e, "Scan could not be validated");
                DeskUpdate::Unavailable {
                    code,
                    message: e.message(),
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::adapters::memory::InMemoryStore;
    use crate::application::handlers::access::ValidateAccessHandler;
    use crate::domain::access::AccessOutcome;
    use crate::domain::attendance::{ActiveSession, ScanLog, ScanLogFilter};
    use crate::domain::foundation::{DomainError, LocalCalendar, MemberId, Timestamp};
    use crate::domain::member::{Member, MemberProfile};
    use crate::domain::subscription::Subscription;
    use crate::ports::{AttendanceRepository, MemberRepository, SubscriptionRepository};
    use std::time::Duration;

    struct Desk {
        store: InMemoryStore,
        keys: mpsc::Sender<KeyEvent>,
        updates: mpsc::Receiver<DeskUpdate>,
        _shutdown: watch::Sender<bool>,
    }

    /// Session lookups that take `delay`, like a store under load.
    struct SlowLookups {
        inner: InMemoryStore,
        delay: Duration,
    }

    #[async_trait::async_trait]
    impl AttendanceRepository for SlowLookups {
        async fn append_scan_log(&self, log: &ScanLog) -> Result<(), DomainError> {
            self.inner.append_scan_log(log).await
        }

        async fn list_scan_logs(
            &self,
            filter: &ScanLogFilter,
        ) -> Result<Vec<ScanLog>, DomainError> {
            self.inner.list_scan_logs(filter).await
        }

        async fn find_session(
            &self,
            member_id: &MemberId,
        ) -> Result<Option<ActiveSession>, DomainError> {
            time::sleep(self.delay).await;
            self.inner.find_session(member_id).await
        }

        async fn list_sessions(&self) -> Result<Vec<ActiveSession>, DomainError> {
            self.inner.list_sessions().await
        }

        async fn start_session(&self, session: &ActiveSession) -> Result<(), DomainError> {
            self.inner.start_session(session).await
        }

        async fn end_session(
            &self,
            member_id: &MemberId,
        ) -> Result<Option<ActiveSession>, DomainError> {
            self.inner.end_session(member_id).await
        }
    }

    async fn start() -> Desk {
        start_with(None).await
    }

    async fn start_with(lookup_delay: Option<Duration>) -> Desk {
        let store = InMemoryStore::default();
        let id = MemberId::parse("BCF-1001").unwrap();
        let now = Timestamp::now();
        store
            .save(&Member::register(id.clone(), "Ana", MemberProfile::default(), now).unwrap())
            .await
            .unwrap();
        store
            .upsert(&Subscription::create_regular(id, 1, now, &LocalCalendar::utc()).unwrap())
            .await
            .unwrap();

        let attendance: Arc<dyn AttendanceRepository> = match lookup_delay {
            Some(delay) => Arc::new(SlowLookups {
                inner: store.clone(),
                delay,
            }),
            None => Arc::new(store.clone()),
        };
        let validator = Arc::new(ValidateAccessHandler::new(
            Arc::new(store.clone()),
            Arc::new(store.clone()),
            attendance.clone(),
        ));
        let recorder = Arc::new(RecordScanHandler::new(validator, attendance, DeskMode::Toggle));
        let handler = ScanInputHandler::new(recorder, ScanTimings::default(), DeskMode::Toggle);

        let (keys, events) = mpsc::channel(64);
        let (update_tx, updates) = mpsc::channel(16);
        let (shutdown_tx, shutdown_rx) = watch::channel(false);
        tokio::spawn(async move { handler.run(events, update_tx, shutdown_rx).await });

        Desk {
            store,
            keys,
            updates,
            _shutdown: shutdown_tx,
        }
    }

    async fn scan(keys: &mpsc::Sender<KeyEvent>, code: &str) {
        for c in code.chars() {
            keys.send(KeyEvent::char(c)).await.unwrap();
        }
        keys.send(KeyEvent::enter()).await.unwrap();
    }

    async fn scan_count(store: &InMemoryStore) -> usize {
        store.list_scan_logs(&ScanLogFilter::default()).await.unwrap().len()
    }

    #[tokio::test(start_paused = true)]
    async fn accepted_scan_is_recorded_and_then_cleared() {
        let mut desk = start().await;

        scan(&desk.keys, "BCF-1001").await;

        match desk.updates.recv().await.unwrap() {
            DeskUpdate::Scanned(report) => {
                assert_eq!(report.validation.outcome, AccessOutcome::Granted)
            }
            other => panic!("expected a scan, got {:?}", other),
        }
        let shown_at = Instant::now();
        assert!(matches!(desk.updates.recv().await.unwrap(), DeskUpdate::Cleared));
        assert!(Instant::now().duration_since(shown_at) >= Duration::from_millis(2000));
    }

    #[tokio::test(start_paused = true)]
    async fn second_enter_within_debounce_is_ignored() {
        let mut desk = start().await;

        scan(&desk.keys, "BCF-1001").await;
        assert!(matches!(desk.updates.recv().await.unwrap(), DeskUpdate::Scanned(_)));

        time::sleep(Duration::from_millis(200)).await;
        scan(&desk.keys, "BCF-1001").await;

        // The next thing published is the display clearing, not a second scan.
        assert!(matches!(desk.updates.recv().await.unwrap(), DeskUpdate::Cleared));
        assert_eq!(scan_count(&desk.store).await, 1);
    }

    #[tokio::test(start_paused = true)]
    async fn double_fire_during_a_slow_lookup_is_debounced() {
        let mut desk = start_with(Some(Duration::from_millis(600))).await;

        scan(&desk.keys, "BCF-1001").await;
        time::sleep(Duration::from_millis(100)).await;
        scan(&desk.keys, "BCF-1001").await;

        match desk.updates.recv().await.unwrap() {
            DeskUpdate::Scanned(report) => {
                assert_eq!(report.validation.outcome, AccessOutcome::Granted)
            }
            other => panic!("expected a scan, got {:?}", other),
        }
        assert!(matches!(desk.updates.recv().await.unwrap(), DeskUpdate::Cleared));
        assert_eq!(scan_count(&desk.store).await, 1);

        let id = MemberId::parse("BCF-1001").unwrap();
        assert!(desk.store.find_session(&id).await.unwrap().is_some());
    }

    #[tokio::test(start_paused = true)]
    async fn scans_outside_debounce_toggle_the_session() {
        let mut desk = start().await;

        scan(&desk.keys, "BCF-1001").await;
        assert!(matches!(desk.updates.recv().await.unwrap(), DeskUpdate::Scanned(_)));

        time::sleep(Duration::from_millis(600)).await;
        scan(&desk.keys, "BCF-1001").await;

        match desk.updates.recv().await.unwrap() {
            DeskUpdate::Scanned(report) => {
                assert_eq!(report.validation.outcome, AccessOutcome::AlreadyCheckedIn)
            }
            other => panic!("expected a scan, got {:?}", other),
        }
        assert_eq!(scan_count(&desk.store).await, 2);
    }

    #[tokio::test(start_paused = true)]
    async fn typing_in_text_fields_is_not_scanning() {
        let mut desk = start().await;

        for c in "BCF-1001".chars() {
            desk.keys.send(KeyEvent::char(c).in_text_field()).await.unwrap();
        }
        desk.keys.send(KeyEvent::enter().in_text_field()).await.unwrap();
        scan(&desk.keys, "BCF-9999").await;

        match desk.updates.recv().await.unwrap() {
            DeskUpdate::Scanned(report) => {
                assert_eq!(report.validation.outcome, AccessOutcome::Invalid)
            }
            other => panic!("expected a scan, got {:?}", other),
        }
    }

    #[tokio::test(start_paused = true)]
    async fn outage_is_published_as_unavailable() {
        let mut desk = start().await;
        desk.store.set_unavailable(true);

        scan(&desk.keys, "BCF-1001").await;

        match desk.updates.recv().await.unwrap() {
            DeskUpdate::Unavailable { code, .. } => assert_eq!(code, "BCF-1001"),
            other => panic!("expected unavailable, got {:?}", other),
        }
    }

    #[tokio::test(start_paused = true)]
    async fn closing_the_key_stream_stops_the_handler() {
        let desk = start().await;
        let Desk { keys, mut updates, .. } = desk;
        drop(keys);
        assert!(updates.recv().await.is_none());
    }
}
