//! Integration tests for the front-desk check-in flow.
//!
//! Scanner lines go through the keyboard-wedge feed, the scan input handler
//! and the scan recorder into the in-memory store.

use std::sync::Arc;
use std::time::Duration;

use tokio::sync::{mpsc, watch};

use gym_desk::adapters::http::{AppState, DeskSettings};
use gym_desk::adapters::scanner::feed_lines;
use gym_desk::adapters::InMemoryStore;
use gym_desk::application::handlers::access::{
    AttendanceReportQuery, ListScansQuery, RecordScanCommand,
};
use gym_desk::application::handlers::member::RegisterMemberCommand;
use gym_desk::application::handlers::scanner::DeskUpdate;
use gym_desk::application::handlers::subscription::SubscriptionPlan;
use gym_desk::application::ScanInputHandler;
use gym_desk::domain::access::{AccessOutcome, DeskMode};
use gym_desk::domain::attendance::{ScanAction, ScanStatus};
use gym_desk::domain::foundation::MemberId;
use gym_desk::domain::scanner::ScanTimings;

// =============================================================================
// Test Infrastructure
// =============================================================================

fn timings() -> ScanTimings {
    ScanTimings {
        idle_timeout: Duration::from_secs(5),
        debounce: Duration::ZERO,
        display: Duration::from_secs(60),
    }
}

async fn desk_with_member() -> (InMemoryStore, AppState, MemberId) {
    let store = InMemoryStore::default();
    let state = AppState::from_store(store.clone(), DeskSettings::default());
    let id = state
        .register_member_handler()
        .handle(RegisterMemberCommand::new(
            "Ana Cruz",
            SubscriptionPlan::Regular {
                months: 1,
                start: None,
            },
        ))
        .await
        .unwrap()
        .member
        .id;
    (store, state, id)
}

/// Feeds `input` through the scanner pipeline and returns every update.
async fn run_scanner(state: &AppState, input: String, mode: DeskMode) -> Vec<DeskUpdate> {
    let handler = ScanInputHandler::new(Arc::new(state.record_scan_handler()), timings(), mode);
    let (keys_tx, keys_rx) = mpsc::channel(256);
    let (updates_tx, mut updates_rx) = mpsc::channel(32);
    let (_shutdown_tx, shutdown_rx) = watch::channel(false);

    let feeder = tokio::spawn(async move { feed_lines(input.as_bytes(), keys_tx).await });
    handler.run(keys_rx, updates_tx, shutdown_rx).await;
    feeder.await.unwrap().unwrap();

    let mut updates = Vec::new();
    while let Some(update) = updates_rx.recv().await {
        updates.push(update);
    }
    updates
}

fn scanned(updates: &[DeskUpdate]) -> Vec<(AccessOutcome, ScanAction)> {
    updates
        .iter()
        .filter_map(|u| match u {
            DeskUpdate::Scanned(report) => Some((report.validation.outcome, report.action)),
            _ => None,
        })
        .collect()
}

// =============================================================================
// Scanner pipeline
// =============================================================================

#[tokio::test]
async fn toggle_desk_checks_in_then_out() {
    let (_, state, id) = desk_with_member().await;
    let input = format!("{id}\nnot-a-card\n{id}\n");

    let updates = run_scanner(&state, input, DeskMode::Toggle).await;

    assert_eq!(
        scanned(&updates),
        vec![
            (AccessOutcome::Granted, ScanAction::CheckIn),
            (AccessOutcome::Invalid, ScanAction::NotApplicable),
            (AccessOutcome::AlreadyCheckedIn, ScanAction::CheckOut),
        ]
    );
    assert!(state.list_scans_handler().active_sessions().await.is_empty());

    let logs = state.list_scans_handler().handle(ListScansQuery::default()).await;
    assert_eq!(logs.len(), 3);
    assert_eq!(logs[1].scanned_code, "not-a-card");
    assert_eq!(logs[1].status, ScanStatus::Invalid);
}

#[tokio::test]
async fn entrance_desk_never_checks_out() {
    let (_, state, id) = desk_with_member().await;
    let input = format!("{id}\n{id}\n");

    let updates = run_scanner(&state, input, DeskMode::CheckIn).await;

    assert_eq!(
        scanned(&updates),
        vec![
            (AccessOutcome::Granted, ScanAction::CheckIn),
            (AccessOutcome::AlreadyCheckedIn, ScanAction::NotApplicable),
        ]
    );
    let sessions = state.list_scans_handler().active_sessions().await;
    assert_eq!(sessions.len(), 1);
    assert_eq!(sessions[0].member_id, id);
}

#[tokio::test]
async fn outage_is_reported_to_the_display() {
    let (store, state, id) = desk_with_member().await;
    store.set_unavailable(true);

    let updates = run_scanner(&state, format!("{id}\n"), DeskMode::Toggle).await;

    assert_eq!(updates.len(), 1);
    assert!(matches!(
        &updates[0],
        DeskUpdate::Unavailable { code, .. } if code == id.as_str()
    ));
}

// =============================================================================
// Attendance
// =============================================================================

#[tokio::test]
async fn attendance_report_pairs_check_ins_with_check_outs() {
    let (_, state, id) = desk_with_member().await;
    let recorder = state.record_scan_handler();

    for _ in 0..3 {
        recorder
            .handle(RecordScanCommand::new(id.as_str()))
            .await
            .unwrap();
    }

    let report = state
        .attendance_report_handler()
        .handle(AttendanceReportQuery {
            member_id: id.clone(),
        })
        .await
        .unwrap();

    assert_eq!(report.member_name, "Ana Cruz");
    assert_eq!(report.visits.len(), 2);
    // Newest visit is still open.
    let open = report.visits.iter().filter(|v| v.check_out.is_none()).count();
    assert_eq!(open, 1);
    assert_eq!(state.list_scans_handler().active_sessions().await.len(), 1);
}

#[tokio::test]
async fn scan_codes_are_trimmed_before_lookup() {
    let (_, state, id) = desk_with_member().await;

    let report = state
        .record_scan_handler()
        .handle(RecordScanCommand::new(format!("  {id}  ")))
        .await
        .unwrap();

    assert_eq!(report.validation.outcome, AccessOutcome::Granted);
    assert_eq!(report.log.unwrap().scanned_code, id.as_str());
}
