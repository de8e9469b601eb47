//! Axum router configuration for the desk endpoints.

use axum::{routing::get, Router};

use super::handlers::{
    health, list_expiring, list_history, list_scans, list_sessions, record_scan,
};
use crate::adapters::http::AppState;

/// Create the desk API router, mounted at `/api`.
///
/// # Routes
///
/// - `POST /scans` - Validate and record a scan
/// - `GET /scans?member_id=&today=` - Scan logs
/// - `GET /sessions` - Active sessions
/// - `GET /subscriptions/expiring?days=` - Expiring member ids
/// - `GET /subscriptions/history?member_id=` - Archived subscriptions
/// - `GET /health` - Liveness
pub fn desk_routes() -> Router<AppState> {
    Router::new()
        .route("/scans", get(list_scans).post(record_scan))
        .route("/sessions", get(list_sessions))
        .route("/subscriptions/expiring", get(list_expiring))
        .route("/subscriptions/history", get(list_history))
        .route("/health", get(health))
}
