//! HTTP handlers for the desk endpoints.

use axum::extract::{Json, Query, State};
use axum::response::IntoResponse;

use crate::application::handlers::access::{ListScansQuery, RecordScanCommand};
use crate::application::handlers::subscription::{ListExpiringQuery, ListHistoryQuery};
use crate::domain::foundation::MemberId;

use super::dto::{
    ExpiringParams, ExpiringResponse, HealthResponse, HistoryParams, ScanRequest, ScansParams,
};
use crate::adapters::http::{ApiError, AppState};

fn optional_member_id(raw: Option<String>) -> Result<Option<MemberId>, ApiError> {
    match raw.as_deref().map(str::trim) {
        None | Some("") => Ok(None),
        Some(id) => Ok(Some(MemberId::parse(id)?)),
    }
}

/// POST /api/scans - Validate a code, update the session and log the scan
pub async fn record_scan(
    State(state): State<AppState>,
    Json(request): Json<ScanRequest>,
) -> Result<impl IntoResponse, ApiError> {
    let mut cmd = RecordScanCommand::new(request.code);
    if let Some(mode) = request.mode {
        cmd = cmd.with_mode(mode);
    }
    let report = state.record_scan_handler().handle(cmd).await?;
    Ok(Json(report))
}

/// GET /api/scans - Scan logs, newest first
pub async fn list_scans(
    State(state): State<AppState>,
    Query(params): Query<ScansParams>,
) -> Result<impl IntoResponse, ApiError> {
    let query = ListScansQuery {
        member_id: optional_member_id(params.member_id)?,
        today: params.today,
    };
    Ok(Json(state.list_scans_handler().handle(query).await))
}

/// GET /api/sessions - Members currently inside
pub async fn list_sessions(State(state): State<AppState>) -> impl IntoResponse {
    Json(state.list_scans_handler().active_sessions().await)
}

/// GET /api/subscriptions/expiring - Members whose subscription ends soon
pub async fn list_expiring(
    State(state): State<AppState>,
    Query(params): Query<ExpiringParams>,
) -> impl IntoResponse {
    let query = ListExpiringQuery {
        threshold_days: params.days,
    };
    let result = state.list_expiring_handler().handle(query).await;
    Json(ExpiringResponse::from(result))
}

/// GET /api/subscriptions/history - Archived subscriptions, newest first
pub async fn list_history(
    State(state): State<AppState>,
    Query(params): Query<HistoryParams>,
) -> Result<impl IntoResponse, ApiError> {
    let query = ListHistoryQuery {
        member_id: optional_member_id(params.member_id)?,
    };
    Ok(Json(state.list_history_handler().handle(query).await))
}

/// GET /api/health - Liveness
pub async fn health() -> impl IntoResponse {
    Json(HealthResponse {
        status: "ok",
        version: env!("CARGO_PKG_VERSION"),
    })
}
