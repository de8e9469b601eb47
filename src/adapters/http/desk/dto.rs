//! HTTP DTOs for the desk endpoints: scans, sessions and subscription reports.

use serde::{Deserialize, Serialize};

use crate::application::handlers::subscription::ListExpiringResult;
use crate::domain::access::DeskMode;
use crate::domain::foundation::MemberId;

/// A code read at the desk.
#[derive(Debug, Clone, Deserialize)]
pub struct ScanRequest {
    pub code: String,
    /// Overrides the desk's configured mode for this scan.
    #[serde(default)]
    pub mode: Option<DeskMode>,
}

/// `GET /api/scans` query string.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct ScansParams {
    pub member_id: Option<String>,
    pub today: bool,
}

/// `GET /api/subscriptions/expiring` query string.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct ExpiringParams {
    pub days: Option<u32>,
}

/// `GET /api/subscriptions/history` query string.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct HistoryParams {
    pub member_id: Option<String>,
}

#[derive(Debug, Clone, Serialize)]
pub struct ExpiringResponse {
    pub threshold_days: u32,
    pub member_ids: Vec<MemberId>,
}

impl From<ListExpiringResult> for ExpiringResponse {
    fn from(result: ListExpiringResult) -> Self {
        Self {
            threshold_days: result.threshold_days,
            member_ids: result.member_ids,
        }
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct HealthResponse {
    pub status: &'static str,
    pub version: &'static str,
}
