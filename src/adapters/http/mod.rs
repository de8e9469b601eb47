//! HTTP adapters - REST API for the front desk.
//!
//! - `members` - registration, profile, renewals, intake, access, attendance
//! - `desk` - scans, active sessions, subscription reports, health
//!
//! Everything is served as JSON under `/api`.

pub mod desk;
mod error;
pub mod members;
mod state;

pub use error::{ApiError, ErrorResponse};
pub use state::{AppState, DeskSettings};

use axum::http::{HeaderValue, Method};
use axum::Router;
use tower_http::cors::{AllowOrigin, Any, CorsLayer};
use tower_http::timeout::TimeoutLayer;
use tower_http::trace::TraceLayer;
use tracing::warn;

use crate::config::ServerConfig;

/// Routes without middleware, for mounting at `/api`.
pub fn api_router() -> Router<AppState> {
    Router::new()
        .nest("/members", members::member_routes())
        .merge(desk::desk_routes())
}

/// The complete application: `/api` routes plus tracing, timeout and CORS.
pub fn app(state: AppState, config: &ServerConfig) -> Router {
    Router::new()
        .nest("/api", api_router())
        .layer(TraceLayer::new_for_http())
        .layer(TimeoutLayer::new(config.request_timeout()))
        .layer(cors_layer(config))
        .with_state(state)
}

fn cors_layer(config: &ServerConfig) -> CorsLayer {
    let origins: Vec<HeaderValue> = config
        .cors_origins_list()
        .into_iter()
        .filter_map(|origin| match origin.parse() {
            Ok(value) => Some(value),
            Err(_) => {
                warn!(origin = %origin, "Ignoring invalid CORS origin");
                None
            }
        })
        .collect();

    let layer = CorsLayer::new()
        .allow_methods([
            Method::GET,
            Method::POST,
            Method::PUT,
            Method::PATCH,
            Method::DELETE,
        ])
        .allow_headers(Any);

    if origins.is_empty() {
        layer.allow_origin(Any)
    } else {
        layer.allow_origin(AllowOrigin::list(origins))
    }
}
