//! Axum router configuration for member endpoints.

use axum::{
    routing::{get, post, put},
    Router,
};

use super::handlers::{
    attendance_report, check_access, delete_member, get_member, list_members, register_member,
    renew_subscription, save_emergency_contact, save_medical_history, sign_waiver, update_member,
};
use crate::adapters::http::AppState;

/// Create the member API router, mounted at `/api/members`.
///
/// # Routes
///
/// - `GET /` - Members with subscription summary
/// - `POST /` - Register a member
/// - `GET /:id` - Member detail
/// - `PATCH /:id` - Partial update
/// - `DELETE /:id` - Delete a member
/// - `POST /:id/renewals` - Renew the subscription
/// - `GET /:id/access` - Access validation
/// - `GET /:id/attendance` - Attendance report
/// - `PUT /:id/medical-history` - Create or update medical history
/// - `PUT /:id/emergency-contact` - Create or update emergency contact
/// - `POST /:id/waiver` - Sign the liability waiver
pub fn member_routes() -> Router<AppState> {
    Router::new()
        .route("/", get(list_members).post(register_member))
        .route(
            "/:id",
            get(get_member).patch(update_member).delete(delete_member),
        )
        .route("/:id/renewals", post(renew_subscription))
        .route("/:id/access", get(check_access))
        .route("/:id/attendance", get(attendance_report))
        .route("/:id/medical-history", put(save_medical_history))
        .route("/:id/emergency-contact", put(save_emergency_contact))
        .route("/:id/waiver", post(sign_waiver))
}
