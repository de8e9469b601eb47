//! HTTP handlers for member endpoints.
//!
//! These handlers connect Axum routes to application layer command/query handlers.

use axum::extract::{Json, Path, State};
use axum::http::StatusCode;
use axum::response::IntoResponse;

use crate::application::handlers::access::AttendanceReportQuery;
use crate::application::handlers::member::{
    DeleteMemberCommand, GetMemberQuery, RegisterMemberCommand, SaveEmergencyContactCommand,
    SaveMedicalHistoryCommand, SignWaiverCommand, UpdateMemberCommand, WaiverForm,
};
use crate::application::handlers::subscription::RenewSubscriptionCommand;
use crate::domain::foundation::MemberId;
use crate::domain::member::{EmergencyContactUpdate, MedicalHistoryUpdate, MemberUpdate};

use super::dto::{
    RegisterMemberRequest, RegisterMemberResponse, RenewSubscriptionRequest,
    RenewSubscriptionResponse,
};
use crate::adapters::http::{ApiError, AppState};

fn member_id(raw: &str) -> Result<MemberId, ApiError> {
    Ok(MemberId::parse(raw)?)
}

// ════════════════════════════════════════════════════════════════════════════════
// Query Handlers (GET endpoints)
// ════════════════════════════════════════════════════════════════════════════════

/// GET /api/members - Members with a subscription summary
pub async fn list_members(State(state): State<AppState>) -> impl IntoResponse {
    Json(state.list_members_handler().handle().await)
}

/// GET /api/members/:id - Member detail with subscription, intake and session
pub async fn get_member(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<impl IntoResponse, ApiError> {
    let query = GetMemberQuery {
        member_id: member_id(&id)?,
    };
    let detail = state.get_member_handler().handle(query).await?;
    Ok(Json(detail))
}

/// GET /api/members/:id/access - Access validation for a member code
///
/// The path segment is treated like a scanned code, so a malformed id is an
/// `invalid` outcome rather than an error.
pub async fn check_access(
    State(state): State<AppState>,
    Path(code): Path<String>,
) -> Result<impl IntoResponse, ApiError> {
    let validation = state.validate_access_handler().handle(&code).await?;
    Ok(Json(validation))
}

/// GET /api/members/:id/attendance - Visits paired from the scan log
pub async fn attendance_report(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<impl IntoResponse, ApiError> {
    let query = AttendanceReportQuery {
        member_id: member_id(&id)?,
    };
    let report = state.attendance_report_handler().handle(query).await?;
    Ok(Json(report))
}

// ════════════════════════════════════════════════════════════════════════════════
// Command Handlers (POST/PATCH/PUT/DELETE endpoints)
// ════════════════════════════════════════════════════════════════════════════════

/// POST /api/members - Register a member with a first subscription
pub async fn register_member(
    State(state): State<AppState>,
    Json(request): Json<RegisterMemberRequest>,
) -> Result<impl IntoResponse, ApiError> {
    let intake = request.intake();
    let cmd = RegisterMemberCommand {
        name: request.name,
        profile: request.profile,
        plan: request.plan,
        coaching_preference: request.coaching_preference,
        payment_status: request.payment_status,
        payment_date: request.payment_date,
        intake,
    };

    let result = state.register_member_handler().handle(cmd).await?;

    Ok((
        StatusCode::CREATED,
        Json(RegisterMemberResponse::from(result)),
    ))
}

/// PATCH /api/members/:id - Partial profile update
pub async fn update_member(
    State(state): State<AppState>,
    Path(id): Path<String>,
    Json(update): Json<MemberUpdate>,
) -> Result<impl IntoResponse, ApiError> {
    let cmd = UpdateMemberCommand {
        member_id: member_id(&id)?,
        update,
    };
    let member = state.update_member_handler().handle(cmd).await?;
    Ok(Json(member))
}

/// DELETE /api/members/:id - Remove a member and their live records
pub async fn delete_member(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<impl IntoResponse, ApiError> {
    let cmd = DeleteMemberCommand {
        member_id: member_id(&id)?,
    };
    state.delete_member_handler().handle(cmd).await?;
    Ok(StatusCode::NO_CONTENT)
}

/// POST /api/members/:id/renewals - Replace the subscription, archiving the old one
pub async fn renew_subscription(
    State(state): State<AppState>,
    Path(id): Path<String>,
    Json(request): Json<RenewSubscriptionRequest>,
) -> Result<impl IntoResponse, ApiError> {
    let cmd = RenewSubscriptionCommand {
        member_id: member_id(&id)?,
        plan: request.plan,
        coaching_preference: request.coaching_preference,
        payment_status: request.payment_status,
        payment_date: request.payment_date,
    };

    let result = state.renew_subscription_handler().handle(cmd).await?;

    Ok((
        StatusCode::CREATED,
        Json(RenewSubscriptionResponse::from(result)),
    ))
}

/// PUT /api/members/:id/medical-history - Create or update the questionnaire
pub async fn save_medical_history(
    State(state): State<AppState>,
    Path(id): Path<String>,
    Json(update): Json<MedicalHistoryUpdate>,
) -> Result<impl IntoResponse, ApiError> {
    let cmd = SaveMedicalHistoryCommand {
        member_id: member_id(&id)?,
        update,
    };
    let history = state.intake_handler().save_medical_history(cmd).await?;
    Ok(Json(history))
}

/// PUT /api/members/:id/emergency-contact - Create or update the contact
pub async fn save_emergency_contact(
    State(state): State<AppState>,
    Path(id): Path<String>,
    Json(update): Json<EmergencyContactUpdate>,
) -> Result<impl IntoResponse, ApiError> {
    let cmd = SaveEmergencyContactCommand {
        member_id: member_id(&id)?,
        update,
    };
    let contact = state.intake_handler().save_emergency_contact(cmd).await?;
    Ok(Json(contact))
}

/// POST /api/members/:id/waiver - Record the signed liability waiver
pub async fn sign_waiver(
    State(state): State<AppState>,
    Path(id): Path<String>,
    Json(form): Json<WaiverForm>,
) -> Result<impl IntoResponse, ApiError> {
    let cmd = SignWaiverCommand {
        member_id: member_id(&id)?,
        form,
    };
    let waiver = state.intake_handler().sign_waiver(cmd).await?;
    Ok((StatusCode::CREATED, Json(waiver)))
}
