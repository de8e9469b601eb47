//! HTTP DTOs (Data Transfer Objects) for member endpoints.
//!
//! These types define the JSON request/response structure for the member API.
//! Domain records serialize as-is; the DTOs only add the envelope.

use serde::{Deserialize, Serialize};

use crate::application::handlers::member::{
    EmergencyContactForm, IntakeForms, IntakeRecords, RegisterMemberResult, WaiverForm,
};
use crate::application::handlers::subscription::{RenewSubscriptionResult, SubscriptionPlan};
use crate::domain::foundation::Timestamp;
use crate::domain::member::{
    EmergencyContact, LiabilityWaiver, MedicalAnswers, MedicalHistory, Member, MemberProfile,
};
use crate::domain::subscription::{PaymentStatus, Subscription, SubscriptionHistoryEntry};

// ════════════════════════════════════════════════════════════════════════════════
// Request DTOs
// ════════════════════════════════════════════════════════════════════════════════

/// Registration form: member details, first plan and optional intake forms.
#[derive(Debug, Clone, Deserialize)]
pub struct RegisterMemberRequest {
    pub name: String,
    #[serde(flatten)]
    pub profile: MemberProfile,
    pub plan: SubscriptionPlan,
    #[serde(default)]
    pub coaching_preference: bool,
    #[serde(default)]
    pub payment_status: PaymentStatus,
    #[serde(default)]
    pub payment_date: Option<Timestamp>,
    #[serde(default)]
    pub medical_history: Option<MedicalAnswers>,
    #[serde(default)]
    pub emergency_contact: Option<EmergencyContactForm>,
    #[serde(default)]
    pub waiver: Option<WaiverForm>,
}

impl RegisterMemberRequest {
    pub fn intake(&self) -> IntakeForms {
        IntakeForms {
            medical_history: self.medical_history.clone(),
            emergency_contact: self.emergency_contact.clone(),
            waiver: self.waiver.clone(),
        }
    }
}

/// Renewal form.
#[derive(Debug, Clone, Deserialize)]
pub struct RenewSubscriptionRequest {
    pub plan: SubscriptionPlan,
    /// Keeps the previous preference when omitted.
    #[serde(default)]
    pub coaching_preference: Option<bool>,
    #[serde(default)]
    pub payment_status: PaymentStatus,
    #[serde(default)]
    pub payment_date: Option<Timestamp>,
}

// ════════════════════════════════════════════════════════════════════════════════
// Response DTOs
// ════════════════════════════════════════════════════════════════════════════════

/// Intake records stored for a member.
#[derive(Debug, Clone, Serialize)]
pub struct IntakeResponse {
    pub medical_history: Option<MedicalHistory>,
    pub emergency_contact: Option<EmergencyContact>,
    pub liability_waiver: Option<LiabilityWaiver>,
}

impl From<IntakeRecords> for IntakeResponse {
    fn from(records: IntakeRecords) -> Self {
        Self {
            medical_history: records.medical_history,
            emergency_contact: records.emergency_contact,
            liability_waiver: records.waiver,
        }
    }
}

/// Response for a new registration.
#[derive(Debug, Clone, Serialize)]
pub struct RegisterMemberResponse {
    pub member: Member,
    pub subscription: Subscription,
    pub intake: IntakeResponse,
}

impl From<RegisterMemberResult> for RegisterMemberResponse {
    fn from(result: RegisterMemberResult) -> Self {
        Self {
            member: result.member,
            subscription: result.subscription,
            intake: result.intake.into(),
        }
    }
}

/// Response for a renewal.
#[derive(Debug, Clone, Serialize)]
pub struct RenewSubscriptionResponse {
    pub subscription: Subscription,
    /// Record moved to history, if one was replaced.
    pub archived: Option<SubscriptionHistoryEntry>,
}

impl From<RenewSubscriptionResult> for RenewSubscriptionResponse {
    fn from(result: RenewSubscriptionResult) -> Self {
        Self {
            subscription: result.subscription,
            archived: result.archived,
        }
    }
}
