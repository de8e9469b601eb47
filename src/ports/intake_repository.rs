//! Intake record repository port.
//!
//! Medical history, emergency contact and liability waiver are each stored
//! at most once per member.

use crate::domain::foundation::{DomainError, MemberId};
use crate::domain::member::{EmergencyContact, LiabilityWaiver, MedicalHistory};
use async_trait::async_trait;

#[async_trait]
pub trait IntakeRepository: Send + Sync {
    async fn find_medical_history(
        &self,
        member_id: &MemberId,
    ) -> Result<Option<MedicalHistory>, DomainError>;

    /// # Errors
    ///
    /// - `IntakeRecordExists` if the member already has one
    async fn save_medical_history(&self, history: &MedicalHistory) -> Result<(), DomainError>;

    /// # Errors
    ///
    /// - `MemberNotFound` if no record exists to update
    async fn update_medical_history(&self, history: &MedicalHistory) -> Result<(), DomainError>;

    async fn find_emergency_contact(
        &self,
        member_id: &MemberId,
    ) -> Result<Option<EmergencyContact>, DomainError>;

    /// # Errors
    ///
    /// - `IntakeRecordExists` if the member already has one
    async fn save_emergency_contact(&self, contact: &EmergencyContact) -> Result<(), DomainError>;

    /// # Errors
    ///
    /// - `MemberNotFound` if no record exists to update
    async fn update_emergency_contact(&self, contact: &EmergencyContact)
        -> Result<(), DomainError>;

    async fn find_liability_waiver(
        &self,
        member_id: &MemberId,
    ) -> Result<Option<LiabilityWaiver>, DomainError>;

    /// Waivers are create-only.
    ///
    /// # Errors
    ///
    /// - `IntakeRecordExists` if the member already signed one
    async fn save_liability_waiver(&self, waiver: &LiabilityWaiver) -> Result<(), DomainError>;
}
