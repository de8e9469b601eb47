//! Intake form handlers.
//!
//! Medical history and the emergency contact are create-or-update; the
//! liability waiver is signed once.

use std::sync::Arc;

use chrono::NaiveDate;
use serde::Deserialize;
use tracing::info;

use crate::domain::foundation::{DomainError, ErrorCode, MemberId, Timestamp};
use crate::domain::member::{
    EmergencyContact, EmergencyContactUpdate, LiabilityWaiver, MedicalAnswers, MedicalHistory,
    MedicalHistoryUpdate, MemberError,
};
use crate::ports::{IntakeRepository, MemberRepository};

const MEDICAL_HISTORY: &str = "medical history";
const EMERGENCY_CONTACT: &str = "emergency contact";
const LIABILITY_WAIVER: &str = "liability waiver";

/// Emergency contact as entered on the sign-up form.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct EmergencyContactForm {
    pub contact_name: String,
    pub contact_number: String,
}

/// Waiver as signed on the sign-up form.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct WaiverForm {
    pub signature_name: String,
    pub signed_date: NaiveDate,
    #[serde(default)]
    pub waiver_accepted: bool,
}

/// Intake records supplied together at registration.
#[derive(Debug, Clone, Default)]
pub struct IntakeForms {
    pub medical_history: Option<MedicalAnswers>,
    pub emergency_contact: Option<EmergencyContactForm>,
    pub waiver: Option<WaiverForm>,
}

/// Validated intake records, ready to be stored.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct IntakeRecords {
    pub medical_history: Option<MedicalHistory>,
    pub emergency_contact: Option<EmergencyContact>,
    pub waiver: Option<LiabilityWaiver>,
}

impl IntakeForms {
    /// Validates every supplied form for `member_id`.
    pub fn into_records(
        self,
        member_id: &MemberId,
        now: Timestamp,
    ) -> Result<IntakeRecords, MemberError> {
        let medical_history = self
            .medical_history
            .map(|answers| MedicalHistory::record(member_id.clone(), answers, now));
        let emergency_contact = self
            .emergency_contact
            .map(|form| {
                EmergencyContact::record(
                    member_id.clone(),
                    form.contact_name,
                    form.contact_number,
                    now,
                )
            })
            .transpose()?;
        let waiver = self
            .waiver
            .map(|form| {
                LiabilityWaiver::sign(
                    member_id.clone(),
                    form.signature_name,
                    form.signed_date,
                    form.waiver_accepted,
                    now,
                )
            })
            .transpose()?;

        Ok(IntakeRecords {
            medical_history,
            emergency_contact,
            waiver,
        })
    }
}

/// Stores freshly validated records for a new member.
pub(crate) async fn save_records(
    intake: &dyn IntakeRepository,
    records: &IntakeRecords,
) -> Result<(), DomainError> {
    if let Some(history) = &records.medical_history {
        intake.save_medical_history(history).await?;
    }
    if let Some(contact) = &records.emergency_contact {
        intake.save_emergency_contact(contact).await?;
    }
    if let Some(waiver) = &records.waiver {
        intake.save_liability_waiver(waiver).await?;
    }
    Ok(())
}

// A create racing with another desk surfaces as a conflict on the form.
fn conflict_or(member_id: &MemberId, form: &str, err: DomainError) -> MemberError {
    if err.code == ErrorCode::IntakeRecordExists {
        MemberError::intake_exists(member_id.clone(), form)
    } else {
        err.into()
    }
}

/// Command to create or update a member's medical history.
#[derive(Debug, Clone)]
pub struct SaveMedicalHistoryCommand {
    pub member_id: MemberId,
    pub update: MedicalHistoryUpdate,
}

/// Command to create or update a member's emergency contact.
#[derive(Debug, Clone)]
pub struct SaveEmergencyContactCommand {
    pub member_id: MemberId,
    pub update: EmergencyContactUpdate,
}

/// Command to record a signed liability waiver.
#[derive(Debug, Clone)]
pub struct SignWaiverCommand {
    pub member_id: MemberId,
    pub form: WaiverForm,
}

/// Handler for the three intake forms.
pub struct IntakeHandler {
    members: Arc<dyn MemberRepository>,
    intake: Arc<dyn IntakeRepository>,
}

impl IntakeHandler {
    pub fn new(members: Arc<dyn MemberRepository>, intake: Arc<dyn IntakeRepository>) -> Self {
        Self { members, intake }
    }

    async fn ensure_member(&self, member_id: &MemberId) -> Result<(), MemberError> {
        match self.members.find_by_id(member_id).await? {
            Some(_) => Ok(()),
            None => Err(MemberError::not_found(member_id.clone())),
        }
    }

    pub async fn save_medical_history(
        &self,
        cmd: SaveMedicalHistoryCommand,
    ) -> Result<MedicalHistory, MemberError> {
        self.ensure_member(&cmd.member_id).await?;
        let now = Timestamp::now();

        match self.intake.find_medical_history(&cmd.member_id).await? {
            Some(mut history) => {
                history.apply(cmd.update, now);
                self.intake.update_medical_history(&history).await?;
                info!(member_id = %cmd.member_id, "Medical history updated");
                Ok(history)
            }
            None => {
                let mut history =
                    MedicalHistory::record(cmd.member_id.clone(), MedicalAnswers::default(), now);
                history.apply(cmd.update, now);
                self.intake
                    .save_medical_history(&history)
                    .await
                    .map_err(|e| conflict_or(&cmd.member_id, MEDICAL_HISTORY, e))?;
                info!(member_id = %cmd.member_id, "Medical history recorded");
                Ok(history)
            }
        }
    }

    pub async fn save_emergency_contact(
        &self,
        cmd: SaveEmergencyContactCommand,
    ) -> Result<EmergencyContact, MemberError> {
        self.ensure_member(&cmd.member_id).await?;
        let now = Timestamp::now();

        match self.intake.find_emergency_contact(&cmd.member_id).await? {
            Some(mut contact) => {
                contact.apply(cmd.update, now)?;
                self.intake.update_emergency_contact(&contact).await?;
                info!(member_id = %cmd.member_id, "Emergency contact updated");
                Ok(contact)
            }
            None => {
                let contact = EmergencyContact::record(
                    cmd.member_id.clone(),
                    cmd.update.contact_name.unwrap_or_default(),
                    cmd.update.contact_number.unwrap_or_default(),
                    now,
                )?;
                self.intake
                    .save_emergency_contact(&contact)
                    .await
                    .map_err(|e| conflict_or(&cmd.member_id, EMERGENCY_CONTACT, e))?;
                info!(member_id = %cmd.member_id, "Emergency contact recorded");
                Ok(contact)
            }
        }
    }

    pub async fn sign_waiver(&self, cmd: SignWaiverCommand) -> Result<LiabilityWaiver, MemberError> {
        self.ensure_member(&cmd.member_id).await?;

        if self.intake.find_liability_waiver(&cmd.member_id).await?.is_some() {
            return Err(MemberError::intake_exists(cmd.member_id, LIABILITY_WAIVER));
        }

        let waiver = LiabilityWaiver::sign(
            cmd.member_id.clone(),
            cmd.form.signature_name,
            cmd.form.signed_date,
            cmd.form.waiver_accepted,
            Timestamp::now(),
        )?;
        self.intake
            .save_liability_waiver(&waiver)
            .await
            .map_err(|e| conflict_or(&cmd.member_id, LIABILITY_WAIVER, e))?;

        info!(member_id = %cmd.member_id, signed_date = %waiver.signed_date, "Liability waiver signed");
        Ok(waiver)
    }
}
