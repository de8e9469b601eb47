//! Intake forms filled in at registration.
//!
//! Each record is one-to-one with a member. Medical history and the
//! emergency contact can be edited later; the liability waiver is signed once.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::domain::foundation::{patch, MemberId, Timestamp, ValidationError};

/// Answers to the pre-exercise medical questionnaire.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct MedicalAnswers {
    pub heart_problems: bool,
    pub blood_pressure_problems: bool,
    pub chest_pain_exercising: bool,
    pub asthma_breathing_problems: bool,
    pub joint_problems: bool,
    pub neck_back_problems: bool,
    pub pregnant_recent_birth: bool,
    pub other_medical_conditions: bool,
    pub other_medical_details: Option<String>,
    pub smoking: bool,
    pub medication: bool,
    pub medication_details: Option<String>,
}

impl MedicalAnswers {
    /// True if any condition was declared.
    pub fn has_flags(&self) -> bool {
        self.heart_problems
            || self.blood_pressure_problems
            || self.chest_pain_exercising
            || self.asthma_breathing_problems
            || self.joint_problems
            || self.neck_back_problems
            || self.pregnant_recent_birth
            || self.other_medical_conditions
            || self.smoking
            || self.medication
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MedicalHistory {
    pub member_id: MemberId,

    #[serde(flatten)]
    pub answers: MedicalAnswers,

    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

impl MedicalHistory {
    pub fn record(member_id: MemberId, answers: MedicalAnswers, now: Timestamp) -> Self {
        Self {
            member_id,
            answers: tidy(answers),
            created_at: now,
            updated_at: now,
        }
    }

    /// Applies the supplied answers and refreshes `updated_at`.
    pub fn apply(&mut self, update: MedicalHistoryUpdate, now: Timestamp) {
        let a = &mut self.answers;
        set(&mut a.heart_problems, update.heart_problems);
        set(&mut a.blood_pressure_problems, update.blood_pressure_problems);
        set(&mut a.chest_pain_exercising, update.chest_pain_exercising);
        set(&mut a.asthma_breathing_problems, update.asthma_breathing_problems);
        set(&mut a.joint_problems, update.joint_problems);
        set(&mut a.neck_back_problems, update.neck_back_problems);
        set(&mut a.pregnant_recent_birth, update.pregnant_recent_birth);
        set(&mut a.other_medical_conditions, update.other_medical_conditions);
        set(&mut a.smoking, update.smoking);
        set(&mut a.medication, update.medication);
        if let Some(details) = update.other_medical_details {
            a.other_medical_details = details;
        }
        if let Some(details) = update.medication_details {
            a.medication_details = details;
        }
        self.answers = tidy(std::mem::take(&mut self.answers));
        self.updated_at = now;
    }
}

/// Partial medical history update; `None` leaves a field unchanged.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct MedicalHistoryUpdate {
    pub heart_problems: Option<bool>,
    pub blood_pressure_problems: Option<bool>,
    pub chest_pain_exercising: Option<bool>,
    pub asthma_breathing_problems: Option<bool>,
    pub joint_problems: Option<bool>,
    pub neck_back_problems: Option<bool>,
    pub pregnant_recent_birth: Option<bool>,
    pub other_medical_conditions: Option<bool>,
    #[serde(deserialize_with = "patch::present")]
    pub other_medical_details: Option<Option<String>>,
    pub smoking: Option<bool>,
    pub medication: Option<bool>,
    #[serde(deserialize_with = "patch::present")]
    pub medication_details: Option<Option<String>>,
}

impl From<MedicalAnswers> for MedicalHistoryUpdate {
    fn from(a: MedicalAnswers) -> Self {
        Self {
            heart_problems: Some(a.heart_problems),
            blood_pressure_problems: Some(a.blood_pressure_problems),
            chest_pain_exercising: Some(a.chest_pain_exercising),
            asthma_breathing_problems: Some(a.asthma_breathing_problems),
            joint_problems: Some(a.joint_problems),
            neck_back_problems: Some(a.neck_back_problems),
            pregnant_recent_birth: Some(a.pregnant_recent_birth),
            other_medical_conditions: Some(a.other_medical_conditions),
            other_medical_details: Some(a.other_medical_details),
            smoking: Some(a.smoking),
            medication: Some(a.medication),
            medication_details: Some(a.medication_details),
        }
    }
}

fn set(field: &mut bool, value: Option<bool>) {
    if let Some(v) = value {
        *field = v;
    }
}

// Detail text is kept only while its checkbox is ticked.
fn tidy(mut answers: MedicalAnswers) -> MedicalAnswers {
    let other = answers.other_medical_conditions;
    let medication = answers.medication;
    answers.other_medical_details = answers
        .other_medical_details
        .take()
        .filter(|d| other && !d.trim().is_empty());
    answers.medication_details = answers
        .medication_details
        .take()
        .filter(|d| medication && !d.trim().is_empty());
    answers
}

/// Person to call in an emergency.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EmergencyContact {
    pub member_id: MemberId,
    pub contact_name: String,
    pub contact_number: String,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

impl EmergencyContact {
    pub fn record(
        member_id: MemberId,
        contact_name: impl Into<String>,
        contact_number: impl Into<String>,
        now: Timestamp,
    ) -> Result<Self, ValidationError> {
        Ok(Self {
            member_id,
            contact_name: required("contact_name", contact_name.into())?,
            contact_number: required("contact_number", contact_number.into())?,
            created_at: now,
            updated_at: now,
        })
    }

    pub fn apply(
        &mut self,
        update: EmergencyContactUpdate,
        now: Timestamp,
    ) -> Result<(), ValidationError> {
        let name = match update.contact_name {
            Some(name) => required("contact_name", name)?,
            None => self.contact_name.clone(),
        };
        let number = match update.contact_number {
            Some(number) => required("contact_number", number)?,
            None => self.contact_number.clone(),
        };
        self.contact_name = name;
        self.contact_number = number;
        self.updated_at = now;
        Ok(())
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct EmergencyContactUpdate {
    pub contact_name: Option<String>,
    pub contact_number: Option<String>,
}

/// Signed liability waiver. Create-only.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LiabilityWaiver {
    pub member_id: MemberId,
    pub signature_name: String,
    pub signed_date: NaiveDate,
    pub waiver_accepted: bool,
    pub created_at: Timestamp,
}

impl LiabilityWaiver {
    pub fn sign(
        member_id: MemberId,
        signature_name: impl Into<String>,
        signed_date: NaiveDate,
        waiver_accepted: bool,
        now: Timestamp,
    ) -> Result<Self, ValidationError> {
        if !waiver_accepted {
            return Err(ValidationError::invalid_format(
                "waiver_accepted",
                "waiver must be accepted",
            ));
        }
        Ok(Self {
            member_id,
            signature_name: required("signature_name", signature_name.into())?,
            signed_date,
            waiver_accepted,
            created_at: now,
        })
    }
}

fn required(field: &str, value: String) -> Result<String, ValidationError> {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        return Err(ValidationError::empty_field(field));
    }
    Ok(trimmed.to_string())
}
