//! PostgreSQL implementation of IntakeRepository.

use crate::domain::foundation::{DomainError, ErrorCode, MemberId, Timestamp};
use crate::domain::member::{EmergencyContact, LiabilityWaiver, MedicalAnswers, MedicalHistory};
use crate::ports::IntakeRepository;
use async_trait::async_trait;
use chrono::{DateTime, NaiveDate, Utc};
use sqlx::PgPool;

use super::{corrupt, db_error};

/// PostgreSQL implementation of the IntakeRepository port.
pub struct PostgresIntakeRepository {
    pool: PgPool,
}

impl PostgresIntakeRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[derive(Debug, sqlx::FromRow)]
struct MedicalHistoryRow {
    member_id: String,
    heart_problems: bool,
    blood_pressure_problems: bool,
    chest_pain_exercising: bool,
    asthma_breathing_problems: bool,
    joint_problems: bool,
    neck_back_problems: bool,
    pregnant_recent_birth: bool,
    other_medical_conditions: bool,
    other_medical_details: Option<String>,
    smoking: bool,
    medication: bool,
    medication_details: Option<String>,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
}

impl TryFrom<MedicalHistoryRow> for MedicalHistory {
    type Error = DomainError;

    fn try_from(row: MedicalHistoryRow) -> Result<Self, Self::Error> {
        Ok(MedicalHistory {
            member_id: MemberId::parse(row.member_id).map_err(corrupt)?,
            answers: MedicalAnswers {
                heart_problems: row.heart_problems,
                blood_pressure_problems: row.blood_pressure_problems,
                chest_pain_exercising: row.chest_pain_exercising,
                asthma_breathing_problems: row.asthma_breathing_problems,
                joint_problems: row.joint_problems,
                neck_back_problems: row.neck_back_problems,
                pregnant_recent_birth: row.pregnant_recent_birth,
                other_medical_conditions: row.other_medical_conditions,
                other_medical_details: row.other_medical_details,
                smoking: row.smoking,
                medication: row.medication,
                medication_details: row.medication_details,
            },
            created_at: Timestamp::from_datetime(row.created_at),
            updated_at: Timestamp::from_datetime(row.updated_at),
        })
    }
}

#[derive(Debug, sqlx::FromRow)]
struct EmergencyContactRow {
    member_id: String,
    contact_name: String,
    contact_number: String,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
}

impl TryFrom<EmergencyContactRow> for EmergencyContact {
    type Error = DomainError;

    fn try_from(row: EmergencyContactRow) -> Result<Self, Self::Error> {
        Ok(EmergencyContact {
            member_id: MemberId::parse(row.member_id).map_err(corrupt)?,
            contact_name: row.contact_name,
            contact_number: row.contact_number,
            created_at: Timestamp::from_datetime(row.created_at),
            updated_at: Timestamp::from_datetime(row.updated_at),
        })
    }
}

#[derive(Debug, sqlx::FromRow)]
struct LiabilityWaiverRow {
    member_id: String,
    signature_name: String,
    signed_date: NaiveDate,
    waiver_accepted: bool,
    created_at: DateTime<Utc>,
}

impl TryFrom<LiabilityWaiverRow> for LiabilityWaiver {
    type Error = DomainError;

    fn try_from(row: LiabilityWaiverRow) -> Result<Self, Self::Error> {
        Ok(LiabilityWaiver {
            member_id: MemberId::parse(row.member_id).map_err(corrupt)?,
            signature_name: row.signature_name,
            signed_date: row.signed_date,
            waiver_accepted: row.waiver_accepted,
            created_at: Timestamp::from_datetime(row.created_at),
        })
    }
}

/// Maps key violations on an intake table to domain codes.
///
/// A primary key clash means the record already exists; a foreign key
/// failure means the member is gone.
fn save_error(table: &str, form: &str, member_id: &MemberId, e: sqlx::Error) -> DomainError {
    if let sqlx::Error::Database(db_err) = &e {
        let constraint = db_err.constraint().unwrap_or_default();
        if constraint == format!("{}_pkey", table) {
            return DomainError::new(
                ErrorCode::IntakeRecordExists,
                format!("Member {} already has a {}", member_id, form),
            )
            .with_detail("form", form);
        }
        if constraint == format!("{}_member_id_fkey", table) {
            return DomainError::new(
                ErrorCode::MemberNotFound,
                format!("Member {} not found", member_id),
            );
        }
    }
    db_error(&format!("save {}", form), e)
}

fn missing(member_id: &MemberId, form: &str) -> DomainError {
    DomainError::new(
        ErrorCode::MemberNotFound,
        format!("No {} on file for member {}", form, member_id),
    )
    .with_detail("form", form)
}

#[async_trait]
impl IntakeRepository for PostgresIntakeRepository {
    async fn find_medical_history(
        &self,
        member_id: &MemberId,
    ) -> Result<Option<MedicalHistory>, DomainError> {
        let row: Option<MedicalHistoryRow> = sqlx::query_as(
            r#"
            SELECT member_id, heart_problems, blood_pressure_problems, chest_pain_exercising,
                   asthma_breathing_problems, joint_problems, neck_back_problems,
                   pregnant_recent_birth, other_medical_conditions, other_medical_details,
                   smoking, medication, medication_details, created_at, updated_at
            FROM medical_histories
            WHERE member_id = $1
            "#,
        )
        .bind(member_id.as_str())
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| db_error("find medical history", e))?;

        row.map(MedicalHistory::try_from).transpose()
    }

    async fn save_medical_history(&self, history: &MedicalHistory) -> Result<(), DomainError> {
        let a = &history.answers;
        sqlx::query(
            r#"
            INSERT INTO medical_histories (
                member_id, heart_problems, blood_pressure_problems, chest_pain_exercising,
                asthma_breathing_problems, joint_problems, neck_back_problems,
                pregnant_recent_birth, other_medical_conditions, other_medical_details,
                smoking, medication, medication_details, created_at, updated_at
            ) VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11, $12, $13, $14, $15)
            "#,
        )
        .bind(history.member_id.as_str())
        .bind(a.heart_problems)
        .bind(a.blood_pressure_problems)
        .bind(a.chest_pain_exercising)
        .bind(a.asthma_breathing_problems)
        .bind(a.joint_problems)
        .bind(a.neck_back_problems)
        .bind(a.pregnant_recent_birth)
        .bind(a.other_medical_conditions)
        .bind(&a.other_medical_details)
        .bind(a.smoking)
        .bind(a.medication)
        .bind(&a.medication_details)
        .bind(history.created_at.as_datetime())
        .bind(history.updated_at.as_datetime())
        .execute(&self.pool)
        .await
        .map_err(|e| save_error("medical_histories", "medical history", &history.member_id, e))?;

        Ok(())
    }

    async fn update_medical_history(&self, history: &MedicalHistory) -> Result<(), DomainError> {
        let a = &history.answers;
        let result = sqlx::query(
            r#"
            UPDATE medical_histories SET
                heart_problems = $2, blood_pressure_problems = $3, chest_pain_exercising = $4,
                asthma_breathing_problems = $5, joint_problems = $6, neck_back_problems = $7,
                pregnant_recent_birth = $8, other_medical_conditions = $9,
                other_medical_details = $10, smoking = $11, medication = $12,
                medication_details = $13, updated_at = $14
            WHERE member_id = $1
            "#,
        )
        .bind(history.member_id.as_str())
        .bind(a.heart_problems)
        .bind(a.blood_pressure_problems)
        .bind(a.chest_pain_exercising)
        .bind(a.asthma_breathing_problems)
        .bind(a.joint_problems)
        .bind(a.neck_back_problems)
        .bind(a.pregnant_recent_birth)
        .bind(a.other_medical_conditions)
        .bind(&a.other_medical_details)
        .bind(a.smoking)
        .bind(a.medication)
        .bind(&a.medication_details)
        .bind(history.updated_at.as_datetime())
        .execute(&self.pool)
        .await
        .map_err(|e| db_error("update medical history", e))?;

        if result.rows_affected() == 0 {
            return Err(missing(&history.member_id, "medical history"));
        }
        Ok(())
    }

    async fn find_emergency_contact(
        &self,
        member_id: &MemberId,
    ) -> Result<Option<EmergencyContact>, DomainError> {
        let row: Option<EmergencyContactRow> = sqlx::query_as(
            r#"
            SELECT member_id, contact_name, contact_number, created_at, updated_at
            FROM emergency_contacts
            WHERE member_id = $1
            "#,
        )
        .bind(member_id.as_str())
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| db_error("find emergency contact", e))?;

        row.map(EmergencyContact::try_from).transpose()
    }

    async fn save_emergency_contact(&self, contact: &EmergencyContact) -> Result<(), DomainError> {
        sqlx::query(
            r#"
            INSERT INTO emergency_contacts (
                member_id, contact_name, contact_number, created_at, updated_at
            ) VALUES ($1, $2, $3, $4, $5)
            "#,
        )
        .bind(contact.member_id.as_str())
        .bind(&contact.contact_name)
        .bind(&contact.contact_number)
        .bind(contact.created_at.as_datetime())
        .bind(contact.updated_at.as_datetime())
        .execute(&self.pool)
        .await
        .map_err(|e| {
            save_error("emergency_contacts", "emergency contact", &contact.member_id, e)
        })?;

        Ok(())
    }

    async fn update_emergency_contact(
        &self,
        contact: &EmergencyContact,
    ) -> Result<(), DomainError> {
        let result = sqlx::query(
            r#"
            UPDATE emergency_contacts
            SET contact_name = $2, contact_number = $3, updated_at = $4
            WHERE member_id = $1
            "#,
        )
        .bind(contact.member_id.as_str())
        .bind(&contact.contact_name)
        .bind(&contact.contact_number)
        .bind(contact.updated_at.as_datetime())
        .execute(&self.pool)
        .await
        .map_err(|e| db_error("update emergency contact", e))?;

        if result.rows_affected() == 0 {
            return Err(missing(&contact.member_id, "emergency contact"));
        }
        Ok(())
    }

    async fn find_liability_waiver(
        &self,
        member_id: &MemberId,
    ) -> Result<Option<LiabilityWaiver>, DomainError> {
        let row: Option<LiabilityWaiverRow> = sqlx::query_as(
            r#"
            SELECT member_id, signature_name, signed_date, waiver_accepted, created_at
            FROM liability_waivers
            WHERE member_id = $1
            "#,
        )
        .bind(member_id.as_str())
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| db_error("find liability waiver", e))?;

        row.map(LiabilityWaiver::try_from).transpose()
    }

    async fn save_liability_waiver(&self, waiver: &LiabilityWaiver) -> Result<(), DomainError> {
        sqlx::query(
            r#"
            INSERT INTO liability_waivers (
                member_id, signature_name, signed_date, waiver_accepted, created_at
            ) VALUES ($1, $2, $3, $4, $5)
            "#,
        )
        .bind(waiver.member_id.as_str())
        .bind(&waiver.signature_name)
        .bind(waiver.signed_date)
        .bind(waiver.waiver_accepted)
        .bind(waiver.created_at.as_datetime())
        .execute(&self.pool)
        .await
        .map_err(|e| save_error("liability_waivers", "liability waiver", &waiver.member_id, e))?;

        Ok(())
    }
}
