//! Member aggregate.
//!
//! A member is identified by the `PREFIX-NNNN` code printed on their QR card.
//! The identifier is allocated once and never changes; everything else can be
//! edited at the desk.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::domain::foundation::{patch, MemberId, Timestamp, ValidationError};

const MAX_AGE: u32 = 150;

/// Optional personal details collected on the sign-up form.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct MemberProfile {
    pub email: Option<String>,
    pub phone: Option<String>,
    pub birthday: Option<NaiveDate>,
    pub age: Option<u32>,
    pub address: Option<String>,
    pub goal: Option<String>,
    pub program_type: Option<String>,
    pub height_cm: Option<f64>,
    pub weight_kg: Option<f64>,
}

impl MemberProfile {
    /// Trims text fields, dropping blank ones, and checks numeric ranges.
    pub fn normalized(self) -> Result<Self, ValidationError> {
        let profile = Self {
            email: non_blank(self.email),
            phone: non_blank(self.phone),
            birthday: self.birthday,
            age: self.age,
            address: non_blank(self.address),
            goal: non_blank(self.goal),
            program_type: non_blank(self.program_type),
            height_cm: self.height_cm,
            weight_kg: self.weight_kg,
        };
        profile.validate()?;
        Ok(profile)
    }

    fn validate(&self) -> Result<(), ValidationError> {
        if let Some(email) = &self.email {
            if !email.contains('@') {
                return Err(ValidationError::invalid_format("email", "missing '@'"));
            }
        }
        if let Some(age) = self.age {
            if age > MAX_AGE {
                return Err(ValidationError::out_of_range("age", 0, MAX_AGE as i64, age as i64));
            }
        }
        positive("height_cm", self.height_cm)?;
        positive("weight_kg", self.weight_kg)?;
        Ok(())
    }
}

/// Member aggregate.
///
/// # Invariants
///
/// - `id` is unique and immutable
/// - `name` is non-empty
/// - `updated_at >= created_at`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Member {
    pub id: MemberId,

    pub name: String,

    #[serde(flatten)]
    pub profile: MemberProfile,

    pub created_at: Timestamp,

    pub updated_at: Timestamp,
}

impl Member {
    /// Registers a new member under an already allocated identifier.
    pub fn register(
        id: MemberId,
        name: impl Into<String>,
        profile: MemberProfile,
        now: Timestamp,
    ) -> Result<Self, ValidationError> {
        let name = required_name(name.into())?;
        Ok(Self {
            id,
            name,
            profile: profile.normalized()?,
            created_at: now,
            updated_at: now,
        })
    }

    /// Applies a partial update.
    ///
    /// Only supplied fields change; `updated_at` is always refreshed. The
    /// update is validated as a whole before anything is written.
    pub fn apply(&mut self, update: MemberUpdate, now: Timestamp) -> Result<(), ValidationError> {
        let name = match update.name {
            Some(name) => required_name(name)?,
            None => self.name.clone(),
        };

        let current = self.profile.clone();
        let profile = MemberProfile {
            email: pick(update.email, current.email),
            phone: pick(update.phone, current.phone),
            birthday: update.birthday.unwrap_or(current.birthday),
            age: update.age.unwrap_or(current.age),
            address: pick(update.address, current.address),
            goal: pick(update.goal, current.goal),
            program_type: pick(update.program_type, current.program_type),
            height_cm: update.height_cm.unwrap_or(current.height_cm),
            weight_kg: update.weight_kg.unwrap_or(current.weight_kg),
        }
        .normalized()?;

        self.name = name;
        self.profile = profile;
        self.updated_at = now;
        Ok(())
    }
}

/// Partial member update.
///
/// For optional fields the outer `Option` says whether the field was
/// supplied and the inner one carries the new value; `Some(None)` clears it.
/// Blank text clears a field as well.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(default)]
pub struct MemberUpdate {
    pub name: Option<String>,
    #[serde(deserialize_with = "patch::present")]
    pub email: Option<Option<String>>,
    #[serde(deserialize_with = "patch::present")]
    pub phone: Option<Option<String>>,
    #[serde(deserialize_with = "patch::present")]
    pub birthday: Option<Option<NaiveDate>>,
    #[serde(deserialize_with = "patch::present")]
    pub age: Option<Option<u32>>,
    #[serde(deserialize_with = "patch::present")]
    pub address: Option<Option<String>>,
    #[serde(deserialize_with = "patch::present")]
    pub goal: Option<Option<String>>,
    #[serde(deserialize_with = "patch::present")]
    pub program_type: Option<Option<String>>,
    #[serde(deserialize_with = "patch::present")]
    pub height_cm: Option<Option<f64>>,
    #[serde(deserialize_with = "patch::present")]
    pub weight_kg: Option<Option<f64>>,
}

impl MemberUpdate {
    /// True if no field was supplied.
    pub fn is_empty(&self) -> bool {
        self == &MemberUpdate::default()
    }
}

fn required_name(name: String) -> Result<String, ValidationError> {
    let trimmed = name.trim();
    if trimmed.is_empty() {
        return Err(ValidationError::empty_field("name"));
    }
    Ok(trimmed.to_string())
}

fn pick(update: Option<Option<String>>, current: Option<String>) -> Option<String> {
    match update {
        Some(value) => non_blank(value),
        None => current,
    }
}

fn non_blank(value: Option<String>) -> Option<String> {
    value
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
}

fn positive(field: &str, value: Option<f64>) -> Result<(), ValidationError> {
    match value {
        Some(v) if !v.is_finite() || v <= 0.0 => Err(ValidationError::invalid_format(
            field,
            "must be a positive number",
        )),
        _ => Ok(()),
    }
}
