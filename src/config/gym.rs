//! Gym configuration

use serde::Deserialize;

use super::error::ValidationError;
use crate::domain::foundation::LocalCalendar;

const MAX_OFFSET_MINUTES: i32 = 14 * 60;

/// Front-desk rules for this gym
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct GymConfig {
    /// Letter prefix of member ids (`BCF` in `BCF-1001`)
    pub member_id_prefix: String,

    /// Counter value the first allocated id follows
    pub member_id_seed: u64,

    /// Local time zone as a fixed offset from UTC
    pub utc_offset_minutes: i32,

    /// Default window for "expiring soon"
    pub expiring_threshold_days: u32,

    /// Window used by the member table
    pub listing_threshold_days: u32,
}

impl GymConfig {
    /// The gym's local calendar
    pub fn calendar(&self) -> Result<LocalCalendar, ValidationError> {
        LocalCalendar::from_offset_minutes(self.utc_offset_minutes)
            .map_err(|_| ValidationError::InvalidUtcOffset(self.utc_offset_minutes))
    }

    /// Validate gym configuration
    pub fn validate(&self) -> Result<(), ValidationError> {
        if self.member_id_prefix.is_empty()
            || !self.member_id_prefix.chars().all(|c| c.is_ascii_uppercase())
        {
            return Err(ValidationError::InvalidMemberPrefix(
                self.member_id_prefix.clone(),
            ));
        }
        if self.utc_offset_minutes.abs() > MAX_OFFSET_MINUTES {
            return Err(ValidationError::InvalidUtcOffset(self.utc_offset_minutes));
        }
        self.calendar()?;
        if !(1..=365).contains(&self.expiring_threshold_days) {
            return Err(ValidationError::InvalidThreshold("expiring_threshold_days"));
        }
        if !(1..=365).contains(&self.listing_threshold_days) {
            return Err(ValidationError::InvalidThreshold("listing_threshold_days"));
        }
        Ok(())
    }
}

impl Default for GymConfig {
    fn default() -> Self {
        Self {
            member_id_prefix: "BCF".to_string(),
            member_id_seed: 1000,
            utc_offset_minutes: 480,
            expiring_threshold_days: 3,
            listing_threshold_days: 7,
        }
    }
}
