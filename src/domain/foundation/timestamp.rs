//! UTC instants.
//!
//! Everything the desk stores is an absolute instant; the gym's local day
//! boundaries are computed by [`LocalCalendar`](super::LocalCalendar).

use chrono::{DateTime, Duration, Utc};
use serde::{Deserialize, Serialize};

use super::ValidationError;

/// A point in time, serialized as RFC 3339.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Timestamp(DateTime<Utc>);

impl Timestamp {
    pub fn now() -> Self {
        Self(Utc::now())
    }

    pub fn from_datetime(dt: DateTime<Utc>) -> Self {
        Self(dt)
    }

    /// Accepts any offset and normalizes to UTC.
    pub fn parse_rfc3339(s: &str) -> Result<Self, ValidationError> {
        DateTime::parse_from_rfc3339(s.trim())
            .map(|dt| Self(dt.with_timezone(&Utc)))
            .map_err(|e| ValidationError::invalid_format("timestamp", e.to_string()))
    }

    pub fn as_datetime(&self) -> &DateTime<Utc> {
        &self.0
    }

    pub fn is_before(&self, other: &Timestamp) -> bool {
        self < other
    }

    pub fn is_after(&self, other: &Timestamp) -> bool {
        self > other
    }

    /// `self - other`; negative when `other` is later.
    pub fn duration_since(&self, other: &Timestamp) -> Duration {
        self.0.signed_duration_since(other.0)
    }

    /// Shifts by whole 24-hour days. Calendar months go through
    /// `LocalCalendar::add_months`.
    pub fn add_days(&self, days: i64) -> Self {
        self.add(Duration::days(days))
    }

    pub fn add(&self, duration: Duration) -> Self {
        Self(self.0 + duration)
    }
}

impl From<DateTime<Utc>> for Timestamp {
    fn from(dt: DateTime<Utc>) -> Self {
        Self(dt)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ts(s: &str) -> Timestamp {
        Timestamp::parse_rfc3339(s).unwrap()
    }

    #[test]
    fn offsets_normalize_to_utc() {
        assert_eq!(ts("2024-03-10T08:00:00+08:00"), ts("2024-03-10T00:00:00Z"));
        assert_eq!(ts(" 2024-03-10T00:00:00Z "), ts("2024-03-10T00:00:00Z"));
    }

    #[test]
    fn unparseable_text_is_invalid_format() {
        let err = Timestamp::parse_rfc3339("yesterday").unwrap_err();
        assert!(matches!(err, ValidationError::InvalidFormat { ref field, .. } if field == "timestamp"));
    }

    #[test]
    fn ordering_helpers_agree_with_ord() {
        let checked_in = ts("2024-03-10T09:00:00Z");
        let checked_out = checked_in.add(Duration::minutes(90));

        assert!(checked_in.is_before(&checked_out));
        assert!(checked_out.is_after(&checked_in));
        assert!(!checked_in.is_after(&checked_in));
        assert_eq!(checked_in.max(checked_out), checked_out);
    }

    #[test]
    fn duration_since_is_signed() {
        let a = ts("2024-01-15T10:00:00Z");
        let b = a.add_days(2);
        assert_eq!(b.duration_since(&a).num_days(), 2);
        assert_eq!(a.duration_since(&b).num_days(), -2);
    }

    #[test]
    fn add_days_crosses_month_end() {
        assert_eq!(ts("2024-02-28T12:00:00Z").add_days(2), ts("2024-03-01T12:00:00Z"));
        assert_eq!(ts("2024-03-01T12:00:00Z").add_days(-1), ts("2024-02-29T12:00:00Z"));
    }

    #[test]
    fn json_is_an_rfc3339_string() {
        let stamp = ts("2024-01-15T10:30:00Z");
        let json = serde_json::to_string(&stamp).unwrap();
        assert!(json.starts_with("\"2024-01-15T10:30:00"));

        let back: Timestamp = serde_json::from_str(&json).unwrap();
        assert_eq!(back, stamp);
    }
}
