//! Strongly-typed identifier value objects.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use uuid::Uuid;

use super::ValidationError;

/// Member identifier printed on the QR card, formatted `PREFIX-NNNN`.
///
/// The prefix is one or more uppercase ASCII letters and the suffix is the
/// value of the shared member counter at allocation time. Once assigned an
/// identifier never changes.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct MemberId(String);

impl MemberId {
    /// Builds an identifier from a prefix and counter value.
    pub fn from_parts(prefix: &str, number: u64) -> Result<Self, ValidationError> {
        Self::parse(format!("{}-{}", prefix, number))
    }

    /// Parses and validates an identifier.
    pub fn parse(id: impl Into<String>) -> Result<Self, ValidationError> {
        let id = id.into();
        if id.is_empty() {
            return Err(ValidationError::empty_field("member_id"));
        }

        let (prefix, number) = id
            .split_once('-')
            .ok_or_else(|| ValidationError::invalid_format("member_id", "expected PREFIX-NNNN"))?;

        if prefix.is_empty() || !prefix.chars().all(|c| c.is_ascii_uppercase()) {
            return Err(ValidationError::invalid_format(
                "member_id",
                "prefix must be uppercase letters",
            ));
        }
        if number.is_empty() || !number.chars().all(|c| c.is_ascii_digit()) {
            return Err(ValidationError::invalid_format(
                "member_id",
                "suffix must be numeric",
            ));
        }

        Ok(Self(id))
    }

    /// Returns the inner string slice.
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Returns the letter prefix (e.g. `BCF`).
    pub fn prefix(&self) -> &str {
        self.0.split_once('-').map(|(p, _)| p).unwrap_or_default()
    }

    /// Returns the numeric suffix.
    pub fn number(&self) -> u64 {
        self.0
            .split_once('-')
            .and_then(|(_, n)| n.parse().ok())
            .unwrap_or_default()
    }
}

impl fmt::Display for MemberId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl FromStr for MemberId {
    type Err = ValidationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

impl TryFrom<String> for MemberId {
    type Error = ValidationError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::parse(value)
    }
}

impl From<MemberId> for String {
    fn from(id: MemberId) -> Self {
        id.0
    }
}

/// Unique identifier for a scan log entry.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ScanLogId(Uuid);

impl ScanLogId {
    /// Creates a new random ScanLogId.
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }

    /// Creates a ScanLogId from an existing UUID.
    pub fn from_uuid(uuid: Uuid) -> Self {
        Self(uuid)
    }

    /// Returns the inner UUID.
    pub fn as_uuid(&self) -> &Uuid {
        &self.0
    }
}

impl Default for ScanLogId {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Display for ScanLogId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl FromStr for ScanLogId {
    type Err = uuid::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Ok(Self(Uuid::parse_str(s)?))
    }
}

/// Unique identifier for an archived subscription period.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct HistoryEntryId(Uuid);

impl HistoryEntryId {
    /// Creates a new random HistoryEntryId.
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }

    /// Creates a HistoryEntryId from an existing UUID.
    pub fn from_uuid(uuid: Uuid) -> Self {
        Self(uuid)
    }

    /// Returns the inner UUID.
    pub fn as_uuid(&self) -> &Uuid {
        &self.0
    }
}

impl Default for HistoryEntryId {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Display for HistoryEntryId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn member_id_accepts_prefix_and_number() {
        let id = MemberId::parse("BCF-1001").unwrap();
        assert_eq!(id.prefix(), "BCF");
        assert_eq!(id.number(), 1001);
        assert_eq!(id.to_string(), "BCF-1001");
    }

    #[test]
    fn member_id_from_parts_formats_suffix() {
        let id = MemberId::from_parts("BCF", 1042).unwrap();
        assert_eq!(id.as_str(), "BCF-1042");
    }

    #[test]
    fn member_id_rejects_empty() {
        assert!(matches!(
            MemberId::parse(""),
            Err(ValidationError::EmptyField { .. })
        ));
    }

    #[test]
    fn member_id_rejects_missing_separator() {
        assert!(MemberId::parse("BCF1001").is_err());
    }

    #[test]
    fn member_id_rejects_lowercase_prefix() {
        assert!(MemberId::parse("bcf-1001").is_err());
    }

    #[test]
    fn member_id_rejects_non_numeric_suffix() {
        assert!(MemberId::parse("BCF-10a1").is_err());
        assert!(MemberId::parse("BCF-").is_err());
    }

    #[test]
    fn member_id_serializes_as_plain_string() {
        let id = MemberId::parse("BCF-7").unwrap();
        assert_eq!(serde_json::to_string(&id).unwrap(), "\"BCF-7\"");
    }

    #[test]
    fn member_id_deserialization_validates() {
        let ok: Result<MemberId, _> = serde_json::from_str("\"BCF-7\"");
        assert!(ok.is_ok());
        let bad: Result<MemberId, _> = serde_json::from_str("\"nope\"");
        assert!(bad.is_err());
    }

    #[test]
    fn scan_log_ids_are_unique() {
        assert_ne!(ScanLogId::new(), ScanLogId::new());
    }

    #[test]
    fn scan_log_id_parses_from_string() {
        let id = ScanLogId::new();
        let parsed: ScanLogId = id.to_string().parse().unwrap();
        assert_eq!(parsed, id);
    }
}
