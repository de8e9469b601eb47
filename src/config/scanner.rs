//! Scanner station configuration

use serde::Deserialize;
use std::time::Duration;

use super::error::ValidationError;
use crate::domain::access::DeskMode;
use crate::domain::scanner::ScanTimings;

/// Keyboard-wedge scanner attached to the server's stdin
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct ScannerConfig {
    /// Read scans from stdin
    pub enabled: bool,

    /// Partial input older than this is discarded
    pub idle_timeout_ms: u64,

    /// Minimum gap between two accepted scans
    pub debounce_ms: u64,

    /// How long a result stays on display
    pub display_ms: u64,

    /// `check-in`, `check-out` or `toggle`
    pub mode: String,
}

impl ScannerConfig {
    pub fn timings(&self) -> ScanTimings {
        ScanTimings {
            idle_timeout: Duration::from_millis(self.idle_timeout_ms),
            debounce: Duration::from_millis(self.debounce_ms),
            display: Duration::from_millis(self.display_ms),
        }
    }

    pub fn desk_mode(&self) -> Result<DeskMode, ValidationError> {
        self.mode
            .parse()
            .map_err(|_| ValidationError::InvalidDeskMode(self.mode.clone()))
    }

    /// Validate scanner configuration
    pub fn validate(&self) -> Result<(), ValidationError> {
        if self.idle_timeout_ms == 0 {
            return Err(ValidationError::InvalidScannerTiming("idle_timeout_ms"));
        }
        if self.display_ms == 0 {
            return Err(ValidationError::InvalidScannerTiming("display_ms"));
        }
        self.desk_mode()?;
        Ok(())
    }
}

impl Default for ScannerConfig {
    fn default() -> Self {
        Self {
            enabled: false,
            idle_timeout_ms: 100,
            debounce_ms: 500,
            display_ms: 2000,
            mode: "toggle".to_string(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_match_scan_timings() {
        let config = ScannerConfig::default();
        assert!(!config.enabled);
        assert_eq!(config.timings(), ScanTimings::default());
        assert_eq!(config.desk_mode().unwrap(), DeskMode::Toggle);
    }

    #[test]
    fn test_mode_aliases() {
        let config = ScannerConfig {
            mode: "checkout".to_string(),
            ..Default::default()
        };
        assert_eq!(config.desk_mode().unwrap(), DeskMode::CheckOut);
    }

    #[test]
    fn test_validation_unknown_mode() {
        let config = ScannerConfig {
            mode: "sideways".to_string(),
            ..Default::default()
        };
        assert_eq!(
            config.validate(),
            Err(ValidationError::InvalidDeskMode("sideways".to_string()))
        );
    }

    #[test]
    fn test_validation_zero_idle_timeout() {
        let config = ScannerConfig {
            idle_timeout_ms: 0,
            ..Default::default()
        };
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_zero_debounce_is_allowed() {
        let config = ScannerConfig {
            debounce_ms: 0,
            ..Default::default()
        };
        assert!(config.validate().is_ok());
    }
}
