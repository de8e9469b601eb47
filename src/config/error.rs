//! Configuration error types

use thiserror::Error;

/// Errors that can occur during configuration loading
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Configuration loading failed: {0}")]
    LoadError(#[from] config::ConfigError),

    #[error("Validation failed: {0}")]
    ValidationFailed(#[from] ValidationError),
}

/// Errors that can occur during configuration validation
#[derive(Debug, Error, PartialEq, Eq)]
pub enum ValidationError {
    #[error("Invalid port number")]
    InvalidPort,

    #[error("Invalid bind address: {0}")]
    InvalidBindAddress(String),

    #[error("Invalid request timeout")]
    InvalidTimeout,

    #[error("Invalid database URL format")]
    InvalidDatabaseUrl,

    #[error("Pool min_connections exceeds max_connections")]
    InvalidPoolSize,

    #[error("Pool size exceeds maximum allowed (100)")]
    PoolSizeTooLarge,

    #[error("Member id prefix must be uppercase letters, got '{0}'")]
    InvalidMemberPrefix(String),

    #[error("UTC offset must be within +/-14 hours, got {0} minutes")]
    InvalidUtcOffset(i32),

    #[error("Threshold '{0}' must be between 1 and 365 days")]
    InvalidThreshold(&'static str),

    #[error("Scanner timing '{0}' must be greater than zero")]
    InvalidScannerTiming(&'static str),

    #[error("Unknown desk mode '{0}'")]
    InvalidDeskMode(String),
}
