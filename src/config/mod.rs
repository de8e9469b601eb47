//! Desk configuration.
//!
//! Values come from, lowest precedence first:
//!
//! 1. built-in defaults (a development desk on the in-memory store)
//! 2. an optional settings file, `gym-desk.toml` by default or the path in
//!    `GYM_DESK_CONFIG`
//! 3. environment variables prefixed `GYM_DESK`, with `__` between levels,
//!    e.g. `GYM_DESK__SCANNER__MODE=check-in`
//!
//! A `.env` file is read into the environment first when present.
//!
//! ```no_run
//! use gym_desk::config::AppConfig;
//!
//! let config = AppConfig::load().expect("Failed to load configuration");
//! config.validate().expect("Invalid configuration");
//! ```

mod database;
mod error;
mod gym;
mod scanner;
mod server;

pub use database::{DatabaseConfig, PoolConfig, StoreBackend};
pub use error::{ConfigError, ValidationError};
pub use gym::GymConfig;
pub use scanner::ScannerConfig;
pub use server::{Environment, LogFormat, ServerConfig};

use config::{Config, Source};
use serde::Deserialize;

/// Variable naming the settings file.
pub const CONFIG_FILE_VAR: &str = "GYM_DESK_CONFIG";

const DEFAULT_CONFIG_FILE: &str = "gym-desk";
const ENV_PREFIX: &str = "GYM_DESK";

/// Root configuration. Every section falls back to its defaults.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    /// Listener, environment, logging, CORS
    pub server: ServerConfig,

    /// Record store selection and pool limits
    pub database: DatabaseConfig,

    /// Member ids, local calendar and expiry thresholds
    pub gym: GymConfig,

    /// Keyboard-wedge scanner
    pub scanner: ScannerConfig,
}

impl AppConfig {
    /// Loads the settings file (if any) overlaid with `GYM_DESK__*` variables.
    ///
    /// # Errors
    ///
    /// `ConfigError::LoadError` if the file cannot be parsed or a value has
    /// the wrong type. Range checks are left to [`AppConfig::validate`].
    pub fn load() -> Result<Self, ConfigError> {
        dotenvy::dotenv().ok();

        let path = std::env::var(CONFIG_FILE_VAR).ok();
        let file = config::File::with_name(path.as_deref().unwrap_or(DEFAULT_CONFIG_FILE))
            // The default file is optional; a named one must exist.
            .required(path.is_some());
        Self::from_file(file)
    }

    /// Builds from `file` overlaid with the environment.
    pub fn from_file<S>(file: S) -> Result<Self, ConfigError>
    where
        S: Source + Send + Sync + 'static,
    {
        let config = Config::builder()
            .add_source(file)
            .add_source(
                config::Environment::with_prefix(ENV_PREFIX)
                    .prefix_separator("__")
                    .separator("__")
                    .try_parsing(true),
            )
            .build()?
            .try_deserialize()?;
        Ok(config)
    }

    /// Checks every section, stopping at the first problem.
    pub fn validate(&self) -> Result<(), ValidationError> {
        self.server.validate()?;
        self.database.validate()?;
        self.gym.validate()?;
        self.scanner.validate()
    }
}
