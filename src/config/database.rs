//! Record store configuration

use serde::Deserialize;
use std::time::Duration;

use super::error::ValidationError;

const MAX_POOL_SIZE: u32 = 100;

/// Where desk records live.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StoreBackend {
    /// Process memory; everything is lost on restart.
    Memory,
    Postgres,
}

/// Record store configuration.
///
/// An empty URL selects the in-memory store.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct DatabaseConfig {
    /// `postgres://` or `postgresql://` URL
    pub url: String,

    /// Apply the bundled migrations before serving
    pub run_migrations: bool,

    pub pool: PoolConfig,
}

/// Connection pool bounds, `GYM_DESK__DATABASE__POOL__*`.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct PoolConfig {
    pub min_connections: u32,
    pub max_connections: u32,
    pub acquire_timeout_secs: u64,
    pub idle_timeout_secs: u64,
    pub max_lifetime_secs: u64,
}

impl DatabaseConfig {
    pub fn backend(&self) -> StoreBackend {
        if self.url.trim().is_empty() {
            StoreBackend::Memory
        } else {
            StoreBackend::Postgres
        }
    }

    pub fn validate(&self) -> Result<(), ValidationError> {
        if self.backend() == StoreBackend::Postgres {
            let url = self.url.trim();
            if !["postgres://", "postgresql://"]
                .iter()
                .any(|scheme| url.starts_with(scheme))
            {
                return Err(ValidationError::InvalidDatabaseUrl);
            }
        }
        self.pool.validate()
    }
}

impl PoolConfig {
    pub fn acquire_timeout(&self) -> Duration {
        Duration::from_secs(self.acquire_timeout_secs)
    }

    pub fn idle_timeout(&self) -> Duration {
        Duration::from_secs(self.idle_timeout_secs)
    }

    pub fn max_lifetime(&self) -> Duration {
        Duration::from_secs(self.max_lifetime_secs)
    }

    fn validate(&self) -> Result<(), ValidationError> {
        if self.min_connections > self.max_connections {
            return Err(ValidationError::InvalidPoolSize);
        }
        if self.max_connections > MAX_POOL_SIZE {
            return Err(ValidationError::PoolSizeTooLarge);
        }
        Ok(())
    }
}

impl Default for DatabaseConfig {
    fn default() -> Self {
        Self {
            url: String::new(),
            run_migrations: true,
            pool: PoolConfig::default(),
        }
    }
}

// A single desk rarely needs more than a handful of connections.
impl Default for PoolConfig {
    fn default() -> Self {
        Self {
            min_connections: 1,
            max_connections: 10,
            acquire_timeout_secs: 30,
            idle_timeout_secs: 600,
            max_lifetime_secs: 1800,
        }
    }
}
