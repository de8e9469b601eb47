//! PostgreSQL adapters - Database implementations for repository ports.
//!
//! This module provides adapters for PostgreSQL-backed persistence:
//! - `PostgresMemberRepository` - Members and the id counter
//! - `PostgresSubscriptionRepository` - Live subscriptions with archive-on-upsert
//! - `PostgresIntakeRepository` - Medical history, emergency contact, waiver
//! - `PostgresAttendanceRepository` - Scan logs and active sessions

mod attendance_repository;
mod intake_repository;
mod member_repository;
mod subscription_repository;

pub use attendance_repository::PostgresAttendanceRepository;
pub use intake_repository::PostgresIntakeRepository;
pub use member_repository::PostgresMemberRepository;
pub use subscription_repository::PostgresSubscriptionRepository;

use sqlx::postgres::PgPoolOptions;
use sqlx::PgPool;
use std::fmt::Display;
use tracing::info;

use crate::config::DatabaseConfig;
use crate::domain::foundation::{DomainError, ErrorCode};

/// Opens a connection pool using the configured limits.
pub async fn connect(config: &DatabaseConfig) -> Result<PgPool, sqlx::Error> {
    let limits = &config.pool;
    let pool = PgPoolOptions::new()
        .min_connections(limits.min_connections)
        .max_connections(limits.max_connections)
        .acquire_timeout(limits.acquire_timeout())
        .idle_timeout(limits.idle_timeout())
        .max_lifetime(limits.max_lifetime())
        .connect(config.url.trim())
        .await?;

    info!(
        max_connections = limits.max_connections,
        "Connected to PostgreSQL"
    );
    Ok(pool)
}

/// Applies the bundled schema migrations.
pub async fn run_migrations(pool: &PgPool) -> Result<(), sqlx::migrate::MigrateError> {
    sqlx::migrate!("./migrations").run(pool).await?;
    info!("Database migrations applied");
    Ok(())
}

pub(crate) fn db_error(context: &str, e: sqlx::Error) -> DomainError {
    DomainError::new(
        ErrorCode::DatabaseError,
        format!("Failed to {}: {}", context, e),
    )
}

/// A stored value the domain refuses to load.
pub(crate) fn corrupt(e: impl Display) -> DomainError {
    DomainError::new(
        ErrorCode::DatabaseError,
        format!("Invalid stored value: {}", e),
    )
}
