//! Desk server entry point: loads configuration, opens the store, serves the
//! API and optionally runs the keyboard-wedge scanner on stdin.

use std::error::Error;
use std::sync::Arc;

use tokio::io::BufReader;
use tokio::net::TcpListener;
use tokio::sync::{mpsc, watch};
use tracing::{error, info, warn};
use tracing_subscriber::EnvFilter;

use gym_desk::adapters::http::{self, AppState, DeskSettings};
use gym_desk::adapters::postgres::{
    self, PostgresAttendanceRepository, PostgresIntakeRepository, PostgresMemberRepository,
    PostgresSubscriptionRepository,
};
use gym_desk::adapters::scanner::{feed_lines, log_updates};
use gym_desk::adapters::InMemoryStore;
use gym_desk::application::ScanInputHandler;
use gym_desk::config::{AppConfig, LogFormat, ServerConfig, StoreBackend};

type BoxError = Box<dyn Error + Send + Sync>;

#[tokio::main]
async fn main() -> Result<(), BoxError> {
    let config = AppConfig::load()?;
    init_tracing(&config.server)?;
    config.validate()?;

    let settings = DeskSettings::from_config(&config.gym, &config.scanner)?;
    let state = build_state(&config, settings).await?;

    let (shutdown_tx, shutdown_rx) = watch::channel(false);
    if config.scanner.enabled {
        spawn_scanner(&state, &config, shutdown_rx);
    }

    let addr = config.server.socket_addr()?;
    let listener = TcpListener::bind(addr).await?;
    info!(
        %addr,
        environment = ?config.server.environment,
        scanner = config.scanner.enabled,
        "Gym desk listening"
    );

    axum::serve(listener, http::app(state, &config.server))
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    // Stops the scanner loop.
    let _ = shutdown_tx.send(true);
    info!("Gym desk stopped");
    Ok(())
}

fn init_tracing(server: &ServerConfig) -> Result<(), BoxError> {
    let filter = EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new(&server.log_level))?;
    let builder = tracing_subscriber::fmt().with_env_filter(filter);

    match server.log_format() {
        LogFormat::Json => builder.json().try_init(),
        LogFormat::Text => builder.try_init(),
    }
}

async fn build_state(config: &AppConfig, settings: DeskSettings) -> Result<AppState, BoxError> {
    if config.database.backend() == StoreBackend::Memory {
        warn!("No database URL configured, records are kept in memory only");
        let store = InMemoryStore::new(config.gym.member_id_prefix.clone(), config.gym.member_id_seed);
        return Ok(AppState::from_store(store, settings));
    }

    let pool = postgres::connect(&config.database).await?;
    if config.database.run_migrations {
        postgres::run_migrations(&pool).await?;
    }

    let members = Arc::new(PostgresMemberRepository::new(
        pool.clone(),
        config.gym.member_id_prefix.clone(),
        config.gym.member_id_seed,
    ));
    Ok(AppState {
        ids: members.clone(),
        members,
        subscriptions: Arc::new(PostgresSubscriptionRepository::new(pool.clone())),
        intake: Arc::new(PostgresIntakeRepository::new(pool.clone())),
        attendance: Arc::new(PostgresAttendanceRepository::new(pool)),
        settings,
    })
}

fn spawn_scanner(state: &AppState, config: &AppConfig, shutdown: watch::Receiver<bool>) {
    let handler = ScanInputHandler::new(
        Arc::new(state.record_scan_handler()),
        config.scanner.timings(),
        state.settings.desk_mode,
    );
    let (keys_tx, keys_rx) = mpsc::channel(256);
    let (updates_tx, updates_rx) = mpsc::channel(32);

    tokio::spawn(async move { handler.run(keys_rx, updates_tx, shutdown).await });
    tokio::spawn(log_updates(updates_rx));
    tokio::spawn(async move {
        match feed_lines(BufReader::new(tokio::io::stdin()), keys_tx).await {
            Ok(lines) => info!(lines, "Scanner input closed"),
            Err(e) => error!(error = %e, "Scanner input failed"),
        }
    });

    info!(mode = %state.settings.desk_mode, "Scanner reading from stdin");
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        error!(error = %e, "Failed to listen for shutdown signal");
    }
    info!("Shutdown signal received");
}
