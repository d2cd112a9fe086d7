//! Rentora Server — application entry point.
//!
//! Connects to SurrealDB, applies migrations and runs the periodic
//! blacklist sweeper until shutdown.

use std::time::Duration;

use rentora_core::repository::RevokedTokenRepository;
use rentora_db::repository::SurrealRevokedTokenRepository;
use rentora_db::{DbConfig, DbManager, run_migrations};
use tracing::{error, info};
use tracing_subscriber::EnvFilter;

/// Interval between expired-blacklist-entry sweeps.
const BLACKLIST_SWEEP_INTERVAL: Duration = Duration::from_secs(3600);

#[tokio::main]
async fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::from_default_env().add_directive("rentora=info".parse().unwrap()),
        )
        .json()
        .init();

    info!("Starting Rentora server...");

    let db = match DbManager::connect(DbConfig::from_env()).await {
        Ok(db) => db,
        Err(e) => {
            error!(error = %e, "Failed to connect to SurrealDB");
            std::process::exit(1);
        }
    };

    if let Err(e) = run_migrations(db.client()).await {
        error!(error = %e, "Failed to run migrations");
        std::process::exit(1);
    }

    let blacklist = SurrealRevokedTokenRepository::new(db.into_client());

    info!("Rentora server ready");

    // Sweep expired blacklist entries in the background.
    let sweeper = tokio::spawn(async move {
        let mut interval = tokio::time::interval(BLACKLIST_SWEEP_INTERVAL);
        loop {
            interval.tick().await;
            match blacklist.cleanup_expired().await {
                Ok(0) => {}
                Ok(removed) => info!(removed, "Swept expired blacklist entries"),
                Err(e) => error!(error = %e, "Blacklist sweep failed"),
            }
        }
    });

    // TODO: mount the HTTP API and wire the auth and marketplace services
    // once the transport layer lands.

    if let Err(e) = tokio::signal::ctrl_c().await {
        error!(error = %e, "Failed to listen for shutdown signal");
    }

    sweeper.abort();
    info!("Rentora server stopped.");
}
