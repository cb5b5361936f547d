//! # TaskHive Worker
//!
//! This is the background worker for TaskHive, responsible for the hourly
//! reminder and overdue sweep.
//!
//! ## Architecture
//!
//! The worker:
//! - Ticks on a configurable interval (default: 1 hour)
//! - Notifies users of tasks coming due within 24 hours
//! - Flags overdue tasks until they are completed
//! - Fires user-scheduled reminders exactly once
//! - Dispatches email through the configured mailer
//!
//! ## Usage
//!
//! ```bash
//! cargo run -p taskhive-worker
//! ```

use std::sync::Arc;
use taskhive_worker::{
    mailer::LogMailer,
    sweep::{SweepConfig, Sweeper},
};
use tokio_util::sync::CancellationToken;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Initialize tracing
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "taskhive_worker=debug".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    tracing::info!(
        "TaskHive Worker v{} starting...",
        env!("CARGO_PKG_VERSION")
    );

    // Load .env file if present (for development)
    dotenvy::dotenv().ok();

    let database_url = std::env::var("DATABASE_URL")
        .map_err(|_| anyhow::anyhow!("DATABASE_URL environment variable is required"))?;

    let pool = taskhive_shared::db::pool::create_pool(taskhive_shared::db::pool::DatabaseConfig {
        url: database_url,
        max_connections: 5,
        ..Default::default()
    })
    .await?;

    taskhive_shared::db::migrations::run_migrations(&pool).await?;

    let config = SweepConfig::from_env()?;
    let sweeper = Sweeper::new(pool, Arc::new(LogMailer::new()), config);

    let cancel = CancellationToken::new();
    let sweep_handle = tokio::spawn(sweeper.run(cancel.clone()));

    tracing::info!("Worker ready");

    tokio::signal::ctrl_c().await?;
    tracing::info!("Shutdown signal received, stopping sweep...");

    cancel.cancel();
    sweep_handle.await?;

    tracing::info!("Shutdown complete");

    Ok(())
}
