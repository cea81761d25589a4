//! # rally-server
//!
//! Backend maintenance and notification server for the Rally app.
//!
//! This binary provides:
//! - **Trigger entrypoints** (HTTP) that fan out push notifications for
//!   newly created messages, friend requests, and missions
//! - **Scheduled maintenance jobs**: retention pruning, friend-request
//!   expiry, overdue detection, deadline reminders, leaderboard recompute
//! - **Idempotent lobby seeding** via a one-shot HTTP endpoint
//! - **Admin API** to run any maintenance job on demand

mod api;
mod config;
mod error;
mod scheduler;

use std::sync::Arc;

use tracing::info;
use tracing_subscriber::EnvFilter;

use rally_engine::{seed_lobbies, LoggingDispatcher, MaintenanceJobs, TriggerHandlers};
use rally_store::MemoryStore;

use crate::api::AppState;
use crate::config::ServerConfig;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // -----------------------------------------------------------------------
    // 1. Initialize tracing (respects RUST_LOG env var)
    // -----------------------------------------------------------------------
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new("info,rally_server=debug")),
        )
        .init();

    info!("Starting Rally server v{}", env!("CARGO_PKG_VERSION"));

    // -----------------------------------------------------------------------
    // 2. Load configuration
    // -----------------------------------------------------------------------
    let config = ServerConfig::from_env();
    info!(?config, "Loaded configuration");

    // -----------------------------------------------------------------------
    // 3. Initialize capabilities
    // -----------------------------------------------------------------------
    let store = Arc::new(MemoryStore::new());
    let dispatcher = Arc::new(LoggingDispatcher);

    let jobs = Arc::new(MaintenanceJobs::new(store.clone(), dispatcher.clone()));
    let handlers = Arc::new(TriggerHandlers::new(store.clone(), dispatcher));

    if config.seed_lobbies_on_start {
        let outcomes = seed_lobbies(store.as_ref(), chrono::Utc::now()).await?;
        info!(lobbies = outcomes.len(), "Seeded lobbies at startup");
    }

    let app_state = AppState {
        store,
        jobs: jobs.clone(),
        handlers,
    };

    // -----------------------------------------------------------------------
    // 4. Spawn the job scheduler
    // -----------------------------------------------------------------------
    if config.run_scheduler {
        let handles = scheduler::spawn(jobs);
        info!(jobs = handles.len(), "Maintenance scheduler running");
    } else {
        info!("Scheduler disabled; jobs run only via the admin API");
    }

    // -----------------------------------------------------------------------
    // 5. Run the HTTP API server (blocks until shutdown)
    // -----------------------------------------------------------------------
    tokio::select! {
        result = api::serve(app_state, config.http_addr) => {
            if let Err(e) = result {
                tracing::error!(error = %e, "HTTP server failed");
                return Err(e);
            }
        }
        _ = tokio::signal::ctrl_c() => {
            info!("Received Ctrl+C, shutting down");
        }
    }

    Ok(())
}
