//! Server configuration loaded from environment variables.
//!
//! Every setting has a default so the server starts with zero
//! configuration for local development.

use std::net::SocketAddr;

/// Server configuration.
#[derive(Debug, Clone)]
pub struct ServerConfig {
    /// Socket address for the HTTP (axum) API server.
    /// Env: `HTTP_ADDR`
    /// Default: `0.0.0.0:8080`
    pub http_addr: SocketAddr,

    /// Whether the in-process scheduler runs the maintenance jobs on
    /// their cadences.  Disable to drive jobs only via the admin API.
    /// Env: `RUN_SCHEDULER` (true/false)
    /// Default: `true`
    pub run_scheduler: bool,

    /// Whether to run the lobby seeder once at startup.
    /// Env: `SEED_LOBBIES_ON_START` (true/false)
    /// Default: `false`
    pub seed_lobbies_on_start: bool,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            http_addr: ([0, 0, 0, 0], 8080).into(),
            run_scheduler: true,
            seed_lobbies_on_start: false,
        }
    }
}

impl ServerConfig {
    /// Load configuration from environment variables, falling back to
    /// defaults.
    pub fn from_env() -> Self {
        let mut config = Self::default();

        if let Ok(addr) = std::env::var("HTTP_ADDR") {
            if let Ok(parsed) = addr.parse::<SocketAddr>() {
                config.http_addr = parsed;
            } else {
                tracing::warn!(value = %addr, "Invalid HTTP_ADDR, using default");
            }
        }

        if let Ok(val) = std::env::var("RUN_SCHEDULER") {
            config.run_scheduler = val != "false" && val != "0";
        }

        if let Ok(val) = std::env::var("SEED_LOBBIES_ON_START") {
            config.seed_lobbies_on_start = val == "true" || val == "1";
        }

        // RUST_LOG is handled directly by tracing-subscriber's EnvFilter,
        // so we do not store it here.

        config
    }
}
