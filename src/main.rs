//! CareHub server: notification delivery and real-time fan-out.
//!
//! Main entry point. Loads configuration, installs logging, and hands off to
//! [`carehub_api::run_server`].

use tracing_subscriber::{EnvFilter, fmt};

use carehub_core::config::{AppConfig, LoggingConfig};
use carehub_core::error::AppError;

#[tokio::main]
async fn main() {
    // ── Step 1: Configuration ────────────────────────────────────
    let config = match load_configuration() {
        Ok(c) => c,
        Err(e) => {
            eprintln!("Failed to load configuration: {e}");
            std::process::exit(1);
        }
    };

    // ── Step 2: Logging ──────────────────────────────────────────
    init_logging(&config.logging);
    tracing::info!(version = env!("CARGO_PKG_VERSION"), "Starting CareHub");

    // ── Step 3: Serve until shutdown ─────────────────────────────
    if let Err(e) = carehub_api::run_server(config).await {
        tracing::error!(error = %e, "Server error");
        std::process::exit(1);
    }
}

/// Load `config/default.toml`, the `CAREHUB_ENV` overlay, and `CAREHUB__*`
/// environment variables.
fn load_configuration() -> Result<AppConfig, AppError> {
    let env = std::env::var("CAREHUB_ENV").unwrap_or_else(|_| "development".to_string());
    let dir = std::env::var("CAREHUB_CONFIG_DIR").unwrap_or_else(|_| "config".to_string());
    AppConfig::load_from(&dir, &env)
}

/// Initialize tracing. `RUST_LOG` wins over the configured level.
fn init_logging(config: &LoggingConfig) {
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(&config.level));

    if config.is_json() {
        fmt()
            .json()
            .with_env_filter(filter)
            .with_target(true)
            .with_thread_ids(true)
            .init();
    } else {
        fmt().pretty().with_env_filter(filter).with_target(true).init();
    }
}
