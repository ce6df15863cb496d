//! CLI command definitions and dispatch.

pub mod cleanup;
pub mod migrate;
pub mod serve;

use clap::{Parser, Subcommand};

use carehub_core::config::AppConfig;
use carehub_core::error::AppError;
use carehub_database::DatabasePool;

/// CareHub: notification delivery and real-time messaging
#[derive(Debug, Parser)]
#[command(name = "carehub", version, about, long_about = None)]
pub struct Cli {
    /// Directory holding `default.toml` and the environment overlays
    #[arg(short, long, default_value = "config", env = "CAREHUB_CONFIG_DIR")]
    pub config: String,

    /// Environment overlay to load, e.g. `development` or `production`
    #[arg(short, long, default_value = "development", env = "CAREHUB_ENV")]
    pub env: String,

    /// Log more detail
    #[arg(short, long)]
    pub verbose: bool,

    /// Subcommand to execute
    #[command(subcommand)]
    pub command: Commands,
}

/// Top-level commands
#[derive(Debug, Subcommand)]
pub enum Commands {
    /// Start the CareHub server
    Serve(serve::ServeArgs),
    /// Apply database migrations
    Migrate,
    /// Purge notifications past the retention window
    Cleanup(cleanup::CleanupArgs),
}

impl Cli {
    /// Execute the CLI command
    pub async fn execute(&self) -> Result<(), AppError> {
        let config = self.load_config()?;
        match &self.command {
            Commands::Serve(args) => serve::execute(args, config).await,
            Commands::Migrate => migrate::execute(&config).await,
            Commands::Cleanup(args) => cleanup::execute(args, &config).await,
        }
    }

    /// Default filter when `RUST_LOG` is unset.
    pub fn log_level(&self) -> &'static str {
        match (&self.command, self.verbose) {
            (_, true) => "debug",
            (Commands::Serve(_), false) => "info",
            _ => "warn",
        }
    }

    fn load_config(&self) -> Result<AppConfig, AppError> {
        AppConfig::load_from(&self.config, &self.env)
    }
}

/// Helper: connect to the configured database, refusing to fall back to
/// the in-memory stores.
pub async fn connect_database(config: &AppConfig) -> Result<DatabasePool, AppError> {
    if !config.database.is_configured() {
        return Err(AppError::configuration(
            "database.url is not set; this command needs PostgreSQL",
        ));
    }
    DatabasePool::connect(&config.database).await
}

#[cfg(test)]
mod tests {
    use clap::CommandFactory;

    use super::*;

    #[test]
    fn test_cli_definition_is_valid() {
        Cli::command().debug_assert();
    }

    #[test]
    fn test_parse_cleanup_days() {
        let cli = Cli::try_parse_from(["carehub", "cleanup", "--days", "7"]).unwrap();
        match cli.command {
            Commands::Cleanup(args) => assert_eq!(args.days, Some(7)),
            other => panic!("unexpected command: {other:?}"),
        }
        assert_eq!(cli.config, "config");
    }

    #[test]
    fn test_parse_serve_port_override() {
        let cli = Cli::try_parse_from(["carehub", "-v", "serve", "--port", "9090"]).unwrap();
        assert_eq!(cli.log_level(), "debug");
        match cli.command {
            Commands::Serve(args) => assert_eq!(args.port, Some(9090)),
            other => panic!("unexpected command: {other:?}"),
        }
    }

    #[test]
    fn test_rejects_zero_retention() {
        assert!(Cli::try_parse_from(["carehub", "cleanup", "--days", "0"]).is_err());
    }
}
