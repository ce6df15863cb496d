//! Apply database migrations.

use carehub_core::config::AppConfig;
use carehub_core::error::AppError;
use carehub_database::migration::run_migrations;

/// Execute the migrate command
pub async fn execute(config: &AppConfig) -> Result<(), AppError> {
    let pool = super::connect_database(config).await?;

    println!("Running database migrations...");
    let result = run_migrations(pool.pool()).await;
    pool.close().await;
    result?;

    println!("All migrations applied successfully.");
    Ok(())
}
