//! One-off notification purge.

use std::sync::Arc;

use clap::Args;

use carehub_core::config::AppConfig;
use carehub_core::error::AppError;
use carehub_core::traits::SystemClock;
use carehub_database::PgNotificationStore;
use carehub_service::NotificationService;
use carehub_worker::NotificationCleanupJob;

/// Arguments for the cleanup command
#[derive(Debug, Args)]
pub struct CleanupArgs {
    /// Retention window in days; defaults to `notifications.retention_days`
    #[arg(long, value_parser = clap::value_parser!(u32).range(1..))]
    pub days: Option<u32>,
}

/// Execute the cleanup command
pub async fn execute(args: &CleanupArgs, config: &AppConfig) -> Result<(), AppError> {
    let pool = super::connect_database(config).await?;

    let service = NotificationService::new(
        Arc::new(PgNotificationStore::new(pool.pool().clone())),
        Arc::new(SystemClock),
        config.notifications.clone(),
    );
    let mut job = NotificationCleanupJob::new(service);
    if let Some(days) = args.days {
        job = job.with_retention_days(i64::from(days));
    }

    let result = job.run().await;
    pool.close().await;

    println!("Removed {} expired notifications.", result?);
    Ok(())
}
