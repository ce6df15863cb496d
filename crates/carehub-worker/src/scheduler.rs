//! Cron scheduler for periodic maintenance tasks.

use tokio_cron_scheduler::{Job as CronJob, JobScheduler};

use carehub_core::config::NotificationConfig;
use carehub_core::error::AppError;
use carehub_service::NotificationService;

use crate::jobs::cleanup::NotificationCleanupJob;

/// Cron-based scheduler for periodic background tasks
pub struct CronScheduler {
    /// The underlying job scheduler
    scheduler: JobScheduler,
    /// Notification service the jobs act through
    notifications: NotificationService,
    /// Cron expression for the retention purge
    cleanup_cron: String,
}

impl std::fmt::Debug for CronScheduler {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CronScheduler")
            .field("cleanup_cron", &self.cleanup_cron)
            .finish()
    }
}

impl CronScheduler {
    /// Create a new cron scheduler
    pub async fn new(
        notifications: NotificationService,
        config: &NotificationConfig,
    ) -> Result<Self, AppError> {
        let scheduler = JobScheduler::new()
            .await
            .map_err(|e| AppError::internal(format!("Failed to create scheduler: {e}")))?;

        Ok(Self {
            scheduler,
            notifications,
            cleanup_cron: config.cleanup_cron.clone(),
        })
    }

    /// Register all default scheduled tasks
    pub async fn register_default_tasks(&self) -> Result<(), AppError> {
        self.register_notification_cleanup().await?;

        tracing::info!("All scheduled tasks registered");
        Ok(())
    }

    /// Start the scheduler
    pub async fn start(&self) -> Result<(), AppError> {
        self.scheduler
            .start()
            .await
            .map_err(|e| AppError::internal(format!("Failed to start scheduler: {e}")))?;

        tracing::info!("Cron scheduler started");
        Ok(())
    }

    /// Shutdown the scheduler
    pub async fn shutdown(&mut self) -> Result<(), AppError> {
        self.scheduler
            .shutdown()
            .await
            .map_err(|e| AppError::internal(format!("Failed to shutdown scheduler: {e}")))?;

        tracing::info!("Cron scheduler shut down");
        Ok(())
    }

    /// Notification retention purge, daily by default
    async fn register_notification_cleanup(&self) -> Result<(), AppError> {
        let cleanup = NotificationCleanupJob::new(self.notifications.clone());
        let job = CronJob::new_async(self.cleanup_cron.as_str(), move |_uuid, _lock| {
            let cleanup = cleanup.clone();
            Box::pin(async move {
                if let Err(e) = cleanup.run().await {
                    tracing::error!(error = %e, "Scheduled notification cleanup failed");
                }
            })
        })
        .map_err(|e| {
            AppError::configuration(format!(
                "Invalid notification cleanup schedule '{}': {e}",
                self.cleanup_cron
            ))
        })?;

        self.scheduler.add(job).await.map_err(|e| {
            AppError::internal(format!("Failed to add notification_cleanup schedule: {e}"))
        })?;

        tracing::info!(cron = %self.cleanup_cron, "Registered: notification_cleanup");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use carehub_core::error::ErrorKind;
    use carehub_core::traits::SystemClock;
    use carehub_database::MemoryNotificationStore;

    use super::*;

    fn service() -> NotificationService {
        NotificationService::new(
            Arc::new(MemoryNotificationStore::new()),
            Arc::new(SystemClock),
            NotificationConfig::default(),
        )
    }

    #[tokio::test]
    async fn test_registers_default_schedule() {
        let scheduler = CronScheduler::new(service(), &NotificationConfig::default())
            .await
            .unwrap();
        scheduler.register_default_tasks().await.unwrap();
    }

    #[tokio::test]
    async fn test_rejects_invalid_cron() {
        let config = NotificationConfig {
            cleanup_cron: "every tuesday".to_string(),
            ..NotificationConfig::default()
        };
        let scheduler = CronScheduler::new(service(), &config).await.unwrap();
        let err = scheduler.register_default_tasks().await.unwrap_err();
        assert_eq!(err.kind, ErrorKind::Configuration);
    }
}
