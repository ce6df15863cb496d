//! Notification retention purge.

use std::time::Instant;

use carehub_core::AppResult;
use carehub_service::NotificationService;

/// Deletes notifications older than the retention window.
#[derive(Debug, Clone)]
pub struct NotificationCleanupJob {
    service: NotificationService,
    retention_days: i64,
}

impl NotificationCleanupJob {
    /// Create a job that purges records older than the service's retention.
    pub fn new(service: NotificationService) -> Self {
        let retention_days = service.retention_days();
        Self {
            service,
            retention_days,
        }
    }

    /// Override the age cutoff.
    pub fn with_retention_days(mut self, days: i64) -> Self {
        self.retention_days = days;
        self
    }

    /// Run the purge once. Returns the number of records removed.
    pub async fn run(&self) -> AppResult<u64> {
        let started = Instant::now();
        tracing::info!(
            retention_days = self.retention_days,
            "Running notification cleanup"
        );

        let removed = self
            .service
            .cleanup_old_notifications(self.retention_days)
            .await?;

        tracing::info!(
            removed,
            elapsed_ms = started.elapsed().as_millis() as u64,
            "Notification cleanup finished"
        );
        Ok(removed)
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use chrono::{Duration, TimeZone, Utc};

    use carehub_core::config::NotificationConfig;
    use carehub_core::traits::ManualClock;
    use carehub_core::types::{NotificationId, PostId, UserId};
    use carehub_database::MemoryNotificationStore;
    use carehub_entity::notification::{
        ActorSnapshot, NewNotification, NotificationPayload, PostLikedData,
    };

    use super::*;

    fn record(at: chrono::DateTime<Utc>) -> carehub_entity::notification::Notification {
        NewNotification {
            recipient: ActorSnapshot::new(UserId::new(), "Rae"),
            sender: ActorSnapshot::new(UserId::new(), "Sam"),
            payload: NotificationPayload::PostLiked(PostLikedData {
                post_id: PostId::new(),
                post_title: "Walk".to_string(),
            }),
            message: "Sam liked your post \"Walk\"".to_string(),
        }
        .into_notification(NotificationId::new(), at)
    }

    #[tokio::test]
    async fn test_purges_only_expired_records() {
        let now = Utc.with_ymd_and_hms(2026, 3, 1, 12, 0, 0).unwrap();
        let store = Arc::new(MemoryNotificationStore::new());
        store.seed(record(now - Duration::days(31))).await;
        store.seed(record(now - Duration::days(29))).await;

        let service = NotificationService::new(
            store.clone(),
            Arc::new(ManualClock::new(now)),
            NotificationConfig::default(),
        );
        let job = NotificationCleanupJob::new(service);

        assert_eq!(job.run().await.unwrap(), 1);
        assert_eq!(store.len().await, 1);
    }

    #[tokio::test]
    async fn test_retention_override() {
        let now = Utc.with_ymd_and_hms(2026, 3, 1, 12, 0, 0).unwrap();
        let store = Arc::new(MemoryNotificationStore::new());
        store.seed(record(now - Duration::days(8))).await;

        let service = NotificationService::new(
            store.clone(),
            Arc::new(ManualClock::new(now)),
            NotificationConfig::default(),
        );
        let job = NotificationCleanupJob::new(service).with_retention_days(7);

        assert_eq!(job.run().await.unwrap(), 1);
        assert!(store.is_empty().await);
    }
}
