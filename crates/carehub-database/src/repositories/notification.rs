//! PostgreSQL notification store.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::PgPool;
use sqlx::types::Json;

use carehub_core::error::{AppError, ErrorKind};
use carehub_core::result::AppResult;
use carehub_core::types::{NotificationId, PageRequest, PageResponse, UserId};
use carehub_entity::notification::{NewNotification, Notification};

use super::rows::NotificationRow;
use crate::store::{InsertOutcome, NotificationStore};

const COLUMNS: &str =
    "id, recipient, sender, kind, data, message, is_read, created_at, updated_at";

/// Notification store backed by the `notifications` table.
#[derive(Debug, Clone)]
pub struct PgNotificationStore {
    pool: PgPool,
}

impl PgNotificationStore {
    /// Create a new notification store.
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    async fn find_by_dedup_key(&self, dedup_key: &str) -> AppResult<Option<Notification>> {
        let row = sqlx::query_as::<_, NotificationRow>(&format!(
            "SELECT {COLUMNS} FROM notifications WHERE dedup_key = $1"
        ))
        .bind(dedup_key)
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| {
            AppError::with_source(ErrorKind::Database, "Failed to look up dedup key", e)
        })?;
        row.map(Notification::try_from).transpose()
    }
}

#[async_trait]
impl NotificationStore for PgNotificationStore {
    async fn find_recent_duplicate(
        &self,
        draft: &NewNotification,
        since: DateTime<Utc>,
    ) -> AppResult<Option<Notification>> {
        let row = sqlx::query_as::<_, NotificationRow>(&format!(
            "SELECT {COLUMNS} FROM notifications \
             WHERE recipient_id = $1 AND sender_id = $2 AND kind = $3 \
               AND post_id IS NOT DISTINCT FROM $4 \
               AND comment_id IS NOT DISTINCT FROM $5 \
               AND created_at >= $6 \
             ORDER BY created_at DESC LIMIT 1"
        ))
        .bind(draft.recipient.id)
        .bind(draft.sender.id)
        .bind(draft.kind().as_str())
        .bind(draft.payload.post_id())
        .bind(draft.payload.comment_id())
        .bind(since)
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| {
            AppError::with_source(ErrorKind::Database, "Failed to check for duplicates", e)
        })?;
        row.map(Notification::try_from).transpose()
    }

    async fn insert(
        &self,
        draft: NewNotification,
        dedup_key: String,
        now: DateTime<Utc>,
    ) -> AppResult<InsertOutcome> {
        let row = sqlx::query_as::<_, NotificationRow>(&format!(
            "INSERT INTO notifications \
             (id, recipient_id, recipient, sender_id, sender, kind, data, post_id, comment_id, \
              message, is_read, dedup_key, created_at, updated_at) \
             VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, FALSE, $11, $12, $12) \
             ON CONFLICT (dedup_key) DO NOTHING \
             RETURNING {COLUMNS}"
        ))
        .bind(NotificationId::new())
        .bind(draft.recipient.id)
        .bind(Json(&draft.recipient))
        .bind(draft.sender.id)
        .bind(Json(&draft.sender))
        .bind(draft.kind().as_str())
        .bind(draft.payload.data_json())
        .bind(draft.payload.post_id())
        .bind(draft.payload.comment_id())
        .bind(&draft.message)
        .bind(&dedup_key)
        .bind(now)
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| {
            AppError::with_source(ErrorKind::Database, "Failed to create notification", e)
        })?;

        match row {
            Some(row) => Ok(InsertOutcome::Created(Notification::try_from(row)?)),
            None => self
                .find_by_dedup_key(&dedup_key)
                .await?
                .map(InsertOutcome::Duplicate)
                .ok_or_else(|| {
                    AppError::database(format!(
                        "Dedup conflict on '{dedup_key}' but no existing row was found"
                    ))
                }),
        }
    }

    async fn find_page(
        &self,
        recipient: UserId,
        page: &PageRequest,
        unread_only: bool,
        visible_since: DateTime<Utc>,
    ) -> AppResult<PageResponse<Notification>> {
        let total: i64 = sqlx::query_scalar(
            "SELECT COUNT(*) FROM notifications \
             WHERE recipient_id = $1 AND created_at > $2 AND ($3 = FALSE OR is_read = FALSE)",
        )
        .bind(recipient)
        .bind(visible_since)
        .bind(unread_only)
        .fetch_one(&self.pool)
        .await
        .map_err(|e| {
            AppError::with_source(ErrorKind::Database, "Failed to count notifications", e)
        })?;

        let rows = sqlx::query_as::<_, NotificationRow>(&format!(
            "SELECT {COLUMNS} FROM notifications \
             WHERE recipient_id = $1 AND created_at > $2 AND ($3 = FALSE OR is_read = FALSE) \
             ORDER BY created_at DESC, id DESC LIMIT $4 OFFSET $5"
        ))
        .bind(recipient)
        .bind(visible_since)
        .bind(unread_only)
        .bind(i64::try_from(page.limit()).unwrap_or(i64::MAX))
        .bind(i64::try_from(page.offset()).unwrap_or(i64::MAX))
        .fetch_all(&self.pool)
        .await
        .map_err(|e| {
            AppError::with_source(ErrorKind::Database, "Failed to list notifications", e)
        })?;

        let items = rows
            .into_iter()
            .map(Notification::try_from)
            .collect::<AppResult<Vec<_>>>()?;

        Ok(PageResponse::new(
            items,
            page.page,
            page.page_size,
            total.max(0) as u64,
        ))
    }

    async fn count_unread(
        &self,
        recipient: UserId,
        visible_since: DateTime<Utc>,
    ) -> AppResult<u64> {
        let count: i64 = sqlx::query_scalar(
            "SELECT COUNT(*) FROM notifications \
             WHERE recipient_id = $1 AND is_read = FALSE AND created_at > $2",
        )
        .bind(recipient)
        .bind(visible_since)
        .fetch_one(&self.pool)
        .await
        .map_err(|e| AppError::with_source(ErrorKind::Database, "Failed to count unread", e))?;
        Ok(count.max(0) as u64)
    }

    async fn mark_read(
        &self,
        id: NotificationId,
        recipient: UserId,
        visible_since: DateTime<Utc>,
        now: DateTime<Utc>,
    ) -> AppResult<Option<Notification>> {
        let row = sqlx::query_as::<_, NotificationRow>(&format!(
            "UPDATE notifications SET is_read = TRUE, updated_at = $3 \
             WHERE id = $1 AND recipient_id = $2 AND created_at > $4 \
             RETURNING {COLUMNS}"
        ))
        .bind(id)
        .bind(recipient)
        .bind(now)
        .bind(visible_since)
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| AppError::with_source(ErrorKind::Database, "Failed to mark read", e))?;
        row.map(Notification::try_from).transpose()
    }

    async fn mark_all_read(
        &self,
        recipient: UserId,
        visible_since: DateTime<Utc>,
        now: DateTime<Utc>,
    ) -> AppResult<u64> {
        let result = sqlx::query(
            "UPDATE notifications SET is_read = TRUE, updated_at = $2 \
             WHERE recipient_id = $1 AND is_read = FALSE AND created_at > $3",
        )
        .bind(recipient)
        .bind(now)
        .bind(visible_since)
        .execute(&self.pool)
        .await
        .map_err(|e| AppError::with_source(ErrorKind::Database, "Failed to mark all read", e))?;
        Ok(result.rows_affected())
    }

    async fn delete(
        &self,
        id: NotificationId,
        recipient: UserId,
        visible_since: DateTime<Utc>,
    ) -> AppResult<bool> {
        let result = sqlx::query(
            "DELETE FROM notifications WHERE id = $1 AND recipient_id = $2 AND created_at > $3",
        )
        .bind(id)
        .bind(recipient)
        .bind(visible_since)
        .execute(&self.pool)
        .await
        .map_err(|e| {
            AppError::with_source(ErrorKind::Database, "Failed to delete notification", e)
        })?;
        Ok(result.rows_affected() > 0)
    }

    async fn delete_older_than(&self, cutoff: DateTime<Utc>) -> AppResult<u64> {
        let result = sqlx::query("DELETE FROM notifications WHERE created_at < $1")
            .bind(cutoff)
            .execute(&self.pool)
            .await
            .map_err(|e| {
                AppError::with_source(ErrorKind::Database, "Failed to purge notifications", e)
            })?;
        Ok(result.rows_affected())
    }

    async fn health_check(&self) -> AppResult<()> {
        sqlx::query_scalar::<_, i32>("SELECT 1")
            .fetch_one(&self.pool)
            .await
            .map(|_| ())
            .map_err(|e| AppError::with_source(ErrorKind::Database, "Health check failed", e))
    }
}
