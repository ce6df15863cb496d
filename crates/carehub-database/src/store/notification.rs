//! Notification record store.

use async_trait::async_trait;
use chrono::{DateTime, Utc};

use carehub_core::result::AppResult;
use carehub_core::types::{NotificationId, PageRequest, PageResponse, UserId};
use carehub_entity::notification::{NewNotification, Notification};

/// Result of an insert attempt.
#[derive(Debug, Clone, PartialEq)]
pub enum InsertOutcome {
    /// A new record was written.
    Created(Notification),
    /// A record with the same dedup key already existed and was returned instead.
    Duplicate(Notification),
}

impl InsertOutcome {
    /// The record, whether new or pre-existing.
    pub fn into_inner(self) -> Notification {
        match self {
            Self::Created(n) | Self::Duplicate(n) => n,
        }
    }

    pub fn is_created(&self) -> bool {
        matches!(self, Self::Created(_))
    }
}

/// Persistent collection of notifications.
///
/// Every query is scoped by recipient. `visible_since` is the retention
/// cutoff: records created at or before it are treated as gone even if the
/// purge job has not removed them yet.
#[async_trait]
pub trait NotificationStore: Send + Sync + 'static {
    /// Newest record for the same recipient, sender, type, post, and
    /// comment created at or after `since`.
    async fn find_recent_duplicate(
        &self,
        draft: &NewNotification,
        since: DateTime<Utc>,
    ) -> AppResult<Option<Notification>>;

    /// Insert a new record unless one with `dedup_key` already exists.
    async fn insert(
        &self,
        draft: NewNotification,
        dedup_key: String,
        now: DateTime<Utc>,
    ) -> AppResult<InsertOutcome>;

    /// One page of a recipient's notifications, newest first.
    async fn find_page(
        &self,
        recipient: UserId,
        page: &PageRequest,
        unread_only: bool,
        visible_since: DateTime<Utc>,
    ) -> AppResult<PageResponse<Notification>>;

    /// Number of unread notifications for a recipient.
    async fn count_unread(&self, recipient: UserId, visible_since: DateTime<Utc>)
    -> AppResult<u64>;

    /// Flip `is_read` on one record owned by `recipient`.
    ///
    /// Returns `None` when the record does not exist, belongs to someone
    /// else, or has expired.
    async fn mark_read(
        &self,
        id: NotificationId,
        recipient: UserId,
        visible_since: DateTime<Utc>,
        now: DateTime<Utc>,
    ) -> AppResult<Option<Notification>>;

    /// Flip `is_read` on every visible unread record of `recipient`. Returns
    /// the number modified.
    async fn mark_all_read(
        &self,
        recipient: UserId,
        visible_since: DateTime<Utc>,
        now: DateTime<Utc>,
    ) -> AppResult<u64>;

    /// Delete one visible record owned by `recipient`. Returns whether a
    /// record was removed.
    async fn delete(
        &self,
        id: NotificationId,
        recipient: UserId,
        visible_since: DateTime<Utc>,
    ) -> AppResult<bool>;

    /// Delete every record created before `cutoff`. Returns the number removed.
    async fn delete_older_than(&self, cutoff: DateTime<Utc>) -> AppResult<u64>;

    /// Check that the backing store is reachable.
    async fn health_check(&self) -> AppResult<()> {
        Ok(())
    }
}
