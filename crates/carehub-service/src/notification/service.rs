//! Notification service.

use std::sync::Arc;

use chrono::{DateTime, Duration, Utc};
use serde::Serialize;
use tracing::{debug, error, info, warn};

use carehub_core::config::NotificationConfig;
use carehub_core::result::AppResult;
use carehub_core::traits::Clock;
use carehub_core::types::{
    CommentId, CommunityId, FriendRequestId, NotificationId, PageRequest, PageResponse, PostId,
    UserId,
};
use carehub_database::store::{InsertOutcome, NotificationStore};
use carehub_entity::notification::{
    ActorSnapshot, CommentReplyData, CommunityInviteData, FriendRequestData, JoinRequestData,
    MAX_MESSAGE_CHARS, MentionData, NewMemberData, NewNotification, Notification,
    NotificationPayload, PostCommentData, PostLikedData,
};

use super::templates;
use crate::publisher::EventPublisher;

/// One page of notifications plus the recipient's total unread count.
#[derive(Debug, Clone, Serialize)]
pub struct NotificationListing {
    pub page: PageResponse<Notification>,
    /// Always counts every unread record, whatever filter produced `page`.
    pub unread_count: u64,
}

/// Sole writer of notification records.
///
/// Creation never fails the caller: self-notifications, duplicates, and
/// store errors all resolve to `None` or to the existing record. Reads and
/// bulk mutations return their errors.
#[derive(Clone)]
pub struct NotificationService {
    store: Arc<dyn NotificationStore>,
    clock: Arc<dyn Clock>,
    config: NotificationConfig,
    publisher: Option<Arc<dyn EventPublisher>>,
}

impl std::fmt::Debug for NotificationService {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("NotificationService")
            .field("config", &self.config)
            .field("publisher", &self.publisher.is_some())
            .finish_non_exhaustive()
    }
}

impl NotificationService {
    /// Creates a new notification service.
    pub fn new(
        store: Arc<dyn NotificationStore>,
        clock: Arc<dyn Clock>,
        config: NotificationConfig,
    ) -> Self {
        Self {
            store,
            clock,
            config,
            publisher: None,
        }
    }

    /// Push newly-created notifications through `publisher`.
    pub fn with_publisher(mut self, publisher: Arc<dyn EventPublisher>) -> Self {
        self.publisher = Some(publisher);
        self
    }

    fn dedup_window(&self) -> Duration {
        Duration::seconds(self.config.dedup_window_seconds)
    }

    fn visible_since(&self, now: DateTime<Utc>) -> DateTime<Utc> {
        now - Duration::days(self.config.retention_days)
    }

    /// Store a notification unless it is a self-notification or a repeat of
    /// one created inside the dedup window.
    ///
    /// Returns the stored record, the earlier duplicate, or `None`. Store
    /// failures are logged and reported as `None`.
    pub async fn create_notification(&self, draft: NewNotification) -> Option<Notification> {
        if draft.is_self_notification() {
            debug!(
                user_id = %draft.sender.id,
                kind = %draft.kind(),
                "Skipping self-notification"
            );
            return None;
        }

        if draft.message.chars().count() > MAX_MESSAGE_CHARS {
            warn!(
                recipient = %draft.recipient.id,
                kind = %draft.kind(),
                "Notification message exceeds {MAX_MESSAGE_CHARS} characters, dropping"
            );
            return None;
        }

        let now = self.clock.now();
        match self
            .store
            .find_recent_duplicate(&draft, now - self.dedup_window())
            .await
        {
            Ok(Some(existing)) => {
                debug!(
                    notification_id = %existing.id,
                    kind = %existing.kind(),
                    "Duplicate notification inside dedup window"
                );
                return Some(existing);
            }
            Ok(None) => {}
            Err(e) => {
                error!(
                    recipient = %draft.recipient.id,
                    error = %e,
                    "Failed to check for duplicate notification"
                );
                return None;
            }
        }

        let dedup_key = draft.dedup_key(now, self.config.dedup_window_seconds);
        let recipient = draft.recipient.id;
        match self.store.insert(draft, dedup_key, now).await {
            Ok(InsertOutcome::Created(notification)) => {
                info!(
                    notification_id = %notification.id,
                    recipient = %recipient,
                    kind = %notification.kind(),
                    "Notification created"
                );
                if let Some(publisher) = &self.publisher {
                    publisher.notification_created(&notification).await;
                }
                Some(notification)
            }
            Ok(InsertOutcome::Duplicate(existing)) => {
                debug!(
                    notification_id = %existing.id,
                    "Dedup key collision, returning existing notification"
                );
                Some(existing)
            }
            Err(e) => {
                error!(recipient = %recipient, error = %e, "Failed to create notification");
                None
            }
        }
    }

    /// Someone liked the recipient's post.
    pub async fn notify_post_liked(
        &self,
        recipient: ActorSnapshot,
        sender: ActorSnapshot,
        post_id: PostId,
        post_title: &str,
    ) -> Option<Notification> {
        let message = templates::post_liked(&sender.name, post_title);
        self.create_notification(NewNotification {
            recipient,
            sender,
            payload: NotificationPayload::PostLiked(PostLikedData {
                post_id,
                post_title: templates::truncate(post_title, templates::TITLE_EXCERPT_CHARS),
            }),
            message,
        })
        .await
    }

    /// Someone commented on the recipient's post.
    pub async fn notify_post_comment(
        &self,
        recipient: ActorSnapshot,
        sender: ActorSnapshot,
        post_id: PostId,
        comment_id: CommentId,
        comment: &str,
        post_title: Option<&str>,
    ) -> Option<Notification> {
        let message = templates::post_comment(&sender.name, comment);
        self.create_notification(NewNotification {
            recipient,
            sender,
            payload: NotificationPayload::PostComment(PostCommentData {
                post_id,
                comment_id,
                post_title: post_title
                    .map(|t| templates::truncate(t, templates::TITLE_EXCERPT_CHARS)),
            }),
            message,
        })
        .await
    }

    /// Someone replied to the recipient's comment.
    pub async fn notify_comment_reply(
        &self,
        recipient: ActorSnapshot,
        sender: ActorSnapshot,
        post_id: PostId,
        comment_id: CommentId,
        reply: &str,
    ) -> Option<Notification> {
        let message = templates::comment_reply(&sender.name, reply);
        self.create_notification(NewNotification {
            recipient,
            sender,
            payload: NotificationPayload::CommentReply(CommentReplyData {
                post_id,
                comment_id,
            }),
            message,
        })
        .await
    }

    /// The recipient was invited to a community.
    pub async fn notify_community_invite(
        &self,
        recipient: ActorSnapshot,
        sender: ActorSnapshot,
        community_id: CommunityId,
        community_name: &str,
    ) -> Option<Notification> {
        let message = templates::community_invite(&sender.name, community_name);
        self.create_notification(NewNotification {
            recipient,
            sender,
            payload: NotificationPayload::CommunityInvite(CommunityInviteData {
                community_id,
                community_name: community_name.to_string(),
            }),
            message,
        })
        .await
    }

    /// A community admin answered the recipient's join request.
    pub async fn notify_join_request_response(
        &self,
        recipient: ActorSnapshot,
        sender: ActorSnapshot,
        community_id: CommunityId,
        community_name: &str,
        accepted: bool,
    ) -> Option<Notification> {
        let data = JoinRequestData {
            community_id,
            community_name: community_name.to_string(),
        };
        let payload = if accepted {
            NotificationPayload::JoinRequestAccepted(data)
        } else {
            NotificationPayload::JoinRequestRejected(data)
        };
        self.create_notification(NewNotification {
            recipient,
            sender,
            payload,
            message: templates::join_request_response(community_name, accepted),
        })
        .await
    }

    /// `sender` joined a community the recipient administers.
    pub async fn notify_new_member(
        &self,
        recipient: ActorSnapshot,
        sender: ActorSnapshot,
        community_id: CommunityId,
        community_name: &str,
    ) -> Option<Notification> {
        let message = templates::new_member(&sender.name, community_name);
        self.create_notification(NewNotification {
            recipient,
            sender,
            payload: NotificationPayload::NewMember(NewMemberData {
                community_id,
                community_name: community_name.to_string(),
            }),
            message,
        })
        .await
    }

    /// The recipient was mentioned in a post or comment.
    pub async fn notify_mention(
        &self,
        recipient: ActorSnapshot,
        sender: ActorSnapshot,
        post_id: PostId,
        comment_id: Option<CommentId>,
        excerpt: &str,
    ) -> Option<Notification> {
        let message = templates::mention(&sender.name, excerpt, comment_id.is_some());
        self.create_notification(NewNotification {
            recipient,
            sender,
            payload: NotificationPayload::Mention(MentionData {
                post_id,
                comment_id,
            }),
            message,
        })
        .await
    }

    /// Someone sent the recipient a friend request.
    pub async fn notify_friend_request(
        &self,
        recipient: ActorSnapshot,
        sender: ActorSnapshot,
        request_id: FriendRequestId,
    ) -> Option<Notification> {
        let message = templates::friend_request(&sender.name);
        self.create_notification(NewNotification {
            recipient,
            sender,
            payload: NotificationPayload::FriendRequest(FriendRequestData { request_id }),
            message,
        })
        .await
    }

    /// A page of the user's notifications, newest first, plus the unread
    /// count across all of them.
    ///
    /// A `limit` of zero selects the configured default page size.
    pub async fn get_user_notifications(
        &self,
        user_id: UserId,
        page: u64,
        limit: u64,
        unread_only: bool,
    ) -> AppResult<NotificationListing> {
        let limit = match limit {
            0 => self.config.default_page_size,
            n => n.min(self.config.max_page_size),
        };
        let request = PageRequest::new(page, limit);
        let visible_since = self.visible_since(self.clock.now());

        let (page, unread_count) = tokio::try_join!(
            self.store
                .find_page(user_id, &request, unread_only, visible_since),
            self.store.count_unread(user_id, visible_since),
        )
        .inspect_err(|e| {
            error!(user_id = %user_id, error = %e, "Failed to fetch notifications");
        })?;

        Ok(NotificationListing { page, unread_count })
    }

    /// Number of unread notifications for the badge.
    pub async fn unread_count(&self, user_id: UserId) -> AppResult<u64> {
        let visible_since = self.visible_since(self.clock.now());
        self.store
            .count_unread(user_id, visible_since)
            .await
            .inspect_err(|e| error!(user_id = %user_id, error = %e, "Failed to count unread"))
    }

    /// Mark one notification read if `user_id` owns it.
    ///
    /// Someone else's notification looks exactly like a missing one.
    pub async fn mark_as_read(
        &self,
        notification_id: NotificationId,
        user_id: UserId,
    ) -> AppResult<Option<Notification>> {
        let now = self.clock.now();
        self.store
            .mark_read(notification_id, user_id, self.visible_since(now), now)
            .await
            .inspect_err(|e| {
                error!(
                    notification_id = %notification_id,
                    error = %e,
                    "Failed to mark notification read"
                )
            })
    }

    /// Mark every unread notification of `user_id` read. Returns the count modified.
    pub async fn mark_all_as_read(&self, user_id: UserId) -> AppResult<u64> {
        let now = self.clock.now();
        let modified = self
            .store
            .mark_all_read(user_id, self.visible_since(now), now)
            .await
            .inspect_err(|e| {
                error!(user_id = %user_id, error = %e, "Failed to mark all notifications read")
            })?;
        debug!(user_id = %user_id, modified, "Marked all notifications read");
        Ok(modified)
    }

    /// Delete one notification owned by `user_id`. Returns whether it existed.
    pub async fn delete_notification(
        &self,
        notification_id: NotificationId,
        user_id: UserId,
    ) -> AppResult<bool> {
        let visible_since = self.visible_since(self.clock.now());
        self.store
            .delete(notification_id, user_id, visible_since)
            .await
            .inspect_err(|e| {
                error!(
                    notification_id = %notification_id,
                    error = %e,
                    "Failed to delete notification"
                )
            })
    }

    /// Delete every notification older than `days_old` days.
    pub async fn cleanup_old_notifications(&self, days_old: i64) -> AppResult<u64> {
        let cutoff = self.clock.now() - Duration::days(days_old);
        let removed = self
            .store
            .delete_older_than(cutoff)
            .await
            .inspect_err(|e| error!(error = %e, "Notification cleanup failed"))?;
        info!(removed, days_old, "Old notifications cleaned up");
        Ok(removed)
    }

    /// Retention window from configuration, in days.
    pub fn retention_days(&self) -> i64 {
        self.config.retention_days
    }

    /// Check that the backing store is reachable.
    pub async fn health_check(&self) -> AppResult<()> {
        self.store.health_check().await
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Mutex;

    use async_trait::async_trait;
    use chrono::TimeZone;

    use carehub_core::AppError;
    use carehub_core::error::ErrorKind;
    use carehub_core::traits::ManualClock;
    use carehub_database::memory::MemoryNotificationStore;
    use carehub_entity::conversation::Message;
    use carehub_entity::notification::NotificationKind;

    use super::*;

    struct Fixture {
        service: NotificationService,
        store: Arc<MemoryNotificationStore>,
        clock: Arc<ManualClock>,
        bea: ActorSnapshot,
        al: ActorSnapshot,
    }

    fn fixture() -> Fixture {
        let store = Arc::new(MemoryNotificationStore::new());
        let clock = Arc::new(ManualClock::new(
            Utc.with_ymd_and_hms(2026, 3, 1, 12, 0, 0).unwrap(),
        ));
        let service = NotificationService::new(
            store.clone(),
            clock.clone(),
            NotificationConfig::default(),
        );
        Fixture {
            service,
            store,
            clock,
            bea: ActorSnapshot::new(UserId::new(), "Bea"),
            al: ActorSnapshot::new(UserId::new(), "Al"),
        }
    }

    #[derive(Default)]
    struct RecordingPublisher {
        notifications: Mutex<Vec<NotificationId>>,
    }

    #[async_trait]
    impl EventPublisher for RecordingPublisher {
        async fn notification_created(&self, notification: &Notification) {
            self.notifications.lock().unwrap().push(notification.id);
        }

        async fn message_sent(&self, _message: &Message) {}
    }

    struct BrokenStore;

    #[async_trait]
    impl NotificationStore for BrokenStore {
        async fn find_recent_duplicate(
            &self,
            _draft: &NewNotification,
            _since: DateTime<Utc>,
        ) -> AppResult<Option<Notification>> {
            Ok(None)
        }

        async fn insert(
            &self,
            _draft: NewNotification,
            _dedup_key: String,
            _now: DateTime<Utc>,
        ) -> AppResult<InsertOutcome> {
            Err(AppError::database("connection reset"))
        }

        async fn find_page(
            &self,
            _recipient: UserId,
            _page: &PageRequest,
            _unread_only: bool,
            _visible_since: DateTime<Utc>,
        ) -> AppResult<PageResponse<Notification>> {
            Err(AppError::database("connection reset"))
        }

        async fn count_unread(
            &self,
            _recipient: UserId,
            _visible_since: DateTime<Utc>,
        ) -> AppResult<u64> {
            Err(AppError::database("connection reset"))
        }

        async fn mark_read(
            &self,
            _id: NotificationId,
            _recipient: UserId,
            _visible_since: DateTime<Utc>,
            _now: DateTime<Utc>,
        ) -> AppResult<Option<Notification>> {
            Err(AppError::database("connection reset"))
        }

        async fn mark_all_read(
            &self,
            _recipient: UserId,
            _visible_since: DateTime<Utc>,
            _now: DateTime<Utc>,
        ) -> AppResult<u64> {
            Err(AppError::database("connection reset"))
        }

        async fn delete(
            &self,
            _id: NotificationId,
            _recipient: UserId,
            _visible_since: DateTime<Utc>,
        ) -> AppResult<bool> {
            Err(AppError::database("connection reset"))
        }

        async fn delete_older_than(&self, _cutoff: DateTime<Utc>) -> AppResult<u64> {
            Err(AppError::database("connection reset"))
        }
    }

    #[tokio::test]
    async fn test_self_notification_is_suppressed() {
        let f = fixture();
        let result = f
            .service
            .notify_post_liked(f.bea.clone(), f.bea.clone(), PostId::new(), "Hello")
            .await;
        assert!(result.is_none());
        assert!(f.store.is_empty().await);
    }

    #[tokio::test]
    async fn test_dedup_window() {
        let f = fixture();
        let post = PostId::new();

        let first = f
            .service
            .notify_post_liked(f.bea.clone(), f.al.clone(), post, "Clinic hours")
            .await
            .expect("first like");

        f.clock.advance(Duration::minutes(4));
        let second = f
            .service
            .notify_post_liked(f.bea.clone(), f.al.clone(), post, "Clinic hours")
            .await
            .expect("second like");
        assert_eq!(first.id, second.id);
        assert_eq!(f.store.len().await, 1);

        f.clock.advance(Duration::minutes(2));
        let third = f
            .service
            .notify_post_liked(f.bea.clone(), f.al.clone(), post, "Clinic hours")
            .await
            .expect("third like");
        assert_ne!(first.id, third.id);
        assert_eq!(f.store.len().await, 2);
    }

    #[tokio::test]
    async fn test_different_posts_are_not_duplicates() {
        let f = fixture();
        f.service
            .notify_post_liked(f.bea.clone(), f.al.clone(), PostId::new(), "One")
            .await
            .expect("one");
        f.service
            .notify_post_liked(f.bea.clone(), f.al.clone(), PostId::new(), "Two")
            .await
            .expect("two");
        assert_eq!(f.store.len().await, 2);
    }

    #[tokio::test]
    async fn test_comment_is_truncated_to_100_chars() {
        let f = fixture();
        let comment = "c".repeat(200);
        let n = f
            .service
            .notify_post_comment(
                f.bea.clone(),
                f.al.clone(),
                PostId::new(),
                CommentId::new(),
                &comment,
                None,
            )
            .await
            .expect("created");

        let expected = format!("{}...", "c".repeat(100));
        assert!(n.message.contains(&expected));
        assert!(!n.message.contains(&"c".repeat(101)));
    }

    #[tokio::test]
    async fn test_pagination_math() {
        let f = fixture();
        for _ in 0..45 {
            f.service
                .notify_post_liked(f.bea.clone(), f.al.clone(), PostId::new(), "Post")
                .await
                .expect("created");
            f.clock.advance(Duration::seconds(1));
        }

        let first = f
            .service
            .get_user_notifications(f.bea.id, 1, 20, false)
            .await
            .unwrap();
        assert_eq!(first.page.items.len(), 20);
        assert_eq!(first.page.total_pages, 3);
        assert_eq!(first.page.total_items, 45);

        let last = f
            .service
            .get_user_notifications(f.bea.id, 3, 20, false)
            .await
            .unwrap();
        assert_eq!(last.page.items.len(), 5);
    }

    #[tokio::test]
    async fn test_unread_count_ignores_filter() {
        let f = fixture();
        let mut ids = Vec::new();
        for _ in 0..10 {
            let n = f
                .service
                .notify_post_liked(f.bea.clone(), f.al.clone(), PostId::new(), "Post")
                .await
                .expect("created");
            ids.push(n.id);
        }
        for id in &ids[..6] {
            f.service.mark_as_read(*id, f.bea.id).await.unwrap();
        }

        let listing = f
            .service
            .get_user_notifications(f.bea.id, 1, 20, true)
            .await
            .unwrap();
        assert_eq!(listing.unread_count, 4);
        assert_eq!(listing.page.items.len(), 4);
        assert!(listing.page.items.iter().all(Notification::is_unread));
    }

    #[tokio::test]
    async fn test_mark_as_read_checks_owner() {
        let f = fixture();
        let n = f
            .service
            .notify_post_liked(f.bea.clone(), f.al.clone(), PostId::new(), "Post")
            .await
            .expect("created");

        let stranger = f.service.mark_as_read(n.id, f.al.id).await.unwrap();
        assert!(stranger.is_none());
        assert!(f.store.get(n.id).await.unwrap().is_unread());

        let owner = f.service.mark_as_read(n.id, f.bea.id).await.unwrap();
        assert!(owner.expect("owned").is_read);
    }

    #[tokio::test]
    async fn test_mark_all_as_read_reports_modified() {
        let f = fixture();
        for _ in 0..3 {
            f.service
                .notify_post_liked(f.bea.clone(), f.al.clone(), PostId::new(), "Post")
                .await
                .expect("created");
        }
        assert_eq!(f.service.mark_all_as_read(f.bea.id).await.unwrap(), 3);
        assert_eq!(f.service.mark_all_as_read(f.bea.id).await.unwrap(), 0);
        assert_eq!(f.service.unread_count(f.bea.id).await.unwrap(), 0);
    }

    #[tokio::test]
    async fn test_cleanup_boundary() {
        let f = fixture();
        let now = f.clock.now();

        let old = f
            .service
            .notify_post_liked(f.bea.clone(), f.al.clone(), PostId::new(), "Old")
            .await
            .expect("old");
        let recent = f
            .service
            .notify_post_liked(f.bea.clone(), f.al.clone(), PostId::new(), "Recent")
            .await
            .expect("recent");

        let mut old_record = f.store.get(old.id).await.unwrap();
        old_record.created_at = now - Duration::days(31);
        f.store.seed(old_record).await;
        let mut recent_record = f.store.get(recent.id).await.unwrap();
        recent_record.created_at = now - Duration::days(29);
        f.store.seed(recent_record).await;

        let removed = f.service.cleanup_old_notifications(30).await.unwrap();
        assert_eq!(removed, 1);
        assert!(f.store.get(old.id).await.is_none());
        assert!(f.store.get(recent.id).await.is_some());
    }

    #[tokio::test]
    async fn test_expired_records_are_unreachable_before_purge() {
        let f = fixture();
        let n = f
            .service
            .notify_post_liked(f.bea.clone(), f.al.clone(), PostId::new(), "Post")
            .await
            .expect("created");

        f.clock.advance(Duration::days(31));
        let listing = f
            .service
            .get_user_notifications(f.bea.id, 1, 20, false)
            .await
            .unwrap();
        assert!(listing.page.items.is_empty());
        assert_eq!(listing.unread_count, 0);
        assert!(f.service.mark_as_read(n.id, f.bea.id).await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_delete_checks_owner() {
        let f = fixture();
        let n = f
            .service
            .notify_friend_request(f.bea.clone(), f.al.clone(), FriendRequestId::new())
            .await
            .expect("created");
        assert!(!f.service.delete_notification(n.id, f.al.id).await.unwrap());
        assert!(f.service.delete_notification(n.id, f.bea.id).await.unwrap());
    }

    #[tokio::test]
    async fn test_publisher_sees_only_new_records() {
        let f = fixture();
        let publisher = Arc::new(RecordingPublisher::default());
        let service = f.service.clone().with_publisher(publisher.clone());
        let post = PostId::new();

        service
            .notify_post_liked(f.bea.clone(), f.al.clone(), post, "Post")
            .await
            .expect("first");
        service
            .notify_post_liked(f.bea.clone(), f.al.clone(), post, "Post")
            .await
            .expect("dup");

        assert_eq!(publisher.notifications.lock().unwrap().len(), 1);
    }

    #[tokio::test]
    async fn test_store_failure_asymmetry() {
        let clock = Arc::new(ManualClock::default());
        let service =
            NotificationService::new(Arc::new(BrokenStore), clock, NotificationConfig::default());
        let bea = ActorSnapshot::new(UserId::new(), "Bea");
        let al = ActorSnapshot::new(UserId::new(), "Al");

        let created = service
            .notify_community_invite(bea.clone(), al, CommunityId::new(), "Caregivers")
            .await;
        assert!(created.is_none());

        let err = service
            .get_user_notifications(bea.id, 1, 20, false)
            .await
            .unwrap_err();
        assert_eq!(err.kind, ErrorKind::Database);
        assert!(service.mark_all_as_read(bea.id).await.is_err());
        assert!(service.cleanup_old_notifications(30).await.is_err());
    }

    #[tokio::test]
    async fn test_oversized_message_is_dropped() {
        let f = fixture();
        let draft = NewNotification {
            recipient: f.bea.clone(),
            sender: f.al.clone(),
            payload: NotificationPayload::FriendRequest(FriendRequestData {
                request_id: FriendRequestId::new(),
            }),
            message: "m".repeat(MAX_MESSAGE_CHARS + 1),
        };
        assert!(f.service.create_notification(draft).await.is_none());
        assert!(f.store.is_empty().await);
    }

    #[tokio::test]
    async fn test_join_request_response_kinds() {
        let f = fixture();
        let community = CommunityId::new();
        let accepted = f
            .service
            .notify_join_request_response(f.bea.clone(), f.al.clone(), community, "CF Parents", true)
            .await
            .expect("accepted");
        let rejected = f
            .service
            .notify_join_request_response(f.bea.clone(), f.al.clone(), community, "CF Parents", false)
            .await
            .expect("rejected");
        assert_eq!(accepted.kind(), NotificationKind::JoinRequestAccepted);
        assert_eq!(rejected.kind(), NotificationKind::JoinRequestRejected);
        assert_ne!(accepted.id, rejected.id);
    }

    #[tokio::test]
    async fn test_like_scenario_reaches_head_of_list() {
        let f = fixture();
        f.service
            .notify_new_member(f.bea.clone(), f.al.clone(), CommunityId::new(), "Caregivers")
            .await
            .expect("earlier");
        f.clock.advance(Duration::minutes(1));

        let liked = f
            .service
            .notify_post_liked(
                f.bea.clone(),
                f.al.clone(),
                PostId::new(),
                "Latest CF Treatment Breakthrough",
            )
            .await
            .expect("like");
        assert_eq!(liked.kind(), NotificationKind::PostLiked);
        assert!(liked.message.starts_with("Al"));
        assert!(liked.message.contains("Latest CF Treatment Breakthrough"));
        assert!(!liked.is_read);

        let listing = f
            .service
            .get_user_notifications(f.bea.id, 1, 20, false)
            .await
            .unwrap();
        assert_eq!(listing.page.items[0].id, liked.id);
        assert_eq!(listing.unread_count, 2);
    }
}
