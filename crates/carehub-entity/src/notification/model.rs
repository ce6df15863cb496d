//! Notification entity model.

use carehub_core::types::NotificationId;
use chrono::{DateTime, Duration, Utc};
use serde::{Deserialize, Serialize};

use super::actor::ActorSnapshot;
use super::kind::NotificationKind;
use super::payload::NotificationPayload;

/// Upper bound on a notification message, in characters.
pub const MAX_MESSAGE_CHARS: usize = 500;

/// A persisted notification addressed to one recipient.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Notification {
    /// Unique notification identifier.
    pub id: NotificationId,
    /// Who the notification is for.
    pub recipient: ActorSnapshot,
    /// Who triggered it.
    pub sender: ActorSnapshot,
    /// Type tag plus type-specific references.
    #[serde(flatten)]
    pub payload: NotificationPayload,
    /// Precomposed human-readable text.
    pub message: String,
    /// Whether the recipient has read this notification.
    #[serde(default)]
    pub is_read: bool,
    /// When the notification was created. Never changes after insert.
    pub created_at: DateTime<Utc>,
    /// When the notification was last modified.
    pub updated_at: DateTime<Utc>,
}

impl Notification {
    /// The notification type.
    pub fn kind(&self) -> NotificationKind {
        self.payload.kind()
    }

    /// Check if the notification has not been read yet.
    pub fn is_unread(&self) -> bool {
        !self.is_read
    }

    /// Whether the record has aged past the retention window at `now`.
    pub fn is_expired(&self, now: DateTime<Utc>, retention: Duration) -> bool {
        self.created_at <= now - retention
    }
}

/// A notification that has not been stored yet.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewNotification {
    /// Who the notification is for.
    pub recipient: ActorSnapshot,
    /// Who triggered it.
    pub sender: ActorSnapshot,
    /// Type tag plus type-specific references.
    #[serde(flatten)]
    pub payload: NotificationPayload,
    /// Precomposed human-readable text.
    pub message: String,
}

impl NewNotification {
    /// The notification type.
    pub fn kind(&self) -> NotificationKind {
        self.payload.kind()
    }

    /// Whether sender and recipient are the same user.
    pub fn is_self_notification(&self) -> bool {
        self.recipient.id == self.sender.id
    }

    /// Composite key identifying "the same event" within one time bucket.
    ///
    /// Format: `recipient:sender:type:post:comment:bucket`, where missing
    /// references are written as `-` and `bucket` is the index of the
    /// `window_seconds`-wide slot containing `at`.
    pub fn dedup_key(&self, at: DateTime<Utc>, window_seconds: i64) -> String {
        let bucket = at.timestamp().div_euclid(window_seconds.max(1));
        let post = self
            .payload
            .post_id()
            .map_or_else(|| "-".to_string(), |id| id.to_string());
        let comment = self
            .payload
            .comment_id()
            .map_or_else(|| "-".to_string(), |id| id.to_string());
        format!(
            "{}:{}:{}:{}:{}:{}",
            self.recipient.id,
            self.sender.id,
            self.kind(),
            post,
            comment,
            bucket
        )
    }

    /// Whether `existing` describes the same event for dedup purposes.
    pub fn matches(&self, existing: &Notification) -> bool {
        existing.recipient.id == self.recipient.id
            && existing.sender.id == self.sender.id
            && existing.kind() == self.kind()
            && existing.payload.post_id() == self.payload.post_id()
            && existing.payload.comment_id() == self.payload.comment_id()
    }

    /// Materialize the stored record.
    pub fn into_notification(self, id: NotificationId, now: DateTime<Utc>) -> Notification {
        Notification {
            id,
            recipient: self.recipient,
            sender: self.sender,
            payload: self.payload,
            message: self.message,
            is_read: false,
            created_at: now,
            updated_at: now,
        }
    }
}

#[cfg(test)]
mod tests {
    use carehub_core::types::{PostId, UserId};
    use chrono::TimeZone;

    use super::*;
    use crate::notification::payload::PostLikedData;

    fn draft(post_id: PostId) -> NewNotification {
        NewNotification {
            recipient: ActorSnapshot::new(UserId::new(), "Bea"),
            sender: ActorSnapshot::new(UserId::new(), "Al"),
            payload: NotificationPayload::PostLiked(PostLikedData {
                post_id,
                post_title: "Airway clearance tips".into(),
            }),
            message: "Al liked your post".into(),
        }
    }

    #[test]
    fn test_serialized_shape_is_flat() {
        let n = draft(PostId::new()).into_notification(NotificationId::new(), Utc::now());
        let json = serde_json::to_value(&n).expect("json");
        assert_eq!(json["type"], "post_liked");
        assert_eq!(json["isRead"], false);
        assert!(json["data"]["postTitle"].is_string());
        assert!(json.get("payload").is_none());

        let back: Notification = serde_json::from_value(json).expect("parse");
        assert_eq!(back, n);
    }

    #[test]
    fn test_dedup_key_buckets() {
        let d = draft(PostId::new());
        let t0 = Utc.with_ymd_and_hms(2026, 3, 1, 12, 0, 10).unwrap();
        let same_slot = t0 + Duration::seconds(200);
        let next_slot = t0 + Duration::seconds(300);
        assert_eq!(d.dedup_key(t0, 300), d.dedup_key(same_slot, 300));
        assert_ne!(d.dedup_key(t0, 300), d.dedup_key(next_slot, 300));
        assert!(d.dedup_key(t0, 300).contains(":post_liked:"));
    }

    #[test]
    fn test_matches_requires_same_post() {
        let d = draft(PostId::new());
        let stored = d.clone().into_notification(NotificationId::new(), Utc::now());
        assert!(d.matches(&stored));

        let mut other = d.clone();
        other.payload = NotificationPayload::PostLiked(PostLikedData {
            post_id: PostId::new(),
            post_title: "Another".into(),
        });
        assert!(!other.matches(&stored));
    }

    #[test]
    fn test_expiry_boundary() {
        let now = Utc::now();
        let mut n = draft(PostId::new()).into_notification(NotificationId::new(), now);
        n.created_at = now - Duration::days(29);
        assert!(!n.is_expired(now, Duration::days(30)));
        n.created_at = now - Duration::days(31);
        assert!(n.is_expired(now, Duration::days(30)));
    }
}
