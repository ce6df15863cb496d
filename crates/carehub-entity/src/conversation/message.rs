//! Chat message entity model.

use carehub_core::types::{ConversationId, MessageId, UserId};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use validator::Validate;

use crate::notification::ActorSnapshot;

/// Upper bound on message content, in characters.
pub const MAX_CONTENT_CHARS: u64 = 2000;

/// What a message carries.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MessageKind {
    #[default]
    Text,
    Image,
    File,
    System,
}

/// A file attached to a message.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Attachment {
    pub url: String,
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub mime_type: Option<String>,
    #[serde(default)]
    pub size: u64,
}

/// One user's reaction to a message.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Reaction {
    pub user_id: UserId,
    pub user_name: String,
    pub reaction: String,
    pub created_at: DateTime<Utc>,
}

/// Read receipt.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ReadReceipt {
    pub user_id: UserId,
    pub read_at: DateTime<Utc>,
}

/// A message inside exactly one conversation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Message {
    pub id: MessageId,
    /// Owning conversation. The sender must be one of its participants.
    pub conversation_id: ConversationId,
    pub sender: ActorSnapshot,
    pub content: String,
    #[serde(rename = "type", default)]
    pub kind: MessageKind,
    #[serde(default)]
    pub attachments: Vec<Attachment>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub reply_to: Option<MessageId>,
    #[serde(default)]
    pub reactions: Vec<Reaction>,
    #[serde(default)]
    pub read_by: Vec<ReadReceipt>,
    #[serde(default)]
    pub is_edited: bool,
    #[serde(default)]
    pub is_deleted: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Client-supplied fields for a new message.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct MessageDraft {
    #[validate(length(min = 1, max = 2000, message = "content must be 1 to 2000 characters"))]
    pub content: String,
    #[serde(rename = "type", default)]
    pub kind: MessageKind,
    #[serde(default)]
    pub attachments: Vec<Attachment>,
    #[serde(default)]
    pub reply_to: Option<MessageId>,
}

impl MessageDraft {
    /// A plain text draft.
    pub fn text(content: impl Into<String>) -> Self {
        Self {
            content: content.into(),
            ..Self::default()
        }
    }

    /// Materialize the stored message. The sender has read their own message.
    pub fn into_message(
        self,
        conversation_id: ConversationId,
        sender: ActorSnapshot,
        now: DateTime<Utc>,
    ) -> Message {
        let read_by = vec![ReadReceipt {
            user_id: sender.id,
            read_at: now,
        }];
        Message {
            id: MessageId::new(),
            conversation_id,
            sender,
            content: self.content,
            kind: self.kind,
            attachments: self.attachments,
            reply_to: self.reply_to,
            reactions: Vec::new(),
            read_by,
            is_edited: false,
            is_deleted: false,
            created_at: now,
            updated_at: now,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_draft_length_bounds() {
        assert!(MessageDraft::text("hi").validate().is_ok());
        assert!(MessageDraft::text("").validate().is_err());
        assert!(MessageDraft::text("é".repeat(2000)).validate().is_ok());
        assert!(MessageDraft::text("a".repeat(2001)).validate().is_err());
    }

    #[test]
    fn test_into_message_marks_sender_read() {
        let sender = ActorSnapshot::new(UserId::new(), "Cam");
        let msg = MessageDraft::text("hello").into_message(
            ConversationId::new(),
            sender.clone(),
            Utc::now(),
        );
        assert_eq!(msg.read_by.len(), 1);
        assert_eq!(msg.read_by[0].user_id, sender.id);
        assert_eq!(msg.kind, MessageKind::Text);
    }
}
