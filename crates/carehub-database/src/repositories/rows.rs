//! Row types and their conversion into domain entities.

use chrono::{DateTime, Utc};
use sqlx::FromRow;
use sqlx::types::Json;

use carehub_core::error::{AppError, ErrorKind};
use carehub_core::types::{ConversationId, NotificationId};
use carehub_entity::conversation::{
    Conversation, ConversationKind, ConversationSettings, LastMessage, Participant,
};
use carehub_entity::notification::{
    ActorSnapshot, Notification, NotificationKind, NotificationPayload,
};

/// A row of the `notifications` table.
#[derive(Debug, FromRow)]
pub(crate) struct NotificationRow {
    pub id: NotificationId,
    pub recipient: Json<ActorSnapshot>,
    pub sender: Json<ActorSnapshot>,
    pub kind: String,
    pub data: serde_json::Value,
    pub message: String,
    pub is_read: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl TryFrom<NotificationRow> for Notification {
    type Error = AppError;

    fn try_from(row: NotificationRow) -> Result<Self, Self::Error> {
        let kind: NotificationKind = row.kind.parse()?;
        let payload = NotificationPayload::from_parts(kind, row.data).map_err(|e| {
            AppError::with_source(
                ErrorKind::Serialization,
                format!("Corrupt data for notification {}", row.id),
                e,
            )
        })?;
        Ok(Notification {
            id: row.id,
            recipient: row.recipient.0,
            sender: row.sender.0,
            payload,
            message: row.message,
            is_read: row.is_read,
            created_at: row.created_at,
            updated_at: row.updated_at,
        })
    }
}

/// A row of the `conversations` table.
#[derive(Debug, FromRow)]
pub(crate) struct ConversationRow {
    pub id: ConversationId,
    pub kind: String,
    pub participants: Json<Vec<Participant>>,
    pub name: Option<String>,
    pub avatar: Option<String>,
    pub last_message: Option<Json<LastMessage>>,
    pub settings: Json<ConversationSettings>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl TryFrom<ConversationRow> for Conversation {
    type Error = AppError;

    fn try_from(row: ConversationRow) -> Result<Self, Self::Error> {
        let kind = match row.kind.as_str() {
            "direct" => ConversationKind::Direct,
            "group" => ConversationKind::Group,
            other => {
                return Err(AppError::new(
                    ErrorKind::Serialization,
                    format!("Unknown conversation type '{other}' for {}", row.id),
                ));
            }
        };
        Ok(Conversation {
            id: row.id,
            kind,
            participants: row.participants.0,
            name: row.name,
            avatar: row.avatar,
            last_message: row.last_message.map(|j| j.0),
            settings: row.settings.0,
            created_at: row.created_at,
            updated_at: row.updated_at,
        })
    }
}
