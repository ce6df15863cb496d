//! PostgreSQL conversation store.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::PgPool;
use sqlx::types::Json;

use carehub_core::error::{AppError, ErrorKind};
use carehub_core::result::AppResult;
use carehub_core::types::ConversationId;
use carehub_entity::conversation::{Conversation, LastMessage, Message};

use super::rows::ConversationRow;
use crate::store::ConversationStore;

/// Conversation store backed by the `conversations` and `messages` tables.
#[derive(Debug, Clone)]
pub struct PgConversationStore {
    pool: PgPool,
}

impl PgConversationStore {
    /// Create a new conversation store.
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl ConversationStore for PgConversationStore {
    async fn create_conversation(&self, conversation: &Conversation) -> AppResult<()> {
        sqlx::query(
            "INSERT INTO conversations \
             (id, kind, participants, name, avatar, last_message, settings, created_at, updated_at) \
             VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9)",
        )
        .bind(conversation.id)
        .bind(conversation.kind.as_str())
        .bind(Json(&conversation.participants))
        .bind(&conversation.name)
        .bind(&conversation.avatar)
        .bind(conversation.last_message.as_ref().map(Json))
        .bind(Json(&conversation.settings))
        .bind(conversation.created_at)
        .bind(conversation.updated_at)
        .execute(&self.pool)
        .await
        .map_err(|e| {
            AppError::with_source(ErrorKind::Database, "Failed to create conversation", e)
        })?;
        Ok(())
    }

    async fn find_conversation(&self, id: ConversationId) -> AppResult<Option<Conversation>> {
        let row = sqlx::query_as::<_, ConversationRow>(
            "SELECT id, kind, participants, name, avatar, last_message, settings, \
             created_at, updated_at FROM conversations WHERE id = $1",
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| {
            AppError::with_source(ErrorKind::Database, "Failed to find conversation", e)
        })?;
        row.map(Conversation::try_from).transpose()
    }

    async fn insert_message(&self, message: &Message) -> AppResult<()> {
        let kind = serde_json::to_value(message.kind)?;
        sqlx::query(
            "INSERT INTO messages \
             (id, conversation_id, sender_id, sender, content, kind, attachments, reply_to, \
              reactions, read_by, is_edited, is_deleted, created_at, updated_at) \
             VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11, $12, $13, $14)",
        )
        .bind(message.id)
        .bind(message.conversation_id)
        .bind(message.sender.id)
        .bind(Json(&message.sender))
        .bind(&message.content)
        .bind(kind.as_str().unwrap_or("text"))
        .bind(Json(&message.attachments))
        .bind(message.reply_to)
        .bind(Json(&message.reactions))
        .bind(Json(&message.read_by))
        .bind(message.is_edited)
        .bind(message.is_deleted)
        .bind(message.created_at)
        .bind(message.updated_at)
        .execute(&self.pool)
        .await
        .map_err(|e| AppError::with_source(ErrorKind::Database, "Failed to insert message", e))?;
        Ok(())
    }

    async fn update_last_message(
        &self,
        id: ConversationId,
        last: &LastMessage,
        now: DateTime<Utc>,
    ) -> AppResult<()> {
        sqlx::query("UPDATE conversations SET last_message = $2, updated_at = $3 WHERE id = $1")
            .bind(id)
            .bind(Json(last))
            .bind(now)
            .execute(&self.pool)
            .await
            .map_err(|e| {
                AppError::with_source(ErrorKind::Database, "Failed to update last message", e)
            })?;
        Ok(())
    }
}
