//! Conversation and message store.

use async_trait::async_trait;
use chrono::{DateTime, Utc};

use carehub_core::result::AppResult;
use carehub_core::types::ConversationId;
use carehub_entity::conversation::{Conversation, LastMessage, Message};

/// Persistent collection of conversations and their messages.
#[async_trait]
pub trait ConversationStore: Send + Sync + 'static {
    /// Insert a new conversation.
    async fn create_conversation(&self, conversation: &Conversation) -> AppResult<()>;

    /// Look up a conversation by id.
    async fn find_conversation(&self, id: ConversationId) -> AppResult<Option<Conversation>>;

    /// Insert a message. The caller has already checked participation.
    async fn insert_message(&self, message: &Message) -> AppResult<()>;

    /// Replace the cached `lastMessage` projection.
    async fn update_last_message(
        &self,
        id: ConversationId,
        last: &LastMessage,
        now: DateTime<Utc>,
    ) -> AppResult<()>;
}
