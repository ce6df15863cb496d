//! In-memory conversation store.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use dashmap::DashMap;

use carehub_core::error::AppError;
use carehub_core::result::AppResult;
use carehub_core::types::{ConversationId, MessageId};
use carehub_entity::conversation::{Conversation, LastMessage, Message};

use crate::store::ConversationStore;

/// Conversation store held in concurrent maps.
#[derive(Debug, Default)]
pub struct MemoryConversationStore {
    conversations: DashMap<ConversationId, Conversation>,
    messages: DashMap<MessageId, Message>,
}

impl MemoryConversationStore {
    /// Create an empty store.
    pub fn new() -> Self {
        Self::default()
    }

    /// Messages of one conversation, oldest first.
    pub fn messages_in(&self, conversation_id: ConversationId) -> Vec<Message> {
        let mut out: Vec<Message> = self
            .messages
            .iter()
            .filter(|m| m.conversation_id == conversation_id)
            .map(|m| m.value().clone())
            .collect();
        out.sort_by_key(|m| m.created_at);
        out
    }
}

#[async_trait]
impl ConversationStore for MemoryConversationStore {
    async fn create_conversation(&self, conversation: &Conversation) -> AppResult<()> {
        if self.conversations.contains_key(&conversation.id) {
            return Err(AppError::conflict(format!(
                "Conversation {} already exists",
                conversation.id
            )));
        }
        self.conversations
            .insert(conversation.id, conversation.clone());
        Ok(())
    }

    async fn find_conversation(&self, id: ConversationId) -> AppResult<Option<Conversation>> {
        Ok(self.conversations.get(&id).map(|c| c.value().clone()))
    }

    async fn insert_message(&self, message: &Message) -> AppResult<()> {
        self.messages.insert(message.id, message.clone());
        Ok(())
    }

    async fn update_last_message(
        &self,
        id: ConversationId,
        last: &LastMessage,
        now: DateTime<Utc>,
    ) -> AppResult<()> {
        let mut conversation = self
            .conversations
            .get_mut(&id)
            .ok_or_else(|| AppError::not_found(format!("Conversation {id} not found")))?;
        conversation.last_message = Some(last.clone());
        conversation.updated_at = now;
        Ok(())
    }
}
