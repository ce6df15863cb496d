//! Message service.

use std::sync::Arc;

use tracing::{info, warn};
use validator::Validate;

use carehub_core::error::AppError;
use carehub_core::result::AppResult;
use carehub_core::traits::Clock;
use carehub_core::types::ConversationId;
use carehub_database::store::ConversationStore;
use carehub_entity::conversation::{Conversation, LastMessage, Message, MessageDraft};

use crate::context::RequestContext;
use crate::publisher::EventPublisher;

/// Writes messages into conversations the sender belongs to.
#[derive(Clone)]
pub struct MessageService {
    store: Arc<dyn ConversationStore>,
    clock: Arc<dyn Clock>,
    publisher: Option<Arc<dyn EventPublisher>>,
}

impl std::fmt::Debug for MessageService {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("MessageService")
            .field("publisher", &self.publisher.is_some())
            .finish_non_exhaustive()
    }
}

impl MessageService {
    /// Creates a new message service.
    pub fn new(store: Arc<dyn ConversationStore>, clock: Arc<dyn Clock>) -> Self {
        Self {
            store,
            clock,
            publisher: None,
        }
    }

    /// Push newly-sent messages through `publisher`.
    pub fn with_publisher(mut self, publisher: Arc<dyn EventPublisher>) -> Self {
        self.publisher = Some(publisher);
        self
    }

    /// Store a new conversation.
    pub async fn start_conversation(&self, conversation: Conversation) -> AppResult<Conversation> {
        self.store.create_conversation(&conversation).await?;
        info!(
            conversation_id = %conversation.id,
            kind = conversation.kind.as_str(),
            participants = conversation.participants.len(),
            "Conversation started"
        );
        Ok(conversation)
    }

    /// Send a message as the caller.
    ///
    /// Fails with not-found when the conversation does not exist, with an
    /// authorization error when the caller is not a participant, and with
    /// a validation error when the content is empty or too long.
    pub async fn send_message(
        &self,
        ctx: &RequestContext,
        conversation_id: ConversationId,
        draft: MessageDraft,
    ) -> AppResult<Message> {
        let conversation = self
            .store
            .find_conversation(conversation_id)
            .await?
            .ok_or_else(|| {
                AppError::not_found(format!("Conversation {conversation_id} not found"))
            })?;

        if !conversation.has_participant(ctx.user_id) {
            warn!(
                user_id = %ctx.user_id,
                conversation_id = %conversation_id,
                "Rejected message from non-participant"
            );
            return Err(AppError::authorization(
                "Only conversation participants can send messages",
            ));
        }

        draft
            .validate()
            .map_err(|e| AppError::validation(format!("Invalid message: {e}")))?;

        let now = self.clock.now();
        let message = draft.into_message(conversation_id, ctx.actor(), now);
        self.store.insert_message(&message).await?;
        self.store
            .update_last_message(conversation_id, &LastMessage::from(&message), now)
            .await?;

        info!(
            message_id = %message.id,
            conversation_id = %conversation_id,
            sender = %ctx.user_id,
            "Message sent"
        );

        if let Some(publisher) = &self.publisher {
            publisher.message_sent(&message).await;
        }
        Ok(message)
    }
}

#[cfg(test)]
mod tests {
    use carehub_core::error::ErrorKind;
    use carehub_core::traits::ManualClock;
    use carehub_core::types::UserId;
    use carehub_database::memory::MemoryConversationStore;
    use carehub_entity::conversation::{Participant, ParticipantRole};
    use chrono::Utc;

    use super::*;

    fn participant(name: &str) -> Participant {
        Participant {
            user_id: UserId::new(),
            name: name.into(),
            role: ParticipantRole::Member,
        }
    }

    async fn setup() -> (MessageService, Arc<MemoryConversationStore>, Conversation) {
        let store = Arc::new(MemoryConversationStore::new());
        let service = MessageService::new(store.clone(), Arc::new(ManualClock::default()));
        let conv = service
            .start_conversation(Conversation::direct(
                participant("Ana"),
                participant("Ben"),
                Utc::now(),
            ))
            .await
            .unwrap();
        (service, store, conv)
    }

    #[tokio::test]
    async fn test_participant_can_send() {
        let (service, store, conv) = setup().await;
        let ana = &conv.participants[0];
        let ctx = RequestContext::new(ana.user_id, ana.name.clone());

        let msg = service
            .send_message(&ctx, conv.id, MessageDraft::text("See you at clinic"))
            .await
            .unwrap();
        assert_eq!(msg.sender.id, ana.user_id);

        let stored = store.find_conversation(conv.id).await.unwrap().unwrap();
        let last = stored.last_message.expect("last message set");
        assert_eq!(last.message_id, msg.id);
        assert_eq!(store.messages_in(conv.id).len(), 1);
    }

    #[tokio::test]
    async fn test_non_participant_is_rejected() {
        let (service, store, conv) = setup().await;
        let ctx = RequestContext::new(UserId::new(), "Eve");
        let err = service
            .send_message(&ctx, conv.id, MessageDraft::text("hi"))
            .await
            .unwrap_err();
        assert_eq!(err.kind, ErrorKind::Authorization);
        assert!(store.messages_in(conv.id).is_empty());
    }

    #[tokio::test]
    async fn test_missing_conversation_is_not_found() {
        let (service, _store, conv) = setup().await;
        let ana = &conv.participants[0];
        let ctx = RequestContext::new(ana.user_id, ana.name.clone());
        let err = service
            .send_message(&ctx, ConversationId::new(), MessageDraft::text("hi"))
            .await
            .unwrap_err();
        assert_eq!(err.kind, ErrorKind::NotFound);
    }

    #[tokio::test]
    async fn test_content_bounds() {
        let (service, _store, conv) = setup().await;
        let ana = &conv.participants[0];
        let ctx = RequestContext::new(ana.user_id, ana.name.clone());

        let empty = service
            .send_message(&ctx, conv.id, MessageDraft::text(""))
            .await
            .unwrap_err();
        assert_eq!(empty.kind, ErrorKind::Validation);

        let long = service
            .send_message(&ctx, conv.id, MessageDraft::text("a".repeat(2001)))
            .await
            .unwrap_err();
        assert_eq!(long.kind, ErrorKind::Validation);
    }
}
