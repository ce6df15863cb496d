//! Client-side record of joined rooms.

use carehub_core::types::{ConversationId, UserId};
use carehub_entity::realtime::ClientEvent;

/// Rooms this client has asked to join.
///
/// The server forgets memberships when a connection drops, so this is the
/// source of truth that gets replayed after every reconnect.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RoomMembership {
    user: Option<UserId>,
    conversations: Vec<ConversationId>,
}

impl RoomMembership {
    pub fn new() -> Self {
        Self::default()
    }

    /// Track the personal room. Returns `false` if it was already tracked.
    pub fn join_user_room(&mut self, user_id: UserId) -> bool {
        self.user.replace(user_id) != Some(user_id)
    }

    pub fn join_conversation(&mut self, conversation_id: ConversationId) -> bool {
        if self.conversations.contains(&conversation_id) {
            return false;
        }
        self.conversations.push(conversation_id);
        true
    }

    pub fn leave_conversation(&mut self, conversation_id: ConversationId) -> bool {
        let before = self.conversations.len();
        self.conversations.retain(|c| *c != conversation_id);
        self.conversations.len() != before
    }

    pub fn user(&self) -> Option<UserId> {
        self.user
    }

    pub fn conversations(&self) -> &[ConversationId] {
        &self.conversations
    }

    /// Join events to send on a fresh connection, personal room first.
    pub fn replay_events(&self) -> Vec<ClientEvent> {
        self.user
            .map(ClientEvent::JoinUserRoom)
            .into_iter()
            .chain(
                self.conversations
                    .iter()
                    .copied()
                    .map(ClientEvent::JoinConversation),
            )
            .collect()
    }
}
