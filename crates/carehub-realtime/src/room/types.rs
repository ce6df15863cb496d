//! Room name definitions and parsing.

use std::fmt;

use carehub_core::types::{ConversationId, UserId};

/// Typed room identifiers.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum RoomName {
    /// Personal room: every tab and device of one user.
    User(UserId),
    /// Everyone currently viewing a conversation.
    Conversation(ConversationId),
}

impl RoomName {
    /// Parses a room string such as `user:<uuid>`.
    pub fn parse(room: &str) -> Option<Self> {
        match room.split_once(':')? {
            ("user", id) => id.parse().ok().map(RoomName::User),
            ("conversation", id) => id.parse().ok().map(RoomName::Conversation),
            _ => None,
        }
    }
}

impl fmt::Display for RoomName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RoomName::User(id) => write!(f, "user:{id}"),
            RoomName::Conversation(id) => write!(f, "conversation:{id}"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_round_trip() {
        let room = RoomName::Conversation(ConversationId::new());
        assert_eq!(RoomName::parse(&room.to_string()), Some(room));
    }

    #[test]
    fn test_parse_rejects_unknown() {
        assert_eq!(RoomName::parse("folder:abc"), None);
        assert_eq!(RoomName::parse("user:not-a-uuid"), None);
        assert_eq!(RoomName::parse("user"), None);
    }
}
