//! Conversation entity model.

use carehub_core::types::{ConversationId, MessageId, UserId};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::message::Message;

/// Whether a conversation is one-to-one or a named group.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ConversationKind {
    Direct,
    Group,
}

impl ConversationKind {
    /// Return the kind as a lowercase string.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Direct => "direct",
            Self::Group => "group",
        }
    }
}

/// Role of a participant inside a conversation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ParticipantRole {
    #[default]
    Member,
    Admin,
}

/// A conversation member.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Participant {
    pub user_id: UserId,
    pub name: String,
    #[serde(default)]
    pub role: ParticipantRole,
}

/// Cached projection of the newest message, for conversation lists.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LastMessage {
    pub message_id: MessageId,
    pub content: String,
    pub sender_id: UserId,
    pub sender_name: String,
    pub sent_at: DateTime<Utc>,
}

impl From<&Message> for LastMessage {
    fn from(message: &Message) -> Self {
        Self {
            message_id: message.id,
            content: message.content.clone(),
            sender_id: message.sender.id,
            sender_name: message.sender.name.clone(),
            sent_at: message.created_at,
        }
    }
}

/// Per-conversation flags.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ConversationSettings {
    #[serde(default)]
    pub archived: bool,
    #[serde(default)]
    pub muted: bool,
    #[serde(default = "default_true")]
    pub allow_invites: bool,
}

impl Default for ConversationSettings {
    fn default() -> Self {
        Self {
            archived: false,
            muted: false,
            allow_invites: true,
        }
    }
}

/// A direct or group conversation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Conversation {
    pub id: ConversationId,
    #[serde(rename = "type")]
    pub kind: ConversationKind,
    pub participants: Vec<Participant>,
    /// Display name, groups only.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    /// Avatar URL, groups only.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub avatar: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub last_message: Option<LastMessage>,
    #[serde(default)]
    pub settings: ConversationSettings,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Conversation {
    /// Start a one-to-one conversation.
    pub fn direct(a: Participant, b: Participant, now: DateTime<Utc>) -> Self {
        Self {
            id: ConversationId::new(),
            kind: ConversationKind::Direct,
            participants: vec![a, b],
            name: None,
            avatar: None,
            last_message: None,
            settings: ConversationSettings::default(),
            created_at: now,
            updated_at: now,
        }
    }

    /// Start a named group conversation.
    pub fn group(
        name: impl Into<String>,
        participants: Vec<Participant>,
        now: DateTime<Utc>,
    ) -> Self {
        Self {
            id: ConversationId::new(),
            kind: ConversationKind::Group,
            participants,
            name: Some(name.into()),
            avatar: None,
            last_message: None,
            settings: ConversationSettings::default(),
            created_at: now,
            updated_at: now,
        }
    }

    /// Whether `user_id` is listed among the participants.
    pub fn has_participant(&self, user_id: UserId) -> bool {
        self.participants.iter().any(|p| p.user_id == user_id)
    }
}

fn default_true() -> bool {
    true
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_has_participant() {
        let a = Participant {
            user_id: UserId::new(),
            name: "Ana".into(),
            role: ParticipantRole::Member,
        };
        let b = Participant {
            user_id: UserId::new(),
            name: "Ben".into(),
            role: ParticipantRole::Member,
        };
        let conv = Conversation::direct(a.clone(), b, Utc::now());
        assert!(conv.has_participant(a.user_id));
        assert!(!conv.has_participant(UserId::new()));
    }

    #[test]
    fn test_settings_default_allows_invites() {
        let settings: ConversationSettings = serde_json::from_str("{}").expect("parse");
        assert!(settings.allow_invites);
        assert!(!settings.archived);
    }
}
