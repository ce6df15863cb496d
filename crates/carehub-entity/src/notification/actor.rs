//! Denormalized actor snapshot embedded in notifications and messages.

use carehub_core::types::UserId;
use serde::{Deserialize, Serialize};

/// A copy of the user's identity at the moment an event happened.
///
/// Snapshots are embedded by value. Renaming a user later does not
/// rewrite historical notifications.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ActorSnapshot {
    /// The user's identifier.
    pub id: UserId,
    /// Display name at the time of the event.
    pub name: String,
    /// Contact email, if known.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub email: Option<String>,
    /// Avatar URL, if any.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub avatar: Option<String>,
}

impl ActorSnapshot {
    /// Snapshot with only an id and a display name.
    pub fn new(id: UserId, name: impl Into<String>) -> Self {
        Self {
            id,
            name: name.into(),
            email: None,
            avatar: None,
        }
    }

    /// Attach an email address.
    pub fn with_email(mut self, email: impl Into<String>) -> Self {
        self.email = Some(email.into());
        self
    }

    /// Attach an avatar URL.
    pub fn with_avatar(mut self, avatar: impl Into<String>) -> Self {
        self.avatar = Some(avatar.into());
        self
    }
}
