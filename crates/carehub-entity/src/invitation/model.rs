//! Group invitation value object.

use std::fmt;

use carehub_core::types::{CommunityId, InvitationId};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::notification::ActorSnapshot;

/// Lifecycle of a group invitation. Resolved states are terminal.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum InvitationStatus {
    #[default]
    Pending,
    Accepted,
    Declined,
}

impl InvitationStatus {
    /// Whether a transition from `self` to `next` is allowed.
    pub fn can_transition_to(self, next: InvitationStatus) -> bool {
        matches!(
            (self, next),
            (Self::Pending, Self::Accepted) | (Self::Pending, Self::Declined)
        )
    }

    /// Return the status as a lowercase string.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Pending => "pending",
            Self::Accepted => "accepted",
            Self::Declined => "declined",
        }
    }
}

impl fmt::Display for InvitationStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// An invitation to join a group, held only for the client session.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GroupInvitation {
    pub id: InvitationId,
    pub group_id: CommunityId,
    pub group_name: String,
    pub inviter: ActorSnapshot,
    pub invitee: ActorSnapshot,
    pub created_at: DateTime<Utc>,
    #[serde(default)]
    pub status: InvitationStatus,
}

impl GroupInvitation {
    /// A fresh pending invitation.
    pub fn new(
        group_id: CommunityId,
        group_name: impl Into<String>,
        inviter: ActorSnapshot,
        invitee: ActorSnapshot,
        now: DateTime<Utc>,
    ) -> Self {
        Self {
            id: InvitationId::new(),
            group_id,
            group_name: group_name.into(),
            inviter,
            invitee,
            created_at: now,
            status: InvitationStatus::Pending,
        }
    }

    pub fn is_pending(&self) -> bool {
        self.status == InvitationStatus::Pending
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_only_pending_can_resolve() {
        use InvitationStatus::*;
        assert!(Pending.can_transition_to(Accepted));
        assert!(Pending.can_transition_to(Declined));
        assert!(!Pending.can_transition_to(Pending));
        assert!(!Accepted.can_transition_to(Declined));
        assert!(!Declined.can_transition_to(Accepted));
    }
}
