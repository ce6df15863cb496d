//! Notification type enumeration.

use std::fmt;
use std::str::FromStr;

use carehub_core::AppError;
use serde::{Deserialize, Serialize};

/// The closed set of notification types.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum NotificationKind {
    /// Someone liked the recipient's post.
    PostLiked,
    /// Someone replied to the recipient's comment.
    CommentReply,
    /// Someone commented on the recipient's post.
    PostComment,
    /// The recipient was invited to a community.
    CommunityInvite,
    /// The recipient's join request was accepted.
    JoinRequestAccepted,
    /// The recipient's join request was rejected.
    JoinRequestRejected,
    /// A new member joined a community the recipient administers.
    NewMember,
    /// The recipient was mentioned in a post or comment.
    Mention,
    /// Someone sent the recipient a friend request.
    FriendRequest,
}

impl NotificationKind {
    /// Every kind, in declaration order.
    pub const ALL: [NotificationKind; 9] = [
        Self::PostLiked,
        Self::CommentReply,
        Self::PostComment,
        Self::CommunityInvite,
        Self::JoinRequestAccepted,
        Self::JoinRequestRejected,
        Self::NewMember,
        Self::Mention,
        Self::FriendRequest,
    ];

    /// Return the kind as its wire string.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::PostLiked => "post_liked",
            Self::CommentReply => "comment_reply",
            Self::PostComment => "post_comment",
            Self::CommunityInvite => "community_invite",
            Self::JoinRequestAccepted => "join_request_accepted",
            Self::JoinRequestRejected => "join_request_rejected",
            Self::NewMember => "new_member",
            Self::Mention => "mention",
            Self::FriendRequest => "friend_request",
        }
    }
}

impl fmt::Display for NotificationKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl FromStr for NotificationKind {
    type Err = AppError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|kind| kind.as_str() == s)
            .ok_or_else(|| AppError::validation(format!("Invalid notification type: '{s}'")))
    }
}
