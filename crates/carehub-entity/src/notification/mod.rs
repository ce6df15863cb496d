//! Notification domain entities.

pub mod actor;
pub mod kind;
pub mod model;
pub mod payload;

pub use actor::ActorSnapshot;
pub use kind::NotificationKind;
pub use model::{NewNotification, Notification, MAX_MESSAGE_CHARS};
pub use payload::{
    CommentReplyData, CommunityInviteData, FriendRequestData, JoinRequestData, MentionData,
    NewMemberData, NotificationPayload, PostCommentData, PostLikedData,
};
