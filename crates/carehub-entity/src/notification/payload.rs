//! Type-specific notification payloads.
//!
//! Each notification type carries its own strongly-typed `data` shape. On
//! the wire the payload is adjacently tagged:
//!
//! ```json
//! { "type": "post_liked", "data": { "postId": "...", "postTitle": "..." } }
//! ```

use carehub_core::types::{CommentId, CommunityId, FriendRequestId, PostId};
use serde::{Deserialize, Serialize};

use super::kind::NotificationKind;

/// References for a liked post.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PostLikedData {
    /// The liked post.
    pub post_id: PostId,
    /// Post title at the time of the like.
    pub post_title: String,
}

/// References for a new comment on a post.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PostCommentData {
    /// The commented post.
    pub post_id: PostId,
    /// The new comment.
    pub comment_id: CommentId,
    /// Post title, when the caller knows it.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub post_title: Option<String>,
}

/// References for a reply to a comment.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CommentReplyData {
    /// The post the thread lives on.
    pub post_id: PostId,
    /// The reply.
    pub comment_id: CommentId,
}

/// References for a community invitation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CommunityInviteData {
    /// The inviting community.
    pub community_id: CommunityId,
    /// Community name at the time of the invite.
    pub community_name: String,
}

/// References for an accepted or rejected join request.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct JoinRequestData {
    /// The community that answered.
    pub community_id: CommunityId,
    /// Community name at the time of the answer.
    pub community_name: String,
}

/// References for a new community member.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewMemberData {
    /// The community that gained a member.
    pub community_id: CommunityId,
    /// Community name at the time of the join.
    pub community_name: String,
}

/// References for a mention.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MentionData {
    /// The post containing the mention.
    pub post_id: PostId,
    /// The comment containing the mention, if it was not the post body.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub comment_id: Option<CommentId>,
}

/// References for a friend request.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FriendRequestData {
    /// The pending request.
    pub request_id: FriendRequestId,
}

/// Discriminated notification payload keyed by notification type.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", content = "data", rename_all = "snake_case")]
pub enum NotificationPayload {
    PostLiked(PostLikedData),
    CommentReply(CommentReplyData),
    PostComment(PostCommentData),
    CommunityInvite(CommunityInviteData),
    JoinRequestAccepted(JoinRequestData),
    JoinRequestRejected(JoinRequestData),
    NewMember(NewMemberData),
    Mention(MentionData),
    FriendRequest(FriendRequestData),
}

impl NotificationPayload {
    /// The notification type this payload belongs to.
    pub fn kind(&self) -> NotificationKind {
        match self {
            Self::PostLiked(_) => NotificationKind::PostLiked,
            Self::CommentReply(_) => NotificationKind::CommentReply,
            Self::PostComment(_) => NotificationKind::PostComment,
            Self::CommunityInvite(_) => NotificationKind::CommunityInvite,
            Self::JoinRequestAccepted(_) => NotificationKind::JoinRequestAccepted,
            Self::JoinRequestRejected(_) => NotificationKind::JoinRequestRejected,
            Self::NewMember(_) => NotificationKind::NewMember,
            Self::Mention(_) => NotificationKind::Mention,
            Self::FriendRequest(_) => NotificationKind::FriendRequest,
        }
    }

    /// The post referenced by this payload, if any.
    pub fn post_id(&self) -> Option<PostId> {
        match self {
            Self::PostLiked(d) => Some(d.post_id),
            Self::CommentReply(d) => Some(d.post_id),
            Self::PostComment(d) => Some(d.post_id),
            Self::Mention(d) => Some(d.post_id),
            _ => None,
        }
    }

    /// The comment referenced by this payload, if any.
    pub fn comment_id(&self) -> Option<CommentId> {
        match self {
            Self::CommentReply(d) => Some(d.comment_id),
            Self::PostComment(d) => Some(d.comment_id),
            Self::Mention(d) => d.comment_id,
            _ => None,
        }
    }

    /// The `data` object alone, as stored in the JSON column.
    pub fn data_json(&self) -> serde_json::Value {
        match serde_json::to_value(self) {
            Ok(serde_json::Value::Object(mut map)) => {
                map.remove("data").unwrap_or(serde_json::Value::Null)
            }
            _ => serde_json::Value::Null,
        }
    }

    /// Rebuild a payload from a stored type string and `data` object.
    pub fn from_parts(
        kind: NotificationKind,
        data: serde_json::Value,
    ) -> Result<Self, serde_json::Error> {
        serde_json::from_value(serde_json::json!({ "type": kind.as_str(), "data": data }))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_adjacent_tagging() {
        let post_id = PostId::new();
        let payload = NotificationPayload::PostLiked(PostLikedData {
            post_id,
            post_title: "Latest CF Treatment Breakthrough".into(),
        });
        let json = serde_json::to_value(&payload).expect("json");
        assert_eq!(json["type"], "post_liked");
        assert_eq!(json["data"]["postId"], post_id.to_string());
        assert_eq!(json["data"]["postTitle"], "Latest CF Treatment Breakthrough");
    }

    #[test]
    fn test_from_parts_restores_variant() {
        let payload = NotificationPayload::JoinRequestRejected(JoinRequestData {
            community_id: CommunityId::new(),
            community_name: "Parents of CF Warriors".into(),
        });
        let restored = NotificationPayload::from_parts(payload.kind(), payload.data_json())
            .expect("restore");
        assert_eq!(restored, payload);
    }

    #[test]
    fn test_mismatched_data_is_rejected() {
        let data = serde_json::json!({ "requestId": FriendRequestId::new() });
        assert!(NotificationPayload::from_parts(NotificationKind::PostLiked, data).is_err());
    }

    #[test]
    fn test_dedup_references() {
        let post_id = PostId::new();
        let comment_id = CommentId::new();
        let reply = NotificationPayload::CommentReply(CommentReplyData { post_id, comment_id });
        assert_eq!(reply.post_id(), Some(post_id));
        assert_eq!(reply.comment_id(), Some(comment_id));

        let invite = NotificationPayload::CommunityInvite(CommunityInviteData {
            community_id: CommunityId::new(),
            community_name: "Caregivers".into(),
        });
        assert_eq!(invite.post_id(), None);
        assert_eq!(invite.comment_id(), None);
    }
}
