//! Client and server event definitions for the real-time connection.
//!
//! Every frame is a JSON object `{"event": "<name>", "data": <payload>}`.

use carehub_core::types::{ConversationId, MessageId, UserId};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::conversation::Message;
use crate::notification::{ActorSnapshot, Notification};
use crate::presence::PresenceStatus;

/// Typing indicator sent by a client.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TypingPayload {
    pub conversation_id: ConversationId,
    pub user_id: UserId,
    pub user_name: String,
}

/// Typing indicator relayed to the rest of a conversation room.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TypingUpdate {
    pub conversation_id: ConversationId,
    pub user_id: UserId,
    pub user_name: String,
    pub is_typing: bool,
}

/// A reaction added to a message.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ReactionPayload {
    pub message_id: MessageId,
    pub conversation_id: ConversationId,
    pub reaction: String,
    pub user_id: UserId,
    pub user_name: String,
}

/// Presence change broadcast to every connection.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StatusChange {
    pub user_id: UserId,
    pub status: PresenceStatus,
    pub timestamp: DateTime<Utc>,
}

/// Audio or video call.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum CallKind {
    #[default]
    Audio,
    Video,
}

/// A call invitation addressed to one user.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CallOffer {
    pub target_user_id: UserId,
    pub caller: ActorSnapshot,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub conversation_id: Option<ConversationId>,
    #[serde(default)]
    pub call_type: CallKind,
}

/// Answer, rejection, or hang-up addressed to the other party.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CallReply {
    pub target_user_id: UserId,
    pub user_id: UserId,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub conversation_id: Option<ConversationId>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub reason: Option<String>,
}

/// Opaque WebRTC signaling blob (SDP offer/answer or ICE candidate).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SignalPayload {
    pub target_user_id: UserId,
    pub from_user_id: UserId,
    pub signal: serde_json::Value,
}

/// Events sent by a client.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "event", content = "data", rename_all = "snake_case")]
pub enum ClientEvent {
    JoinUserRoom(UserId),
    JoinConversation(ConversationId),
    LeaveConversation(ConversationId),
    TypingStart(TypingPayload),
    TypingStop(TypingPayload),
    UserOnline(UserId),
    UserAway(UserId),
    MessageReaction(ReactionPayload),
    InitiateCall(CallOffer),
    AnswerCall(CallReply),
    RejectCall(CallReply),
    EndCall(CallReply),
    WebrtcOffer(SignalPayload),
    WebrtcAnswer(SignalPayload),
    WebrtcIceCandidate(SignalPayload),
    Pong { timestamp: i64 },
}

impl ClientEvent {
    /// The wire name of the event.
    pub fn name(&self) -> &'static str {
        match self {
            Self::JoinUserRoom(_) => "join_user_room",
            Self::JoinConversation(_) => "join_conversation",
            Self::LeaveConversation(_) => "leave_conversation",
            Self::TypingStart(_) => "typing_start",
            Self::TypingStop(_) => "typing_stop",
            Self::UserOnline(_) => "user_online",
            Self::UserAway(_) => "user_away",
            Self::MessageReaction(_) => "message_reaction",
            Self::InitiateCall(_) => "initiate_call",
            Self::AnswerCall(_) => "answer_call",
            Self::RejectCall(_) => "reject_call",
            Self::EndCall(_) => "end_call",
            Self::WebrtcOffer(_) => "webrtc_offer",
            Self::WebrtcAnswer(_) => "webrtc_answer",
            Self::WebrtcIceCandidate(_) => "webrtc_ice_candidate",
            Self::Pong { .. } => "pong",
        }
    }
}

/// Events sent by the server.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "event", content = "data", rename_all = "snake_case")]
pub enum ServerEvent {
    UserTyping(TypingUpdate),
    UserStatusChange(StatusChange),
    MessageReactionUpdate(ReactionPayload),
    NewMessage(Box<Message>),
    NewNotification(Box<Notification>),
    IncomingCall(CallOffer),
    CallAnswered(CallReply),
    CallRejected(CallReply),
    CallEnded(CallReply),
    WebrtcOffer(SignalPayload),
    WebrtcAnswer(SignalPayload),
    WebrtcIceCandidate(SignalPayload),
    Ping { timestamp: i64 },
    Error { code: String, message: String },
}

impl ServerEvent {
    /// Build an `error` event.
    pub fn error(code: impl Into<String>, message: impl Into<String>) -> Self {
        Self::Error {
            code: code.into(),
            message: message.into(),
        }
    }

    /// The wire name of the event.
    pub fn name(&self) -> &'static str {
        match self {
            Self::UserTyping(_) => "user_typing",
            Self::UserStatusChange(_) => "user_status_change",
            Self::MessageReactionUpdate(_) => "message_reaction_update",
            Self::NewMessage(_) => "new_message",
            Self::NewNotification(_) => "new_notification",
            Self::IncomingCall(_) => "incoming_call",
            Self::CallAnswered(_) => "call_answered",
            Self::CallRejected(_) => "call_rejected",
            Self::CallEnded(_) => "call_ended",
            Self::WebrtcOffer(_) => "webrtc_offer",
            Self::WebrtcAnswer(_) => "webrtc_answer",
            Self::WebrtcIceCandidate(_) => "webrtc_ice_candidate",
            Self::Ping { .. } => "ping",
            Self::Error { .. } => "error",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_join_user_room_frame() {
        let user = UserId::new();
        let frame = format!(r#"{{"event":"join_user_room","data":"{user}"}}"#);
        let event: ClientEvent = serde_json::from_str(&frame).expect("parse");
        assert_eq!(event, ClientEvent::JoinUserRoom(user));
        assert_eq!(event.name(), "join_user_room");
    }

    #[test]
    fn test_typing_frame_uses_camel_case() {
        let conv = ConversationId::new();
        let user = UserId::new();
        let frame = serde_json::json!({
            "event": "typing_start",
            "data": { "conversationId": conv, "userId": user, "userName": "Dee" }
        });
        let event: ClientEvent = serde_json::from_value(frame).expect("parse");
        match event {
            ClientEvent::TypingStart(p) => {
                assert_eq!(p.conversation_id, conv);
                assert_eq!(p.user_name, "Dee");
            }
            other => panic!("unexpected event {other:?}"),
        }
    }

    #[test]
    fn test_server_event_names_match_wire() {
        let events = [
            ServerEvent::Ping { timestamp: 1 },
            ServerEvent::error("bad_frame", "nope"),
            ServerEvent::UserStatusChange(StatusChange {
                user_id: UserId::new(),
                status: PresenceStatus::Away,
                timestamp: Utc::now(),
            }),
        ];
        for event in events {
            let json = serde_json::to_value(&event).expect("json");
            assert_eq!(json["event"], event.name());
        }
    }

    #[test]
    fn test_unknown_event_is_rejected() {
        let frame = r#"{"event":"self_destruct","data":null}"#;
        assert!(serde_json::from_str::<ClientEvent>(frame).is_err());
    }
}
