//! Conversation and message entities.

pub mod message;
pub mod model;

pub use message::{Attachment, Message, MessageDraft, MessageKind, Reaction, ReadReceipt, MAX_CONTENT_CHARS};
pub use model::{
    Conversation, ConversationKind, ConversationSettings, LastMessage, Participant,
    ParticipantRole,
};
