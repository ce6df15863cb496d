//! Real-time wire events.

pub mod event;

pub use event::{
    CallKind, CallOffer, CallReply, ClientEvent, ReactionPayload, ServerEvent, SignalPayload,
    StatusChange, TypingPayload, TypingUpdate,
};
