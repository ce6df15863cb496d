//! Reconnecting real-time client.

pub mod client;
pub mod membership;

pub use client::RealtimeClient;
pub use membership::RoomMembership;
