//! # carehub-realtime
//!
//! Real-time engine for CareHub. Provides:
//!
//! - Connection management with per-connection outbound queues
//! - Addressable rooms (`user:{id}`, `conversation:{id}`)
//! - Relay of typing, reaction, presence, call, and WebRTC events
//! - Push of new notifications and messages to the rooms that want them
//! - Ping/pong heartbeat and engine metrics

pub mod connection;
pub mod metrics;
pub mod presence;
pub mod push;
pub mod room;
pub mod server;

pub use connection::manager::ConnectionManager;
pub use metrics::RealtimeMetrics;
pub use presence::tracker::PresenceTracker;
pub use push::dispatcher::PushDispatcher;
pub use room::registry::RoomRegistry;
pub use room::types::RoomName;
pub use server::RealtimeEngine;
