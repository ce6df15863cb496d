//! Real-time WebSocket engine configuration.

use serde::{Deserialize, Serialize};

/// Real-time (WebSocket) engine configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RealtimeConfig {
    /// Outbound message buffer per connection.
    #[serde(default = "default_channel_buffer")]
    pub channel_buffer_size: usize,
    /// Server ping interval in seconds.
    #[serde(default = "default_ping_interval")]
    pub ping_interval_seconds: u64,
    /// Extra grace, in seconds, after a missed ping before the connection is dropped.
    #[serde(default = "default_ping_timeout")]
    pub ping_timeout_seconds: u64,
    /// Maximum rooms a single connection may join.
    #[serde(default = "default_max_rooms")]
    pub max_rooms_per_connection: usize,
}

impl Default for RealtimeConfig {
    fn default() -> Self {
        Self {
            channel_buffer_size: default_channel_buffer(),
            ping_interval_seconds: default_ping_interval(),
            ping_timeout_seconds: default_ping_timeout(),
            max_rooms_per_connection: default_max_rooms(),
        }
    }
}

fn default_channel_buffer() -> usize {
    256
}

fn default_ping_interval() -> u64 {
    25
}

fn default_ping_timeout() -> u64 {
    20
}

fn default_max_rooms() -> usize {
    64
}
