//! Settings for the notification client.

use serde::{Deserialize, Serialize};

/// Client-side cache and real-time connection settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ClientConfig {
    /// Base URL of the CareHub HTTP API, e.g. `http://localhost:8080/api`.
    #[serde(default = "default_base_url")]
    pub base_url: String,
    /// WebSocket endpoint, e.g. `ws://localhost:8080/api/ws`.
    #[serde(default = "default_ws_url")]
    pub ws_url: String,
    /// Interval between unread-count polls, in seconds.
    #[serde(default = "default_poll_interval")]
    pub poll_interval_seconds: u64,
    /// Page size for list fetches.
    #[serde(default = "default_page_size")]
    pub page_size: u64,
    /// Delay before reconnecting a dropped real-time connection.
    #[serde(default = "default_reconnect_delay")]
    pub reconnect_delay_ms: u64,
    /// HTTP request timeout in seconds.
    #[serde(default = "default_request_timeout")]
    pub request_timeout_seconds: u64,
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            base_url: default_base_url(),
            ws_url: default_ws_url(),
            poll_interval_seconds: default_poll_interval(),
            page_size: default_page_size(),
            reconnect_delay_ms: default_reconnect_delay(),
            request_timeout_seconds: default_request_timeout(),
        }
    }
}

fn default_base_url() -> String {
    "http://localhost:8080/api".to_string()
}

fn default_ws_url() -> String {
    "ws://localhost:8080/api/ws".to_string()
}

fn default_poll_interval() -> u64 {
    30
}

fn default_page_size() -> u64 {
    20
}

fn default_reconnect_delay() -> u64 {
    1000
}

fn default_request_timeout() -> u64 {
    10
}
