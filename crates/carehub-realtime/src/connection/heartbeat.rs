//! Ping/pong heartbeat for WebSocket keepalive.

use std::sync::Arc;
use std::time::Duration;

use chrono::{DateTime, Utc};
use tokio::time;

use carehub_core::config::RealtimeConfig;
use carehub_entity::realtime::ServerEvent;

use super::handle::ConnectionHandle;

/// Heartbeat configuration
#[derive(Debug, Clone, Copy)]
pub struct HeartbeatConfig {
    /// Interval between pings
    pub ping_interval: Duration,
    /// Extra grace after a missed ping
    pub ping_timeout: Duration,
}

impl From<&RealtimeConfig> for HeartbeatConfig {
    fn from(config: &RealtimeConfig) -> Self {
        Self {
            ping_interval: Duration::from_secs(config.ping_interval_seconds),
            ping_timeout: Duration::from_secs(config.ping_timeout_seconds),
        }
    }
}

impl HeartbeatConfig {
    /// A connection is stale once its last pong is older than one interval
    /// plus the timeout.
    pub fn is_stale(&self, last_pong: DateTime<Utc>, now: DateTime<Utc>) -> bool {
        let limit = self.ping_interval + self.ping_timeout;
        match (now - last_pong).to_std() {
            Ok(elapsed) => elapsed > limit,
            Err(_) => false,
        }
    }
}

/// Run heartbeat loop for a connection.
///
/// Sends periodic pings and closes the connection once it goes stale.
pub async fn run_heartbeat(handle: Arc<ConnectionHandle>, config: HeartbeatConfig) {
    let mut interval = time::interval(config.ping_interval);
    // The first tick completes immediately.
    interval.tick().await;

    loop {
        tokio::select! {
            _ = interval.tick() => {}
            _ = handle.closed() => break,
        }

        let now = Utc::now();
        if config.is_stale(handle.last_pong(), now) {
            tracing::warn!(
                conn_id = %handle.id,
                last_pong = %handle.last_pong(),
                "Heartbeat timeout, closing connection"
            );
            handle.mark_dead();
            break;
        }

        let ping = ServerEvent::Ping {
            timestamp: now.timestamp_millis(),
        };
        let frame = match serde_json::to_string(&ping) {
            Ok(frame) => frame,
            Err(e) => {
                tracing::error!(error = %e, "Failed to serialize ping");
                continue;
            }
        };

        if !handle.send(frame) && !handle.is_alive() {
            tracing::debug!(conn_id = %handle.id, "Ping send failed, connection gone");
            break;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn config() -> HeartbeatConfig {
        HeartbeatConfig {
            ping_interval: Duration::from_secs(25),
            ping_timeout: Duration::from_secs(20),
        }
    }

    #[test]
    fn test_fresh_pong_is_not_stale() {
        let now = Utc::now();
        assert!(!config().is_stale(now - chrono::Duration::seconds(44), now));
    }

    #[test]
    fn test_old_pong_is_stale() {
        let now = Utc::now();
        assert!(config().is_stale(now - chrono::Duration::seconds(46), now));
    }

    #[test]
    fn test_pong_from_the_future_is_not_stale() {
        let now = Utc::now();
        assert!(!config().is_stale(now + chrono::Duration::seconds(5), now));
    }

    #[tokio::test(start_paused = true)]
    async fn test_heartbeat_sends_ping_then_closes_stale_connection() {
        let (tx, mut rx) = tokio::sync::mpsc::channel(8);
        let handle = Arc::new(ConnectionHandle::new(
            tx,
            tokio_util::sync::CancellationToken::new(),
            Utc::now() - chrono::Duration::seconds(120),
        ));
        let task = tokio::spawn(run_heartbeat(
            handle.clone(),
            HeartbeatConfig {
                ping_interval: Duration::from_secs(1),
                ping_timeout: Duration::from_secs(1),
            },
        ));

        task.await.expect("heartbeat task");
        assert!(!handle.is_alive());
        assert!(rx.try_recv().is_err());
    }
}
