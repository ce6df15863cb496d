//! Real-time engine metrics.

use std::sync::atomic::{AtomicU64, Ordering};

use serde::Serialize;

/// Atomic counters for the real-time engine.
#[derive(Debug, Default)]
pub struct RealtimeMetrics {
    connections_opened: AtomicU64,
    connections_closed: AtomicU64,
    events_received: AtomicU64,
    events_sent: AtomicU64,
    invalid_frames: AtomicU64,
    notifications_pushed: AtomicU64,
    messages_pushed: AtomicU64,
}

/// Point-in-time copy of the counters.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct MetricsSnapshot {
    pub connections_opened: u64,
    pub connections_closed: u64,
    pub active_connections: u64,
    pub events_received: u64,
    pub events_sent: u64,
    pub invalid_frames: u64,
    pub notifications_pushed: u64,
    pub messages_pushed: u64,
}

impl RealtimeMetrics {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn connection_opened(&self) {
        self.connections_opened.fetch_add(1, Ordering::Relaxed);
    }

    pub fn connection_closed(&self) {
        self.connections_closed.fetch_add(1, Ordering::Relaxed);
    }

    pub fn event_received(&self) {
        self.events_received.fetch_add(1, Ordering::Relaxed);
    }

    pub fn events_sent(&self, count: u64) {
        self.events_sent.fetch_add(count, Ordering::Relaxed);
    }

    pub fn invalid_frame(&self) {
        self.invalid_frames.fetch_add(1, Ordering::Relaxed);
    }

    pub fn notification_pushed(&self) {
        self.notifications_pushed.fetch_add(1, Ordering::Relaxed);
    }

    pub fn message_pushed(&self) {
        self.messages_pushed.fetch_add(1, Ordering::Relaxed);
    }

    /// Active connections = opened - closed.
    pub fn active_connections(&self) -> u64 {
        let opened = self.connections_opened.load(Ordering::Relaxed);
        let closed = self.connections_closed.load(Ordering::Relaxed);
        opened.saturating_sub(closed)
    }

    pub fn snapshot(&self) -> MetricsSnapshot {
        MetricsSnapshot {
            connections_opened: self.connections_opened.load(Ordering::Relaxed),
            connections_closed: self.connections_closed.load(Ordering::Relaxed),
            active_connections: self.active_connections(),
            events_received: self.events_received.load(Ordering::Relaxed),
            events_sent: self.events_sent.load(Ordering::Relaxed),
            invalid_frames: self.invalid_frames.load(Ordering::Relaxed),
            notifications_pushed: self.notifications_pushed.load(Ordering::Relaxed),
            messages_pushed: self.messages_pushed.load(Ordering::Relaxed),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_active_connections() {
        let metrics = RealtimeMetrics::new();
        metrics.connection_opened();
        metrics.connection_opened();
        metrics.connection_closed();
        metrics.events_sent(3);

        let snapshot = metrics.snapshot();
        assert_eq!(snapshot.active_connections, 1);
        assert_eq!(snapshot.events_sent, 3);
    }
}
