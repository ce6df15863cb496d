//! Individual WebSocket connection handle.

use std::sync::atomic::{AtomicBool, AtomicI64, Ordering};

use chrono::{DateTime, Utc};
use tokio::sync::mpsc;
use tokio_util::sync::CancellationToken;

use carehub_core::types::ConnectionId;

/// A handle to a single WebSocket connection.
///
/// Holds the sender side of the connection's outbound queue. The socket
/// task owns the receiver and writes every queued frame to the wire.
#[derive(Debug)]
pub struct ConnectionHandle {
    /// Unique connection ID
    pub id: ConnectionId,
    /// Sender for serialized outbound frames
    sender: mpsc::Sender<String>,
    /// When the connection was established
    pub connected_at: DateTime<Utc>,
    /// Last pong received, as unix milliseconds
    last_pong_ms: AtomicI64,
    /// Whether the connection is still alive
    alive: AtomicBool,
    /// Cancelled when the connection is closed from the server side
    shutdown: CancellationToken,
}

impl ConnectionHandle {
    /// Create a new connection handle.
    pub fn new(
        sender: mpsc::Sender<String>,
        shutdown: CancellationToken,
        now: DateTime<Utc>,
    ) -> Self {
        Self {
            id: ConnectionId::new(),
            sender,
            connected_at: now,
            last_pong_ms: AtomicI64::new(now.timestamp_millis()),
            alive: AtomicBool::new(true),
            shutdown,
        }
    }

    /// Queue a frame for this connection.
    ///
    /// Never blocks. A full queue drops the frame; a closed queue marks the
    /// connection dead.
    pub fn send(&self, frame: String) -> bool {
        if !self.is_alive() {
            return false;
        }
        match self.sender.try_send(frame) {
            Ok(()) => true,
            Err(mpsc::error::TrySendError::Full(_)) => {
                tracing::warn!(conn_id = %self.id, "Send buffer full, dropping frame");
                false
            }
            Err(mpsc::error::TrySendError::Closed(_)) => {
                self.mark_dead();
                false
            }
        }
    }

    /// Check if connection is alive
    pub fn is_alive(&self) -> bool {
        self.alive.load(Ordering::SeqCst)
    }

    /// Mark connection as dead and wake the socket task.
    pub fn mark_dead(&self) {
        self.alive.store(false, Ordering::SeqCst);
        self.shutdown.cancel();
    }

    /// Record a pong response
    pub fn record_pong(&self, at: DateTime<Utc>) {
        self.last_pong_ms
            .store(at.timestamp_millis(), Ordering::SeqCst);
    }

    /// When the last pong arrived.
    pub fn last_pong(&self) -> DateTime<Utc> {
        DateTime::from_timestamp_millis(self.last_pong_ms.load(Ordering::SeqCst))
            .unwrap_or(self.connected_at)
    }

    /// Resolves once the connection has been closed server-side.
    pub async fn closed(&self) {
        self.shutdown.cancelled().await;
    }
}
