//! Top-level real-time engine that ties together all subsystems.

use std::sync::Arc;

use tokio_util::sync::CancellationToken;
use tracing::info;

use carehub_core::config::RealtimeConfig;
use carehub_service::EventPublisher;

use crate::connection::heartbeat::HeartbeatConfig;
use crate::connection::manager::ConnectionManager;
use crate::metrics::RealtimeMetrics;
use crate::presence::tracker::PresenceTracker;
use crate::push::dispatcher::PushDispatcher;
use crate::room::registry::RoomRegistry;

/// Central real-time engine that coordinates all WebSocket subsystems.
#[derive(Clone)]
pub struct RealtimeEngine {
    /// Connection manager.
    pub connections: Arc<ConnectionManager>,
    /// Room registry.
    pub rooms: Arc<RoomRegistry>,
    /// Presence tracker.
    pub presence: Arc<PresenceTracker>,
    /// Push of new notifications and messages.
    pub push: Arc<PushDispatcher>,
    /// Metrics collector.
    pub metrics: Arc<RealtimeMetrics>,
    heartbeat: HeartbeatConfig,
    shutdown: CancellationToken,
}

impl std::fmt::Debug for RealtimeEngine {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RealtimeEngine")
            .field("connections", &self.connections.connection_count())
            .field("rooms", &self.rooms.room_count())
            .finish()
    }
}

impl RealtimeEngine {
    /// Creates a new real-time engine with all subsystems.
    pub fn new(config: RealtimeConfig) -> Self {
        let shutdown = CancellationToken::new();
        let heartbeat = HeartbeatConfig::from(&config);

        let metrics = Arc::new(RealtimeMetrics::new());
        let rooms = Arc::new(RoomRegistry::new());
        let presence = Arc::new(PresenceTracker::new());
        let connections = Arc::new(ConnectionManager::new(
            config,
            rooms.clone(),
            presence.clone(),
            metrics.clone(),
            shutdown.clone(),
        ));
        let push = Arc::new(PushDispatcher::new(connections.clone(), metrics.clone()));

        info!("Real-time engine initialized");

        Self {
            connections,
            rooms,
            presence,
            push,
            metrics,
            heartbeat,
            shutdown,
        }
    }

    /// The publisher handed to the services.
    pub fn publisher(&self) -> Arc<dyn EventPublisher> {
        self.push.clone()
    }

    /// Heartbeat settings for each connection.
    pub fn heartbeat(&self) -> HeartbeatConfig {
        self.heartbeat
    }

    /// Resolves once shutdown has started.
    pub async fn shutting_down(&self) {
        self.shutdown.cancelled().await;
    }

    /// Initiates a graceful shutdown of the real-time engine.
    pub fn shutdown(&self) {
        info!("Shutting down real-time engine");
        self.shutdown.cancel();
        self.connections.close_all();
        info!("Real-time engine shut down");
    }
}

#[cfg(test)]
mod tests {
    use carehub_core::types::{NotificationId, PostId, UserId};
    use carehub_entity::notification::{
        ActorSnapshot, NewNotification, NotificationPayload, PostLikedData,
    };
    use chrono::Utc;

    use super::*;

    #[tokio::test]
    async fn test_publisher_pushes_to_recipient_room() {
        let engine = RealtimeEngine::new(RealtimeConfig::default());
        let recipient = UserId::new();
        let (conn, mut rx) = engine.connections.register();
        engine.connections.handle_inbound(
            conn.id,
            &serde_json::json!({"event": "join_user_room", "data": recipient}).to_string(),
        );

        let notification = NewNotification {
            recipient: ActorSnapshot::new(recipient, "Rae"),
            sender: ActorSnapshot::new(UserId::new(), "Sam"),
            payload: NotificationPayload::PostLiked(PostLikedData {
                post_id: PostId::new(),
                post_title: "Morning walk".to_string(),
            }),
            message: "Sam liked your post".to_string(),
        }
        .into_notification(NotificationId::new(), Utc::now());

        engine.publisher().notification_created(&notification).await;

        let frame: serde_json::Value =
            serde_json::from_str(&rx.try_recv().expect("pushed frame")).expect("json");
        assert_eq!(frame["event"], "new_notification");
        assert_eq!(frame["data"]["id"], serde_json::json!(notification.id));
        assert_eq!(engine.metrics.snapshot().notifications_pushed, 1);
    }

    #[tokio::test]
    async fn test_shutdown_closes_connections() {
        let engine = RealtimeEngine::new(RealtimeConfig::default());
        let (conn, _rx) = engine.connections.register();
        engine.shutdown();
        conn.closed().await;
        assert!(!conn.is_alive());
        assert_eq!(engine.connections.connection_count(), 0);
    }
}
