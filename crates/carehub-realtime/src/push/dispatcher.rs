//! Pushes new notifications and messages to the rooms that want them.

use std::sync::Arc;

use async_trait::async_trait;
use tracing::debug;

use carehub_entity::conversation::Message;
use carehub_entity::notification::Notification;
use carehub_entity::realtime::ServerEvent;
use carehub_service::EventPublisher;

use crate::connection::manager::ConnectionManager;
use crate::metrics::RealtimeMetrics;
use crate::room::RoomName;

/// Bridges the service layer's [`EventPublisher`] to live connections.
#[derive(Debug, Clone)]
pub struct PushDispatcher {
    connections: Arc<ConnectionManager>,
    metrics: Arc<RealtimeMetrics>,
}

impl PushDispatcher {
    pub fn new(connections: Arc<ConnectionManager>, metrics: Arc<RealtimeMetrics>) -> Self {
        Self {
            connections,
            metrics,
        }
    }
}

#[async_trait]
impl EventPublisher for PushDispatcher {
    async fn notification_created(&self, notification: &Notification) {
        let room = RoomName::User(notification.recipient.id);
        let event = ServerEvent::NewNotification(Box::new(notification.clone()));
        let delivered = self.connections.emit_to_room(room, &event, None);
        self.metrics.notification_pushed();
        debug!(
            notification_id = %notification.id,
            recipient = %notification.recipient.id,
            delivered,
            "Pushed notification"
        );
    }

    async fn message_sent(&self, message: &Message) {
        let room = RoomName::Conversation(message.conversation_id);
        let event = ServerEvent::NewMessage(Box::new(message.clone()));
        let delivered = self.connections.emit_to_room(room, &event, None);
        self.metrics.message_pushed();
        debug!(
            message_id = %message.id,
            conversation_id = %message.conversation_id,
            delivered,
            "Pushed message"
        );
    }
}
