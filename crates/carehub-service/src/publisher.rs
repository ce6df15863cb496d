//! Seam between the services and the real-time layer.

use async_trait::async_trait;

use carehub_entity::conversation::Message;
use carehub_entity::notification::Notification;

/// Receives records right after they are written so they can be pushed
/// to connected clients. Delivery is best effort; implementations log
/// their own failures.
#[async_trait]
pub trait EventPublisher: Send + Sync + 'static {
    /// A new (non-duplicate) notification was stored.
    async fn notification_created(&self, notification: &Notification);

    /// A new message was stored.
    async fn message_sent(&self, message: &Message);
}
