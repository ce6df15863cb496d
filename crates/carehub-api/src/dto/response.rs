//! Response DTOs.

use serde::{Deserialize, Serialize};

use carehub_entity::conversation::Message;
use carehub_entity::notification::Notification;
use carehub_realtime::metrics::MetricsSnapshot;
use carehub_service::NotificationListing;

/// Pagination block of the notification list.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PaginationMeta {
    pub current_page: u64,
    pub total_pages: u64,
    pub total_count: u64,
    pub limit: u64,
}

/// `GET /api/notifications`
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NotificationListResponse {
    pub notifications: Vec<Notification>,
    pub unread_count: u64,
    pub pagination: PaginationMeta,
}

impl From<NotificationListing> for NotificationListResponse {
    fn from(listing: NotificationListing) -> Self {
        let page = listing.page;
        Self {
            pagination: PaginationMeta {
                current_page: page.page,
                total_pages: page.total_pages,
                total_count: page.total_items,
                limit: page.page_size,
            },
            notifications: page.items,
            unread_count: listing.unread_count,
        }
    }
}

/// `GET /api/notifications/unread-count`
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UnreadCountResponse {
    pub unread_count: u64,
}

/// A single notification.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NotificationResponse {
    pub notification: Notification,
}

/// Result of a bulk update.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ModifiedCountResponse {
    pub modified_count: u64,
}

/// Result of a delete.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DeletedResponse {
    pub deleted: bool,
}

/// A stored message.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MessageResponse {
    pub message: Message,
}

/// Health check response.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct HealthResponse {
    /// Status.
    pub status: String,
    /// Version.
    pub version: String,
    /// Uptime.
    pub uptime_seconds: u64,
}

/// Detailed health response.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DetailedHealthResponse {
    /// Overall status.
    pub status: String,
    /// Store status.
    pub database: String,
    /// Live WebSocket connections.
    pub ws_connections: usize,
    /// Users online or away.
    pub online_users: usize,
    /// Live rooms.
    pub rooms: usize,
    /// Realtime counters.
    pub realtime: MetricsSnapshot,
}
