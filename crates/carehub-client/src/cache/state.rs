//! Observable cache state.

use carehub_core::types::NotificationId;
use carehub_entity::notification::Notification;

/// Everything a notification dropdown renders.
#[derive(Debug, Clone, Default)]
pub struct CacheState {
    /// Loaded notifications, newest first.
    pub notifications: Vec<Notification>,
    /// Unread badge count as last reported by the server (adjusted locally).
    pub unread_count: u64,
    /// A first-page fetch is in flight.
    pub is_loading: bool,
    /// A next-page fetch is in flight.
    pub is_loading_more: bool,
    /// The server reported pages after `current_page`.
    pub has_more: bool,
    /// Last page loaded; 0 before the first fetch.
    pub current_page: u64,
    /// Message of the last failed list fetch.
    pub error: Option<String>,
}

impl CacheState {
    /// Whether a list fetch of either kind is in flight.
    pub fn is_busy(&self) -> bool {
        self.is_loading || self.is_loading_more
    }

    pub fn find(&self, id: NotificationId) -> Option<&Notification> {
        self.notifications.iter().find(|n| n.id == id)
    }

    pub(crate) fn find_mut(&mut self, id: NotificationId) -> Option<&mut Notification> {
        self.notifications.iter_mut().find(|n| n.id == id)
    }

    /// Append records not already present, keeping order.
    pub(crate) fn append(&mut self, page: Vec<Notification>) {
        for notification in page {
            if self.find(notification.id).is_none() {
                self.notifications.push(notification);
            }
        }
    }
}
