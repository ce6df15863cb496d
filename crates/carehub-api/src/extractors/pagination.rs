//! Query parameters for the notification list.

use serde::{Deserialize, Serialize};

/// `?page=&limit=&unreadOnly=`
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NotificationQuery {
    /// Page number (1-based, default: 1).
    #[serde(default = "default_page")]
    pub page: u64,
    /// Items per page. Zero or absent selects the configured default.
    #[serde(default)]
    pub limit: u64,
    /// Only return unread records.
    #[serde(default)]
    pub unread_only: bool,
}

fn default_page() -> u64 {
    1
}

impl Default for NotificationQuery {
    fn default() -> Self {
        Self {
            page: default_page(),
            limit: 0,
            unread_only: false,
        }
    }
}
