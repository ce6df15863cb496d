//! Notification policy configuration.

use serde::{Deserialize, Serialize};

/// Dedup, retention, and paging policy for notifications.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NotificationConfig {
    /// Window in seconds during which an identical event is folded into the
    /// existing record.
    #[serde(default = "default_dedup_window")]
    pub dedup_window_seconds: i64,
    /// Records older than this many days are unreachable and purged.
    #[serde(default = "default_retention_days")]
    pub retention_days: i64,
    /// Page size used when the caller does not pass one.
    #[serde(default = "default_page_size")]
    pub default_page_size: u64,
    /// Upper bound on a requested page size.
    #[serde(default = "default_max_page_size")]
    pub max_page_size: u64,
    /// Cron expression for the retention purge job.
    #[serde(default = "default_cleanup_cron")]
    pub cleanup_cron: String,
}

impl Default for NotificationConfig {
    fn default() -> Self {
        Self {
            dedup_window_seconds: default_dedup_window(),
            retention_days: default_retention_days(),
            default_page_size: default_page_size(),
            max_page_size: default_max_page_size(),
            cleanup_cron: default_cleanup_cron(),
        }
    }
}

fn default_dedup_window() -> i64 {
    300
}

fn default_retention_days() -> i64 {
    30
}

fn default_page_size() -> u64 {
    20
}

fn default_max_page_size() -> u64 {
    100
}

fn default_cleanup_cron() -> String {
    // sec min hour day month weekday
    "0 15 3 * * *".to_string()
}
