//! Notification cache with optimistic mutations.

use std::sync::Arc;
use std::time::Duration;

use tokio::sync::watch;
use tokio::time::MissedTickBehavior;
use tokio_util::sync::CancellationToken;
use tracing::{debug, warn};

use carehub_core::config::ClientConfig;
use carehub_core::result::AppResult;
use carehub_core::types::NotificationId;
use carehub_entity::notification::Notification;

use super::polling::PollingGuard;
use super::state::CacheState;
use crate::api::NotificationApi;

/// Paginated notification list plus unread badge for one signed-in user.
///
/// State lives in a `watch` channel so views can [`subscribe`](Self::subscribe)
/// and re-render on change. Clones share the same state.
#[derive(Clone)]
pub struct NotificationCache {
    api: Arc<dyn NotificationApi>,
    state: Arc<watch::Sender<CacheState>>,
    page_size: u64,
    poll_interval: Duration,
}

impl std::fmt::Debug for NotificationCache {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("NotificationCache")
            .field("page_size", &self.page_size)
            .field("poll_interval", &self.poll_interval)
            .finish()
    }
}

impl NotificationCache {
    pub fn new(api: Arc<dyn NotificationApi>, config: &ClientConfig) -> Self {
        let (state, _) = watch::channel(CacheState::default());
        Self {
            api,
            state: Arc::new(state),
            page_size: config.page_size.max(1),
            poll_interval: Duration::from_secs(config.poll_interval_seconds.max(1)),
        }
    }

    /// Receiver that observes every state change.
    pub fn subscribe(&self) -> watch::Receiver<CacheState> {
        self.state.subscribe()
    }

    /// Copy of the current state.
    pub fn snapshot(&self) -> CacheState {
        self.state.borrow().clone()
    }

    pub fn unread_count(&self) -> u64 {
        self.state.borrow().unread_count
    }

    /// Load page 1 and replace the list (`reset`), or append the next page.
    pub async fn fetch_notifications(&self, reset: bool) -> AppResult<()> {
        self.state.send_modify(|s| {
            if reset {
                s.is_loading = true;
            } else {
                s.is_loading_more = true;
            }
        });
        self.load_page(reset).await
    }

    /// Append the next page. Returns `false` without fetching when there are
    /// no more pages or another list fetch is already in flight.
    pub async fn load_more(&self) -> AppResult<bool> {
        let claimed = self.state.send_if_modified(|s| {
            if !s.has_more || s.is_busy() {
                return false;
            }
            s.is_loading_more = true;
            true
        });
        if !claimed {
            return Ok(false);
        }
        self.load_page(false).await.map(|()| true)
    }

    async fn load_page(&self, reset: bool) -> AppResult<()> {
        let page = if reset {
            1
        } else {
            self.state.borrow().current_page + 1
        };

        let result = self.api.fetch_page(page, self.page_size).await;

        self.state.send_modify(|s| {
            if reset {
                s.is_loading = false;
            } else {
                s.is_loading_more = false;
            }
            match &result {
                Ok(response) => {
                    if reset {
                        s.notifications = response.notifications.clone();
                    } else {
                        s.append(response.notifications.clone());
                    }
                    s.unread_count = response.unread_count;
                    s.has_more = response.has_more();
                    s.current_page = response.pagination.current_page;
                    s.error = None;
                }
                Err(e) => {
                    s.error = Some(e.message.clone());
                }
            }
        });

        match result {
            Ok(response) => {
                debug!(
                    page,
                    loaded = response.notifications.len(),
                    unread = response.unread_count,
                    "Notification page loaded"
                );
                Ok(())
            }
            Err(e) => {
                warn!(page, error = %e, "Failed to load notifications");
                Err(e)
            }
        }
    }

    /// Mark one notification read locally, then on the server.
    ///
    /// The local change is kept even if the server call fails.
    pub async fn mark_as_read(&self, id: NotificationId) -> AppResult<()> {
        self.state.send_if_modified(|s| match s.find_mut(id) {
            Some(n) if n.is_unread() => {
                n.is_read = true;
                s.unread_count = s.unread_count.saturating_sub(1);
                true
            }
            _ => false,
        });

        self.api.mark_read(id).await.inspect_err(|e| {
            warn!(notification_id = %id, error = %e, "Failed to mark notification read");
        })
    }

    /// Mark everything read locally and zero the badge, then on the server.
    pub async fn mark_all_as_read(&self) -> AppResult<u64> {
        self.state.send_modify(|s| {
            for n in &mut s.notifications {
                n.is_read = true;
            }
            s.unread_count = 0;
        });

        self.api.mark_all_read().await.inspect_err(|e| {
            warn!(error = %e, "Failed to mark all notifications read");
        })
    }

    /// Remove a notification locally, then on the server.
    pub async fn delete_notification(&self, id: NotificationId) -> AppResult<()> {
        self.state.send_if_modified(|s| {
            let Some(index) = s.notifications.iter().position(|n| n.id == id) else {
                return false;
            };
            let removed = s.notifications.remove(index);
            if removed.is_unread() {
                s.unread_count = s.unread_count.saturating_sub(1);
            }
            true
        });

        self.api.delete(id).await.inspect_err(|e| {
            warn!(notification_id = %id, error = %e, "Failed to delete notification");
        })
    }

    /// Re-read just the badge count. On failure the previous count stays.
    pub async fn refresh_unread_count(&self) -> AppResult<u64> {
        let count = self.api.unread_count().await?;
        self.state.send_if_modified(|s| {
            let changed = s.unread_count != count;
            s.unread_count = count;
            changed
        });
        Ok(count)
    }

    /// Apply a `new_notification` push. Records already in the list are ignored.
    pub fn apply_push(&self, notification: Notification) -> bool {
        self.state.send_if_modified(|s| {
            if s.find(notification.id).is_some() {
                return false;
            }
            if notification.is_unread() {
                s.unread_count += 1;
            }
            s.notifications.insert(0, notification);
            true
        })
    }

    /// Start refreshing the badge every `poll_interval_seconds`.
    ///
    /// Polling runs until the returned guard is dropped or stopped.
    pub fn start_polling(&self) -> PollingGuard {
        let token = CancellationToken::new();
        let cache = self.clone();
        let child = token.clone();

        let task = tokio::spawn(async move {
            let mut ticker = tokio::time::interval(cache.poll_interval);
            ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);
            ticker.tick().await;

            loop {
                tokio::select! {
                    _ = child.cancelled() => break,
                    _ = ticker.tick() => {
                        if let Err(e) = cache.refresh_unread_count().await {
                            debug!(error = %e, "Unread count poll failed");
                        }
                    }
                }
            }
            debug!("Unread count polling stopped");
        });

        PollingGuard::new(token, task)
    }
}
