//! Application state shared across all handlers and middleware.

use std::sync::Arc;
use std::time::Instant;

use carehub_core::config::AppConfig;
use carehub_core::traits::Clock;
use carehub_database::store::{ConversationStore, NotificationStore};
use carehub_realtime::RealtimeEngine;
use carehub_service::{MessageService, NotificationService};

/// Application state containing all shared dependencies.
///
/// Passed to every Axum handler via `State<AppState>`.
/// All fields are `Arc`-wrapped for cheap cloning across tasks.
#[derive(Debug, Clone)]
pub struct AppState {
    // ── Configuration ────────────────────────────────────────
    /// Application configuration
    pub config: Arc<AppConfig>,
    /// When the process started serving
    pub started_at: Instant,

    // ── Realtime ─────────────────────────────────────────────
    /// WebSocket realtime engine
    pub realtime: Arc<RealtimeEngine>,

    // ── Services ─────────────────────────────────────────────
    /// Notification service
    pub notification_service: Arc<NotificationService>,
    /// Message write service
    pub message_service: Arc<MessageService>,
}

impl AppState {
    /// Wires the services to the given stores and a fresh realtime engine.
    ///
    /// Both services publish freshly written records through the engine.
    pub fn new(
        config: AppConfig,
        notification_store: Arc<dyn NotificationStore>,
        conversation_store: Arc<dyn ConversationStore>,
        clock: Arc<dyn Clock>,
    ) -> Self {
        let realtime = Arc::new(RealtimeEngine::new(config.realtime.clone()));
        let publisher = realtime.publisher();

        let notification_service = Arc::new(
            NotificationService::new(
                notification_store,
                Arc::clone(&clock),
                config.notifications.clone(),
            )
            .with_publisher(Arc::clone(&publisher)),
        );
        let message_service =
            Arc::new(MessageService::new(conversation_store, clock).with_publisher(publisher));

        Self {
            config: Arc::new(config),
            started_at: Instant::now(),
            realtime,
            notification_service,
            message_service,
        }
    }
}
