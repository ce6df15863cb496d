//! Application builder: wires stores, services, the realtime engine, and
//! the scheduler into a running server.

use std::sync::Arc;
use std::time::Duration;

use axum::Router;

use carehub_core::config::AppConfig;
use carehub_core::error::{AppError, ErrorKind};
use carehub_core::traits::SystemClock;
use carehub_database::migration::run_migrations;
use carehub_database::store::{ConversationStore, NotificationStore};
use carehub_database::{
    DatabasePool, MemoryConversationStore, MemoryNotificationStore, PgConversationStore,
    PgNotificationStore,
};
use carehub_worker::CronScheduler;

use crate::router::build_router;
use crate::state::AppState;

/// Builds the complete Axum application with all routes and middleware.
pub fn build_app(state: AppState) -> Router {
    build_router(state)
}

/// Stores backing the services, plus the pool when they live in Postgres.
struct Stores {
    notifications: Arc<dyn NotificationStore>,
    conversations: Arc<dyn ConversationStore>,
    pool: Option<DatabasePool>,
}

/// Runs the CareHub server until ctrl-c or SIGTERM.
pub async fn run_server(config: AppConfig) -> Result<(), AppError> {
    tracing::info!("Starting CareHub server...");

    // ── Step 1: Open stores ──────────────────────────────────────
    let stores = open_stores(&config).await?;

    // ── Step 2: Wire services and realtime engine ────────────────
    let state = AppState::new(
        config.clone(),
        stores.notifications,
        stores.conversations,
        Arc::new(SystemClock),
    );

    // ── Step 3: Start scheduled tasks ────────────────────────────
    let mut scheduler = if config.worker.enabled {
        let scheduler = CronScheduler::new(
            (*state.notification_service).clone(),
            &config.notifications,
        )
        .await?;
        scheduler.register_default_tasks().await?;
        scheduler.start().await?;
        Some(scheduler)
    } else {
        tracing::info!("Worker disabled, scheduled tasks will not run");
        None
    };

    // ── Step 4: Build and start HTTP server ──────────────────────
    let realtime = Arc::clone(&state.realtime);
    let app = build_app(state);
    let addr = config.server.bind_address();
    let listener = tokio::net::TcpListener::bind(&addr)
        .await
        .map_err(|e| {
            AppError::with_source(ErrorKind::Configuration, format!("Failed to bind {addr}"), e)
        })?;

    tracing::info!(address = %addr, "CareHub server listening");

    let grace = Duration::from_secs(config.server.shutdown_grace_seconds);
    let shutdown_realtime = Arc::clone(&realtime);
    let server = axum::serve(listener, app).with_graceful_shutdown(async move {
        shutdown_signal().await;
        // WebSocket tasks only end once their connections are closed.
        shutdown_realtime.shutdown();
    });

    let result = server
        .await
        .map_err(|e| AppError::internal(format!("Server error: {e}")));

    // ── Step 5: Tear down ────────────────────────────────────────
    realtime.shutdown();
    if let Some(scheduler) = scheduler.as_mut() {
        match tokio::time::timeout(grace, scheduler.shutdown()).await {
            Ok(Ok(())) => {}
            Ok(Err(e)) => tracing::warn!(error = %e, "Scheduler shutdown failed"),
            Err(_) => tracing::warn!("Scheduler did not stop within the grace period"),
        }
    }
    if let Some(pool) = stores.pool {
        pool.close().await;
    }

    tracing::info!("CareHub server stopped");
    result
}

async fn open_stores(config: &AppConfig) -> Result<Stores, AppError> {
    if !config.database.is_configured() {
        tracing::warn!("No database configured, using in-memory stores");
        return Ok(Stores {
            notifications: Arc::new(MemoryNotificationStore::new()),
            conversations: Arc::new(MemoryConversationStore::new()),
            pool: None,
        });
    }

    let pool = DatabasePool::connect(&config.database).await?;
    run_migrations(pool.pool()).await?;

    Ok(Stores {
        notifications: Arc::new(PgNotificationStore::new(pool.pool().clone())),
        conversations: Arc::new(PgConversationStore::new(pool.pool().clone())),
        pool: Some(pool),
    })
}

/// Resolves on ctrl-c or, on unix, SIGTERM.
pub async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = tokio::signal::ctrl_c().await {
            tracing::error!(error = %e, "Failed to listen for ctrl-c");
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate()) {
            Ok(mut signal) => {
                signal.recv().await;
            }
            Err(e) => {
                tracing::error!(error = %e, "Failed to listen for SIGTERM");
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => tracing::info!("Received ctrl-c, shutting down"),
        _ = terminate => tracing::info!("Received SIGTERM, shutting down"),
    }
}
