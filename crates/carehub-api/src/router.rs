//! Route definitions for the CareHub HTTP API.
//!
//! All routes are organized by domain and mounted under `/api`.
//! The router receives `AppState` and passes it to all handlers via Axum's `State` extractor.

use std::time::Duration;

use axum::{
    Router,
    extract::DefaultBodyLimit,
    middleware as axum_middleware,
    routing::{delete, get, post},
};
use tower_http::compression::CompressionLayer;
use tower_http::timeout::TimeoutLayer;
use tower_http::trace::TraceLayer;

use crate::handlers;
use crate::middleware;
use crate::state::AppState;

/// Build the complete Axum router with all routes and middleware.
pub fn build_router(state: AppState) -> Router {
    let server = &state.config.server;

    let api_routes = Router::new()
        .merge(notification_routes())
        .merge(conversation_routes())
        .merge(health_routes())
        .route("/ws", get(handlers::ws::ws_upgrade));

    Router::new()
        .nest("/api", api_routes)
        .layer(DefaultBodyLimit::max(server.body_limit_bytes))
        .layer(TimeoutLayer::new(Duration::from_secs(
            server.request_timeout_seconds,
        )))
        .layer(CompressionLayer::new())
        .layer(TraceLayer::new_for_http())
        .layer(middleware::cors::build_cors_layer(&server.cors))
        .layer(axum_middleware::from_fn(middleware::logging::request_logging))
        .with_state(state)
}

/// Notification list, badge count, and read-state endpoints
fn notification_routes() -> Router<AppState> {
    Router::new()
        .route(
            "/notifications",
            get(handlers::notification::list_notifications),
        )
        .route(
            "/notifications/unread-count",
            get(handlers::notification::unread_count),
        )
        .route(
            "/notifications/read-all",
            post(handlers::notification::mark_all_read),
        )
        .route(
            "/notifications/{id}/read",
            post(handlers::notification::mark_read),
        )
        .route(
            "/notifications/{id}",
            delete(handlers::notification::delete_notification),
        )
}

/// Message write path
fn conversation_routes() -> Router<AppState> {
    Router::new().route(
        "/conversations/{id}/messages",
        post(handlers::message::send_message),
    )
}

/// Liveness and detailed health
fn health_routes() -> Router<AppState> {
    Router::new()
        .route("/health", get(handlers::health::health))
        .route("/health/detailed", get(handlers::health::health_detailed))
}
