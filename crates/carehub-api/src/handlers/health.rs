//! Health check handlers.

use axum::Json;
use axum::extract::State;
use axum::http::StatusCode;

use crate::dto::response::{DetailedHealthResponse, HealthResponse};
use crate::state::AppState;

/// GET /api/health
pub async fn health(State(state): State<AppState>) -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "ok".to_string(),
        version: env!("CARGO_PKG_VERSION").to_string(),
        uptime_seconds: state.started_at.elapsed().as_secs(),
    })
}

/// GET /api/health/detailed
pub async fn health_detailed(
    State(state): State<AppState>,
) -> (StatusCode, Json<DetailedHealthResponse>) {
    let (status, database) = match state.notification_service.health_check().await {
        Ok(()) => (StatusCode::OK, "connected"),
        Err(e) => {
            tracing::warn!(error = %e, "Store health check failed");
            (StatusCode::SERVICE_UNAVAILABLE, "unavailable")
        }
    };
    let realtime = &state.realtime;

    (
        status,
        Json(DetailedHealthResponse {
            status: if status.is_success() { "ok" } else { "degraded" }.to_string(),
            database: database.to_string(),
            ws_connections: realtime.connections.connection_count(),
            online_users: realtime.presence.online_count(),
            rooms: realtime.rooms.room_count(),
            realtime: realtime.metrics.snapshot(),
        }),
    )
}
