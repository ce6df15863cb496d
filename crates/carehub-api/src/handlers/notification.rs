//! Notification handlers.

use axum::Json;
use axum::extract::{Path, Query, State};

use carehub_core::error::AppError;
use carehub_core::types::NotificationId;

use crate::dto::response::{
    DeletedResponse, ModifiedCountResponse, NotificationListResponse, NotificationResponse,
    UnreadCountResponse,
};
use crate::error::ApiError;
use crate::extractors::{CurrentUser, NotificationQuery};
use crate::state::AppState;

/// GET /api/notifications
pub async fn list_notifications(
    State(state): State<AppState>,
    user: CurrentUser,
    Query(query): Query<NotificationQuery>,
) -> Result<Json<NotificationListResponse>, ApiError> {
    let listing = state
        .notification_service
        .get_user_notifications(user.user_id, query.page, query.limit, query.unread_only)
        .await?;
    Ok(Json(listing.into()))
}

/// GET /api/notifications/unread-count
pub async fn unread_count(
    State(state): State<AppState>,
    user: CurrentUser,
) -> Result<Json<UnreadCountResponse>, ApiError> {
    let unread_count = state.notification_service.unread_count(user.user_id).await?;
    Ok(Json(UnreadCountResponse { unread_count }))
}

/// POST /api/notifications/{id}/read
pub async fn mark_read(
    State(state): State<AppState>,
    user: CurrentUser,
    Path(id): Path<NotificationId>,
) -> Result<Json<NotificationResponse>, ApiError> {
    let notification = state
        .notification_service
        .mark_as_read(id, user.user_id)
        .await?
        .ok_or_else(|| AppError::not_found("Notification not found"))?;
    Ok(Json(NotificationResponse { notification }))
}

/// POST /api/notifications/read-all
pub async fn mark_all_read(
    State(state): State<AppState>,
    user: CurrentUser,
) -> Result<Json<ModifiedCountResponse>, ApiError> {
    let modified_count = state
        .notification_service
        .mark_all_as_read(user.user_id)
        .await?;
    Ok(Json(ModifiedCountResponse { modified_count }))
}

/// DELETE /api/notifications/{id}
pub async fn delete_notification(
    State(state): State<AppState>,
    user: CurrentUser,
    Path(id): Path<NotificationId>,
) -> Result<Json<DeletedResponse>, ApiError> {
    if !state
        .notification_service
        .delete_notification(id, user.user_id)
        .await?
    {
        return Err(AppError::not_found("Notification not found").into());
    }
    Ok(Json(DeletedResponse { deleted: true }))
}
