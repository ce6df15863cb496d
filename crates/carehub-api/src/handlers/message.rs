//! Message handlers.

use axum::Json;
use axum::extract::{Path, State};
use axum::http::StatusCode;

use carehub_core::types::ConversationId;
use carehub_entity::conversation::MessageDraft;

use crate::dto::response::MessageResponse;
use crate::error::ApiError;
use crate::extractors::CurrentUser;
use crate::state::AppState;

/// POST /api/conversations/{id}/messages
pub async fn send_message(
    State(state): State<AppState>,
    user: CurrentUser,
    Path(conversation_id): Path<ConversationId>,
    Json(draft): Json<MessageDraft>,
) -> Result<(StatusCode, Json<MessageResponse>), ApiError> {
    let message = state
        .message_service
        .send_message(&user, conversation_id, draft)
        .await?;
    Ok((StatusCode::CREATED, Json(MessageResponse { message })))
}
