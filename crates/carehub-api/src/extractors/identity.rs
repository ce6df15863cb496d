//! `CurrentUser` extractor: reads the caller identity forwarded by the
//! upstream auth layer.

use axum::extract::FromRequestParts;
use axum::http::request::Parts;

use carehub_core::error::AppError;
use carehub_core::types::UserId;
use carehub_service::RequestContext;

use crate::error::ApiError;

/// Header carrying the caller's user id.
pub const USER_ID_HEADER: &str = "x-user-id";
/// Header carrying the caller's display name.
pub const USER_NAME_HEADER: &str = "x-user-name";

/// The calling user, available in handlers.
#[derive(Debug, Clone)]
pub struct CurrentUser(pub RequestContext);

impl std::ops::Deref for CurrentUser {
    type Target = RequestContext;
    fn deref(&self) -> &Self::Target {
        &self.0
    }
}

impl<S> FromRequestParts<S> for CurrentUser
where
    S: Send + Sync,
{
    type Rejection = ApiError;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        let raw_id = parts
            .headers
            .get(USER_ID_HEADER)
            .and_then(|v| v.to_str().ok())
            .ok_or_else(|| AppError::authentication("Missing caller identity"))?;

        let user_id: UserId = raw_id
            .trim()
            .parse()
            .map_err(|_| AppError::authentication("Invalid caller identity"))?;

        let user_name = parts
            .headers
            .get(USER_NAME_HEADER)
            .and_then(|v| v.to_str().ok())
            .map(str::trim)
            .filter(|name| !name.is_empty())
            .map(String::from)
            .unwrap_or_else(|| user_id.to_string());

        Ok(CurrentUser(RequestContext::new(user_id, user_name)))
    }
}
