//! Request context carrying the calling user.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use carehub_core::types::UserId;
use carehub_entity::notification::ActorSnapshot;

/// Context for the current request.
///
/// Built by the HTTP layer from the identity the upstream auth layer
/// forwards, and passed into service methods so every operation knows
/// who is acting.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RequestContext {
    /// The caller's user ID.
    pub user_id: UserId,
    /// The caller's display name.
    pub user_name: String,
    /// When the request was received.
    pub request_time: DateTime<Utc>,
}

impl RequestContext {
    /// Creates a new request context.
    pub fn new(user_id: UserId, user_name: impl Into<String>) -> Self {
        Self {
            user_id,
            user_name: user_name.into(),
            request_time: Utc::now(),
        }
    }

    /// The caller as an actor snapshot.
    pub fn actor(&self) -> ActorSnapshot {
        ActorSnapshot::new(self.user_id, self.user_name.clone())
    }
}
