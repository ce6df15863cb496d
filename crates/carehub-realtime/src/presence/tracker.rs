//! Last-known presence status per user.

use chrono::{DateTime, Utc};
use dashmap::DashMap;

use carehub_core::types::UserId;
use carehub_entity::presence::PresenceStatus;
use carehub_entity::realtime::StatusChange;

/// Tracks the most recent presence status announced for each user.
#[derive(Debug, Default)]
pub struct PresenceTracker {
    statuses: DashMap<UserId, (PresenceStatus, DateTime<Utc>)>,
}

impl PresenceTracker {
    /// Creates a new tracker.
    pub fn new() -> Self {
        Self::default()
    }

    /// Records a status and returns the change to broadcast.
    pub fn set(&self, user_id: UserId, status: PresenceStatus, at: DateTime<Utc>) -> StatusChange {
        if status == PresenceStatus::Offline {
            self.statuses.remove(&user_id);
        } else {
            self.statuses.insert(user_id, (status, at));
        }
        StatusChange {
            user_id,
            status,
            timestamp: at,
        }
    }

    /// Current status of a user; users never seen are offline.
    pub fn status(&self, user_id: UserId) -> PresenceStatus {
        self.statuses
            .get(&user_id)
            .map(|entry| entry.value().0)
            .unwrap_or(PresenceStatus::Offline)
    }

    /// Number of users currently online or away.
    pub fn online_count(&self) -> usize {
        self.statuses.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_set_and_clear() {
        let tracker = PresenceTracker::new();
        let user = UserId::new();
        let change = tracker.set(user, PresenceStatus::Away, Utc::now());
        assert_eq!(change.status, PresenceStatus::Away);
        assert_eq!(tracker.status(user), PresenceStatus::Away);
        assert_eq!(tracker.online_count(), 1);

        tracker.set(user, PresenceStatus::Offline, Utc::now());
        assert_eq!(tracker.status(user), PresenceStatus::Offline);
        assert_eq!(tracker.online_count(), 0);
    }
}
