//! Reverse index: which rooms each connection is in.

use std::collections::HashSet;

use dashmap::DashMap;

use carehub_core::types::ConnectionId;

use super::types::RoomName;

/// Tracks connection-to-room membership.
#[derive(Debug, Default)]
pub struct MembershipTracker {
    conn_to_rooms: DashMap<ConnectionId, HashSet<RoomName>>,
}

impl MembershipTracker {
    pub fn new() -> Self {
        Self::default()
    }

    /// Records a membership.
    pub fn add(&self, conn_id: ConnectionId, room: RoomName) {
        self.conn_to_rooms.entry(conn_id).or_default().insert(room);
    }

    /// Removes a membership.
    pub fn remove(&self, conn_id: ConnectionId, room: &RoomName) {
        if let Some(mut rooms) = self.conn_to_rooms.get_mut(&conn_id) {
            rooms.remove(room);
        }
    }

    /// Rooms a connection is in.
    pub fn rooms_of(&self, conn_id: ConnectionId) -> HashSet<RoomName> {
        self.conn_to_rooms
            .get(&conn_id)
            .map(|entry| entry.value().clone())
            .unwrap_or_default()
    }

    /// Number of rooms a connection is in.
    pub fn count(&self, conn_id: ConnectionId) -> usize {
        self.conn_to_rooms
            .get(&conn_id)
            .map(|entry| entry.value().len())
            .unwrap_or(0)
    }

    /// Forgets every membership of a connection and returns them.
    pub fn remove_all(&self, conn_id: ConnectionId) -> HashSet<RoomName> {
        self.conn_to_rooms
            .remove(&conn_id)
            .map(|(_, rooms)| rooms)
            .unwrap_or_default()
    }
}
