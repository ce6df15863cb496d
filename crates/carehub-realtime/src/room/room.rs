//! Single room with member tracking.

use std::collections::HashSet;

use carehub_core::types::ConnectionId;

use super::types::RoomName;

/// A room and the connections currently in it.
#[derive(Debug, Clone)]
pub struct Room {
    pub name: RoomName,
    members: HashSet<ConnectionId>,
}

impl Room {
    /// Creates a new empty room.
    pub fn new(name: RoomName) -> Self {
        Self {
            name,
            members: HashSet::new(),
        }
    }

    /// Adds a member. Returns `false` if it was already present.
    pub fn join(&mut self, conn_id: ConnectionId) -> bool {
        self.members.insert(conn_id)
    }

    /// Removes a member.
    pub fn leave(&mut self, conn_id: ConnectionId) {
        self.members.remove(&conn_id);
    }

    pub fn member_count(&self) -> usize {
        self.members.len()
    }

    pub fn is_empty(&self) -> bool {
        self.members.is_empty()
    }

    /// Returns all member connection IDs.
    pub fn members(&self) -> Vec<ConnectionId> {
        self.members.iter().copied().collect()
    }
}
