//! Room registry: all live rooms and their members.

use dashmap::DashMap;

use carehub_core::types::ConnectionId;

use super::membership::MembershipTracker;
use super::room::Room;
use super::types::RoomName;

/// Registry of all non-empty rooms.
///
/// A room exists while at least one connection is in it.
#[derive(Debug, Default)]
pub struct RoomRegistry {
    rooms: DashMap<RoomName, Room>,
    memberships: MembershipTracker,
}

impl RoomRegistry {
    /// Creates an empty registry.
    pub fn new() -> Self {
        Self::default()
    }

    /// Puts a connection in a room. Returns `false` if it was already there.
    pub fn join(&self, room: RoomName, conn_id: ConnectionId) -> bool {
        let added = self
            .rooms
            .entry(room)
            .or_insert_with(|| Room::new(room))
            .join(conn_id);
        self.memberships.add(conn_id, room);
        added
    }

    /// Takes a connection out of a room.
    pub fn leave(&self, room: RoomName, conn_id: ConnectionId) {
        if let Some(mut entry) = self.rooms.get_mut(&room) {
            entry.leave(conn_id);
            if entry.is_empty() {
                drop(entry);
                self.rooms.remove_if(&room, |_, r| r.is_empty());
            }
        }
        self.memberships.remove(conn_id, &room);
    }

    /// Takes a connection out of every room it is in.
    pub fn leave_all(&self, conn_id: ConnectionId) {
        for room in self.memberships.remove_all(conn_id) {
            if let Some(mut entry) = self.rooms.get_mut(&room) {
                entry.leave(conn_id);
                if entry.is_empty() {
                    drop(entry);
                    self.rooms.remove_if(&room, |_, r| r.is_empty());
                }
            }
        }
    }

    /// Connection IDs currently in `room`.
    pub fn members(&self, room: &RoomName) -> Vec<ConnectionId> {
        self.rooms
            .get(room)
            .map(|r| r.members())
            .unwrap_or_default()
    }

    /// Whether a connection is in `room`.
    pub fn is_member(&self, room: &RoomName, conn_id: ConnectionId) -> bool {
        self.memberships.rooms_of(conn_id).contains(room)
    }

    /// Number of rooms a connection is in.
    pub fn room_count_for(&self, conn_id: ConnectionId) -> usize {
        self.memberships.count(conn_id)
    }

    /// Number of members in a room.
    pub fn member_count(&self, room: &RoomName) -> usize {
        self.rooms.get(room).map(|r| r.member_count()).unwrap_or(0)
    }

    /// Total number of live rooms.
    pub fn room_count(&self) -> usize {
        self.rooms.len()
    }
}

#[cfg(test)]
mod tests {
    use carehub_core::types::{ConversationId, UserId};

    use super::*;

    #[test]
    fn test_join_and_leave() {
        let registry = RoomRegistry::new();
        let room = RoomName::Conversation(ConversationId::new());
        let a = ConnectionId::new();
        let b = ConnectionId::new();

        assert!(registry.join(room, a));
        assert!(!registry.join(room, a));
        registry.join(room, b);
        assert_eq!(registry.member_count(&room), 2);

        registry.leave(room, a);
        assert_eq!(registry.members(&room), vec![b]);
        registry.leave(room, b);
        assert_eq!(registry.room_count(), 0);
    }

    #[test]
    fn test_leave_all_clears_every_room() {
        let registry = RoomRegistry::new();
        let conn = ConnectionId::new();
        let user_room = RoomName::User(UserId::new());
        let conv_room = RoomName::Conversation(ConversationId::new());
        registry.join(user_room, conn);
        registry.join(conv_room, conn);
        assert_eq!(registry.room_count_for(conn), 2);

        registry.leave_all(conn);
        assert_eq!(registry.room_count_for(conn), 0);
        assert_eq!(registry.room_count(), 0);
        assert!(!registry.is_member(&user_room, conn));
    }
}
