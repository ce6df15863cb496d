//! Connection pool: every live connection, plus which user each one claims.

use std::collections::HashSet;
use std::sync::Arc;

use dashmap::DashMap;

use carehub_core::types::{ConnectionId, UserId};

use super::handle::ConnectionHandle;

/// Thread-safe pool of all active WebSocket connections.
///
/// Connections are anonymous until they announce presence with
/// `user_online`/`user_away`; from then on they claim that user id.
#[derive(Debug, Default)]
pub struct ConnectionPool {
    /// Connection ID → connection handle.
    by_id: DashMap<ConnectionId, Arc<ConnectionHandle>>,
    /// Connection ID → claimed user.
    claims: DashMap<ConnectionId, UserId>,
    /// User ID → connections claiming that user.
    by_user: DashMap<UserId, HashSet<ConnectionId>>,
}

impl ConnectionPool {
    /// Creates a new empty connection pool.
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds a connection to the pool.
    pub fn add(&self, handle: Arc<ConnectionHandle>) {
        self.by_id.insert(handle.id, handle);
    }

    /// Records that a connection speaks for `user_id`. A later claim replaces
    /// an earlier one; the replaced user is returned.
    pub fn claim(&self, conn_id: ConnectionId, user_id: UserId) -> Option<UserId> {
        let replaced = self
            .claims
            .insert(conn_id, user_id)
            .filter(|previous| *previous != user_id);
        if let Some(previous) = replaced {
            self.release(conn_id, previous);
        }
        self.by_user.entry(user_id).or_default().insert(conn_id);
        replaced
    }

    /// The user a connection has claimed, if any.
    pub fn claimed_user(&self, conn_id: ConnectionId) -> Option<UserId> {
        self.claims.get(&conn_id).map(|entry| *entry.value())
    }

    /// Removes a connection. Returns the handle and the user it had claimed.
    pub fn remove(
        &self,
        conn_id: ConnectionId,
    ) -> Option<(Arc<ConnectionHandle>, Option<UserId>)> {
        let (_, handle) = self.by_id.remove(&conn_id)?;
        let claimed = self.claims.remove(&conn_id).map(|(_, user)| user);
        if let Some(user_id) = claimed {
            self.release(conn_id, user_id);
        }
        Some((handle, claimed))
    }

    fn release(&self, conn_id: ConnectionId, user_id: UserId) {
        if let Some(mut connections) = self.by_user.get_mut(&user_id) {
            connections.remove(&conn_id);
            if connections.is_empty() {
                drop(connections);
                self.by_user.remove_if(&user_id, |_, c| c.is_empty());
            }
        }
    }

    /// Gets a specific connection by ID.
    pub fn get(&self, conn_id: ConnectionId) -> Option<Arc<ConnectionHandle>> {
        self.by_id.get(&conn_id).map(|entry| entry.value().clone())
    }

    /// Whether any live connection still claims `user_id`.
    pub fn is_user_connected(&self, user_id: UserId) -> bool {
        self.by_user
            .get(&user_id)
            .is_some_and(|entry| !entry.value().is_empty())
    }

    /// Returns total number of active connections.
    pub fn connection_count(&self) -> usize {
        self.by_id.len()
    }

    /// Returns number of unique users claimed by connections.
    pub fn user_count(&self) -> usize {
        self.by_user.len()
    }

    /// Returns all connection handles.
    pub fn all_connections(&self) -> Vec<Arc<ConnectionHandle>> {
        self.by_id
            .iter()
            .map(|entry| entry.value().clone())
            .collect()
    }
}
