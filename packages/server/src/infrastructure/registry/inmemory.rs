//! In-memory connection registry.
//!
//! A single `tokio::sync::Mutex` guards the whole map, so every operation is
//! atomic with respect to every other one across all rooms. Handles never
//! escape the lock except as clones in a snapshot.

use std::collections::{BTreeSet, HashMap};

use async_trait::async_trait;
use tokio::sync::Mutex;

use crate::domain::{
    ConnectionHandle, ConnectionId, ConnectionRegistry, Departure, LiveConnection, RoomId, UserId,
};

type RoomConnections = HashMap<ConnectionId, LiveConnection>;

/// Process-wide room → connection map
#[derive(Default)]
pub struct InMemoryConnectionRegistry {
    rooms: Mutex<HashMap<RoomId, RoomConnections>>,
}

impl InMemoryConnectionRegistry {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl ConnectionRegistry for InMemoryConnectionRegistry {
    async fn register(&self, room_id: RoomId, user_id: UserId, handle: ConnectionHandle) -> bool {
        let mut rooms = self.rooms.lock().await;
        let connections = rooms.entry(room_id.clone()).or_default();
        let first = !connections
            .values()
            .any(|connection| connection.user_id == user_id);
        if !first {
            tracing::debug!(
                "User '{}' already live in room '{}', adding another connection",
                user_id,
                room_id
            );
        }
        tracing::debug!(
            "Connection '{}' registered for user '{}' in room '{}'",
            handle.id(),
            user_id,
            room_id
        );
        connections.insert(handle.id(), LiveConnection { user_id, handle });
        first
    }

    async fn unregister(
        &self,
        room_id: &RoomId,
        connection_id: ConnectionId,
    ) -> Option<Departure> {
        let mut rooms = self.rooms.lock().await;
        let connections = rooms.get_mut(room_id)?;
        let removed = connections.remove(&connection_id)?;
        let last_connection = !connections
            .values()
            .any(|connection| connection.user_id == removed.user_id);
        if connections.is_empty() {
            rooms.remove(room_id);
            tracing::debug!("Room '{}' has no live connections left", room_id);
        }
        tracing::debug!(
            "Connection '{}' of user '{}' unregistered from room '{}'",
            connection_id,
            removed.user_id,
            room_id
        );
        Some(Departure {
            user_id: removed.user_id,
            last_connection,
        })
    }

    async fn list_active_users(&self, room_id: &RoomId) -> BTreeSet<UserId> {
        let rooms = self.rooms.lock().await;
        rooms
            .get(room_id)
            .map(|connections| {
                connections
                    .values()
                    .map(|connection| connection.user_id.clone())
                    .collect()
            })
            .unwrap_or_default()
    }

    async fn connections(&self, room_id: &RoomId) -> Vec<LiveConnection> {
        let rooms = self.rooms.lock().await;
        rooms
            .get(room_id)
            .map(|connections| connections.values().cloned().collect())
            .unwrap_or_default()
    }

    async fn snapshot(&self) -> Vec<(RoomId, BTreeSet<UserId>)> {
        let rooms = self.rooms.lock().await;
        let mut snapshot: Vec<(RoomId, BTreeSet<UserId>)> = rooms
            .iter()
            .map(|(room_id, connections)| {
                let users = connections
                    .values()
                    .map(|connection| connection.user_id.clone())
                    .collect();
                (room_id.clone(), users)
            })
            .collect();
        snapshot.sort_by(|a, b| a.0.cmp(&b.0));
        snapshot
    }
}
