//! Live connections and the registry that tracks them.

use std::collections::BTreeSet;

use async_trait::async_trait;
use tokio::sync::mpsc;

use super::{ConnectionId, MessagePushError, RoomId, UserId};

/// Outbound channel of one connection. Frames are already-encoded JSON text.
pub type PusherChannel = mpsc::UnboundedSender<String>;

/// Handle to one live connection
///
/// Every frame for a connection (direct replies and room broadcasts alike)
/// goes through `sender`, so frames reach the client in the order they were
/// queued.
#[derive(Debug, Clone)]
pub struct ConnectionHandle {
    id: ConnectionId,
    sender: PusherChannel,
}

impl ConnectionHandle {
    pub fn new(sender: PusherChannel) -> Self {
        Self {
            id: ConnectionId::generate(),
            sender,
        }
    }

    pub fn id(&self) -> ConnectionId {
        self.id
    }

    /// Queue a frame. Fails once the transport side has gone away.
    pub fn send(&self, frame: String) -> Result<(), MessagePushError> {
        self.sender
            .send(frame)
            .map_err(|_| MessagePushError::ConnectionClosed(self.id.to_string()))
    }

    pub fn is_closed(&self) -> bool {
        self.sender.is_closed()
    }
}

/// One registry entry: a user live in a room through a handle
#[derive(Debug, Clone)]
pub struct LiveConnection {
    pub user_id: UserId,
    pub handle: ConnectionHandle,
}

/// Result of removing one connection from the registry
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Departure {
    pub user_id: UserId,
    /// No other connection of the user is left in the room
    pub last_connection: bool,
}

/// Connection Registry
///
/// Process-wide map of room → live (user, handle) pairs. Implementations must
/// make all operations atomic with respect to each other.
#[async_trait]
pub trait ConnectionRegistry: Send + Sync {
    /// Insert the pair under the room, creating the room's entry set if absent.
    /// Membership checks are the caller's responsibility.
    ///
    /// Returns `true` when this is the user's first live connection in the
    /// room, decided under the same lock as the insert.
    async fn register(&self, room_id: RoomId, user_id: UserId, handle: ConnectionHandle) -> bool;

    /// Remove the entry owning `connection_id`. Idempotent: `None` when the
    /// handle is not (or no longer) registered. Empty room sets are dropped.
    async fn unregister(&self, room_id: &RoomId, connection_id: ConnectionId)
    -> Option<Departure>;

    /// Distinct users currently live in the room; empty for unknown rooms.
    async fn list_active_users(&self, room_id: &RoomId) -> BTreeSet<UserId>;

    /// Snapshot of the room's live connections, taken at call time.
    async fn connections(&self, room_id: &RoomId) -> Vec<LiveConnection>;

    /// Every room with at least one live connection and its active users.
    async fn snapshot(&self) -> Vec<(RoomId, BTreeSet<UserId>)>;
}
