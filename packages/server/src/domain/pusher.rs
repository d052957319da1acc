//! Broadcast Engine interface.

use async_trait::async_trait;

use super::{Message, MessageId, RoomId, UserId};

/// Events fanned out to the live connections of a room
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RoomEvent {
    UserJoined(UserId),
    UserLeft(UserId),
    Typing { user_id: UserId, is_typing: bool },
    MessagePosted(Message),
    MessageRead { message_id: MessageId, user_id: UserId },
}

/// Outcome of one broadcast
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct BroadcastReport {
    /// Connections the event was queued on
    pub delivered: usize,
    /// Users whose connection failed and was unregistered as a result
    pub evicted: Vec<UserId>,
}

/// Best-effort, online-only fan-out to the current live connections of a room.
///
/// A failed delivery never stops the others; the dead connection is removed
/// from the registry and reported in [`BroadcastReport::evicted`].
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait MessagePusher: Send + Sync {
    async fn broadcast(&self, room_id: &RoomId, event: &RoomEvent) -> BroadcastReport;
}
