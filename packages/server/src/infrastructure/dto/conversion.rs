//! Conversion logic between DTOs and domain entities.

use std::collections::BTreeSet;

use parley_shared::time::get_utc_timestamp;

use crate::domain::{Message, Room, RoomEvent, RoomId, Timestamp, UserId};
use crate::infrastructure::dto::{http, websocket as ws};

fn now_rfc3339() -> String {
    Timestamp::new(get_utc_timestamp()).to_rfc3339()
}

// ========================================
// Domain → Live channel DTO
// ========================================

impl From<&RoomEvent> for ws::OutboundMessage {
    fn from(event: &RoomEvent) -> Self {
        match event {
            RoomEvent::UserJoined(user_id) => Self::UserStatus {
                user_id: user_id.as_str().to_string(),
                status: ws::UserStatus::Joined,
                content: format!("User {} joined the chat", user_id),
                timestamp: now_rfc3339(),
            },
            RoomEvent::UserLeft(user_id) => Self::UserStatus {
                user_id: user_id.as_str().to_string(),
                status: ws::UserStatus::Left,
                content: format!("User {} left the chat", user_id),
                timestamp: now_rfc3339(),
            },
            RoomEvent::Typing { user_id, is_typing } => Self::Typing {
                user_id: user_id.as_str().to_string(),
                is_typing: *is_typing,
                timestamp: now_rfc3339(),
            },
            RoomEvent::MessagePosted(message) => Self::Message {
                id: message.id.to_string(),
                sender_id: message.sender_id.as_str().to_string(),
                content: message.content.as_str().to_string(),
                timestamp: message.created_at.to_rfc3339(),
            },
            RoomEvent::MessageRead {
                message_id,
                user_id,
            } => Self::ReadStatus {
                message_id: message_id.to_string(),
                user_id: user_id.as_str().to_string(),
                timestamp: now_rfc3339(),
            },
        }
    }
}

/// Build an `active_users` event
pub fn active_users_message(users: &BTreeSet<UserId>) -> ws::OutboundMessage {
    ws::OutboundMessage::ActiveUsers {
        users: users.iter().map(|u| u.as_str().to_string()).collect(),
        timestamp: now_rfc3339(),
    }
}

/// Build a `room_info` event
pub fn room_info_message(room: &Room, active_user_count: usize) -> ws::OutboundMessage {
    ws::OutboundMessage::RoomInfo {
        room_id: room.id.as_str().to_string(),
        title: room.title.as_str().to_string(),
        participant_count: room.member_count(),
        active_user_count,
        timestamp: now_rfc3339(),
    }
}

/// Build a `success` event
pub fn success_message(message: impl Into<String>) -> ws::OutboundMessage {
    ws::OutboundMessage::Success {
        message: message.into(),
        timestamp: now_rfc3339(),
    }
}

/// Build an `error` event
pub fn error_message(
    code: u16,
    message: impl Into<String>,
    details: Option<String>,
) -> ws::OutboundMessage {
    ws::OutboundMessage::Error {
        code,
        message: message.into(),
        details,
        timestamp: now_rfc3339(),
    }
}

/// Build a `pong` event
pub fn pong_message() -> ws::OutboundMessage {
    ws::OutboundMessage::Pong {
        timestamp: now_rfc3339(),
    }
}

// ========================================
// Domain → HTTP DTO
// ========================================

impl From<Message> for http::MessageDto {
    fn from(message: Message) -> Self {
        Self {
            id: message.id.to_string(),
            room_id: message.room_id.into_string(),
            sender_id: message.sender_id.into_string(),
            content: message.content.into_string(),
            timestamp: message.created_at.to_rfc3339(),
            is_read: message.is_read,
        }
    }
}

impl http::RoomDetailDto {
    pub fn from_room(room: Room, active_user_count: usize) -> Self {
        Self {
            id: room.id.into_string(),
            title: room.title.as_str().to_string(),
            is_active: room.is_active,
            members: room.members.into_iter().map(UserId::into_string).collect(),
            active_user_count,
            created_at: room.created_at.to_rfc3339(),
            updated_at: room.updated_at.to_rfc3339(),
        }
    }
}

impl http::RoomConnectionStatusDto {
    pub fn from_snapshot(room_id: RoomId, users: BTreeSet<UserId>) -> Self {
        let connection_status = if users.is_empty() {
            "inactive"
        } else {
            "active"
        };
        Self {
            room_id: room_id.into_string(),
            websocket_connections: users.len(),
            connected_users: users.into_iter().map(UserId::into_string).collect(),
            connection_status: connection_status.to_string(),
        }
    }
}

impl From<Vec<(RoomId, BTreeSet<UserId>)>> for http::ConnectionStatusDto {
    fn from(snapshot: Vec<(RoomId, BTreeSet<UserId>)>) -> Self {
        let rooms: Vec<http::RoomConnectionStatusDto> = snapshot
            .into_iter()
            .map(|(room_id, users)| http::RoomConnectionStatusDto::from_snapshot(room_id, users))
            .collect();
        Self {
            total_websocket_connections: rooms.iter().map(|r| r.websocket_connections).sum(),
            active_rooms: rooms.len(),
            rooms,
        }
    }
}
