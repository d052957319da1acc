//! Live channel wire contract.
//!
//! Every frame is one JSON object discriminated by its `type` field.

use serde::{Deserialize, Serialize};

/// Codes carried by `error` events and, for fatal ones, by the close frame.
pub mod error_code {
    /// Graceful close (idle timeout)
    pub const NORMAL_CLOSURE: u16 = 1000;
    /// Malformed payload, unsupported type, deprecated operation
    pub const BAD_REQUEST: u16 = 400;
    /// Not authenticated yet, or authentication failed
    pub const POLICY_VIOLATION: u16 = 1008;
    /// Unhandled server fault
    pub const INTERNAL_ERROR: u16 = 1011;
    /// Authenticated user is not a member of the room
    pub const FORBIDDEN: u16 = 4003;
    /// Room does not exist
    pub const ROOM_NOT_FOUND: u16 = 4004;
}

/// Inbound `type` values this server understands
pub const KNOWN_INBOUND_TYPES: &[&str] = &[
    "auth",
    "ping",
    "get_active_users",
    "get_room_info",
    "typing",
    "message",
];

/// Client → server envelope
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum InboundMessage {
    Auth { token: String },
    Ping,
    GetActiveUsers,
    GetRoomInfo,
    Typing { is_typing: bool },
    /// Content submission over the live channel; always rejected
    Message { content: String },
}

/// Joined / left
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum UserStatus {
    Joined,
    Left,
}

/// Server → client envelope
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum OutboundMessage {
    Success {
        message: String,
        timestamp: String,
    },
    Error {
        code: u16,
        message: String,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        details: Option<String>,
        timestamp: String,
    },
    Pong {
        timestamp: String,
    },
    ActiveUsers {
        users: Vec<String>,
        timestamp: String,
    },
    Message {
        id: String,
        sender_id: String,
        content: String,
        timestamp: String,
    },
    UserStatus {
        user_id: String,
        status: UserStatus,
        content: String,
        timestamp: String,
    },
    Typing {
        user_id: String,
        is_typing: bool,
        timestamp: String,
    },
    RoomInfo {
        room_id: String,
        title: String,
        participant_count: usize,
        active_user_count: usize,
        timestamp: String,
    },
    ReadStatus {
        message_id: String,
        user_id: String,
        timestamp: String,
    },
}

impl OutboundMessage {
    /// Encode as a text frame
    pub fn to_json(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string(self)
    }
}
