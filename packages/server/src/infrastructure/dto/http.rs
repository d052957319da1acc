//! HTTP API request and response DTOs.

use serde::{Deserialize, Serialize};

/// Body of `POST /api/chat/{room_id}`
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SendMessageRequest {
    pub message: String,
}

/// Body of `POST /api/chatrooms`
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CreateRoomRequest {
    pub title: String,
}

/// Query of `GET /api/chat/{room_id}`
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct HistoryQuery {
    pub skip: Option<usize>,
    pub limit: Option<usize>,
    pub sender_id: Option<String>,
    #[serde(default)]
    pub unread_only: bool,
}

/// Persisted message
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MessageDto {
    pub id: String,
    pub room_id: String,
    pub sender_id: String,
    pub content: String,
    pub timestamp: String,
    pub is_read: bool,
}

/// Live users of a room
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ActiveUsersDto {
    pub room_id: String,
    pub users: Vec<String>,
}

/// Room with its members
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RoomDetailDto {
    pub id: String,
    pub title: String,
    pub is_active: bool,
    pub members: Vec<String>,
    pub active_user_count: usize,
    pub created_at: String,
    pub updated_at: String,
}

/// Live connection status of one room
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RoomConnectionStatusDto {
    pub room_id: String,
    pub websocket_connections: usize,
    pub connected_users: Vec<String>,
    pub connection_status: String,
}

/// Live connection status of the whole process
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ConnectionStatusDto {
    pub total_websocket_connections: usize,
    pub active_rooms: usize,
    pub rooms: Vec<RoomConnectionStatusDto>,
}

/// Error body of every non-2xx response
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ErrorBody {
    pub code: u16,
    pub message: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub details: Option<String>,
}
