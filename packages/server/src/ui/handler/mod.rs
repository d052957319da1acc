//! axum handlers.

mod auth;
mod body;
mod error;
mod http;
mod websocket;

pub use http::{
    create_room, delete_room, get_active_users, get_connection_status, get_message,
    get_messages, get_room_connection_status, get_room_detail, get_rooms, health_check,
    join_room, leave_room, mark_message_read, send_message,
};
pub use websocket::websocket_handler;
