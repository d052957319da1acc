//! HTTP API endpoint handlers.

use std::sync::Arc;

use axum::{
    Json,
    extract::{Path, Query, State},
    http::StatusCode,
};

use crate::{
    domain::{MessageFilter, MessageId, RoomId, UserId},
    infrastructure::dto::http::{
        ActiveUsersDto, ConnectionStatusDto, CreateRoomRequest, HistoryQuery, MessageDto,
        RoomConnectionStatusDto, RoomDetailDto, SendMessageRequest,
    },
    ui::state::AppState,
    usecase::ChatError,
};

use super::{auth::BearerToken, body::ApiJson, error::ApiError};

type ApiResult<T> = Result<T, ApiError>;

async fn authenticate(state: &AppState, BearerToken(token): &BearerToken) -> ApiResult<UserId> {
    Ok(state.authenticate_usecase.execute(token).await?)
}

fn parse_room_id(raw: String) -> ApiResult<RoomId> {
    RoomId::try_from(raw).map_err(|e| ApiError(ChatError::from(e)))
}

fn parse_message_id(raw: &str) -> ApiResult<MessageId> {
    MessageId::try_from(raw).map_err(|e| ApiError(ChatError::from(e)))
}

/// Health check endpoint
pub async fn health_check() -> Json<serde_json::Value> {
    Json(serde_json::json!({"status": "ok"}))
}

// ========================================
// Messages
// ========================================

/// Post a message; persisted first, then pushed to the room's live connections
pub async fn send_message(
    State(state): State<Arc<AppState>>,
    Path(room_id): Path<String>,
    token: BearerToken,
    ApiJson(body): ApiJson<SendMessageRequest>,
) -> ApiResult<(StatusCode, Json<MessageDto>)> {
    let sender_id = authenticate(&state, &token).await?;
    let room_id = parse_room_id(room_id)?;
    let message = state
        .send_message_usecase
        .execute(&room_id, &sender_id, body.message)
        .await?;
    Ok((StatusCode::CREATED, Json(MessageDto::from(message))))
}

/// Message history, newest first
pub async fn get_messages(
    State(state): State<Arc<AppState>>,
    Path(room_id): Path<String>,
    Query(query): Query<HistoryQuery>,
    token: BearerToken,
) -> ApiResult<Json<Vec<MessageDto>>> {
    let user_id = authenticate(&state, &token).await?;
    let room_id = parse_room_id(room_id)?;
    let sender_id = query
        .sender_id
        .map(UserId::new)
        .transpose()
        .map_err(|e| ApiError(ChatError::from(e)))?;
    let filter = MessageFilter {
        sender_id,
        unread_only: query.unread_only,
    };

    let messages = state
        .get_messages_usecase
        .execute(
            &room_id,
            &user_id,
            query.skip.unwrap_or_default(),
            query.limit,
            filter,
        )
        .await?;
    Ok(Json(messages.into_iter().map(MessageDto::from).collect()))
}

pub async fn get_message(
    State(state): State<Arc<AppState>>,
    Path((room_id, message_id)): Path<(String, String)>,
    token: BearerToken,
) -> ApiResult<Json<MessageDto>> {
    let user_id = authenticate(&state, &token).await?;
    let room_id = parse_room_id(room_id)?;
    let message_id = parse_message_id(&message_id)?;
    let message = state
        .get_messages_usecase
        .get_one(&room_id, &user_id, message_id)
        .await?;
    Ok(Json(MessageDto::from(message)))
}

/// Mark a message read and notify the room
pub async fn mark_message_read(
    State(state): State<Arc<AppState>>,
    Path((room_id, message_id)): Path<(String, String)>,
    token: BearerToken,
) -> ApiResult<Json<MessageDto>> {
    let user_id = authenticate(&state, &token).await?;
    let room_id = parse_room_id(room_id)?;
    let message_id = parse_message_id(&message_id)?;
    let message = state
        .mark_message_read_usecase
        .execute(&room_id, &user_id, message_id)
        .await?;
    Ok(Json(MessageDto::from(message)))
}

// ========================================
// Presence
// ========================================

pub async fn get_active_users(
    State(state): State<Arc<AppState>>,
    Path(room_id): Path<String>,
    token: BearerToken,
) -> ApiResult<Json<ActiveUsersDto>> {
    let user_id = authenticate(&state, &token).await?;
    let room_id = parse_room_id(room_id)?;
    let users = state
        .room_presence_usecase
        .active_users_for_member(&room_id, &user_id)
        .await?;
    Ok(Json(ActiveUsersDto {
        room_id: room_id.into_string(),
        users: users.into_iter().map(UserId::into_string).collect(),
    }))
}

/// Live connection status of every room (debug)
pub async fn get_connection_status(State(state): State<Arc<AppState>>) -> Json<ConnectionStatusDto> {
    let snapshot = state.room_presence_usecase.connection_status().await;
    Json(ConnectionStatusDto::from(snapshot))
}

/// Live connection status of one room (debug)
pub async fn get_room_connection_status(
    State(state): State<Arc<AppState>>,
    Path(room_id): Path<String>,
) -> ApiResult<Json<RoomConnectionStatusDto>> {
    let room_id = parse_room_id(room_id)?;
    let users = state.room_presence_usecase.active_users(&room_id).await;
    Ok(Json(RoomConnectionStatusDto::from_snapshot(room_id, users)))
}

// ========================================
// Rooms
// ========================================

/// Rooms the caller belongs to
pub async fn get_rooms(
    State(state): State<Arc<AppState>>,
    token: BearerToken,
) -> ApiResult<Json<Vec<RoomDetailDto>>> {
    let user_id = authenticate(&state, &token).await?;
    let rooms = state.manage_room_usecase.list_for(&user_id).await?;

    let mut details = Vec::with_capacity(rooms.len());
    for room in rooms {
        let active = state.room_presence_usecase.active_users(&room.id).await.len();
        details.push(RoomDetailDto::from_room(room, active));
    }
    Ok(Json(details))
}

pub async fn create_room(
    State(state): State<Arc<AppState>>,
    token: BearerToken,
    ApiJson(body): ApiJson<CreateRoomRequest>,
) -> ApiResult<(StatusCode, Json<RoomDetailDto>)> {
    let user_id = authenticate(&state, &token).await?;
    let room = state.manage_room_usecase.create(body.title, &user_id).await?;
    Ok((StatusCode::CREATED, Json(RoomDetailDto::from_room(room, 0))))
}

/// Get room detail by ID
pub async fn get_room_detail(
    State(state): State<Arc<AppState>>,
    Path(room_id): Path<String>,
    token: BearerToken,
) -> ApiResult<Json<RoomDetailDto>> {
    authenticate(&state, &token).await?;
    let room_id = parse_room_id(room_id)?;
    let (room, active) = state.room_presence_usecase.room_info(&room_id).await?;
    Ok(Json(RoomDetailDto::from_room(room, active)))
}

pub async fn join_room(
    State(state): State<Arc<AppState>>,
    Path(room_id): Path<String>,
    token: BearerToken,
) -> ApiResult<Json<RoomDetailDto>> {
    let user_id = authenticate(&state, &token).await?;
    let room_id = parse_room_id(room_id)?;
    let room = state.manage_room_usecase.join(&room_id, &user_id).await?;
    let active = state.room_presence_usecase.active_users(&room_id).await.len();
    Ok(Json(RoomDetailDto::from_room(room, active)))
}

pub async fn leave_room(
    State(state): State<Arc<AppState>>,
    Path(room_id): Path<String>,
    token: BearerToken,
) -> ApiResult<Json<RoomDetailDto>> {
    let user_id = authenticate(&state, &token).await?;
    let room_id = parse_room_id(room_id)?;
    let room = state.manage_room_usecase.leave(&room_id, &user_id).await?;
    let active = state.room_presence_usecase.active_users(&room_id).await.len();
    Ok(Json(RoomDetailDto::from_room(room, active)))
}

/// Delete a room and its messages
pub async fn delete_room(
    State(state): State<Arc<AppState>>,
    Path(room_id): Path<String>,
    token: BearerToken,
) -> ApiResult<StatusCode> {
    let user_id = authenticate(&state, &token).await?;
    let room_id = parse_room_id(room_id)?;
    state.manage_room_usecase.delete(&room_id, &user_id).await?;
    Ok(StatusCode::NO_CONTENT)
}
