//! Live channel session protocol.
//!
//! `LiveSession` drives one connection from `Unauthenticated` through
//! `Authenticated` to `Closed`. It knows nothing about the transport: the
//! WebSocket handler feeds it inbound text frames and acts on the returned
//! [`SessionAction`]. Every reply is queued on the connection's own outbound
//! channel, the same one room broadcasts use, so the client sees frames in the
//! order they were produced.

use std::sync::Arc;

use crate::{
    domain::{ConnectionHandle, RoomId, UserId},
    infrastructure::dto::{
        conversion::{
            active_users_message, error_message, pong_message, room_info_message,
            success_message,
        },
        websocket::{InboundMessage, KNOWN_INBOUND_TYPES, OutboundMessage, error_code},
    },
    ui::state::AppState,
    usecase::ChatError,
};

/// Protocol state of one connection
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SessionState {
    Unauthenticated,
    Authenticated(UserId),
    Closed,
}

/// What the transport must do after a frame was handled
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SessionAction {
    Continue,
    /// Send a close frame with `code` and stop reading
    Close { code: u16, reason: String },
}

impl SessionAction {
    fn close(code: u16, reason: impl Into<String>) -> Self {
        Self::Close {
            code,
            reason: reason.into(),
        }
    }
}

pub struct LiveSession {
    app: Arc<AppState>,
    room_id: RoomId,
    handle: ConnectionHandle,
    state: SessionState,
}

impl LiveSession {
    pub fn new(app: Arc<AppState>, room_id: RoomId, handle: ConnectionHandle) -> Self {
        Self {
            app,
            room_id,
            handle,
            state: SessionState::Unauthenticated,
        }
    }

    pub fn state(&self) -> &SessionState {
        &self.state
    }

    pub fn room_id(&self) -> &RoomId {
        &self.room_id
    }

    /// Greet a freshly opened connection.
    pub fn open(&self) {
        self.reply(success_message(format!(
            "Connected to room {}. Send an auth event to join",
            self.room_id
        )));
    }

    pub async fn handle_text(&mut self, text: &str) -> SessionAction {
        let inbound = match parse_inbound(text) {
            Ok(inbound) => inbound,
            Err(rejection) => {
                self.reply(rejection);
                return SessionAction::Continue;
            }
        };

        match self.state.clone() {
            SessionState::Unauthenticated => self.handle_unauthenticated(inbound).await,
            SessionState::Authenticated(user_id) => {
                self.handle_authenticated(user_id, inbound).await
            }
            SessionState::Closed => {
                tracing::debug!("Ignoring frame on closed session in room '{}'", self.room_id);
                SessionAction::Continue
            }
        }
    }

    pub fn handle_binary(&self) -> SessionAction {
        self.reply(error_message(
            error_code::BAD_REQUEST,
            "Binary frames are not supported",
            Some("Send JSON text frames".to_string()),
        ));
        SessionAction::Continue
    }

    /// Tear the session down. Runs the disconnect cleanup at most once.
    pub async fn close(&mut self) {
        let previous = std::mem::replace(&mut self.state, SessionState::Closed);
        if let SessionState::Authenticated(user_id) = previous {
            tracing::info!("Closing session of '{}' in room '{}'", user_id, self.room_id);
            self.app
                .disconnect_participant_usecase
                .execute(&self.room_id, self.handle.id())
                .await;
        }
    }

    async fn handle_unauthenticated(&mut self, inbound: InboundMessage) -> SessionAction {
        let InboundMessage::Auth { token } = inbound else {
            self.reply(error_message(
                error_code::POLICY_VIOLATION,
                "Authentication required",
                Some("Send an auth event first".to_string()),
            ));
            return SessionAction::Continue;
        };

        let connect = self.app.connect_participant_usecase.clone();
        let user_id = match connect.execute(&self.room_id, &token).await {
            Ok(user_id) => user_id,
            Err(e) => return self.reject(e),
        };

        // 登録より先に成功を返し、本人にはルームのイベントより前に届くようにする
        self.state = SessionState::Authenticated(user_id.clone());
        self.reply(success_message(format!("Authenticated as {user_id}")));
        connect
            .join(&self.room_id, user_id, self.handle.clone())
            .await;
        SessionAction::Continue
    }

    async fn handle_authenticated(
        &mut self,
        user_id: UserId,
        inbound: InboundMessage,
    ) -> SessionAction {
        let presence = self.app.room_presence_usecase.clone();
        match inbound {
            InboundMessage::Auth { .. } => {
                self.reply(error_message(
                    error_code::BAD_REQUEST,
                    "Already authenticated",
                    None,
                ));
            }
            InboundMessage::Ping => self.reply(pong_message()),
            InboundMessage::GetActiveUsers => {
                let users = presence.active_users(&self.room_id).await;
                self.reply(active_users_message(&users));
            }
            InboundMessage::GetRoomInfo => match presence.room_info(&self.room_id).await {
                Ok((room, active)) => self.reply(room_info_message(&room, active)),
                Err(ChatError::NotFound(message)) => {
                    self.reply(error_message(error_code::ROOM_NOT_FOUND, message, None));
                }
                Err(e) => return self.fault(e),
            },
            InboundMessage::Typing { is_typing } => {
                presence
                    .notify_typing(&self.room_id, &user_id, is_typing)
                    .await;
            }
            InboundMessage::Message { .. } => {
                self.reply(error_message(
                    error_code::BAD_REQUEST,
                    "Sending messages over the live channel is not supported",
                    Some(format!("Use POST /api/chat/{}", self.room_id)),
                ));
            }
        }
        SessionAction::Continue
    }

    /// Report a failed authentication attempt and close.
    fn reject(&mut self, error: ChatError) -> SessionAction {
        if matches!(error, ChatError::Internal(_)) {
            return self.fault(error);
        }
        let code = match &error {
            ChatError::Authentication(_) => error_code::POLICY_VIOLATION,
            ChatError::Authorization { .. } => error_code::FORBIDDEN,
            ChatError::NotFound(_) => error_code::ROOM_NOT_FOUND,
            ChatError::Validation(_) => error_code::POLICY_VIOLATION,
            ChatError::Internal(_) => error_code::INTERNAL_ERROR,
        };
        tracing::warn!("Rejected connection to room '{}': {}", self.room_id, error);
        self.state = SessionState::Closed;
        let reason = error.to_string();
        self.reply(error_message(code, reason.clone(), None));
        SessionAction::close(code, reason)
    }

    fn fault(&self, error: ChatError) -> SessionAction {
        tracing::error!("Server fault in room '{}': {}", self.room_id, error);
        self.reply(error_message(
            error_code::INTERNAL_ERROR,
            "Internal server error",
            None,
        ));
        SessionAction::close(error_code::INTERNAL_ERROR, "Internal server error")
    }

    fn reply(&self, message: OutboundMessage) {
        let frame = match message.to_json() {
            Ok(frame) => frame,
            Err(e) => {
                tracing::error!("Failed to encode reply: {}", e);
                return;
            }
        };
        if let Err(e) = self.handle.send(frame) {
            tracing::debug!("Dropping reply in room '{}': {}", self.room_id, e);
        }
    }
}

/// Decode one inbound frame, or build the `error` event answering it.
fn parse_inbound(text: &str) -> Result<InboundMessage, OutboundMessage> {
    let value: serde_json::Value = serde_json::from_str(text).map_err(|e| {
        error_message(error_code::BAD_REQUEST, "Invalid JSON", Some(e.to_string()))
    })?;

    let Some(kind) = value.get("type").and_then(serde_json::Value::as_str) else {
        return Err(error_message(
            error_code::BAD_REQUEST,
            "Missing event type",
            None,
        ));
    };
    if !KNOWN_INBOUND_TYPES.contains(&kind) {
        return Err(error_message(
            error_code::BAD_REQUEST,
            format!("Unsupported event type '{kind}'"),
            None,
        ));
    }

    serde_json::from_value(value).map_err(|e| {
        error_message(
            error_code::BAD_REQUEST,
            "Invalid event payload",
            Some(e.to_string()),
        )
    })
}
