//! WebSocket connection handlers.

use std::{sync::Arc, time::Duration};

use axum::{
    extract::{
        Path, State,
        ws::{CloseFrame, Message, WebSocket, WebSocketUpgrade},
    },
    http::StatusCode,
    response::IntoResponse,
};
use futures_util::{
    sink::SinkExt,
    stream::{SplitSink, SplitStream, StreamExt},
};
use tokio::sync::{mpsc, oneshot};

use crate::{
    domain::{ConnectionHandle, RoomId},
    infrastructure::dto::websocket::error_code,
    ui::{
        session::{LiveSession, SessionAction},
        state::AppState,
    },
};

/// How long the outbound side may take to flush after the inbound side ended
const FLUSH_TIMEOUT: Duration = Duration::from_secs(5);
/// Close frame reasons are capped by the WebSocket protocol
const MAX_CLOSE_REASON_BYTES: usize = 123;

/// Close request handed from the inbound side to the outbound side
type CloseRequest = (u16, String);

pub async fn websocket_handler(
    ws: WebSocketUpgrade,
    State(state): State<Arc<AppState>>,
    Path(room_id): Path<String>,
) -> Result<impl IntoResponse, StatusCode> {
    let room_id = match RoomId::try_from(room_id) {
        Ok(room_id) => room_id,
        Err(e) => {
            tracing::warn!("Rejecting WebSocket upgrade: {}", e);
            return Err(StatusCode::BAD_REQUEST);
        }
    };

    Ok(ws.on_upgrade(move |socket| handle_socket(socket, state, room_id)))
}

/// Spawns a task that drains the connection's outbound channel into the
/// WebSocket sink.
///
/// Frames queued before a close request are flushed first, then the close
/// frame is sent. Without a close request the task ends once every sender of
/// the channel is gone.
fn pusher_loop(
    mut rx: mpsc::UnboundedReceiver<String>,
    mut sender: SplitSink<WebSocket, Message>,
    mut close_rx: oneshot::Receiver<CloseRequest>,
) -> tokio::task::JoinHandle<()> {
    tokio::spawn(async move {
        loop {
            tokio::select! {
                biased;
                frame = rx.recv() => {
                    let Some(frame) = frame else { break };
                    if sender.send(Message::Text(frame.into())).await.is_err() {
                        return;
                    }
                }
                close = &mut close_rx => {
                    while let Ok(frame) = rx.try_recv() {
                        if sender.send(Message::Text(frame.into())).await.is_err() {
                            return;
                        }
                    }
                    if let Ok((code, reason)) = close {
                        let frame = CloseFrame {
                            code,
                            reason: truncate_reason(reason).into(),
                        };
                        if let Err(e) = sender.send(Message::Close(Some(frame))).await {
                            tracing::debug!("Failed to send close frame: {}", e);
                        }
                    }
                    break;
                }
            }
        }
        let _ = sender.close().await;
    })
}

async fn handle_socket(socket: WebSocket, state: Arc<AppState>, room_id: RoomId) {
    let (sender, mut receiver) = socket.split();
    let (tx, rx) = mpsc::unbounded_channel();
    let (close_tx, close_rx) = oneshot::channel();

    let idle_timeout = state.idle_timeout;
    let mut session = LiveSession::new(state, room_id, ConnectionHandle::new(tx));
    tracing::info!("Live connection opened for room '{}'", session.room_id());

    let mut send_task = pusher_loop(rx, sender, close_rx);
    session.open();

    let outbound_finished = tokio::select! {
        _ = receive_loop(&mut receiver, &mut session, idle_timeout, close_tx) => false,
        _ = &mut send_task => true,
    };

    session.close().await;
    tracing::info!("Live connection closed for room '{}'", session.room_id());
    drop(session);

    if !outbound_finished && tokio::time::timeout(FLUSH_TIMEOUT, &mut send_task).await.is_err() {
        tracing::warn!("Outbound side did not finish in time, aborting");
        send_task.abort();
    }
}

/// Feed inbound frames to the session until the client goes away, the session
/// asks to close, or the connection stays idle too long.
async fn receive_loop(
    receiver: &mut SplitStream<WebSocket>,
    session: &mut LiveSession,
    idle_timeout: Option<Duration>,
    close_tx: oneshot::Sender<CloseRequest>,
) {
    loop {
        let next = match idle_timeout {
            Some(limit) => match tokio::time::timeout(limit, receiver.next()).await {
                Ok(next) => next,
                Err(_) => {
                    tracing::info!("Closing idle connection in room '{}'", session.room_id());
                    let _ = close_tx.send((error_code::NORMAL_CLOSURE, "Idle timeout".to_string()));
                    return;
                }
            },
            None => receiver.next().await,
        };

        let msg = match next {
            Some(Ok(msg)) => msg,
            Some(Err(e)) => {
                tracing::warn!("WebSocket error: {}", e);
                return;
            }
            None => return,
        };

        let action = match msg {
            Message::Text(text) => {
                tracing::debug!("Received text: {}", text.as_str());
                session.handle_text(text.as_str()).await
            }
            Message::Binary(_) => session.handle_binary(),
            Message::Ping(_) | Message::Pong(_) => {
                // Ping/pong is handled automatically by the WebSocket protocol
                continue;
            }
            Message::Close(_) => {
                tracing::debug!("Client requested close");
                return;
            }
        };

        if let SessionAction::Close { code, reason } = action {
            let _ = close_tx.send((code, reason));
            return;
        }
    }
}

fn truncate_reason(mut reason: String) -> String {
    if reason.len() > MAX_CLOSE_REASON_BYTES {
        let mut end = MAX_CLOSE_REASON_BYTES;
        while !reason.is_char_boundary(end) {
            end -= 1;
        }
        reason.truncate(end);
    }
    reason
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_truncate_reason_keeps_short_reasons() {
        // テスト項目: 短い理由はそのまま残る
        assert_eq!(truncate_reason("Idle timeout".to_string()), "Idle timeout");
    }

    #[test]
    fn test_truncate_reason_respects_char_boundary() {
        // テスト項目: 長い理由は文字境界で 123 バイト以内に切り詰められる
        // given (前提条件):
        let reason = "あ".repeat(60);

        // when (操作):
        let truncated = truncate_reason(reason);

        // then (期待する結果):
        assert!(truncated.len() <= MAX_CLOSE_REASON_BYTES);
        assert_eq!(truncated, "あ".repeat(41));
    }
}
