//! WebSocket を使った MessagePusher 実装
//!
//! ## 責務
//!
//! - ルームイベントを live channel の JSON フレームに変換
//! - レジストリのスナップショットに含まれる全接続へ送信
//! - 送信に失敗した接続をレジストリから削除
//!
//! WebSocket の生成と送信ループは UI 層（`ui/handler/websocket.rs`）が担当し、
//! この実装は各接続の `PusherChannel` にフレームを積むだけです。

use std::sync::Arc;

use async_trait::async_trait;

use crate::{
    domain::{BroadcastReport, ConnectionRegistry, MessagePusher, RoomEvent, RoomId},
    infrastructure::dto::websocket::OutboundMessage,
};

/// WebSocket を使った MessagePusher 実装
pub struct WebSocketMessagePusher {
    registry: Arc<dyn ConnectionRegistry>,
}

impl WebSocketMessagePusher {
    pub fn new(registry: Arc<dyn ConnectionRegistry>) -> Self {
        Self { registry }
    }
}

#[async_trait]
impl MessagePusher for WebSocketMessagePusher {
    async fn broadcast(&self, room_id: &RoomId, event: &RoomEvent) -> BroadcastReport {
        let frame = match OutboundMessage::from(event).to_json() {
            Ok(frame) => frame,
            Err(e) => {
                tracing::error!("Failed to encode event for room '{}': {}", room_id, e);
                return BroadcastReport::default();
            }
        };

        let targets = self.registry.connections(room_id).await;
        let mut report = BroadcastReport::default();

        for target in targets {
            match target.handle.send(frame.clone()) {
                Ok(()) => {
                    report.delivered += 1;
                }
                Err(e) => {
                    // ブロードキャストでは一部の送信失敗を許容し、死んだ接続を片付ける
                    tracing::warn!(
                        "Failed to push event to user '{}' in room '{}': {}",
                        target.user_id,
                        room_id,
                        e
                    );
                    let Some(departure) =
                        self.registry.unregister(room_id, target.handle.id()).await
                    else {
                        continue;
                    };
                    if departure.last_connection && !report.evicted.contains(&departure.user_id) {
                        report.evicted.push(departure.user_id);
                    }
                }
            }
        }

        tracing::debug!(
            "Broadcast to room '{}': {} delivered, {} evicted",
            room_id,
            report.delivered,
            report.evicted.len()
        );
        report
    }
}
