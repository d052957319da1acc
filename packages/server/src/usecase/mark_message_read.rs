//! UseCase: 既読処理

use std::sync::Arc;

use crate::domain::{
    Message, MessageId, MessageRepository, RoomEvent, RoomId, RoomRepository, UserId,
};

use super::{access::require_member, announce::RoomAnnouncer, error::ChatError};

/// メッセージ既読化のユースケース
///
/// 既読化に成功するとルームに `read_status` を通知する。
pub struct MarkMessageReadUseCase {
    rooms: Arc<dyn RoomRepository>,
    messages: Arc<dyn MessageRepository>,
    announcer: Arc<RoomAnnouncer>,
}

impl MarkMessageReadUseCase {
    pub fn new(
        rooms: Arc<dyn RoomRepository>,
        messages: Arc<dyn MessageRepository>,
        announcer: Arc<RoomAnnouncer>,
    ) -> Self {
        Self {
            rooms,
            messages,
            announcer,
        }
    }

    pub async fn execute(
        &self,
        room_id: &RoomId,
        user_id: &UserId,
        message_id: MessageId,
    ) -> Result<Message, ChatError> {
        require_member(self.rooms.as_ref(), room_id, user_id).await?;
        let message = self.messages.mark_read(room_id, message_id).await?;

        self.announcer
            .publish(
                room_id,
                RoomEvent::MessageRead {
                    message_id,
                    user_id: user_id.clone(),
                },
            )
            .await;

        Ok(message)
    }
}
