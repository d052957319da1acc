//! UseCase: メッセージ履歴の取得

use std::sync::Arc;

use crate::domain::{
    Message, MessageFilter, MessageId, MessageRepository, RoomId, RoomRepository, UserId,
};

use super::{access::require_member, error::ChatError};

/// `limit` を省略したときの件数
pub const DEFAULT_PAGE_SIZE: usize = 50;
/// 一度に返す最大件数
pub const MAX_PAGE_SIZE: usize = 100;

/// メッセージ履歴取得のユースケース
pub struct GetMessagesUseCase {
    rooms: Arc<dyn RoomRepository>,
    messages: Arc<dyn MessageRepository>,
}

impl GetMessagesUseCase {
    pub fn new(rooms: Arc<dyn RoomRepository>, messages: Arc<dyn MessageRepository>) -> Self {
        Self { rooms, messages }
    }

    /// 新しい順に `offset` 件読み飛ばし、最大 `limit` 件を返す
    ///
    /// `limit` は 1..=100 に丸める（省略時 50）。
    pub async fn execute(
        &self,
        room_id: &RoomId,
        user_id: &UserId,
        offset: usize,
        limit: Option<usize>,
        filter: MessageFilter,
    ) -> Result<Vec<Message>, ChatError> {
        require_member(self.rooms.as_ref(), room_id, user_id).await?;
        let limit = clamp_limit(limit);
        Ok(self.messages.list(room_id, offset, limit, filter).await?)
    }

    /// メッセージを一件取得
    pub async fn get_one(
        &self,
        room_id: &RoomId,
        user_id: &UserId,
        message_id: MessageId,
    ) -> Result<Message, ChatError> {
        require_member(self.rooms.as_ref(), room_id, user_id).await?;
        Ok(self.messages.get(room_id, message_id).await?)
    }
}

fn clamp_limit(limit: Option<usize>) -> usize {
    limit.unwrap_or(DEFAULT_PAGE_SIZE).clamp(1, MAX_PAGE_SIZE)
}
