//! UseCase: ルームとメンバーシップの管理
//!
//! メンバーシップの変更はライブ接続に影響しない（退出しても既存の接続は
//! 切断されず、次の認証時に判定される）。

use std::sync::Arc;

use crate::domain::{MessageRepository, Room, RoomId, RoomRepository, RoomTitle, UserId};

use super::{access::require_member, error::ChatError};

/// ルーム管理のユースケース
pub struct ManageRoomUseCase {
    rooms: Arc<dyn RoomRepository>,
    messages: Arc<dyn MessageRepository>,
}

impl ManageRoomUseCase {
    pub fn new(rooms: Arc<dyn RoomRepository>, messages: Arc<dyn MessageRepository>) -> Self {
        Self { rooms, messages }
    }

    /// ルームを作成し、作成者を最初のメンバーにする
    pub async fn create(&self, title: String, creator: &UserId) -> Result<Room, ChatError> {
        let title = RoomTitle::new(title)?;
        let room = self
            .rooms
            .create_room(title, vec![creator.clone()])
            .await?;
        tracing::info!("User '{}' created room '{}'", creator, room.id);
        Ok(room)
    }

    /// ユーザーが所属するルームの一覧
    pub async fn list_for(&self, user_id: &UserId) -> Result<Vec<Room>, ChatError> {
        let rooms = self.rooms.list_rooms().await?;
        Ok(rooms
            .into_iter()
            .filter(|room| room.is_member(user_id))
            .collect())
    }

    /// ルームに参加（既にメンバーなら何もしない）
    pub async fn join(&self, room_id: &RoomId, user_id: &UserId) -> Result<Room, ChatError> {
        let room = self.rooms.add_member(room_id, user_id.clone()).await?;
        tracing::info!("User '{}' joined room '{}'", user_id, room_id);
        Ok(room)
    }

    /// ルームから退出（最後のメンバーが抜けるとルームは非アクティブになる）
    pub async fn leave(&self, room_id: &RoomId, user_id: &UserId) -> Result<Room, ChatError> {
        require_member(self.rooms.as_ref(), room_id, user_id).await?;
        let room = self.rooms.remove_member(room_id, user_id).await?;
        tracing::info!("User '{}' left room '{}'", user_id, room_id);
        Ok(room)
    }

    /// ルームを削除（メッセージも削除する）
    ///
    /// ルームを先に削除してからメッセージを消す。削除と並行した送信は、
    /// 書き込み後にルームの不在を検知して自分のログを片付ける。
    ///
    /// # Returns
    ///
    /// 削除したメッセージ数
    pub async fn delete(&self, room_id: &RoomId, user_id: &UserId) -> Result<usize, ChatError> {
        require_member(self.rooms.as_ref(), room_id, user_id).await?;
        self.rooms.delete_room(room_id).await?;
        let removed = self.messages.delete_room_messages(room_id).await?;
        tracing::info!(
            "User '{}' deleted room '{}' ({} messages removed)",
            user_id,
            room_id,
            removed
        );
        Ok(removed)
    }
}
