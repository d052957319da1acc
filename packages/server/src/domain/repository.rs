//! Repository trait 定義
//!
//! ドメイン層が必要とするデータストアへのインターフェースを定義します。
//! 具体的な実装は Infrastructure 層が提供します（依存性の逆転）。

use async_trait::async_trait;

use super::{
    Message, MessageContent, MessageFilter, MessageId, RepositoryError, Room, RoomId, RoomTitle,
    UserId,
};

/// Room Membership Store
///
/// Durable record of rooms and their members. Authorization decisions are
/// always taken against this store.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait RoomRepository: Send + Sync {
    /// Room を取得（存在しない場合は `RoomNotFound`）
    async fn get_room(&self, room_id: &RoomId) -> Result<Room, RepositoryError>;

    /// ユーザーがルームのメンバーかどうか（未知のルームでは false）
    async fn is_member(&self, room_id: &RoomId, user_id: &UserId) -> Result<bool, RepositoryError>;

    /// 新しいルームを作成
    async fn create_room(
        &self,
        title: RoomTitle,
        members: Vec<UserId>,
    ) -> Result<Room, RepositoryError>;

    /// 既存の Room エンティティをそのまま保存（シード投入用）
    async fn insert_room(&self, room: Room) -> Result<(), RepositoryError>;

    /// メンバーを追加
    async fn add_member(&self, room_id: &RoomId, user_id: UserId) -> Result<Room, RepositoryError>;

    /// メンバーを削除（空になったルームは非アクティブになる）
    async fn remove_member(
        &self,
        room_id: &RoomId,
        user_id: &UserId,
    ) -> Result<Room, RepositoryError>;

    /// ルームを削除
    async fn delete_room(&self, room_id: &RoomId) -> Result<(), RepositoryError>;

    /// 全てのルームを取得
    async fn list_rooms(&self) -> Result<Vec<Room>, RepositoryError>;
}

/// Message Store
///
/// Time-ordered log of messages per room. Listings are newest first.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait MessageRepository: Send + Sync {
    /// メッセージを追加（ID とタイムスタンプはストアが採番）
    async fn append(
        &self,
        room_id: &RoomId,
        sender_id: &UserId,
        content: MessageContent,
    ) -> Result<Message, RepositoryError>;

    /// メッセージ一覧を新しい順に取得
    async fn list(
        &self,
        room_id: &RoomId,
        offset: usize,
        limit: usize,
        filter: MessageFilter,
    ) -> Result<Vec<Message>, RepositoryError>;

    /// メッセージを一件取得
    async fn get(&self, room_id: &RoomId, message_id: MessageId)
    -> Result<Message, RepositoryError>;

    /// 既読フラグを立てる
    async fn mark_read(
        &self,
        room_id: &RoomId,
        message_id: MessageId,
    ) -> Result<Message, RepositoryError>;

    /// ルームのメッセージを全て削除（ルーム削除時のカスケード）
    async fn delete_room_messages(&self, room_id: &RoomId) -> Result<usize, RepositoryError>;
}
