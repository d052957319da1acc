//! UseCase: ルームのプレゼンス（誰がライブ接続しているか）に関する問い合わせと通知

use std::{collections::BTreeSet, sync::Arc};

use crate::domain::{ConnectionRegistry, Room, RoomEvent, RoomId, RoomRepository, UserId};

use super::{access::require_member, announce::RoomAnnouncer, error::ChatError};

/// プレゼンス問い合わせのユースケース
pub struct RoomPresenceUseCase {
    rooms: Arc<dyn RoomRepository>,
    registry: Arc<dyn ConnectionRegistry>,
    announcer: Arc<RoomAnnouncer>,
}

impl RoomPresenceUseCase {
    pub fn new(
        rooms: Arc<dyn RoomRepository>,
        registry: Arc<dyn ConnectionRegistry>,
        announcer: Arc<RoomAnnouncer>,
    ) -> Self {
        Self {
            rooms,
            registry,
            announcer,
        }
    }

    /// ライブ接続中のユーザー（認証済みセッションからの問い合わせ用）
    pub async fn active_users(&self, room_id: &RoomId) -> BTreeSet<UserId> {
        self.registry.list_active_users(room_id).await
    }

    /// ライブ接続中のユーザー（同期 API 用、メンバーのみ）
    pub async fn active_users_for_member(
        &self,
        room_id: &RoomId,
        user_id: &UserId,
    ) -> Result<BTreeSet<UserId>, ChatError> {
        require_member(self.rooms.as_ref(), room_id, user_id).await?;
        Ok(self.registry.list_active_users(room_id).await)
    }

    /// ルーム情報とライブ接続中のユーザー数
    pub async fn room_info(&self, room_id: &RoomId) -> Result<(Room, usize), ChatError> {
        let room = self.rooms.get_room(room_id).await?;
        let active = self.registry.list_active_users(room_id).await.len();
        Ok((room, active))
    }

    /// 入力中インジケータをルームに通知
    pub async fn notify_typing(&self, room_id: &RoomId, user_id: &UserId, is_typing: bool) {
        self.announcer
            .publish(
                room_id,
                RoomEvent::Typing {
                    user_id: user_id.clone(),
                    is_typing,
                },
            )
            .await;
    }

    /// ライブ接続のあるルームごとのユーザー一覧（運用向けステータス）
    pub async fn connection_status(&self) -> Vec<(RoomId, BTreeSet<UserId>)> {
        self.registry.snapshot().await
    }
}
