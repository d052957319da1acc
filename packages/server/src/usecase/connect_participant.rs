//! UseCase: 参加者接続処理
//!
//! live channel の認証フレームを受け取ったときの処理。
//!
//! 1. 資格情報を検証してユーザー ID を得る
//! 2. ルームの存在とメンバーシップを確認する
//! 3. 呼び出し側が本人に成功を返したあと、接続をレジストリに登録し、
//!    最初の接続であればルームに「参加」イベントを通知する（新しい接続自身も含む）

use std::sync::Arc;

use crate::domain::{ConnectionHandle, IdentityVerifier, RoomId, RoomRepository, UserId};

use super::{
    access::{require_member, verify_credential},
    announce::RoomAnnouncer,
    error::ChatError,
};

/// 参加者接続のユースケース
pub struct ConnectParticipantUseCase {
    identity: Arc<dyn IdentityVerifier>,
    rooms: Arc<dyn RoomRepository>,
    announcer: Arc<RoomAnnouncer>,
}

impl ConnectParticipantUseCase {
    pub fn new(
        identity: Arc<dyn IdentityVerifier>,
        rooms: Arc<dyn RoomRepository>,
        announcer: Arc<RoomAnnouncer>,
    ) -> Self {
        Self {
            identity,
            rooms,
            announcer,
        }
    }

    /// 参加者接続を実行（認証と認可のみ、レジストリは変更しない）
    ///
    /// # Returns
    ///
    /// * `Ok(UserId)` - 接続を許可されたユーザー
    /// * `Err(ChatError)` - 認証・認可・ルーム不在・内部エラー
    pub async fn execute(&self, room_id: &RoomId, credential: &str) -> Result<UserId, ChatError> {
        let user_id = verify_credential(self.identity.as_ref(), credential).await?;
        require_member(self.rooms.as_ref(), room_id, &user_id).await?;
        Ok(user_id)
    }

    /// 許可された接続をレジストリに登録し、必要なら「参加」を通知
    ///
    /// # Returns
    ///
    /// このルームでのユーザーの最初のライブ接続か（二本目以降は通知しない）
    pub async fn join(&self, room_id: &RoomId, user_id: UserId, handle: ConnectionHandle) -> bool {
        tracing::info!("User '{}' connected to room '{}'", user_id, room_id);
        self.announcer.admit(room_id, user_id, handle).await
    }
}
