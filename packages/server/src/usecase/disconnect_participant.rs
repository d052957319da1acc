//! UseCase: 参加者切断処理
//!
//! 接続が閉じたとき（クライアントの切断、致命的エラー、アイドルタイムアウト）に
//! 一度だけ呼ばれる。未登録の接続に対しては何もしない。

use std::sync::Arc;

use crate::domain::{ConnectionId, RoomId, UserId};

use super::announce::RoomAnnouncer;

/// 参加者切断のユースケース
pub struct DisconnectParticipantUseCase {
    announcer: Arc<RoomAnnouncer>,
}

impl DisconnectParticipantUseCase {
    pub fn new(announcer: Arc<RoomAnnouncer>) -> Self {
        Self { announcer }
    }

    /// 参加者切断を実行
    ///
    /// 接続を登録解除し、そのユーザーの最後の接続であれば残りの参加者に
    /// 「退出」を通知する。判定と通知は登録・解除の順序どおりに行われる。
    ///
    /// # Returns
    ///
    /// 登録解除されたユーザー（未登録だった場合は `None`）
    pub async fn execute(&self, room_id: &RoomId, connection_id: ConnectionId) -> Option<UserId> {
        let departure = self.announcer.release(room_id, connection_id).await?;
        tracing::info!(
            "User '{}' disconnected from room '{}'",
            departure.user_id,
            room_id
        );
        Some(departure.user_id)
    }
}
