//! UseCase: メッセージ送信処理（同期 API）
//!
//! ## テスト実装の作業記録
//!
//! ### 何をテストしているか
//! - SendMessageUseCase::execute() メソッド
//! - 永続化とルームへのブロードキャスト
//!
//! ### どのような状況を想定しているか
//! - 正常系：メンバーが送信し、ライブ接続中の全員（送信者を含む）に届く
//! - 異常系：メンバーでないユーザー、空・長すぎる本文、書き込み中のルーム削除
//! - エッジケース：誰もライブ接続していないルームへの送信（永続化のみ）

use std::sync::Arc;

use crate::domain::{
    Message, MessageContent, MessageRepository, RepositoryError, RoomEvent, RoomId,
    RoomRepository, UserId,
};

use super::{access::require_member, announce::RoomAnnouncer, error::ChatError};

/// メッセージ送信のユースケース
pub struct SendMessageUseCase {
    rooms: Arc<dyn RoomRepository>,
    messages: Arc<dyn MessageRepository>,
    announcer: Arc<RoomAnnouncer>,
}

impl SendMessageUseCase {
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

    /// メッセージ送信を実行
    ///
    /// メンバーシップの確認は書き込みより前に行う。永続化に成功した時点で
    /// 送信は成功とし、ブロードキャストの配信結果は戻り値に影響しない。
    ///
    /// # Returns
    ///
    /// * `Ok(Message)` - 永続化されたメッセージ（ID・タイムスタンプ採番済み）
    /// * `Err(ChatError)` - 認可・ルーム不在・入力不正・内部エラー
    pub async fn execute(
        &self,
        room_id: &RoomId,
        sender_id: &UserId,
        content: String,
    ) -> Result<Message, ChatError> {
        require_member(self.rooms.as_ref(), room_id, sender_id).await?;
        let content = MessageContent::new(content)?;

        let message = self.messages.append(room_id, sender_id, content).await?;

        // 書き込み中にルームが削除された場合、削除後に残ったログを片付ける
        if let Err(RepositoryError::RoomNotFound(id)) = self.rooms.get_room(room_id).await {
            tracing::warn!(
                "Room '{}' was deleted while message '{}' was being posted",
                room_id,
                message.id
            );
            self.messages.delete_room_messages(room_id).await?;
            return Err(RepositoryError::RoomNotFound(id).into());
        }
        tracing::info!(
            "User '{}' posted message '{}' to room '{}'",
            sender_id,
            message.id,
            room_id
        );

        let delivered = self
            .announcer
            .publish(room_id, RoomEvent::MessagePosted(message.clone()))
            .await;
        tracing::debug!("Message '{}' pushed to {} connections", message.id, delivered);

        Ok(message)
    }
}

#[cfg(test)]
mod tests {
    use std::sync::atomic::{AtomicUsize, Ordering};

    use super::*;
    use crate::{
        domain::{
            MessageFilter, Room, RoomTitle, Timestamp,
            pusher::MockMessagePusher,
            repository::{MockMessageRepository, MockRoomRepository},
        },
        infrastructure::registry::InMemoryConnectionRegistry,
        usecase::test_support::{Fixture, NOW, drain, room_id, user},
    };

    fn general_room() -> Room {
        Room::new(
            room_id("R1"),
            RoomTitle::new("General".to_string()).unwrap(),
            [user("alice")],
            Timestamp::new(NOW),
        )
    }

    fn announcer_with(pusher: MockMessagePusher) -> Arc<RoomAnnouncer> {
        Arc::new(RoomAnnouncer::new(
            Arc::new(InMemoryConnectionRegistry::new()),
            Arc::new(pusher),
        ))
    }

    fn create_usecase(fixture: &Fixture) -> SendMessageUseCase {
        SendMessageUseCase::new(
            fixture.rooms.clone(),
            fixture.messages.clone(),
            fixture.announcer.clone(),
        )
    }

    #[tokio::test]
    async fn test_member_message_is_persisted_and_broadcast() {
        // テスト項目: メンバーの送信は永続化され、送信者を含むライブ接続全員に届く
        // given (前提条件):
        let fixture = Fixture::new().await;
        let usecase = create_usecase(&fixture);
        let (_alice, mut alice_rx) = fixture.attach("R1", "alice").await;
        let (_bob, mut bob_rx) = fixture.attach("R1", "bob").await;

        // when (操作):
        let result = usecase
            .execute(&room_id("R1"), &user("alice"), "hello".to_string())
            .await;

        // then (期待する結果):
        let message = result.unwrap();
        assert_eq!(message.content.as_str(), "hello");
        assert_eq!(message.sender_id, user("alice"));

        for frames in [drain(&mut alice_rx), drain(&mut bob_rx)] {
            assert_eq!(frames.len(), 1);
            assert_eq!(frames[0]["type"], "message");
            assert_eq!(frames[0]["id"], message.id.to_string());
            assert_eq!(frames[0]["sender_id"], "alice");
            assert_eq!(frames[0]["content"], "hello");
        }

        let history = fixture
            .messages
            .list(&room_id("R1"), 0, 50, MessageFilter::default())
            .await
            .unwrap();
        assert_eq!(history.first(), Some(&message));
    }

    #[tokio::test]
    async fn test_message_is_persisted_when_nobody_is_live() {
        // テスト項目: ライブ接続が無くても永続化は成功する
        // given (前提条件):
        let fixture = Fixture::new().await;
        let usecase = create_usecase(&fixture);

        // when (操作):
        let result = usecase
            .execute(&room_id("R1"), &user("bob"), "anyone?".to_string())
            .await;

        // then (期待する結果):
        assert!(result.is_ok());
        let history = fixture
            .messages
            .list(&room_id("R1"), 0, 50, MessageFilter::default())
            .await
            .unwrap();
        assert_eq!(history.len(), 1);
    }

    #[tokio::test]
    async fn test_non_member_is_rejected_before_any_write() {
        // テスト項目: メンバーでないユーザーの送信は書き込み前に拒否される
        // given (前提条件):
        let mut rooms = MockRoomRepository::new();
        rooms.expect_get_room().returning(|_| Ok(general_room()));
        rooms.expect_is_member().returning(|_, _| Ok(false));
        let mut messages = MockMessageRepository::new();
        messages.expect_append().times(0);
        let mut pusher = MockMessagePusher::new();
        pusher.expect_broadcast().times(0);
        let usecase =
            SendMessageUseCase::new(Arc::new(rooms), Arc::new(messages), announcer_with(pusher));

        // when (操作):
        let result = usecase
            .execute(&room_id("R1"), &user("mallory"), "sneaky".to_string())
            .await;

        // then (期待する結果):
        assert_eq!(
            result,
            Err(ChatError::Authorization {
                room_id: "R1".to_string(),
                user_id: "mallory".to_string(),
            })
        );
    }

    #[tokio::test]
    async fn test_invalid_content_is_validation_error() {
        // テスト項目: 空白のみ・長すぎる本文は入力エラーになり保存されない
        // given (前提条件):
        let fixture = Fixture::new().await;
        let usecase = create_usecase(&fixture);
        let too_long = "a".repeat(crate::domain::value_object::MAX_MESSAGE_LENGTH + 1);

        // when (操作):
        let blank = usecase
            .execute(&room_id("R1"), &user("alice"), "   ".to_string())
            .await;
        let long = usecase
            .execute(&room_id("R1"), &user("alice"), too_long)
            .await;

        // then (期待する結果):
        assert!(matches!(blank, Err(ChatError::Validation(_))));
        assert!(matches!(long, Err(ChatError::Validation(_))));
        let history = fixture
            .messages
            .list(&room_id("R1"), 0, 50, MessageFilter::default())
            .await
            .unwrap();
        assert!(history.is_empty());
    }

    #[tokio::test]
    async fn test_store_failure_is_internal_and_not_broadcast() {
        // テスト項目: 永続化に失敗した場合は Internal を返し、通知もしない
        // given (前提条件):
        let fixture = Fixture::new().await;
        let mut messages = MockMessageRepository::new();
        messages
            .expect_append()
            .times(1)
            .returning(|_, _, _| Err(crate::domain::RepositoryError::Storage("down".to_string())));
        let mut pusher = MockMessagePusher::new();
        pusher.expect_broadcast().times(0);
        let usecase =
            SendMessageUseCase::new(fixture.rooms.clone(), Arc::new(messages), announcer_with(pusher));

        // when (操作):
        let result = usecase
            .execute(&room_id("R1"), &user("alice"), "hello".to_string())
            .await;

        // then (期待する結果):
        assert!(matches!(result, Err(ChatError::Internal(_))));
    }

    #[tokio::test]
    async fn test_room_deleted_during_post_leaves_no_messages_behind() {
        // テスト項目: 認可の後、書き込み中にルームが削除された場合はメッセージを残さず NotFound を返す
        // given (前提条件):
        let fixture = Fixture::new().await;
        let lookups = Arc::new(AtomicUsize::new(0));
        let mut rooms = MockRoomRepository::new();
        let counter = lookups.clone();
        rooms.expect_get_room().returning(move |id| {
            if counter.fetch_add(1, Ordering::SeqCst) == 0 {
                Ok(general_room())
            } else {
                Err(RepositoryError::RoomNotFound(id.as_str().to_string()))
            }
        });
        rooms.expect_is_member().returning(|_, _| Ok(true));
        let mut pusher = MockMessagePusher::new();
        pusher.expect_broadcast().times(0);
        let usecase =
            SendMessageUseCase::new(Arc::new(rooms), fixture.messages.clone(), announcer_with(pusher));

        // when (操作):
        let result = usecase
            .execute(&room_id("R1"), &user("alice"), "too late".to_string())
            .await;

        // then (期待する結果):
        assert!(matches!(result, Err(ChatError::NotFound(_))));
        assert_eq!(lookups.load(Ordering::SeqCst), 2);
        let history = fixture
            .messages
            .list(&room_id("R1"), 0, 50, MessageFilter::default())
            .await
            .unwrap();
        assert!(history.is_empty());
    }
}
