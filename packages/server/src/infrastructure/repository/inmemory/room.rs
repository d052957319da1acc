//! InMemory Room Repository 実装
//!
//! ドメイン層が定義する RoomRepository trait の具体的な実装。

use std::{collections::HashMap, sync::Arc};

use async_trait::async_trait;
use parley_shared::time::Clock;
use tokio::sync::Mutex;

use crate::domain::{RepositoryError, Room, RoomId, RoomRepository, RoomTitle, Timestamp, UserId};

/// インメモリ Room Repository 実装
pub struct InMemoryRoomRepository {
    /// room_id → Room
    rooms: Mutex<HashMap<RoomId, Room>>,
    clock: Arc<dyn Clock>,
}

impl InMemoryRoomRepository {
    /// 新しい InMemoryRoomRepository を作成
    pub fn new(clock: Arc<dyn Clock>) -> Self {
        Self {
            rooms: Mutex::new(HashMap::new()),
            clock,
        }
    }

    fn now(&self) -> Timestamp {
        Timestamp::new(self.clock.now_millis())
    }
}

fn not_found(room_id: &RoomId) -> RepositoryError {
    RepositoryError::RoomNotFound(room_id.as_str().to_string())
}

#[async_trait]
impl RoomRepository for InMemoryRoomRepository {
    async fn get_room(&self, room_id: &RoomId) -> Result<Room, RepositoryError> {
        let rooms = self.rooms.lock().await;
        rooms.get(room_id).cloned().ok_or_else(|| not_found(room_id))
    }

    async fn is_member(&self, room_id: &RoomId, user_id: &UserId) -> Result<bool, RepositoryError> {
        let rooms = self.rooms.lock().await;
        Ok(rooms
            .get(room_id)
            .is_some_and(|room| room.is_member(user_id)))
    }

    async fn create_room(
        &self,
        title: RoomTitle,
        members: Vec<UserId>,
    ) -> Result<Room, RepositoryError> {
        let room = Room::new(RoomId::generate(), title, members, self.now());
        let mut rooms = self.rooms.lock().await;
        rooms.insert(room.id.clone(), room.clone());
        tracing::debug!("Room '{}' created", room.id);
        Ok(room)
    }

    async fn insert_room(&self, room: Room) -> Result<(), RepositoryError> {
        let mut rooms = self.rooms.lock().await;
        if rooms.contains_key(&room.id) {
            return Err(RepositoryError::RoomAlreadyExists(
                room.id.as_str().to_string(),
            ));
        }
        rooms.insert(room.id.clone(), room);
        Ok(())
    }

    async fn add_member(&self, room_id: &RoomId, user_id: UserId) -> Result<Room, RepositoryError> {
        let now = self.now();
        let mut rooms = self.rooms.lock().await;
        let room = rooms.get_mut(room_id).ok_or_else(|| not_found(room_id))?;
        room.add_member(user_id, now);
        Ok(room.clone())
    }

    async fn remove_member(
        &self,
        room_id: &RoomId,
        user_id: &UserId,
    ) -> Result<Room, RepositoryError> {
        let now = self.now();
        let mut rooms = self.rooms.lock().await;
        let room = rooms.get_mut(room_id).ok_or_else(|| not_found(room_id))?;
        room.remove_member(user_id, now);
        Ok(room.clone())
    }

    async fn delete_room(&self, room_id: &RoomId) -> Result<(), RepositoryError> {
        let mut rooms = self.rooms.lock().await;
        rooms
            .remove(room_id)
            .map(|_| ())
            .ok_or_else(|| not_found(room_id))
    }

    async fn list_rooms(&self) -> Result<Vec<Room>, RepositoryError> {
        let rooms = self.rooms.lock().await;
        let mut list: Vec<Room> = rooms.values().cloned().collect();
        list.sort_by(|a, b| a.id.cmp(&b.id));
        Ok(list)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use parley_shared::time::FixedClock;

    // ========================================
    // テスト作業記録
    // ========================================
    // 【何をテストするか】
    // - InMemoryRoomRepository のルーム作成・取得・削除
    // - メンバーの追加・削除とアクティブ状態の遷移
    // - 存在しないルームに対するエラー
    // ========================================

    fn create_test_repository() -> InMemoryRoomRepository {
        InMemoryRoomRepository::new(Arc::new(FixedClock::new(1000)))
    }

    fn user(id: &str) -> UserId {
        UserId::new(id.to_string()).unwrap()
    }

    fn title(value: &str) -> RoomTitle {
        RoomTitle::new(value.to_string()).unwrap()
    }

    #[tokio::test]
    async fn test_create_and_get_room() {
        // テスト項目: 作成したルームを取得できる
        // given (前提条件):
        let repo = create_test_repository();

        // when (操作):
        let created = repo
            .create_room(title("Lobby"), vec![user("alice"), user("bob")])
            .await
            .unwrap();
        let fetched = repo.get_room(&created.id).await.unwrap();

        // then (期待する結果):
        assert_eq!(created, fetched);
        assert!(fetched.is_active);
        assert_eq!(fetched.created_at, Timestamp::new(1000));
    }

    #[tokio::test]
    async fn test_get_unknown_room_returns_not_found() {
        // テスト項目: 存在しないルームの取得は RoomNotFound になる
        // given (前提条件):
        let repo = create_test_repository();
        let room_id = RoomId::new("missing".to_string()).unwrap();

        // when (操作):
        let result = repo.get_room(&room_id).await;

        // then (期待する結果):
        assert_eq!(
            result,
            Err(RepositoryError::RoomNotFound("missing".to_string()))
        );
    }

    #[tokio::test]
    async fn test_is_member_for_unknown_room_is_false() {
        // テスト項目: 存在しないルームではメンバー判定が false になる（エラーにならない）
        // given (前提条件):
        let repo = create_test_repository();
        let room_id = RoomId::new("missing".to_string()).unwrap();

        // when (操作):
        let result = repo.is_member(&room_id, &user("alice")).await;

        // then (期待する結果):
        assert_eq!(result, Ok(false));
    }

    #[tokio::test]
    async fn test_remove_last_member_deactivates_room() {
        // テスト項目: 最後のメンバーを削除するとルームが非アクティブになる
        // given (前提条件):
        let repo = create_test_repository();
        let room = repo
            .create_room(title("Pair"), vec![user("alice")])
            .await
            .unwrap();

        // when (操作):
        let updated = repo.remove_member(&room.id, &user("alice")).await.unwrap();

        // then (期待する結果):
        assert!(!updated.is_active);
        assert!(!repo.is_member(&room.id, &user("alice")).await.unwrap());
    }

    #[tokio::test]
    async fn test_add_member_is_visible_to_is_member() {
        // テスト項目: 追加したメンバーが is_member で確認できる
        // given (前提条件):
        let repo = create_test_repository();
        let room = repo.create_room(title("Open"), vec![]).await.unwrap();

        // when (操作):
        let updated = repo.add_member(&room.id, user("carol")).await.unwrap();

        // then (期待する結果):
        assert!(updated.is_active);
        assert!(repo.is_member(&room.id, &user("carol")).await.unwrap());
    }

    #[tokio::test]
    async fn test_insert_room_rejects_duplicate_id() {
        // テスト項目: 同じ ID のルームを二重に登録できない
        // given (前提条件):
        let repo = create_test_repository();
        let room = Room::new(
            RoomId::new("R1".to_string()).unwrap(),
            title("Seeded"),
            vec![user("alice")],
            Timestamp::new(1),
        );
        repo.insert_room(room.clone()).await.unwrap();

        // when (操作):
        let result = repo.insert_room(room).await;

        // then (期待する結果):
        assert_eq!(
            result,
            Err(RepositoryError::RoomAlreadyExists("R1".to_string()))
        );
    }

    #[tokio::test]
    async fn test_delete_room_removes_it_from_listing() {
        // テスト項目: 削除したルームは一覧から消える
        // given (前提条件):
        let repo = create_test_repository();
        let room = repo
            .create_room(title("Temp"), vec![user("alice")])
            .await
            .unwrap();

        // when (操作):
        repo.delete_room(&room.id).await.unwrap();

        // then (期待する結果):
        assert!(repo.list_rooms().await.unwrap().is_empty());
        assert!(repo.delete_room(&room.id).await.is_err());
    }
}
