//! Seed file loading.
//!
//! ```json
//! {
//!   "rooms": [{ "id": "R1", "title": "Lobby", "members": ["alice", "bob"] }],
//!   "tokens": { "token-alice": "alice", "token-bob": "bob" }
//! }
//! ```

use std::{collections::HashMap, path::Path};

use serde::Deserialize;
use thiserror::Error;

use crate::{
    domain::{
        RepositoryError, Room, RoomId, RoomRepository, RoomTitle, Timestamp, UserId,
        ValueObjectError,
    },
    infrastructure::identity::StaticTokenVerifier,
};

#[derive(Debug, Error)]
pub enum SeedError {
    #[error("Failed to read seed file: {0}")]
    Io(#[from] std::io::Error),

    #[error("Failed to parse seed file: {0}")]
    Parse(#[from] serde_json::Error),

    #[error("Invalid seed entry: {0}")]
    Invalid(#[from] ValueObjectError),

    #[error("Failed to store seed room: {0}")]
    Repository(#[from] RepositoryError),
}

#[derive(Debug, Clone, Deserialize)]
pub struct SeedRoom {
    pub id: String,
    pub title: String,
    #[serde(default)]
    pub members: Vec<String>,
}

/// Rooms and credentials to start the server with
#[derive(Debug, Clone, Default, Deserialize)]
pub struct Seed {
    #[serde(default)]
    pub rooms: Vec<SeedRoom>,
    /// credential → user id
    #[serde(default)]
    pub tokens: HashMap<String, String>,
}

impl Seed {
    pub fn from_path(path: &Path) -> Result<Self, SeedError> {
        let raw = std::fs::read_to_string(path)?;
        Self::from_json(&raw)
    }

    pub fn from_json(raw: &str) -> Result<Self, SeedError> {
        Ok(serde_json::from_str(raw)?)
    }

    /// Store every seed room. Returns the number of rooms stored.
    pub async fn load_rooms(
        &self,
        repository: &dyn RoomRepository,
        now: Timestamp,
    ) -> Result<usize, SeedError> {
        for seed_room in &self.rooms {
            let members = seed_room
                .members
                .iter()
                .map(|member| UserId::new(member.clone()))
                .collect::<Result<Vec<_>, _>>()?;
            let room = Room::new(
                RoomId::new(seed_room.id.clone())?,
                RoomTitle::new(seed_room.title.clone())?,
                members,
                now,
            );
            repository.insert_room(room).await?;
            tracing::info!("Seeded room '{}' ({})", seed_room.id, seed_room.title);
        }
        Ok(self.rooms.len())
    }

    pub fn verifier(&self) -> Result<StaticTokenVerifier, SeedError> {
        let tokens = self
            .tokens
            .iter()
            .map(|(token, user_id)| {
                UserId::new(user_id.clone()).map(|user_id| (token.clone(), user_id))
            })
            .collect::<Result<HashMap<_, _>, _>>()?;
        Ok(StaticTokenVerifier::new(tokens))
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use super::*;
    use crate::{domain::IdentityVerifier, infrastructure::repository::InMemoryRoomRepository};
    use parley_shared::time::FixedClock;

    const SEED: &str = r#"{
        "rooms": [
            { "id": "R1", "title": "Lobby", "members": ["alice", "bob"] },
            { "id": "R2", "title": "Empty" }
        ],
        "tokens": { "token-alice": "alice" }
    }"#;

    #[tokio::test]
    async fn test_seed_rooms_are_loaded() {
        // テスト項目: シードのルームがリポジトリに登録される
        // given (前提条件):
        let seed = Seed::from_json(SEED).unwrap();
        let repo = InMemoryRoomRepository::new(Arc::new(FixedClock::new(0)));

        // when (操作):
        let count = seed.load_rooms(&repo, Timestamp::new(10)).await.unwrap();

        // then (期待する結果):
        assert_eq!(count, 2);
        let r1 = repo
            .get_room(&RoomId::new("R1".to_string()).unwrap())
            .await
            .unwrap();
        assert_eq!(r1.member_count(), 2);
        assert!(r1.is_active);
        let r2 = repo
            .get_room(&RoomId::new("R2".to_string()).unwrap())
            .await
            .unwrap();
        assert!(!r2.is_active);
    }

    #[tokio::test]
    async fn test_seed_tokens_build_verifier() {
        // テスト項目: シードのトークンから検証器が構築される
        // given (前提条件):
        let seed = Seed::from_json(SEED).unwrap();

        // when (操作):
        let verifier = seed.verifier().unwrap();

        // then (期待する結果):
        assert_eq!(verifier.len(), 1);
        assert_eq!(
            verifier.verify("token-alice").await.unwrap().as_str(),
            "alice"
        );
    }

    #[test]
    fn test_invalid_seed_json_is_rejected() {
        // テスト項目: 不正な JSON のシードはエラーになる
        // given (前提条件):
        let raw = "{ rooms: ";

        // when (操作):
        let result = Seed::from_json(raw);

        // then (期待する結果):
        assert!(matches!(result, Err(SeedError::Parse(_))));
    }

    #[tokio::test]
    async fn test_seed_with_blank_member_is_rejected() {
        // テスト項目: 空のユーザー ID を含むシードは拒否される
        // given (前提条件):
        let seed =
            Seed::from_json(r#"{"rooms":[{"id":"R1","title":"T","members":[""]}]}"#).unwrap();
        let repo = InMemoryRoomRepository::new(Arc::new(FixedClock::new(0)));

        // when (操作):
        let result = seed.load_rooms(&repo, Timestamp::new(0)).await;

        // then (期待する結果):
        assert!(matches!(result, Err(SeedError::Invalid(_))));
    }
}
