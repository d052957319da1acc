//! Shared fixture for usecase and session tests: in-memory stores seeded with
//! two rooms and a token per user.

use std::{collections::HashMap, sync::Arc};

use parley_shared::time::FixedClock;
use tokio::sync::mpsc;

use crate::{
    domain::{ConnectionHandle, ConnectionRegistry, Room, RoomId, RoomRepository, RoomTitle, Timestamp, UserId},
    infrastructure::{
        identity::StaticTokenVerifier,
        message_pusher::WebSocketMessagePusher,
        registry::InMemoryConnectionRegistry,
        repository::{InMemoryMessageRepository, InMemoryRoomRepository},
    },
    usecase::RoomAnnouncer,
};

pub(crate) const NOW: i64 = 1_700_000_000_000;

pub(crate) fn room_id(value: &str) -> RoomId {
    RoomId::new(value.to_string()).unwrap()
}

pub(crate) fn user(value: &str) -> UserId {
    UserId::new(value.to_string()).unwrap()
}

pub(crate) struct Fixture {
    pub rooms: Arc<InMemoryRoomRepository>,
    pub messages: Arc<InMemoryMessageRepository>,
    pub registry: Arc<InMemoryConnectionRegistry>,
    pub pusher: Arc<WebSocketMessagePusher>,
    pub announcer: Arc<RoomAnnouncer>,
    pub identity: Arc<StaticTokenVerifier>,
}

impl Fixture {
    /// R1 "General" (alice, bob), R2 "Random" (carol); mallory belongs nowhere.
    /// Tokens are `token-<user>`.
    pub async fn new() -> Self {
        let clock = Arc::new(FixedClock::new(NOW));
        let rooms = Arc::new(InMemoryRoomRepository::new(clock.clone()));
        let messages = Arc::new(InMemoryMessageRepository::new(clock));
        let registry = Arc::new(InMemoryConnectionRegistry::new());
        let pusher = Arc::new(WebSocketMessagePusher::new(registry.clone()));
        let announcer = Arc::new(RoomAnnouncer::new(registry.clone(), pusher.clone()));

        for (id, title, members) in [
            ("R1", "General", vec!["alice", "bob"]),
            ("R2", "Random", vec!["carol"]),
        ] {
            let room = Room::new(
                room_id(id),
                RoomTitle::new(title.to_string()).unwrap(),
                members.into_iter().map(user),
                Timestamp::new(NOW),
            );
            rooms.insert_room(room).await.unwrap();
        }

        let tokens: HashMap<String, UserId> = ["alice", "bob", "carol", "mallory"]
            .into_iter()
            .map(|name| (format!("token-{name}"), user(name)))
            .collect();
        let identity = Arc::new(StaticTokenVerifier::new(tokens));

        Self {
            rooms,
            messages,
            registry,
            pusher,
            announcer,
            identity,
        }
    }

    /// Register a live connection directly, bypassing the connect usecase.
    pub async fn attach(
        &self,
        room: &str,
        name: &str,
    ) -> (ConnectionHandle, mpsc::UnboundedReceiver<String>) {
        let (tx, rx) = mpsc::unbounded_channel();
        let handle = ConnectionHandle::new(tx);
        self.registry
            .register(room_id(room), user(name), handle.clone())
            .await;
        (handle, rx)
    }
}

/// Every frame queued so far, decoded.
pub(crate) fn drain(rx: &mut mpsc::UnboundedReceiver<String>) -> Vec<serde_json::Value> {
    let mut frames = Vec::new();
    while let Ok(frame) = rx.try_recv() {
        frames.push(serde_json::from_str(&frame).unwrap());
    }
    frames
}
