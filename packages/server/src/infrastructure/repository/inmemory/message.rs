//! InMemory Message Repository 実装

use std::{collections::HashMap, sync::Arc};

use async_trait::async_trait;
use parley_shared::time::Clock;
use tokio::sync::Mutex;

use crate::domain::{
    Message, MessageContent, MessageFilter, MessageId, MessageRepository, RepositoryError, RoomId,
    Timestamp, UserId,
};

/// インメモリ Message Repository 実装
///
/// Messages of a room are kept in append order, so the newest message is
/// always last regardless of clock resolution.
pub struct InMemoryMessageRepository {
    messages: Mutex<HashMap<RoomId, Vec<Message>>>,
    clock: Arc<dyn Clock>,
}

impl InMemoryMessageRepository {
    pub fn new(clock: Arc<dyn Clock>) -> Self {
        Self {
            messages: Mutex::new(HashMap::new()),
            clock,
        }
    }
}

fn message_not_found(message_id: MessageId) -> RepositoryError {
    RepositoryError::MessageNotFound(message_id.to_string())
}

#[async_trait]
impl MessageRepository for InMemoryMessageRepository {
    async fn append(
        &self,
        room_id: &RoomId,
        sender_id: &UserId,
        content: MessageContent,
    ) -> Result<Message, RepositoryError> {
        let message = Message {
            id: MessageId::generate(),
            room_id: room_id.clone(),
            sender_id: sender_id.clone(),
            content,
            created_at: Timestamp::new(self.clock.now_millis()),
            is_read: false,
        };

        let mut messages = self.messages.lock().await;
        messages
            .entry(room_id.clone())
            .or_default()
            .push(message.clone());
        tracing::debug!("Message '{}' stored in room '{}'", message.id, room_id);

        Ok(message)
    }

    async fn list(
        &self,
        room_id: &RoomId,
        offset: usize,
        limit: usize,
        filter: MessageFilter,
    ) -> Result<Vec<Message>, RepositoryError> {
        let messages = self.messages.lock().await;
        let Some(log) = messages.get(room_id) else {
            return Ok(Vec::new());
        };

        Ok(log
            .iter()
            .rev()
            .filter(|message| filter.matches(message))
            .skip(offset)
            .take(limit)
            .cloned()
            .collect())
    }

    async fn get(
        &self,
        room_id: &RoomId,
        message_id: MessageId,
    ) -> Result<Message, RepositoryError> {
        let messages = self.messages.lock().await;
        messages
            .get(room_id)
            .and_then(|log| log.iter().find(|m| m.id == message_id))
            .cloned()
            .ok_or_else(|| message_not_found(message_id))
    }

    async fn mark_read(
        &self,
        room_id: &RoomId,
        message_id: MessageId,
    ) -> Result<Message, RepositoryError> {
        let mut messages = self.messages.lock().await;
        let message = messages
            .get_mut(room_id)
            .and_then(|log| log.iter_mut().find(|m| m.id == message_id))
            .ok_or_else(|| message_not_found(message_id))?;
        message.is_read = true;
        Ok(message.clone())
    }

    async fn delete_room_messages(&self, room_id: &RoomId) -> Result<usize, RepositoryError> {
        let mut messages = self.messages.lock().await;
        Ok(messages.remove(room_id).map_or(0, |log| log.len()))
    }
}
