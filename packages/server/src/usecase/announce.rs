//! Room announcements with dead-connection follow-up.
//!
//! Every room event goes out through one [`RoomAnnouncer`]. Its lock covers a
//! registry change together with the `joined` / `left` event it causes, so
//! observers see presence events in the same order the registry changed.

use std::{collections::VecDeque, sync::Arc};

use tokio::sync::Mutex;

use crate::domain::{
    ConnectionHandle, ConnectionId, ConnectionRegistry, Departure, MessagePusher, RoomEvent,
    RoomId, UserId,
};

/// Publishes room events and presence transitions one at a time
pub struct RoomAnnouncer {
    registry: Arc<dyn ConnectionRegistry>,
    pusher: Arc<dyn MessagePusher>,
    gate: Mutex<()>,
}

impl RoomAnnouncer {
    pub fn new(registry: Arc<dyn ConnectionRegistry>, pusher: Arc<dyn MessagePusher>) -> Self {
        Self {
            registry,
            pusher,
            gate: Mutex::new(()),
        }
    }

    /// Broadcast `event` to the room. Returns the number of frames queued.
    pub async fn publish(&self, room_id: &RoomId, event: RoomEvent) -> usize {
        let _gate = self.gate.lock().await;
        self.fan_out(room_id, event).await
    }

    /// Register the connection and announce `joined` if it is the user's first
    /// one in the room. Returns whether it was the first.
    pub async fn admit(&self, room_id: &RoomId, user_id: UserId, handle: ConnectionHandle) -> bool {
        let _gate = self.gate.lock().await;
        let first = self
            .registry
            .register(room_id.clone(), user_id.clone(), handle)
            .await;
        if first {
            self.fan_out(room_id, RoomEvent::UserJoined(user_id)).await;
        }
        first
    }

    /// Unregister the connection and announce `left` if it was the user's last
    /// one in the room. `None` when the connection was not registered.
    pub async fn release(&self, room_id: &RoomId, connection_id: ConnectionId) -> Option<Departure> {
        let _gate = self.gate.lock().await;
        let departure = self.registry.unregister(room_id, connection_id).await?;
        if departure.last_connection {
            self.fan_out(room_id, RoomEvent::UserLeft(departure.user_id.clone()))
                .await;
        }
        Some(departure)
    }

    /// Broadcast `event`, then announce the departure of every user whose
    /// connection turned out to be dead. Terminates because each eviction
    /// removes a registry entry. Callers hold the gate.
    async fn fan_out(&self, room_id: &RoomId, event: RoomEvent) -> usize {
        let mut pending = VecDeque::from([event]);
        let mut delivered = 0;

        while let Some(event) = pending.pop_front() {
            let report = self.pusher.broadcast(room_id, &event).await;
            delivered += report.delivered;
            for user_id in report.evicted {
                tracing::info!(
                    "User '{}' dropped from room '{}' after a failed delivery",
                    user_id,
                    room_id
                );
                pending.push_back(RoomEvent::UserLeft(user_id));
            }
        }

        delivered
    }
}
