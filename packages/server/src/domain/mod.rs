//! Domain layer.
//!
//! Value objects, entities and the interfaces this layer needs from the
//! outside world (stores, identity provider, connection registry, pusher).
//! Concrete implementations live in the infrastructure layer.

pub mod connection;
pub mod entity;
pub mod error;
pub mod identity;
pub mod pusher;
pub mod repository;
pub mod value_object;

pub use connection::{
    ConnectionHandle, ConnectionRegistry, Departure, LiveConnection, PusherChannel,
};
pub use entity::{Message, MessageFilter, Room};
pub use error::{IdentityError, MessagePushError, RepositoryError, ValueObjectError};
pub use identity::IdentityVerifier;
pub use pusher::{BroadcastReport, MessagePusher, RoomEvent};
pub use repository::{MessageRepository, RoomRepository};
pub use value_object::{
    ConnectionId, MessageContent, MessageId, RoomId, RoomTitle, Timestamp, UserId,
};
