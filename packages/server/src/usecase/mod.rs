//! UseCase layer.
//!
//! Each usecase orchestrates domain interfaces for one operation and
//! translates collaborator errors into [`ChatError`].

mod access;
mod announce;
pub mod authenticate;
pub mod connect_participant;
pub mod disconnect_participant;
pub mod error;
pub mod get_messages;
pub mod manage_room;
pub mod mark_message_read;
pub mod room_presence;
pub mod send_message;
#[cfg(test)]
pub(crate) mod test_support;

pub use announce::RoomAnnouncer;
pub use authenticate::AuthenticateUseCase;
pub use connect_participant::ConnectParticipantUseCase;
pub use disconnect_participant::DisconnectParticipantUseCase;
pub use error::ChatError;
pub use get_messages::{DEFAULT_PAGE_SIZE, GetMessagesUseCase, MAX_PAGE_SIZE};
pub use manage_room::ManageRoomUseCase;
pub use mark_message_read::MarkMessageReadUseCase;
pub use room_presence::RoomPresenceUseCase;
pub use send_message::SendMessageUseCase;
