//! Credential and membership checks shared by the usecases.

use crate::domain::{IdentityVerifier, Room, RoomId, RoomRepository, UserId};

use super::error::ChatError;

pub(crate) async fn verify_credential(
    identity: &dyn IdentityVerifier,
    credential: &str,
) -> Result<UserId, ChatError> {
    if credential.trim().is_empty() {
        return Err(ChatError::Authentication("Empty credential".to_string()));
    }
    Ok(identity.verify(credential).await?)
}

/// Load the room and make sure `user_id` is one of its members.
pub(crate) async fn require_member(
    rooms: &dyn RoomRepository,
    room_id: &RoomId,
    user_id: &UserId,
) -> Result<Room, ChatError> {
    let room = rooms.get_room(room_id).await?;
    if !rooms.is_member(room_id, user_id).await? {
        return Err(ChatError::Authorization {
            room_id: room_id.as_str().to_string(),
            user_id: user_id.as_str().to_string(),
        });
    }
    Ok(room)
}
