//! UseCase 層のエラー定義
//!
//! 外部コラボレータ（ストア・認証基盤）のエラーはここで分類し直し、
//! そのまま上位層へ漏らさない。

use thiserror::Error;

use crate::domain::{IdentityError, RepositoryError, ValueObjectError};

/// Error taxonomy shared by every usecase
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ChatError {
    /// Bad or expired credential
    #[error("Authentication failed: {0}")]
    Authentication(String),

    /// Valid identity, but not allowed to act on the room
    #[error("User '{user_id}' is not a participant of room '{room_id}'")]
    Authorization { room_id: String, user_id: String },

    /// Unknown room or message
    #[error("{0}")]
    NotFound(String),

    /// Malformed input
    #[error("Validation failed: {0}")]
    Validation(String),

    /// Store or identity provider fault
    #[error("Internal error: {0}")]
    Internal(String),
}

impl From<RepositoryError> for ChatError {
    fn from(error: RepositoryError) -> Self {
        match error {
            RepositoryError::RoomNotFound(_) | RepositoryError::MessageNotFound(_) => {
                Self::NotFound(error.to_string())
            }
            RepositoryError::RoomAlreadyExists(_) => Self::Validation(error.to_string()),
            RepositoryError::Storage(_) => Self::Internal(error.to_string()),
        }
    }
}

impl From<IdentityError> for ChatError {
    fn from(error: IdentityError) -> Self {
        match error {
            IdentityError::InvalidCredential => Self::Authentication(error.to_string()),
            IdentityError::Unavailable(_) => Self::Internal(error.to_string()),
        }
    }
}

impl From<ValueObjectError> for ChatError {
    fn from(error: ValueObjectError) -> Self {
        Self::Validation(error.to_string())
    }
}
