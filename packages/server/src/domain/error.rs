//! Domain error types.

use thiserror::Error;

/// Value object construction failures
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ValueObjectError {
    #[error("{0} must not be empty")]
    Empty(&'static str),

    #[error("{field} must be at most {max} long")]
    TooLong { field: &'static str, max: usize },

    #[error("{0} must not have leading or trailing whitespace")]
    SurroundingWhitespace(&'static str),

    #[error("{0} has an invalid format")]
    InvalidFormat(&'static str),
}

/// Store failures reported by repository implementations
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum RepositoryError {
    #[error("Room '{0}' not found")]
    RoomNotFound(String),

    #[error("Message '{0}' not found")]
    MessageNotFound(String),

    #[error("Room '{0}' already exists")]
    RoomAlreadyExists(String),

    #[error("Storage failure: {0}")]
    Storage(String),
}

/// Identity provider failures
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum IdentityError {
    #[error("Invalid or expired credential")]
    InvalidCredential,

    #[error("Identity provider unavailable: {0}")]
    Unavailable(String),
}

/// Delivery failures of the message pusher
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum MessagePushError {
    #[error("Connection '{0}' is closed")]
    ConnectionClosed(String),

    #[error("Failed to encode event: {0}")]
    Encode(String),
}
