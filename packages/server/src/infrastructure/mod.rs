//! Infrastructure layer: concrete implementations of the domain interfaces.

pub mod dto;
pub mod identity;
pub mod message_pusher;
pub mod registry;
pub mod repository;
pub mod seed;
