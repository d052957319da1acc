//! Parley chat room server library.
//!
//! Tracks which users are live-connected to which rooms, fans room events out
//! to those connections, and routes message creation through a synchronous,
//! durable path.

// layers
pub mod domain;
pub mod infrastructure;
pub mod ui;
pub mod usecase;
