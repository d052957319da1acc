//! Utilities shared by the Parley binaries and libraries.

pub mod logger;
pub mod time;
