//! UI layer: axum routes, the live channel session and server lifecycle.

mod handler;
mod server;
pub mod session;
mod signal;
pub mod state; // UseCase 層の組み立てを bin / テストから行うため public

pub use server::Server;
pub use state::AppState;
