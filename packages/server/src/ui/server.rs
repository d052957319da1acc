//! Server execution logic.

use std::sync::Arc;

use axum::{
    Router,
    routing::{get, patch, post},
};
use tokio::net::TcpListener;
use tower_http::trace::TraceLayer;

use super::{
    handler::{
        create_room, delete_room, get_active_users, get_connection_status, get_message,
        get_messages, get_room_connection_status, get_room_detail, get_rooms, health_check,
        join_room, leave_room, mark_message_read, send_message, websocket_handler,
    },
    signal::shutdown_signal,
    state::AppState,
};

/// Chat room server
///
/// # Example
///
/// ```ignore
/// let server = Server::new(app_state);
/// let listener = tokio::net::TcpListener::bind("127.0.0.1:8080").await?;
/// server.serve(listener).await?;
/// ```
pub struct Server {
    app_state: Arc<AppState>,
}

impl Server {
    pub fn new(app_state: AppState) -> Self {
        Self {
            app_state: Arc::new(app_state),
        }
    }

    /// Build the router with every route of the chat API
    pub fn router(&self) -> Router {
        Router::new()
            // WebSocket エンドポイント
            .route("/api/ws/chat/{room_id}", get(websocket_handler))
            // HTTP エンドポイント
            .route("/api/health", get(health_check))
            .route("/api/chat/{room_id}", post(send_message).get(get_messages))
            .route("/api/chat/{room_id}/messages/{message_id}", get(get_message))
            .route(
                "/api/chat/{room_id}/messages/{message_id}/read",
                patch(mark_message_read),
            )
            .route("/api/chat/{room_id}/active-users", get(get_active_users))
            .route("/api/ws/status", get(get_connection_status))
            .route("/api/ws/status/{room_id}", get(get_room_connection_status))
            .route("/api/chatrooms", get(get_rooms).post(create_room))
            .route(
                "/api/chatrooms/{room_id}",
                get(get_room_detail).delete(delete_room),
            )
            .route("/api/chatrooms/{room_id}/join", post(join_room))
            .route("/api/chatrooms/{room_id}/leave", post(leave_room))
            .layer(TraceLayer::new_for_http())
            .with_state(self.app_state.clone())
    }

    /// Run the server on `listener` until Ctrl+C or SIGTERM
    ///
    /// # Errors
    ///
    /// Returns an error if the listener fails during server execution.
    pub async fn serve(self, listener: TcpListener) -> std::io::Result<()> {
        let app = self.router();

        tracing::info!("Chat server listening on {}", listener.local_addr()?);
        tracing::info!("Press Ctrl+C to shutdown gracefully");

        axum::serve(listener, app)
            .with_graceful_shutdown(shutdown_signal())
            .await?;

        tracing::info!("Server shutdown complete");
        Ok(())
    }
}
