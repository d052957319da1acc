//! HTTP error responses.

use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};

use crate::{infrastructure::dto::http::ErrorBody, usecase::ChatError};

/// Usecase error rendered as a JSON error body
#[derive(Debug)]
pub struct ApiError(pub ChatError);

impl From<ChatError> for ApiError {
    fn from(error: ChatError) -> Self {
        Self(error)
    }
}

impl ApiError {
    pub fn status(&self) -> StatusCode {
        match &self.0 {
            ChatError::Authentication(_) => StatusCode::UNAUTHORIZED,
            ChatError::Authorization { .. } => StatusCode::FORBIDDEN,
            ChatError::NotFound(_) => StatusCode::NOT_FOUND,
            ChatError::Validation(_) => StatusCode::BAD_REQUEST,
            ChatError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = self.status();
        let body = match &self.0 {
            ChatError::Internal(details) => {
                tracing::error!("Internal error: {}", details);
                ErrorBody {
                    code: status.as_u16(),
                    message: "Internal server error".to_string(),
                    details: None,
                }
            }
            other => {
                tracing::debug!("Request failed: {}", other);
                ErrorBody {
                    code: status.as_u16(),
                    message: other.to_string(),
                    details: None,
                }
            }
        };
        (status, Json(body)).into_response()
    }
}
