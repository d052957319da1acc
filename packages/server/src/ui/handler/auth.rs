//! Bearer credential extraction.

use axum::{
    extract::FromRequestParts,
    http::{header, request::Parts},
};

use crate::usecase::ChatError;

use super::error::ApiError;

/// Raw credential from `Authorization: Bearer <token>`
#[derive(Debug, Clone)]
pub struct BearerToken(pub String);

impl<S> FromRequestParts<S> for BearerToken
where
    S: Send + Sync,
{
    type Rejection = ApiError;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        parts
            .headers
            .get(header::AUTHORIZATION)
            .and_then(|value| value.to_str().ok())
            .and_then(|value| value.strip_prefix("Bearer "))
            .map(str::trim)
            .filter(|token| !token.is_empty())
            .map(|token| Self(token.to_string()))
            .ok_or_else(|| {
                ApiError(ChatError::Authentication(
                    "Missing bearer credential".to_string(),
                ))
            })
    }
}
