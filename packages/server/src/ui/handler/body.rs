//! JSON request bodies with the API's error shape.

use axum::{
    Json,
    extract::{FromRequest, Request, rejection::JsonRejection},
};

use crate::usecase::ChatError;

use super::error::ApiError;

/// `Json<T>` whose rejections (bad syntax, wrong shape, missing content type)
/// are reported as a 400 `{"code","message"}` body.
pub struct ApiJson<T>(pub T);

impl<S, T> FromRequest<S> for ApiJson<T>
where
    Json<T>: FromRequest<S, Rejection = JsonRejection>,
    S: Send + Sync,
{
    type Rejection = ApiError;

    async fn from_request(req: Request, state: &S) -> Result<Self, Self::Rejection> {
        match Json::<T>::from_request(req, state).await {
            Ok(Json(value)) => Ok(Self(value)),
            Err(rejection) => {
                tracing::debug!("Rejected request body: {}", rejection.body_text());
                Err(ApiError(ChatError::Validation(format!(
                    "Invalid request body: {}",
                    rejection.body_text()
                ))))
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use axum::{
        body::Body,
        http::{StatusCode, header},
    };

    use super::*;
    use crate::infrastructure::dto::http::SendMessageRequest;

    fn request(content_type: Option<&str>, body: &str) -> Request {
        let mut builder = Request::builder().method("POST").uri("/api/chat/R1");
        if let Some(content_type) = content_type {
            builder = builder.header(header::CONTENT_TYPE, content_type);
        }
        builder.body(Body::from(body.to_string())).unwrap()
    }

    #[tokio::test]
    async fn test_valid_body_is_extracted() {
        // テスト項目: 正しい JSON 本文はそのまま取り出せる
        // given (前提条件):
        let req = request(Some("application/json"), r#"{"message":"hello"}"#);

        // when (操作):
        let result = ApiJson::<SendMessageRequest>::from_request(req, &()).await;

        // then (期待する結果):
        let Ok(ApiJson(body)) = result else {
            panic!("body should be accepted");
        };
        assert_eq!(body.message, "hello");
    }

    #[tokio::test]
    async fn test_malformed_body_is_bad_request() {
        // テスト項目: 壊れた JSON・欠けたフィールド・Content-Type なしはいずれも 400 になる
        // given (前提条件):
        let cases = [
            request(Some("application/json"), "{not json"),
            request(Some("application/json"), r#"{"text":"hello"}"#),
            request(None, r#"{"message":"hello"}"#),
        ];

        for req in cases {
            // when (操作):
            let result = ApiJson::<SendMessageRequest>::from_request(req, &()).await;

            // then (期待する結果):
            let Err(error) = result else {
                panic!("body should be rejected");
            };
            assert!(matches!(error.0, ChatError::Validation(_)));
            assert_eq!(error.status(), StatusCode::BAD_REQUEST);
        }
    }
}
