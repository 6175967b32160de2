// API Error Module
// One error taxonomy for both simulated surfaces. The OpenAI-compatible
// surface reports auth failures as a flat {"error": "..."} body while the
// Anthropic-compatible surface nests {"error": {"type", "message"}}.

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;

/// Which simulated API surface produced the error; selects the body shape
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Surface {
    OpenAi,
    Anthropic,
}

/// Application error type
#[derive(Debug, thiserror::Error)]
pub enum ApiError {
    #[error("authentication failed: {message}")]
    Auth { surface: Surface, message: String },
    #[error("invalid request: {message}")]
    Validation { surface: Surface, message: String },
    #[error("unauthorized: {0}")]
    Unauthorized(String),
    #[error("session expired")]
    SessionExpired,
    #[error("not found: {0}")]
    NotFound(String),
    #[error("internal error: {0}")]
    Internal(String),
}

impl ApiError {
    pub fn auth(surface: Surface, message: impl Into<String>) -> Self {
        Self::Auth {
            surface,
            message: message.into(),
        }
    }

    pub fn validation(surface: Surface, message: impl Into<String>) -> Self {
        Self::Validation {
            surface,
            message: message.into(),
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let (status, body) = match self {
            ApiError::Auth {
                surface: Surface::OpenAi,
                message,
            } => (StatusCode::UNAUTHORIZED, json!({ "error": message })),
            ApiError::Auth {
                surface: Surface::Anthropic,
                message,
            } => (
                StatusCode::UNAUTHORIZED,
                json!({ "error": { "type": "authentication_error", "message": message } }),
            ),
            ApiError::Validation { message, .. } => (
                StatusCode::BAD_REQUEST,
                json!({ "error": { "type": "invalid_request_error", "message": message } }),
            ),
            ApiError::Unauthorized(message) => {
                (StatusCode::UNAUTHORIZED, json!({ "error": message }))
            }
            ApiError::SessionExpired => (
                StatusCode::UNAUTHORIZED,
                json!({ "error": "Session expired" }),
            ),
            ApiError::NotFound(message) => (StatusCode::NOT_FOUND, json!({ "error": message })),
            ApiError::Internal(message) => {
                tracing::error!(%message, "Internal error");
                let detail = if cfg!(debug_assertions) {
                    message
                } else {
                    "Internal server error".to_string()
                };
                (StatusCode::INTERNAL_SERVER_ERROR, json!({ "error": detail }))
            }
        };

        let mut response = Json(body).into_response();
        *response.status_mut() = status;
        response
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::body::to_bytes;

    async fn body_json(error: ApiError) -> (StatusCode, serde_json::Value) {
        let response = error.into_response();
        let status = response.status();
        let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        (status, serde_json::from_slice(&bytes).unwrap())
    }

    #[tokio::test]
    async fn test_openai_auth_error_is_flat() {
        let (status, body) = body_json(ApiError::auth(Surface::OpenAi, "Invalid API key")).await;
        assert_eq!(status, StatusCode::UNAUTHORIZED);
        assert_eq!(body, serde_json::json!({"error": "Invalid API key"}));
    }

    #[tokio::test]
    async fn test_anthropic_auth_error_is_structured() {
        let (status, body) = body_json(ApiError::auth(Surface::Anthropic, "Invalid API key")).await;
        assert_eq!(status, StatusCode::UNAUTHORIZED);
        assert_eq!(body["error"]["type"], "authentication_error");
        assert_eq!(body["error"]["message"], "Invalid API key");
    }

    #[tokio::test]
    async fn test_validation_error_shape() {
        let (status, body) =
            body_json(ApiError::validation(Surface::OpenAi, "messages required")).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body["error"]["type"], "invalid_request_error");
    }

    #[tokio::test]
    async fn test_session_expired() {
        let (status, body) = body_json(ApiError::SessionExpired).await;
        assert_eq!(status, StatusCode::UNAUTHORIZED);
        assert_eq!(body["error"], "Session expired");
    }
}
