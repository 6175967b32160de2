// API Credential Checks
// Each simulated surface authenticates the way the real provider does:
// OpenAI-style bearer tokens, Anthropic-style x-api-key headers. Checks
// return an explicit Result consumed at the top of each handler.

use crate::errors::{ApiError, Surface};
use axum::http::{header, HeaderMap};

/// Validate `Authorization: Bearer <key>` against the configured API key
pub fn require_bearer(headers: &HeaderMap, api_key: &str) -> Result<(), ApiError> {
    let token = headers
        .get(header::AUTHORIZATION)
        .and_then(|value| value.to_str().ok())
        .and_then(|value| value.strip_prefix("Bearer "));

    match token {
        None => Err(ApiError::auth(
            Surface::OpenAi,
            "Missing or invalid authorization header",
        )),
        Some(token) if token != api_key => {
            Err(ApiError::auth(Surface::OpenAi, "Invalid API key"))
        }
        Some(_) => Ok(()),
    }
}

/// Validate the `x-api-key` header against the configured API key
pub fn require_api_key_header(headers: &HeaderMap, api_key: &str) -> Result<(), ApiError> {
    let provided = headers.get("x-api-key").and_then(|value| value.to_str().ok());

    match provided {
        None => Err(ApiError::auth(
            Surface::Anthropic,
            "Missing required header: x-api-key",
        )),
        Some(key) if key != api_key => {
            Err(ApiError::auth(Surface::Anthropic, "Invalid API key"))
        }
        Some(_) => Ok(()),
    }
}
