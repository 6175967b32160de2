// Admin API Module
// Session-gated configuration and request-log endpoints, plus the
// login/logout/status endpoints that manage the sessions themselves.

use super::state::AppState;
use crate::{
    errors::ApiError,
    session::SessionCheck,
    store::ConfigUpdate,
};
use axum::{
    extract::{Request, State},
    http::{header, HeaderMap, StatusCode},
    middleware::Next,
    response::{IntoResponse, Response},
    Json,
};
use serde::Deserialize;
use std::sync::Arc;

/// Header carrying the admin session token
pub const SESSION_TOKEN_HEADER: &str = "x-admin-token";

fn session_token(headers: &HeaderMap) -> Option<&str> {
    headers
        .get(SESSION_TOKEN_HEADER)
        .and_then(|value| value.to_str().ok())
}

/// Middleware guarding the admin endpoints. Re-validates the session age on
/// every access; an expired session is destroyed and the request rejected.
pub async fn require_session(
    State(state): State<Arc<AppState>>,
    request: Request,
    next: Next,
) -> Response {
    let check = match session_token(request.headers()) {
        Some(token) => state.sessions.check(token),
        None => SessionCheck::Missing,
    };

    match check {
        SessionCheck::Valid => next.run(request).await,
        SessionCheck::Expired => ApiError::SessionExpired.into_response(),
        SessionCheck::Missing => {
            ApiError::Unauthorized("Not authenticated".to_string()).into_response()
        }
    }
}

/// GET /api/config
pub async fn get_config(State(state): State<Arc<AppState>>) -> impl IntoResponse {
    Json(state.store.snapshot())
}

/// POST /api/config
pub async fn update_config(
    State(state): State<Arc<AppState>>,
    Json(update): Json<ConfigUpdate>,
) -> impl IntoResponse {
    let config = state.store.update(update);
    tracing::info!("Configuration updated");
    Json(serde_json::json!({ "success": true, "config": config }))
}

/// GET /api/logs
pub async fn list_logs(State(state): State<Arc<AppState>>) -> impl IntoResponse {
    Json(state.logs.snapshot())
}

/// DELETE /api/logs
pub async fn clear_logs(State(state): State<Arc<AppState>>) -> impl IntoResponse {
    state.logs.clear();
    tracing::info!("Request log cleared");
    Json(serde_json::json!({ "success": true }))
}

/// GET /api/logs/download
pub async fn download_logs(State(state): State<Arc<AppState>>) -> Result<Response, ApiError> {
    let json = serde_json::to_vec_pretty(&state.logs.snapshot())
        .map_err(|e| ApiError::Internal(e.to_string()))?;

    Ok(Response::builder()
        .status(StatusCode::OK)
        .header(header::CONTENT_TYPE, "application/json")
        .header(
            header::CONTENT_DISPOSITION,
            "attachment; filename=\"request_logs.json\"",
        )
        .body(json.into())
        .unwrap())
}

#[derive(Debug, Deserialize)]
pub struct LoginRequest {
    pub password: String,
}

/// POST /api/login
pub async fn login(
    State(state): State<Arc<AppState>>,
    Json(request): Json<LoginRequest>,
) -> Result<impl IntoResponse, ApiError> {
    if request.password != state.config.admin.password {
        tracing::warn!("Admin login rejected");
        return Err(ApiError::Unauthorized("Invalid password".to_string()));
    }

    let token = state.sessions.create();
    tracing::info!("Admin login");
    Ok(Json(serde_json::json!({ "success": true, "token": token })))
}

/// POST /api/logout
pub async fn logout(
    State(state): State<Arc<AppState>>,
    headers: HeaderMap,
) -> impl IntoResponse {
    if let Some(token) = session_token(&headers) {
        state.sessions.destroy(token);
    }
    Json(serde_json::json!({ "success": true }))
}

/// GET /api/session
pub async fn session_status(
    State(state): State<Arc<AppState>>,
    headers: HeaderMap,
) -> impl IntoResponse {
    let authenticated = session_token(&headers)
        .map(|token| state.sessions.check(token) == SessionCheck::Valid)
        .unwrap_or(false);

    Json(serde_json::json!({ "authenticated": authenticated }))
}
