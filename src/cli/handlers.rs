// HTTP Handlers Module
// Implements the OpenAI-compatible and Anthropic-compatible API endpoints.

use super::state::AppState;
use crate::{
    anthropic::{self, MessagesRequest, MessagesResponse, MessagesUsage},
    auth,
    errors::ApiError,
    generator::generator_for,
    logs::LogEntry,
    openai::{self, ChatCompletionRequest, ChatCompletionResponse, Usage},
    store::ModelReply,
    stream::CharStreamBuilder,
};
use axum::{
    body::Body,
    extract::{ConnectInfo, State},
    http::{header, HeaderMap, StatusCode, Uri},
    response::{IntoResponse, Response},
    Json,
};
use futures::StreamExt;
use serde_json::Value;
use std::net::SocketAddr;
use std::sync::Arc;

/// Plain health check endpoint
pub async fn health() -> &'static str {
    "OK"
}

/// JSON health check endpoint
pub async fn health_json(State(state): State<Arc<AppState>>) -> impl IntoResponse {
    Json(serde_json::json!({
        "status": "ok",
        "service": "fakegpt",
        "wsClients": state.ws_clients.count()
    }))
}

/// POST /v1/chat/completions
pub async fn chat_completions(
    State(state): State<Arc<AppState>>,
    ConnectInfo(addr): ConnectInfo<SocketAddr>,
    uri: Uri,
    headers: HeaderMap,
    Json(body): Json<Value>,
) -> Result<Response, ApiError> {
    let cfg = state.store.snapshot();
    auth::require_bearer(&headers, &cfg.api_key)?;
    state.logs.record(log_entry("POST", &uri, &headers, &body, addr));

    let request = ChatCompletionRequest::from_value(&body)?;
    let model = request.model.unwrap_or_else(|| cfg.default_model.clone());
    let reply = cfg.resolve_model(Some(&model));

    tracing::info!(model = %model, stream = request.stream, "Chat completion request");

    let content = generator_for(&reply).generate(&body);
    wait_for_reply(&reply).await;

    if request.stream {
        let stream = CharStreamBuilder::new(&model, content)
            .id(openai::completion_id())
            .build();
        let body = Body::from_stream(
            stream
                .into_completions_stream()
                .map(Ok::<_, std::io::Error>),
        );

        Ok(Response::builder()
            .status(StatusCode::OK)
            .header(header::CONTENT_TYPE, "text/plain; charset=utf-8")
            .header(header::CACHE_CONTROL, "no-cache")
            .header(header::CONNECTION, "keep-alive")
            .body(body)
            .unwrap())
    } else {
        let usage = Usage::for_reply(content.chars().count() as u32);
        let response =
            ChatCompletionResponse::new(openai::completion_id(), model, content, usage);
        Ok(Json(response).into_response())
    }
}

/// POST /v1/messages
pub async fn messages(
    State(state): State<Arc<AppState>>,
    ConnectInfo(addr): ConnectInfo<SocketAddr>,
    uri: Uri,
    headers: HeaderMap,
    Json(body): Json<Value>,
) -> Result<Response, ApiError> {
    let cfg = state.store.snapshot();
    auth::require_api_key_header(&headers, &cfg.api_key)?;
    state.logs.record(log_entry("POST", &uri, &headers, &body, addr));

    let request = MessagesRequest::from_value(&body)?;
    let model = request.model.unwrap_or_else(|| cfg.default_model.clone());
    let reply = cfg.resolve_model(Some(&model));

    tracing::info!(model = %model, stream = request.stream, "Messages request");

    let content = generator_for(&reply).generate(&body);
    wait_for_reply(&reply).await;

    if request.stream {
        let stream = CharStreamBuilder::new(&model, content)
            .id(anthropic::message_id())
            .build();
        let body = Body::from_stream(stream.into_messages_stream().map(Ok::<_, std::io::Error>));

        Ok(Response::builder()
            .status(StatusCode::OK)
            .header(header::CONTENT_TYPE, "text/event-stream")
            .header(header::CACHE_CONTROL, "no-cache")
            .header(header::CONNECTION, "keep-alive")
            .body(body)
            .unwrap())
    } else {
        let usage = MessagesUsage::for_reply(content.chars().count() as u32);
        let response = MessagesResponse::new(anthropic::message_id(), model, content, usage);
        Ok(Json(response).into_response())
    }
}

/// Simulated thinking time. Awaited before the response is built so no
/// headers are flushed during the delay.
async fn wait_for_reply(reply: &ModelReply) {
    let delay = reply.delay();
    if !delay.is_zero() {
        tokio::time::sleep(delay).await;
    }
}

fn log_entry(
    method: &str,
    uri: &Uri,
    headers: &HeaderMap,
    body: &Value,
    addr: SocketAddr,
) -> LogEntry {
    let headers = headers
        .iter()
        .map(|(name, value)| {
            (
                name.to_string(),
                value.to_str().unwrap_or("<binary>").to_string(),
            )
        })
        .collect();

    LogEntry::new(method, uri.to_string(), headers, body.clone(), addr.ip().to_string())
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::http::HeaderValue;

    #[tokio::test]
    async fn test_health_endpoint() {
        let response = health().await.into_response();
        assert_eq!(response.status(), StatusCode::OK);
    }

    #[test]
    fn test_log_entry_captures_request() {
        let mut headers = HeaderMap::new();
        headers.insert("x-api-key", HeaderValue::from_static("sk-test"));

        let entry = log_entry(
            "POST",
            &"/v1/messages".parse().unwrap(),
            &headers,
            &serde_json::json!({"messages": []}),
            "10.0.0.1:9999".parse().unwrap(),
        );

        assert_eq!(entry.method, "POST");
        assert_eq!(entry.url, "/v1/messages");
        assert_eq!(entry.headers["x-api-key"], "sk-test");
        assert_eq!(entry.ip, "10.0.0.1");
    }
}
