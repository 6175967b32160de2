//! CLI module for FakeGPT server functionality.
//!
//! This module provides the `fakegpt serve` command implementation.

mod admin;
mod config;
mod handlers;
mod state;
mod ws;

pub use config::{Config, ConfigError};
pub use state::AppState;
pub use ws::{WsRegistry, HEARTBEAT_INTERVAL};

use axum::{
    middleware,
    routing::{get, post},
    Router,
};
use std::path::Path;
use std::{net::SocketAddr, sync::Arc};
use tokio::signal;
use tower_http::{
    cors::CorsLayer,
    services::{ServeDir, ServeFile},
    trace::TraceLayer,
};

/// Build the application router for the given shared state
pub fn app(state: Arc<AppState>) -> Router {
    let admin_routes = Router::new()
        .route("/config", get(admin::get_config).post(admin::update_config))
        .route("/logs", get(admin::list_logs).delete(admin::clear_logs))
        .route("/logs/download", get(admin::download_logs))
        .layer(middleware::from_fn_with_state(
            state.clone(),
            admin::require_session,
        ));

    let session_routes = Router::new()
        .route("/login", post(admin::login))
        .route("/logout", post(admin::logout))
        .route("/session", get(admin::session_status))
        .route("/health", get(handlers::health_json))
        // Unmatched /api routes are a 404, not the SPA fallback
        .fallback(api_not_found);

    let static_dir = Path::new(&state.config.storage.static_dir);
    let spa =
        ServeDir::new(static_dir).not_found_service(ServeFile::new(static_dir.join("index.html")));

    Router::new()
        .route("/health", get(handlers::health))
        .route("/v1/chat/completions", post(handlers::chat_completions))
        .route("/v1/messages", post(handlers::messages))
        .route("/ws", get(ws::ws_handler))
        .nest("/api", admin_routes.merge(session_routes))
        .fallback_service(spa)
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive())
        .with_state(state)
}

async fn api_not_found() -> crate::errors::ApiError {
    crate::errors::ApiError::NotFound("Not found".to_string())
}

/// Run the FakeGPT server with the given configuration
pub async fn run_server(config: Config) -> Result<(), Box<dyn std::error::Error>> {
    let addr: SocketAddr = format!("{}:{}", config.server.host, config.server.port).parse()?;

    tracing::info!("Starting FakeGPT server on {}", addr);
    tracing::info!("OpenAI endpoint: /v1/chat/completions");
    tracing::info!("Anthropic endpoint: /v1/messages");
    tracing::info!("Admin API: /api/..., panel served from {}", config.storage.static_dir);

    let state = Arc::new(AppState::new(config));
    let app = app(state);

    let listener = tokio::net::TcpListener::bind(addr).await?;

    axum::serve(
        listener,
        app.into_make_service_with_connect_info::<SocketAddr>(),
    )
    .with_graceful_shutdown(shutdown_signal())
    .await?;

    tracing::info!("Server shutdown complete");
    Ok(())
}

async fn shutdown_signal() {
    let ctrl_c = async {
        signal::ctrl_c()
            .await
            .expect("Failed to install Ctrl+C handler");
    };

    #[cfg(unix)]
    let terminate = async {
        signal::unix::signal(signal::unix::SignalKind::terminate())
            .expect("Failed to install signal handler")
            .recv()
            .await;
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {},
        _ = terminate => {},
    }

    tracing::info!("Shutdown signal received");
}
