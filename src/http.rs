//! HTTP transport
//!
//! `POST /mcp` takes a JSON-RPC message or batch, `GET /health` is for
//! load balancers. Everything else is axum's default 404/405.

use axum::body::Bytes;
use axum::extract::State;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::routing::{get, post};
use axum::{Json, Router};
use serde_json::{json, Value};
use std::sync::Arc;
use tower_http::trace::TraceLayer;

use crate::config::{ProviderKind, ServerConfig, MCP_PATH};
use crate::mcp::{parse_error, McpServer};

#[derive(Clone)]
struct AppState {
    server: Arc<McpServer>,
    provider: ProviderKind,
}

pub fn router(server: Arc<McpServer>, provider: ProviderKind) -> Router {
    Router::new()
        .route(MCP_PATH, post(mcp_post).get(mcp_get))
        .route("/health", get(health))
        .layer(TraceLayer::new_for_http())
        .with_state(AppState { server, provider })
}

async fn mcp_get() -> Response {
    // No server-initiated stream
    StatusCode::METHOD_NOT_ALLOWED.into_response()
}

async fn mcp_post(State(state): State<AppState>, body: Bytes) -> Response {
    let incoming: Value = match serde_json::from_slice(&body) {
        Ok(payload) => payload,
        Err(e) => return (StatusCode::OK, Json(parse_error(e))).into_response(),
    };

    match state.server.handle_message(incoming).await {
        Some(response) => (StatusCode::OK, Json(response)).into_response(),
        None => StatusCode::ACCEPTED.into_response(),
    }
}

async fn health(State(state): State<AppState>) -> Json<Value> {
    Json(json!({"status": "ok", "provider": state.provider.to_string()}))
}

/// Bind and serve until Ctrl-C / SIGTERM, letting in-flight requests finish
pub async fn serve(config: &ServerConfig, server: Arc<McpServer>) -> anyhow::Result<()> {
    let app = router(server, config.provider);
    let addr = config.bind_addr();
    let listener = tokio::net::TcpListener::bind(&addr).await?;

    tracing::info!(addr = %addr, url = %config.public_url(), "MCP server listening");
    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;
    tracing::info!("Server stopped");
    Ok(())
}

async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = tokio::signal::ctrl_c().await {
            tracing::error!("Failed to listen for Ctrl-C: {e}");
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate()) {
            Ok(mut sig) => {
                sig.recv().await;
            }
            Err(e) => {
                tracing::error!("Failed to listen for SIGTERM: {e}");
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {},
        _ = terminate => {},
    }
    tracing::info!("Shutdown signal received, draining connections");
}
