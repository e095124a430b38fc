//! HTTP API server for integration with other systems.
//!
//! Exposes the same tools as the MCP server as JSON endpoints.

use crate::cli::Output;
use crate::config::Settings;
use crate::error::RedsightError;
use crate::mcp::tool_definitions;
use crate::service::{ToolReply, ToolService};
use axum::{
    body::Bytes,
    extract::{Path, State},
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::{get, post},
    Json, Router,
};
use serde_json::Value;
use std::sync::Arc;
use tower_http::cors::{Any, CorsLayer};
use tracing::info;

/// Shared application state.
struct AppState {
    service: ToolService,
}

/// Run the HTTP API server.
pub async fn run_serve(host: &str, port: u16, settings: Settings) -> anyhow::Result<()> {
    let state = Arc::new(AppState {
        service: ToolService::new(settings)?,
    });

    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    let app = Router::new()
        .route("/health", get(health))
        .route("/tools", get(list_tools))
        .route("/tools/{name}", post(call_tool))
        .layer(cors)
        .with_state(state);

    let addr = format!("{}:{}", host, port);
    let listener = tokio::net::TcpListener::bind(&addr).await?;
    info!("HTTP API listening on {}", addr);

    Output::header("Redsight API Server");
    println!();
    Output::success(&format!("Listening on http://{}", addr));
    println!();
    println!("Endpoints:");
    Output::kv("Health", "GET  /health");
    Output::kv("Tools", "GET  /tools");
    Output::kv("Call tool", "POST /tools/{name}");
    println!();
    Output::info("Press Ctrl+C to stop the server.");

    axum::serve(listener, app).await?;

    Ok(())
}

/// HTTP status for a tool reply.
fn status_for(reply: &ToolReply) -> StatusCode {
    match reply.error_kind {
        None => StatusCode::OK,
        Some("invalid_parameter") | Some("invalid_input") => StatusCode::BAD_REQUEST,
        Some("missing_credentials") => StatusCode::SERVICE_UNAVAILABLE,
        Some("upstream_fetch") => StatusCode::BAD_GATEWAY,
        Some("unknown_tool") => StatusCode::NOT_FOUND,
        Some(_) => StatusCode::INTERNAL_SERVER_ERROR,
    }
}

fn reply_response(reply: ToolReply) -> Response {
    (status_for(&reply), Json(reply.body)).into_response()
}

// === Handlers ===

async fn health() -> impl IntoResponse {
    Json(serde_json::json!({ "status": "ok" }))
}

async fn list_tools() -> impl IntoResponse {
    Json(serde_json::json!({ "tools": tool_definitions() }))
}

async fn call_tool(
    State(state): State<Arc<AppState>>,
    Path(name): Path<String>,
    body: Bytes,
) -> Response {
    let arguments = if body.iter().all(u8::is_ascii_whitespace) {
        None
    } else {
        match serde_json::from_slice::<Value>(&body) {
            Ok(value) => Some(value),
            Err(e) => {
                let err = RedsightError::InvalidInput(format!("request body is not JSON: {}", e));
                return reply_response(ToolReply::failure(&err));
            }
        }
    };

    reply_response(state.service.call(&name, arguments).await)
}
