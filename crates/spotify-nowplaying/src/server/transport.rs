//! HTTP ingress.
//!
//! Turns slash-command POSTs and webhook GETs into inbound messages and
//! acknowledges immediately; replies travel asynchronously through the
//! reply sink.

use std::sync::Arc;

use axum::{
    Form, Json, Router,
    extract::{OriginalUri, Path, Query, State},
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::{get, post},
};
use serde::Deserialize;
use tower_http::trace::TraceLayer;

use super::Dispatcher;
use crate::error::RegistryError;
use crate::models::{CommandMessage, WebhookMessage};

/// Slash command form as posted by the chat platform.
#[derive(Debug, Deserialize)]
pub struct CommandForm {
    pub command: String,
    pub user_id: String,
    pub response_url: String,
    #[serde(default)]
    pub text: String,
}

/// Shared state for HTTP handlers.
pub struct HttpState {
    pub dispatcher: Dispatcher,
}

/// Create the HTTP router.
pub fn create_router(dispatcher: Dispatcher) -> Router {
    let state = Arc::new(HttpState { dispatcher });

    Router::new()
        .route("/", get(health_check))
        .route("/health", get(health_check))
        .route("/slack/command", post(handle_command))
        .route("/webhooks/{name}", get(handle_webhook))
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

async fn health_check() -> impl IntoResponse {
    Json(serde_json::json!({
        "status": "ok",
        "service": "spotify-nowplaying",
        "version": env!("CARGO_PKG_VERSION")
    }))
}

/// `POST /slack/command`
async fn handle_command(
    State(state): State<Arc<HttpState>>,
    Form(form): Form<CommandForm>,
) -> Response {
    let msg = CommandMessage {
        command: form.command.trim_start_matches('/').to_string(),
        user_id: form.user_id,
        response_url: form.response_url,
        text: form.text,
    };

    tracing::debug!(command = %msg.command, user_id = %msg.user_id, "Received command");

    match state.dispatcher.dispatch_command(msg) {
        Ok(()) => StatusCode::OK.into_response(),
        Err(e) => dispatch_error(&e),
    }
}

/// `GET /webhooks/{name}`
///
/// The request body is never read.
async fn handle_webhook(
    State(state): State<Arc<HttpState>>,
    Path(name): Path<String>,
    OriginalUri(uri): OriginalUri,
    Query(query): Query<Vec<(String, String)>>,
) -> Response {
    tracing::debug!(webhook = %name, "Received webhook");

    let msg = WebhookMessage { name, url: uri.to_string(), query };

    match state.dispatcher.dispatch_webhook(msg) {
        Ok(()) => (StatusCode::OK, "ok").into_response(),
        Err(e) => dispatch_error(&e),
    }
}

fn dispatch_error(err: &RegistryError) -> Response {
    match err {
        RegistryError::Unknown(_) => (StatusCode::NOT_FOUND, err.to_string()).into_response(),
        _ => (StatusCode::SERVICE_UNAVAILABLE, err.to_string()).into_response(),
    }
}
