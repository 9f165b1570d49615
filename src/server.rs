//! HTTP server exposing the tag pipeline.
//!
//! # Endpoints
//!
//! | Method | Path | Description |
//! |--------|------|-------------|
//! | `POST` | `/generate-tags` | Generate tags for `{"text": <any JSON>}` |
//! | `GET`  | `/health` | Health check (returns version) |
//!
//! # Error Contract
//!
//! Errors are returned as `{"error": "<message>"}`. A missing or falsy
//! `text` field is a `400`; every pipeline failure is a `500` whose message
//! starts with `Failed to generate tags:`.
//!
//! # CORS
//!
//! All origins, methods, and headers are permitted so browser frontends can
//! call the endpoint cross-origin.

use std::sync::Arc;

use anyhow::Context;
use axum::{
    Json, Router,
    extract::{State, rejection::JsonRejection},
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::{get, post},
};
use serde::Serialize;
use serde_json::Value;
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::{DefaultMakeSpan, DefaultOnResponse, TraceLayer};
use tracing::Level;

use crate::models::{RawInput, TagList};
use crate::tagger::{TagGenerator, TaggingError};

/// Message returned when the request has no usable `text` field.
pub const MISSING_INPUT_MESSAGE: &str = "Missing 'data' in request body.";

/// Shared application state passed to route handlers.
#[derive(Clone)]
struct AppState {
    generator: Arc<TagGenerator>,
}

/// Builds the router with all routes and middleware.
///
/// Split from [`run_server`] so tests can drive it without binding a socket.
pub fn create_router(generator: Arc<TagGenerator>) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    let trace_layer = TraceLayer::new_for_http()
        .make_span_with(DefaultMakeSpan::new().level(Level::INFO))
        .on_response(DefaultOnResponse::new().level(Level::INFO));

    Router::new()
        .route("/generate-tags", post(handle_generate_tags))
        .route("/health", get(handle_health))
        .layer(trace_layer)
        .layer(cors)
        .with_state(AppState { generator })
}

/// Binds `bind_addr` and serves until Ctrl-C.
///
/// # Errors
///
/// Returns an error if the address cannot be bound or the server fails.
pub async fn run_server(bind_addr: &str, generator: Arc<TagGenerator>) -> anyhow::Result<()> {
    let app = create_router(generator);

    let listener = tokio::net::TcpListener::bind(bind_addr)
        .await
        .with_context(|| format!("Failed to bind {bind_addr}"))?;

    tracing::info!(addr = %listener.local_addr()?, "Server listening");

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    Ok(())
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::error!(error = %e, "Failed to listen for shutdown signal");
        std::future::pending::<()>().await;
    }
    tracing::info!("Shutting down");
}

// ============ Error response ============

#[derive(Serialize)]
struct ErrorBody {
    error: String,
}

/// Error type that converts into an HTTP response.
#[derive(Debug)]
struct ApiError {
    status: StatusCode,
    message: String,
}

impl ApiError {
    fn bad_request(message: impl Into<String>) -> Self {
        Self {
            status: StatusCode::BAD_REQUEST,
            message: message.into(),
        }
    }

    fn missing_input() -> Self {
        Self::bad_request(MISSING_INPUT_MESSAGE)
    }
}

impl From<JsonRejection> for ApiError {
    fn from(rejection: JsonRejection) -> Self {
        match rejection {
            // Bodies sent without a JSON content type carry no fields at all.
            JsonRejection::MissingJsonContentType(_) => Self::missing_input(),
            other => Self::bad_request(other.body_text()),
        }
    }
}

impl From<TaggingError> for ApiError {
    fn from(error: TaggingError) -> Self {
        if error.is_transport() {
            tracing::error!(error = %error, "Provider request failed");
        } else {
            tracing::warn!(error = %error, "Provider answer unusable");
        }

        Self {
            status: StatusCode::INTERNAL_SERVER_ERROR,
            message: error.to_string(),
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        (self.status, Json(ErrorBody { error: self.message })).into_response()
    }
}

// ============ GET /health ============

#[derive(Serialize)]
struct HealthResponse {
    status: &'static str,
    version: &'static str,
}

async fn handle_health() -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "ok",
        version: env!("CARGO_PKG_VERSION"),
    })
}

// ============ POST /generate-tags ============

#[derive(Serialize)]
struct GenerateTagsResponse {
    tags: TagList,
}

/// Handler for `POST /generate-tags`.
///
/// Reads `text` from the JSON body, rejects absent or falsy values without
/// calling the model, and otherwise waits for the full pipeline.
async fn handle_generate_tags(
    State(state): State<AppState>,
    payload: Result<Json<Value>, JsonRejection>,
) -> Result<Json<GenerateTagsResponse>, ApiError> {
    let Json(body) = payload?;

    let input = body
        .get("text")
        .cloned()
        .map(RawInput::from)
        .filter(|input| !input.is_falsy())
        .ok_or_else(ApiError::missing_input)?;

    let tags = state.generator.generate_tags(&input).await?;

    Ok(Json(GenerateTagsResponse { tags }))
}
