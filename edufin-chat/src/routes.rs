//! HTTP routes for the EduFin chat service.
//!
//! Endpoints:
//! - `POST /api/chat/session` - create or update a session (idempotent upsert)
//! - `POST /api/chat/message` - process one chat turn
//! - `GET /api/chat/:session_id/messages` - full transcript
//! - `GET /health` - health check

use crate::service::ChatService;
use crate::types::{Language, Message, Session};
use axum::{
    extract::{Path, State},
    http::StatusCode,
    response::Json,
    routing::{get, post},
    Router,
};
use edufin_common::Error;
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use tower_http::cors::{Any, CorsLayer};

/// Shared application state.
#[derive(Clone)]
pub struct AppState {
    pub service: Arc<ChatService>,
}

/// Session init request body.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SessionInitRequest {
    pub session_id: String,
    pub language: String,
}

/// Chat turn request body.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ChatTurnRequest {
    pub message: String,
    pub session_id: String,
    pub language: String,
}

/// Chat turn response.
#[derive(Debug, Serialize, Deserialize)]
pub struct ChatTurnResponse {
    pub message: Message,
    pub success: bool,
}

/// Error response.
#[derive(Debug, Serialize, Deserialize)]
pub struct ErrorResponse {
    pub error: String,
    pub code: String,
}

/// Health check response.
#[derive(Debug, Serialize, Deserialize)]
pub struct HealthResponse {
    pub status: String,
    pub service: String,
    pub version: String,
}

/// Map a service error to an HTTP error response.
fn error_response(error: &Error) -> (StatusCode, Json<ErrorResponse>) {
    let status =
        StatusCode::from_u16(error.status_code()).unwrap_or(StatusCode::INTERNAL_SERVER_ERROR);
    (
        status,
        Json(ErrorResponse {
            error: error.to_string(),
            code: error.code().to_string(),
        }),
    )
}

/// Build the service router.
pub fn build_router(state: AppState) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    Router::new()
        .route("/api/chat/session", post(session_init_handler))
        .route("/api/chat/message", post(chat_turn_handler))
        .route("/api/chat/:session_id/messages", get(history_handler))
        .route("/health", get(health_handler))
        .layer(cors)
        .with_state(state)
}

/// Create or get a chat session; switches language on an existing session.
async fn session_init_handler(
    State(state): State<AppState>,
    Json(request): Json<SessionInitRequest>,
) -> Result<Json<Session>, (StatusCode, Json<ErrorResponse>)> {
    let language = Language::from_code(&request.language).map_err(|e| error_response(&e))?;

    let session = state
        .service
        .init_session(&request.session_id, language)
        .await
        .map_err(|e| error_response(&e))?;

    Ok(Json(session))
}

/// Process one chat turn and return the assistant's message.
async fn chat_turn_handler(
    State(state): State<AppState>,
    Json(request): Json<ChatTurnRequest>,
) -> Result<Json<ChatTurnResponse>, (StatusCode, Json<ErrorResponse>)> {
    let language = Language::from_code(&request.language).map_err(|e| error_response(&e))?;

    let message = state
        .service
        .send_message(&request.session_id, &request.message, language)
        .await
        .map_err(|e| {
            tracing::error!(session_id = %request.session_id, error = %e, "Chat turn failed");
            error_response(&e)
        })?;

    Ok(Json(ChatTurnResponse {
        message,
        success: true,
    }))
}

/// Full transcript for a session; empty array when the session is unknown.
async fn history_handler(
    State(state): State<AppState>,
    Path(session_id): Path<String>,
) -> Result<Json<Vec<Message>>, (StatusCode, Json<ErrorResponse>)> {
    let messages = state
        .service
        .history(&session_id)
        .await
        .map_err(|e| error_response(&e))?;

    Ok(Json(messages))
}

/// Health check handler.
async fn health_handler() -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "healthy".into(),
        service: "edufin-chat".into(),
        version: env!("CARGO_PKG_VERSION").into(),
    })
}
