//! HTTP request handlers

use super::assets::{get_index_html, serve_static};
use super::sse::sse_stream;
use super::types::{
    ChatRequest, ErrorResponse, InitPayload, SamplingLimits, SnapshotResponse, TurnResponse,
};
use super::AppState;
use crate::markdown;
use crate::session::{SamplingConfig, SessionHandle, TurnOutcome};
use axum::{
    extract::{Path, State},
    http::StatusCode,
    response::{Html, IntoResponse, Response},
    routing::{get, post},
    Json, Router,
};
use std::sync::Arc;

/// Create the API router
pub fn create_router(state: AppState) -> Router {
    Router::new()
        // Root serves the page
        .route("/", get(serve_page))
        // Static assets
        .route("/assets/*path", get(serve_static))
        // Session lifecycle: open on connect, closed when the stream drops
        .route("/api/session/stream", get(stream_session))
        // Redraw
        .route("/api/sessions/:id", get(get_session))
        // User actions
        .route("/api/sessions/:id/chat", post(send_chat))
        .route("/api/sessions/:id/clear", post(clear_session))
        // Version
        .route("/version", get(get_version))
        .with_state(state)
}

/// Router used when the server cannot talk to the model: every path shows
/// the configuration error and nothing else.
pub fn create_setup_error_router(message: &str) -> Router {
    let page: Arc<str> = format!(
        "<!doctype html><html><head><meta charset=\"utf-8\">\
         <title>Recommendation Chatbot</title>\
         <link rel=\"stylesheet\" href=\"/assets/app.css\"></head>\
         <body><main class=\"setup-error\"><h1>Recommendation Chatbot</h1>\
         <div class=\"banner error\">{}</div></main></body></html>",
        markdown::render(&format!("❌ {message}"))
    )
    .into();

    Router::new()
        .route("/assets/*path", get(serve_static))
        .fallback(serve_setup_error)
        .with_state(page)
}

// ============================================================
// Page
// ============================================================

async fn serve_page() -> impl IntoResponse {
    match get_index_html() {
        Some(content) => Html(content).into_response(),
        None => (
            StatusCode::NOT_FOUND,
            Html("<h1>404 - UI not found</h1>".to_string()),
        )
            .into_response(),
    }
}

async fn serve_setup_error(State(page): State<Arc<str>>) -> impl IntoResponse {
    (StatusCode::SERVICE_UNAVAILABLE, Html(page.to_string()))
}

// ============================================================
// Session Stream
// ============================================================

async fn stream_session(State(state): State<AppState>) -> impl IntoResponse {
    let (session_id, handle, guard) = state.sessions.connect();
    let broadcast_rx = handle.broadcast_tx.subscribe();
    let snapshot = handle.session.lock().await.snapshot(false);

    let init = InitPayload {
        session_id,
        model: state.model_id.clone(),
        limits: SamplingLimits::default(),
        snapshot: SnapshotResponse::from(&snapshot),
    };

    sse_stream(init, broadcast_rx, guard)
}

// ============================================================
// Redraw
// ============================================================

async fn get_session(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<SnapshotResponse>, AppError> {
    let handle = find_session(&state, &id)?;
    let snapshot = handle.session.lock().await.snapshot(false);
    Ok(Json(SnapshotResponse::from(&snapshot)))
}

// ============================================================
// User Actions
// ============================================================

async fn send_chat(
    State(state): State<AppState>,
    Path(id): Path<String>,
    Json(req): Json<ChatRequest>,
) -> Result<Json<TurnResponse>, AppError> {
    let defaults = SamplingConfig::default();
    let sampling = SamplingConfig::new(
        req.temperature.unwrap_or(defaults.temperature),
        req.max_output_length.unwrap_or(defaults.max_output_length),
    )
    .map_err(|e| AppError::BadRequest(e.to_string()))?;

    let handle = find_session(&state, &id)?;

    // Held across the remote call: one interaction at a time per session
    let mut session = handle.session.lock().await;

    let text = session
        .begin_turn(&req.text)
        .map_err(|e| AppError::BadRequest(e.to_string()))?;
    handle.publish(session.snapshot(true));

    tracing::info!(
        session_id = %id,
        chars = text.chars().count(),
        new_chat = !session.has_chat(),
        "Sending message"
    );

    let outcome = session.finish_turn(&text, sampling).await;
    if let TurnOutcome::Failed(failure) = &outcome {
        tracing::warn!(
            session_id = %id,
            error = %failure.message,
            hint = ?failure.hint,
            "Turn failed"
        );
    }

    let snapshot = session.snapshot(false);
    drop(session);

    handle.publish(snapshot.clone());
    Ok(Json(TurnResponse::new(outcome, &snapshot)))
}

async fn clear_session(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<SnapshotResponse>, AppError> {
    let handle = find_session(&state, &id)?;

    let mut session = handle.session.lock().await;
    session.clear();
    let snapshot = session.snapshot(false);
    drop(session);

    tracing::info!(session_id = %id, "Conversation cleared");
    handle.publish(snapshot.clone());
    Ok(Json(SnapshotResponse::from(&snapshot)))
}

fn find_session(state: &AppState, id: &str) -> Result<SessionHandle, AppError> {
    state
        .sessions
        .get(id)
        .ok_or_else(|| AppError::NotFound(format!("Session not found: {id}")))
}

// ============================================================
// Version
// ============================================================

async fn get_version() -> &'static str {
    concat!("reco-chat ", env!("CARGO_PKG_VERSION"))
}

// ============================================================
// Error Handling
// ============================================================

enum AppError {
    BadRequest(String),
    NotFound(String),
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, message) = match self {
            AppError::BadRequest(msg) => (StatusCode::BAD_REQUEST, msg),
            AppError::NotFound(msg) => (StatusCode::NOT_FOUND, msg),
        };

        let body = Json(ErrorResponse::new(message));
        (status, body).into_response()
    }
}
