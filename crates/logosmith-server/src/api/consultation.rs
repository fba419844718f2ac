//! Consultation endpoints — the only way external callers drive the
//! workflow engine.

use axum::extract::State;
use axum::routing::{get, post};
use axum::{Json, Router};
use serde::Deserialize;

use logosmith_core::state::AppState;
use logosmith_core::ServerError;

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/tech_logo", get(start_session))
        .route("/chat", post(chat))
}

/// GET /tech_logo — Start a new design session. The assistant opens the
/// conversation.
async fn start_session(State(state): State<AppState>) -> Json<serde_json::Value> {
    let (session_id, message) = state.engine.start_session().await;
    Json(serde_json::json!({
        "session_id": session_id,
        "message": message,
    }))
}

#[derive(Debug, Deserialize)]
struct ChatRequest {
    session_id: String,
    message: String,
}

/// POST /chat — Submit a user message and drive the workflow until it next
/// awaits input or terminates.
async fn chat(
    State(state): State<AppState>,
    Json(request): Json<ChatRequest>,
) -> Result<Json<serde_json::Value>, ServerError> {
    let reply = state
        .engine
        .process_message(&request.session_id, &request.message)
        .await?;

    Ok(Json(serde_json::json!({
        "conversation": reply.conversation,
        "current_step": reply.current_step,
    })))
}
