//! Chat endpoint: one question in, one answer out, within a session.

use axum::extract::{rejection::JsonRejection, Json, State};
use medicheck_common::ApiError;
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::state::{SharedState, DEFAULT_SESSION};

#[derive(Debug, Deserialize)]
pub struct ChatRequest {
    #[serde(default, alias = "question")]
    pub message: String,
    #[serde(default)]
    pub session_id: Option<String>,
}

#[derive(Debug, Serialize)]
pub struct ChatResponse {
    pub response: String,
}

/// Upstream failures are returned as text in `response` with status 200.
pub async fn chat_submit(
    State(state): State<SharedState>,
    payload: Result<Json<ChatRequest>, JsonRejection>,
) -> Result<Json<ChatResponse>, ApiError> {
    let Json(payload) = payload?;
    let question = payload.message.trim();
    if question.is_empty() {
        return Err(ApiError::MissingInput("Message manquant.".to_string()));
    }

    let session_id = payload
        .session_id
        .as_deref()
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .unwrap_or(DEFAULT_SESSION);
    debug!(session_id, "Chat question received");

    let session = state.session(session_id).await;
    // serialises questions within one conversation
    let mut history = session.lock().await;
    let response = state.chatbot.query(&mut history, question).await;

    Ok(Json(ChatResponse { response }))
}
