//! Liveness and notice endpoints.

use axum::extract::{rejection::JsonRejection, Json};
use medicheck_common::ApiError;
use serde::Deserialize;
use serde_json::{json, Value};

pub async fn ping() -> Json<Value> {
    Json(json!({ "message": "pong" }))
}

#[derive(Debug, Deserialize)]
pub struct NoticeRequest {
    #[serde(default)]
    pub name: String,
}

// Placeholder notice; no document is generated yet.
pub async fn generate_notice(
    payload: Result<Json<NoticeRequest>, JsonRejection>,
) -> Result<Json<Value>, ApiError> {
    let Json(payload) = payload?;
    let name = payload.name.trim();
    if name.is_empty() {
        return Err(ApiError::MissingInput("Nom du médicament manquant.".to_string()));
    }
    Ok(Json(json!({ "notice": format!("Notice générée pour {name}.") })))
}
