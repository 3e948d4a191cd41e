//! Toxicity percentage lookup.

use axum::extract::{rejection::JsonRejection, Json, State};
use medicheck_common::columns::{IDENTITY_COLUMNS, TOXICITY};
use medicheck_common::ApiError;
use serde::{Deserialize, Serialize};

use crate::state::SharedState;

#[derive(Debug, Deserialize)]
pub struct ToxicityRequest {
    #[serde(default)]
    pub name: String,
}

#[derive(Debug, Serialize)]
pub struct ToxicityResponse {
    pub toxicite: String,
}

pub async fn check_toxicity(
    State(state): State<SharedState>,
    payload: Result<Json<ToxicityRequest>, JsonRejection>,
) -> Result<Json<ToxicityResponse>, ApiError> {
    let Json(payload) = payload?;
    let name = payload.name.trim();
    if name.is_empty() {
        return Err(ApiError::MissingInput("Nom du médicament manquant.".to_string()));
    }

    let table = state
        .toxicity
        .as_ref()
        .ok_or_else(|| ApiError::Internal("Toxicity table is not loaded".to_string()))?;

    let record = table
        .find_exact(name, &IDENTITY_COLUMNS)
        .ok_or_else(|| ApiError::NotFound("Médicament non trouvé dans la base toxicité.".to_string()))?;

    let value = record.get(TOXICITY).unwrap_or_default();
    Ok(Json(ToxicityResponse { toxicite: format!("{value}%") }))
}
