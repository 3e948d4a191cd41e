//! Full reference record for one drug.

use axum::extract::{Json, Path, State};
use medicheck_common::columns::{DCI, IDENTITY_COLUMNS};
use medicheck_common::ApiError;
use serde_json::{Map, Value};
use tracing::debug;

use crate::state::SharedState;

/// URL prefix under which `images_dir` is reachable.
pub const IMAGE_URL_PREFIX: &str = "/static/images_medicaments";

/// Every column of the matching row (blank cells as `""`), the DCI upper-cased,
/// plus `structure_image_url` when `<DCI>.png` exists.
pub async fn get_medicament(
    State(state): State<SharedState>,
    Path(name): Path<String>,
) -> Result<Json<Map<String, Value>>, ApiError> {
    let record = state
        .reference
        .find_exact(&name, &IDENTITY_COLUMNS)
        .ok_or_else(|| ApiError::NotFound("Médicament non trouvé".to_string()))?;

    let mut body = Map::new();
    for column in state.reference.columns() {
        let value = record.get(column).unwrap_or_default();
        body.insert(column.clone(), Value::String(value.to_string()));
    }

    let dci = record.get(DCI).unwrap_or_default().to_uppercase();
    body.insert(DCI.to_string(), Value::String(dci.clone()));

    let image_url = if dci.is_empty() {
        String::new()
    } else {
        let file_name = format!("{dci}.png");
        let exists = tokio::fs::try_exists(state.images_dir.join(&file_name))
            .await
            .unwrap_or(false);
        if exists {
            format!("{IMAGE_URL_PREFIX}/{file_name}")
        } else {
            debug!(dci = %dci, "No structure image");
            String::new()
        }
    };
    body.insert("structure_image_url".to_string(), Value::String(image_url));

    Ok(Json(body))
}
