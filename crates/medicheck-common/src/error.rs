use axum::{
    extract::rejection::JsonRejection,
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use thiserror::Error;

#[derive(Debug, Error)]
pub enum MedicheckError {
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("Drug not found: {0}")]
    DrugNotFound(String),

    #[error("Configuration error: {0}")]
    Config(String),

    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

pub type Result<T> = std::result::Result<T, MedicheckError>;

/// Errors surfaced at the HTTP boundary as `{"error": "..."}` bodies.
#[derive(Debug, Error)]
pub enum ApiError {
    /// Required input was absent or blank (400).
    #[error("{0}")]
    MissingInput(String),

    /// No record matched the lookup (404).
    #[error("{0}")]
    NotFound(String),

    /// Anything else that went wrong while serving the request (500).
    #[error("{0}")]
    Internal(String),
}

impl ApiError {
    pub fn status(&self) -> StatusCode {
        match self {
            ApiError::MissingInput(_) => StatusCode::BAD_REQUEST,
            ApiError::NotFound(_)     => StatusCode::NOT_FOUND,
            ApiError::Internal(_)     => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl From<MedicheckError> for ApiError {
    fn from(err: MedicheckError) -> Self {
        match err {
            MedicheckError::DrugNotFound(name) => ApiError::NotFound(name),
            other => ApiError::Internal(other.to_string()),
        }
    }
}

/// Unreadable request body: wrong content type, malformed JSON or wrong shape.
impl From<JsonRejection> for ApiError {
    fn from(rejection: JsonRejection) -> Self {
        ApiError::MissingInput(rejection.body_text())
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = self.status();
        if status.is_server_error() {
            tracing::error!(error = %self, "request failed");
        }
        (status, Json(serde_json::json!({ "error": self.to_string() }))).into_response()
    }
}
