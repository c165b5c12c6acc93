// src/error.rs
// Standardized error types for acplan

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use thiserror::Error;

/// Main error type for the acplan library
#[derive(Error, Debug)]
pub enum AcError {
    #[error("invalid input: {0}")]
    InvalidInput(String),

    #[error("{0} not found")]
    NotFound(String),

    #[error("authentication failed")]
    Unauthorized,

    #[error("analysis already in progress")]
    RoundInProgress,

    #[error("database error: {0}")]
    Db(#[from] sqlx::Error),

    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("JSON serialization error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("unknown error: {0}")]
    Other(String),

    #[error(transparent)]
    Anyhow(#[from] anyhow::Error),
}

/// Convenience type alias for Result using AcError
pub type Result<T> = std::result::Result<T, AcError>;

impl From<String> for AcError {
    fn from(s: String) -> Self {
        AcError::Other(s)
    }
}

impl AcError {
    fn status(&self) -> StatusCode {
        match self {
            AcError::InvalidInput(_) => StatusCode::UNPROCESSABLE_ENTITY,
            AcError::NotFound(_) => StatusCode::NOT_FOUND,
            AcError::Unauthorized => StatusCode::UNAUTHORIZED,
            AcError::RoundInProgress => StatusCode::CONFLICT,
            AcError::Json(_) => StatusCode::BAD_REQUEST,
            _ => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl IntoResponse for AcError {
    fn into_response(self) -> Response {
        let status = self.status();
        let body = Json(serde_json::json!({ "error": self.to_string() }));
        (status, body).into_response()
    }
}
