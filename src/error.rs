use crate::view::UnknownView;
use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use serde_json::json;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum AppError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
    #[error("{0}")]
    UnknownView(#[from] UnknownView),
    #[error("Not found: {0}")]
    NotFound(String),
}

/// Converts `AppError` into an HTTP response with a JSON body.
impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, error_message) = match self {
            AppError::Io(io_err) => {
                tracing::error!(error = ?io_err, "IO error.");
                (StatusCode::INTERNAL_SERVER_ERROR, "An internal error occurred".to_string())
            }
            AppError::Serialization(serde_err) => {
                tracing::error!(error = ?serde_err, "Serialization error.");
                (StatusCode::INTERNAL_SERVER_ERROR, "Stored data could not be read".to_string())
            }
            AppError::UnknownView(unknown) => (StatusCode::NOT_FOUND, unknown.to_string()),
            AppError::NotFound(message) => (StatusCode::NOT_FOUND, message),
        };

        let body = Json(json!({ "error": error_message }));
        (status, body).into_response()
    }
}
