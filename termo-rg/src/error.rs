//! Error types for termo-rg

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;
use termo_common::Error;
use thiserror::Error as ThisError;

/// API error type
#[derive(Debug, ThisError)]
pub enum ApiError {
    /// Invalid request (400)
    #[error("Invalid request: {0}")]
    BadRequest(String),

    /// Internal server error (500)
    #[error("Internal server error: {0}")]
    Internal(String),

    /// Report pipeline error
    #[error(transparent)]
    Report(#[from] Error),
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let (status, error_code, message) = match self {
            ApiError::BadRequest(msg) => (StatusCode::BAD_REQUEST, "BAD_REQUEST", msg),
            ApiError::Internal(msg) => (StatusCode::INTERNAL_SERVER_ERROR, "INTERNAL_ERROR", msg),
            ApiError::Report(ref err) => {
                let (status, code) = report_error_code(err);
                (status, code, err.to_string())
            }
        };

        let body = Json(json!({
            "error": {
                "code": error_code,
                "message": message,
            }
        }));

        (status, body).into_response()
    }
}

/// Status code and wire code for a pipeline error
///
/// Input problems (the submission itself) map to 400 with a code naming
/// the violated rule; collaborator and environment problems map to 500.
fn report_error_code(err: &Error) -> (StatusCode, &'static str) {
    match err {
        Error::MissingField { .. } => (StatusCode::BAD_REQUEST, "MISSING_FIELD"),
        Error::MissingCriticalField { .. } => (StatusCode::BAD_REQUEST, "MISSING_CRITICAL_FIELD"),
        Error::InvalidNumericInput { .. } => (StatusCode::BAD_REQUEST, "INVALID_NUMERIC_INPUT"),
        Error::InvalidImagePayload { .. } => (StatusCode::BAD_REQUEST, "INVALID_IMAGE_PAYLOAD"),
        Error::UnsupportedObjectCount(_) => (StatusCode::BAD_REQUEST, "UNSUPPORTED_OBJECT_COUNT"),
        Error::Template(_) => (StatusCode::INTERNAL_SERVER_ERROR, "TEMPLATE_ERROR"),
        Error::MapRendering(_) => (StatusCode::INTERNAL_SERVER_ERROR, "MAP_ERROR"),
        Error::DocumentAssembly(_) => (StatusCode::INTERNAL_SERVER_ERROR, "ASSEMBLY_ERROR"),
        Error::Config(_) => (StatusCode::INTERNAL_SERVER_ERROR, "CONFIG_ERROR"),
        Error::Io(_) => (StatusCode::INTERNAL_SERVER_ERROR, "IO_ERROR"),
    }
}

/// Result type for API handlers
pub type ApiResult<T> = Result<T, ApiError>;
