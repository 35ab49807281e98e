//! Error types for mxp-ex
//!
//! Handler errors render as `{"error": {"code", "message"}}` bodies.

use axum::{
    extract::multipart::MultipartError,
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;
use thiserror::Error;

use crate::services::{AnalyzerError, StoreError};

/// API error type
#[derive(Debug, Error)]
pub enum ApiError {
    /// Invalid request (400)
    #[error("Invalid request: {0}")]
    BadRequest(String),

    /// File type the pipeline cannot handle (400)
    #[error("Unsupported file type: {0}")]
    UnsupportedMediaType(String),

    /// External analyzer or scanner failed (500)
    #[error("Analysis failed: {0}")]
    AnalysisFailed(String),

    /// IO error
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

impl From<StoreError> for ApiError {
    fn from(err: StoreError) -> Self {
        match err {
            StoreError::UnsupportedMediaType(name) => ApiError::UnsupportedMediaType(name),
            StoreError::InvalidFileName(_) | StoreError::Upload(_) => {
                ApiError::BadRequest(err.to_string())
            }
            StoreError::Io(e) => ApiError::Io(e),
        }
    }
}

impl From<AnalyzerError> for ApiError {
    fn from(err: AnalyzerError) -> Self {
        match err {
            AnalyzerError::UnsupportedMediaType(detail) => ApiError::UnsupportedMediaType(detail),
            other => ApiError::AnalysisFailed(other.to_string()),
        }
    }
}

impl From<MultipartError> for ApiError {
    fn from(err: MultipartError) -> Self {
        ApiError::BadRequest(err.body_text())
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let message = self.to_string();
        let (status, error_code) = match self {
            ApiError::BadRequest(_) => (StatusCode::BAD_REQUEST, "BAD_REQUEST"),
            ApiError::UnsupportedMediaType(_) => {
                (StatusCode::BAD_REQUEST, "UNSUPPORTED_MEDIA_TYPE")
            }
            ApiError::AnalysisFailed(_) => {
                (StatusCode::INTERNAL_SERVER_ERROR, "ANALYSIS_FAILED")
            }
            ApiError::Io(_) => (StatusCode::INTERNAL_SERVER_ERROR, "IO_ERROR"),
        };

        if status.is_server_error() {
            tracing::error!(code = error_code, error = %message, "Request failed");
        } else {
            tracing::debug!(code = error_code, error = %message, "Request rejected");
        }

        let body = Json(json!({
            "error": {
                "code": error_code,
                "message": message,
            }
        }));

        (status, body).into_response()
    }
}

/// Result type for API handlers
pub type ApiResult<T> = Result<T, ApiError>;
