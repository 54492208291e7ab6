//! Error types for the Folio server

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::convert::ConvertError;

/// Application-wide result type
pub type Result<T> = std::result::Result<T, AppError>;

/// Application error type
#[derive(Error, Debug)]
pub enum AppError {
    /// Client sent something other than a PDF
    #[error("{0}")]
    Validation(String),

    /// Query or form parameter failed validation
    #[error("{0}")]
    InvalidParameter(String),

    #[error("{0}")]
    BadRequest(String),

    #[error("Missing file field")]
    MissingFile,

    #[error("{0}")]
    PayloadTooLarge(String),

    #[error(transparent)]
    Conversion(#[from] ConvertError),

    #[error(transparent)]
    Storage(#[from] StorageError),
}

/// Storage-specific errors
#[derive(Error, Debug)]
pub enum StorageError {
    #[error("Bucket not found: {0}")]
    BucketNotFound(String),

    #[error("Object not found: {0}")]
    ObjectNotFound(String),

    #[error("Access denied: {0}")]
    AccessDenied(String),

    #[error("S3 SDK error: {0}")]
    SdkError(String),
}

impl AppError {
    /// Get HTTP status code for this error
    pub fn status_code(&self) -> StatusCode {
        match self {
            Self::Validation(_) | Self::BadRequest(_) => StatusCode::BAD_REQUEST,
            Self::InvalidParameter(_) | Self::MissingFile => StatusCode::UNPROCESSABLE_ENTITY,
            Self::PayloadTooLarge(_) => StatusCode::PAYLOAD_TOO_LARGE,
            Self::Conversion(_) | Self::Storage(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

/// Error response body
#[derive(Debug, Serialize, Deserialize)]
pub struct ErrorResponse {
    pub detail: String,
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let status = self.status_code();

        match &self {
            AppError::Conversion(e) => tracing::error!("Conversion error: {}", e),
            AppError::Storage(e) => tracing::error!("Storage error: {}", e),
            _ => tracing::warn!(status = %status, "Rejected request: {}", self),
        }

        let body = Json(ErrorResponse {
            detail: self.to_string(),
        });

        (status, body).into_response()
    }
}
