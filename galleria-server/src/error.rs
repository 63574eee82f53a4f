//! API error handling module
//!
//! Provides a unified error type for all API endpoints with structured error variants.

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use galleria_core::GalleriaError;
use thiserror::Error;

/// API error type with structured variants for different error categories
#[derive(Debug, Error)]
pub enum ApiError {
    /// Bad request - client provided invalid input
    #[error("Bad request: {0}")]
    BadRequest(String),

    /// Storage error - failure in the upload store
    #[error("Storage error: {0}")]
    Storage(#[from] GalleriaError),
}

impl ApiError {
    /// Create a bad request error
    pub fn bad_request(message: impl Into<String>) -> Self {
        Self::BadRequest(message.into())
    }

    /// Get the HTTP status code for this error
    pub fn status_code(&self) -> StatusCode {
        match self {
            Self::BadRequest(_) => StatusCode::BAD_REQUEST,
            Self::Storage(ref e) => match e {
                GalleriaError::InvalidFileName(_) => StatusCode::BAD_REQUEST,
                GalleriaError::Io(_)
                | GalleriaError::UploadDir { .. }
                | GalleriaError::NameCollision(_) => StatusCode::INTERNAL_SERVER_ERROR,
            },
        }
    }

    /// Get the error code for programmatic error handling
    pub fn error_code(&self) -> &'static str {
        match self {
            Self::BadRequest(_) => "INVALID_INPUT",
            Self::Storage(ref e) => match e {
                GalleriaError::Io(_) => "STORAGE_IO_ERROR",
                GalleriaError::UploadDir { .. } => "UPLOAD_DIR_UNAVAILABLE",
                GalleriaError::NameCollision(_) => "NAME_COLLISION",
                GalleriaError::InvalidFileName(_) => "INVALID_FILE_NAME",
            },
        }
    }

    /// Get sanitized error message for client response
    fn client_message(&self) -> String {
        match self {
            // Never leak filesystem paths to clients
            Self::Storage(ref e) => match e {
                GalleriaError::InvalidFileName(_) => "Invalid file name".to_string(),
                GalleriaError::NameCollision(_) => {
                    "Could not allocate a unique file name, please retry".to_string()
                }
                GalleriaError::Io(_) | GalleriaError::UploadDir { .. } => {
                    "Failed to store uploaded file".to_string()
                }
            },
            _ => self.to_string(),
        }
    }

    /// Get the error category for logging
    fn error_category(&self) -> &'static str {
        match self {
            Self::BadRequest(_) => "bad_request",
            Self::Storage(_) => "storage",
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = self.status_code();
        let category = self.error_category();
        let code = self.error_code();
        let internal_message = self.to_string();
        let client_message = self.client_message();

        match &self {
            Self::BadRequest(_) => {
                tracing::warn!(
                    status = %status,
                    category = category,
                    code = code,
                    error = %internal_message,
                    "Client error"
                );
            }
            Self::Storage(_) => {
                tracing::error!(
                    status = %status,
                    category = category,
                    code = code,
                    error = %internal_message,
                    client_message = %client_message,
                    "Storage error (internal details logged)"
                );
            }
        }

        let body = serde_json::json!({
            "error": client_message,
            "code": code,
        });

        (status, Json(body)).into_response()
    }
}
