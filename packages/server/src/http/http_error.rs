//! HTTP error handling
//!
//! Every failed request answers with the same JSON shape,
//! `{ "message", "code", "details"? }`, and a status derived from the code.

use arbor_core::services::{ErrorKind, TreeServiceError};
use axum::{
    extract::rejection::JsonRejection,
    http::StatusCode,
    response::{IntoResponse, Json, Response},
};
use serde::{Deserialize, Serialize};

/// HTTP error response body
#[derive(Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct HttpError {
    /// User-facing error message
    pub message: String,
    /// Machine-readable error code
    pub code: String,
    /// Optional detailed error information for debugging
    #[serde(skip_serializing_if = "Option::is_none")]
    pub details: Option<String>,
}

impl HttpError {
    /// Create a new HTTP error
    pub fn new(message: impl Into<String>, code: impl Into<String>) -> Self {
        Self {
            message: message.into(),
            code: code.into(),
            details: None,
        }
    }

    /// Create a new HTTP error with details
    pub fn with_details(
        message: impl Into<String>,
        code: impl Into<String>,
        details: impl Into<String>,
    ) -> Self {
        Self {
            message: message.into(),
            code: code.into(),
            details: Some(details.into()),
        }
    }

    /// Path segment that is not an integer id
    pub fn invalid_id(raw: &str) -> Self {
        Self::with_details(
            "Node id must be an integer",
            "INVALID_INPUT",
            format!("received: '{}'", raw),
        )
    }

    pub fn status(&self) -> StatusCode {
        match self.code.as_str() {
            "NODE_NOT_FOUND" | "RESOURCE_NOT_FOUND" => StatusCode::NOT_FOUND,
            "INVALID_INPUT" | "VALIDATION_ERROR" | "CYCLIC_MOVE" => StatusCode::BAD_REQUEST,
            _ => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl IntoResponse for HttpError {
    fn into_response(self) -> Response {
        (self.status(), Json(self)).into_response()
    }
}

impl From<TreeServiceError> for HttpError {
    fn from(err: TreeServiceError) -> Self {
        match err.kind() {
            ErrorKind::NotFound => HttpError::new(err.to_string(), "NODE_NOT_FOUND"),
            ErrorKind::InvalidArgument => HttpError::new(err.to_string(), "VALIDATION_ERROR"),
            ErrorKind::CyclicMove => HttpError::new(err.to_string(), "CYCLIC_MOVE"),
            ErrorKind::CorruptHierarchy => {
                tracing::error!("Corrupt hierarchy: {}", err);
                HttpError::new(err.to_string(), "CORRUPT_HIERARCHY")
            }
            ErrorKind::StoreFailure => {
                tracing::error!("Store failure: {:?}", err);
                HttpError::with_details("Storage operation failed", "STORE_ERROR", err.to_string())
            }
        }
    }
}

impl From<JsonRejection> for HttpError {
    fn from(rejection: JsonRejection) -> Self {
        HttpError::with_details("Invalid request body", "INVALID_INPUT", rejection.body_text())
    }
}
