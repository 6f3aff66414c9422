//! Success envelope shared by every endpoint: `{ "message", "data" }`

use axum::response::Json;
use serde::Serialize;

#[derive(Debug, Serialize)]
pub struct ApiResponse<T> {
    pub message: String,
    pub data: T,
}

/// Wrap `data` with a human-readable message
pub fn success<T: Serialize>(message: impl Into<String>, data: T) -> Json<ApiResponse<T>> {
    Json(ApiResponse {
        message: message.into(),
        data,
    })
}
