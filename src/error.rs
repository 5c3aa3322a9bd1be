//! Error types for the cache layer
//!
//! Provides unified error handling using thiserror.

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;
use thiserror::Error;

// == Cache Error Enum ==
/// Unified error type for the cache layer.
///
/// A missing key is not an error (`CacheEngine::get` returns `Option`).
/// These variants cover internal faults only; none of them is allowed to
/// fail a wrapped business operation.
#[derive(Error, Debug)]
pub enum CacheError {
    /// Durable tier I/O failed; the operation degrades to memory-only
    #[error("durable store unavailable: {0}")]
    StorageUnavailable(#[from] sqlx::Error),

    /// Value could not be encoded for the durable tier
    #[error("value serialization failed: {0}")]
    Serialization(#[from] serde_json::Error),
}

// == IntoResponse Implementation ==
// Only the administrative endpoints surface these errors over HTTP.
impl IntoResponse for CacheError {
    fn into_response(self) -> Response {
        let status = match &self {
            CacheError::StorageUnavailable(_) => StatusCode::SERVICE_UNAVAILABLE,
            CacheError::Serialization(_) => StatusCode::INTERNAL_SERVER_ERROR,
        };

        let body = Json(json!({
            "error": self.to_string()
        }));

        (status, body).into_response()
    }
}

// == Result Type Alias ==
/// Convenience Result type for the cache layer.
pub type Result<T> = std::result::Result<T, CacheError>;
