//! Fixed-shape error payloads for unmatched routes and handler panics.

use axum::{
    http::{StatusCode, Uri},
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;
use std::any::Any;
use tracing::{debug, error};

/// Router fallback for any path without a route.
pub async fn not_found(uri: Uri) -> Response {
    debug!(%uri, "no route");
    (
        StatusCode::NOT_FOUND,
        Json(json!({
            "status": "error",
            "message": "The requested resource was not found",
        })),
    )
        .into_response()
}

/// Response for a panic caught by `CatchPanicLayer`.
pub fn internal_error(panic: Box<dyn Any + Send + 'static>) -> Response {
    let detail = panic
        .downcast_ref::<String>()
        .map(String::as_str)
        .or_else(|| panic.downcast_ref::<&str>().copied())
        .unwrap_or("non-string panic payload");
    error!(detail, "request handler panicked");
    (
        StatusCode::INTERNAL_SERVER_ERROR,
        Json(json!({
            "status": "error",
            "message": "An internal server error occurred",
        })),
    )
        .into_response()
}
