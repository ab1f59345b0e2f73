use axum::Json;
use serde_json::{json, Value};

/// GET /api/health: liveness probe, no side effects.
pub async fn health_handler() -> Json<Value> {
    Json(json!({
        "status": "ok",
        "message": "FocusLock API is running",
        "version": env!("CARGO_PKG_VERSION"),
        "commit": env!("FOCUSLOCK_GIT_SHA"),
    }))
}
