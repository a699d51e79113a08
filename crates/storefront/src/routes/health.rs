//! Health check route handlers.

use axum::{Json, extract::State, http::StatusCode};
use serde_json::{Value, json};

use crate::routes::ok;
use crate::state::AppState;

/// GET /health
///
/// Liveness: the process is up and serving.
pub async fn liveness() -> Json<Value> {
    ok(json!({ "status": "ok" }))
}

/// GET /health/ready
///
/// Readiness: the backend API answers. Load balancers use this to hold
/// traffic while the upstream is down.
pub async fn readiness(State(state): State<AppState>) -> (StatusCode, Json<Value>) {
    match state.api().get::<Value>("/health").await {
        Ok(_) => (StatusCode::OK, ok(json!({ "status": "ready" }))),
        Err(e) => (
            StatusCode::SERVICE_UNAVAILABLE,
            Json(json!({
                "success": false,
                "message": format!("backend unavailable: {e}"),
            })),
        ),
    }
}
