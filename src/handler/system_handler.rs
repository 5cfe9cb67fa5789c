use axum::{extract::State, response::IntoResponse, Json};
use serde_json::json;

use crate::app::AppState;
use crate::util::error::HandlerError;

// Liveness probe
pub async fn health_handler(State(state): State<AppState>) -> impl IntoResponse {
    Json(json!({
        "status": "ok",
        "timestamp": chrono::Utc::now().to_rfc3339(),
        "environment": state.config.environment,
    }))
}

// Welcome + version
pub async fn root_handler() -> impl IntoResponse {
    Json(json!({
        "message": "Welcome to GaleRya API",
        "version": env!("CARGO_PKG_VERSION"),
    }))
}

// Unmatched routes answer with the same JSON error shape as everything else
pub async fn fallback_handler() -> HandlerError {
    HandlerError::not_found("Route not found")
}
