//! Liveness and readiness probes.

use crate::startup::AppState;
use axum::{Json, extract::State, http::StatusCode, response::IntoResponse};
use serde_json::json;

/// Health check endpoint for Docker/K8s liveness probes.
pub async fn health_check() -> impl IntoResponse {
    (
        StatusCode::OK,
        Json(json!({
            "status": "ok",
            "service": "chat-service",
            "version": env!("CARGO_PKG_VERSION")
        })),
    )
}

/// Readiness reflects whether the Gemini client was configured at startup,
/// making the degraded-start state visible to deployments.
pub async fn readiness_check(State(state): State<AppState>) -> StatusCode {
    if state.text_provider.is_some() {
        StatusCode::OK
    } else {
        StatusCode::SERVICE_UNAVAILABLE
    }
}
