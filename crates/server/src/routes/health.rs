//! Liveness check.

use axum::Json;

use backlink_vista_core::api::HealthResponse;

/// Returns `{"status":"ok"}` while the server is running.
pub async fn health() -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "ok".to_string(),
    })
}
