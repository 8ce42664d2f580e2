use axum::{response::IntoResponse, Json};

/// GET /health, public, for deploy probes.
pub async fn health() -> impl IntoResponse {
    Json(serde_json::json!({ "status": "ok" }))
}
