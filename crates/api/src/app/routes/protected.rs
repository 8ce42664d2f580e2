//! Permission-gated sample routes.

use axum::{response::IntoResponse, Json};

/// GET /api/protected/example
///
/// The "user.read" requirement is enforced by the route's authorization
/// layer before this handler runs; the handler itself has nothing to check.
pub async fn example() -> impl IntoResponse {
    Json(serde_json::json!({ "ok": true }))
}
