use std::sync::Arc;

use axum::{routing::get, Router};

use warden_auth::Permission;

use crate::app::services::AppServices;
use crate::authz::{AuthzState, permission_middleware};

pub mod auth;
pub mod protected;
pub mod system;

/// Router for all routes behind the authentication gate.
///
/// Each route's required permission set is attached here, at registration;
/// the authorization layer reads it back at dispatch time. An empty set
/// means authentication only.
pub fn authenticated_router(services: Arc<AppServices>) -> Router {
    let me = Router::new()
        .route("/api/auth/me", get(auth::me))
        .layer(axum::middleware::from_fn_with_state(
            AuthzState::new(services.clone(), Vec::new()),
            permission_middleware,
        ));

    let example = Router::new()
        .route("/api/protected/example", get(protected::example))
        .layer(axum::middleware::from_fn_with_state(
            AuthzState::new(services, vec![Permission::new("user.read")]),
            permission_middleware,
        ));

    Router::new().merge(me).merge(example)
}
