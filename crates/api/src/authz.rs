//! Per-route authorization gate.
//!
//! Each protected route attaches the permission set it requires when it is
//! registered; this middleware reads that set at dispatch time, resolves the
//! caller's effective permissions fresh from the store, and lets the
//! any-of decision in `warden_auth::authorize` rule on it.

use std::sync::Arc;

use axum::{extract::State, middleware::Next, response::Response};

use warden_auth::{Permission, authorize};
use warden_infra::CredentialStore;

use crate::app::{errors, services::AppServices};
use crate::context::IdentityContext;

/// Route-scoped authorization state: the service handle plus the permission
/// set the route was registered with.
#[derive(Clone)]
pub struct AuthzState {
    pub services: Arc<AppServices>,
    pub required: Arc<[Permission]>,
}

impl AuthzState {
    pub fn new(services: Arc<AppServices>, required: Vec<Permission>) -> Self {
        Self {
            services,
            required: required.into(),
        }
    }
}

/// Authorization gate for one route.
///
/// An empty requirement passes unconditionally without touching the store.
/// Otherwise the request must carry an authenticated identity (absence is a
/// 401, never a 403), and the identity's effective permission set must
/// intersect the requirement. Store faults surface as 500, not as denial.
pub async fn permission_middleware(
    State(state): State<AuthzState>,
    req: axum::http::Request<axum::body::Body>,
    next: Next,
) -> Result<Response, Response> {
    if state.required.is_empty() {
        return Ok(next.run(req).await);
    }

    let user_id = match req.extensions().get::<IdentityContext>() {
        Some(identity) => identity.user_id(),
        None => return Err(errors::unauthorized()),
    };

    let effective = state
        .services
        .store
        .effective_permissions(user_id)
        .await
        .map_err(|e| {
            tracing::error!(error = %e, "permission resolution failed");
            errors::store_failure()
        })?;

    authorize(&effective.permissions, &state.required).map_err(|e| {
        tracing::debug!(%user_id, "request forbidden");
        errors::forbidden(e.to_string())
    })?;

    Ok(next.run(req).await)
}
