//! Login, logout, and profile.

use std::sync::Arc;

use axum::{
    extract::{Extension, rejection::JsonRejection},
    http::StatusCode,
    response::IntoResponse,
    Json,
};

use warden_auth::{AuthenticatedIdentity, verify_password};
use warden_infra::CredentialStore;

use crate::app::dto::{LoginRequest, LoginResponse, ProfileResponse};
use crate::app::{errors, services::AppServices};
use crate::context::IdentityContext;

/// POST /api/auth/login
///
/// Unknown email, wrong password, and deactivated account are deliberately
/// indistinguishable: one 401 body for all three.
pub async fn login(
    Extension(services): Extension<Arc<AppServices>>,
    body: Result<Json<LoginRequest>, JsonRejection>,
) -> axum::response::Response {
    let Ok(Json(body)) = body else {
        return errors::validation("body must be JSON with email and password");
    };
    if body.email.is_empty() || body.password.is_empty() {
        return errors::validation("email and password must be non-empty");
    }

    let user = match services.store.find_user_by_email(&body.email).await {
        Ok(user) => user,
        Err(e) => {
            tracing::error!(error = %e, "user lookup failed");
            return errors::store_failure();
        }
    };

    // An inactive account authenticates exactly like a missing one.
    let Some(user) = user.filter(|u| u.is_active) else {
        tracing::debug!("login rejected");
        return errors::invalid_credentials();
    };

    match verify_password(&body.password, &user.password_hash).await {
        Ok(true) => {}
        Ok(false) => {
            tracing::debug!("login rejected");
            return errors::invalid_credentials();
        }
        Err(e) => {
            tracing::error!(error = %e, "password verification failed");
            return errors::internal();
        }
    }

    let identity = AuthenticatedIdentity::new(user.id, user.email);
    match services.tokens.issue(&identity) {
        Ok(token) => (
            StatusCode::OK,
            Json(LoginResponse {
                access_token: token,
            }),
        )
            .into_response(),
        Err(e) => {
            tracing::error!(error = %e, "token issuance failed");
            errors::internal()
        }
    }
}

/// POST /api/auth/logout
///
/// There is no server-side session to tear down; discarding the token is the
/// client's job. Public and always a 200, token or not.
pub async fn logout() -> impl IntoResponse {
    Json(serde_json::json!({ "ok": true }))
}

/// GET /api/auth/me
///
/// Reloads the user record rather than trusting the token: tokens carry no
/// liveness, so deactivation (or deletion) since issuance is enforced here
/// with a 401.
pub async fn me(
    Extension(services): Extension<Arc<AppServices>>,
    Extension(identity): Extension<IdentityContext>,
) -> axum::response::Response {
    let user = match services.store.find_user_by_id(identity.user_id()).await {
        Ok(user) => user,
        Err(e) => {
            tracing::error!(error = %e, "user lookup failed");
            return errors::store_failure();
        }
    };

    let Some(user) = user.filter(|u| u.is_active) else {
        tracing::debug!(user_id = %identity.user_id(), "profile for missing or inactive user");
        return errors::unauthorized();
    };

    let effective = match services.store.effective_permissions(user.id).await {
        Ok(effective) => effective,
        Err(e) => {
            tracing::error!(error = %e, "permission resolution failed");
            return errors::store_failure();
        }
    };

    (
        StatusCode::OK,
        Json(ProfileResponse {
            id: user.id,
            email: user.email,
            roles: effective.roles,
            permissions: effective.permissions,
        }),
    )
        .into_response()
}
