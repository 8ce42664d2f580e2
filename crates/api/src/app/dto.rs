use std::collections::BTreeSet;

use serde::{Deserialize, Serialize};

use warden_auth::{Permission, Role};
use warden_core::UserId;

// -------------------------
// Request DTOs
// -------------------------

/// Login body. Unknown fields are ignored; emptiness is checked by the
/// handler so the failure maps to a 400, not a deserialization error.
#[derive(Debug, Deserialize)]
pub struct LoginRequest {
    pub email: String,
    pub password: String,
}

// -------------------------
// Response DTOs
// -------------------------

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct LoginResponse {
    pub access_token: String,
}

/// Profile payload for the "who am I" route. Role codes and permission keys
/// serialize as sorted arrays; they are for display and feature-gating only,
/// authorization decisions always re-derive from the store.
#[derive(Debug, Serialize)]
pub struct ProfileResponse {
    pub id: UserId,
    pub email: String,
    pub roles: BTreeSet<Role>,
    pub permissions: BTreeSet<Permission>,
}
