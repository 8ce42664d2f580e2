use serde::{Deserialize, Serialize};

use warden_core::UserId;

/// Identity proven by a verified bearer token.
///
/// Request-scoped and transient: derived from decoded claims after signature
/// verification, threaded through the request, never persisted. Holds only
/// what the token asserts; roles and permissions are re-read from the store
/// on every authorization check.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AuthenticatedIdentity {
    pub user_id: UserId,
    pub email: String,
}

impl AuthenticatedIdentity {
    pub fn new(user_id: UserId, email: impl Into<String>) -> Self {
        Self {
            user_id,
            email: email.into(),
        }
    }
}
