use chrono::Utc;
use serde::{Deserialize, Serialize};

use warden_core::UserId;

use crate::identity::AuthenticatedIdentity;

/// Bearer token claims (transport-agnostic).
///
/// Exactly what the service signs: the subject, the subject's email at issue
/// time, and an issued-at stamp. There is deliberately no `exp` claim: a
/// token stays valid for as long as the signing key does. See the `token`
/// module for the verification side of that contract.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AccessClaims {
    /// Subject: the authenticated user's id.
    pub sub: UserId,

    /// Email as of issue time. Display/logging convenience only; anything
    /// security-relevant re-reads the user record.
    pub email: String,

    /// Issued-at, seconds since the Unix epoch.
    pub iat: i64,
}

impl AccessClaims {
    /// Build claims for an identity, stamped with the current time.
    pub fn issued_now(identity: &AuthenticatedIdentity) -> Self {
        Self {
            sub: identity.user_id,
            email: identity.email.clone(),
            iat: Utc::now().timestamp(),
        }
    }

    /// The request-scoped identity these claims prove.
    pub fn identity(&self) -> AuthenticatedIdentity {
        AuthenticatedIdentity::new(self.sub, self.email.clone())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn claims_serialize_with_jwt_field_names() {
        let identity = AuthenticatedIdentity::new(UserId::new(), "a@example.com");
        let claims = AccessClaims::issued_now(&identity);
        let value = serde_json::to_value(&claims).unwrap();

        assert_eq!(value["sub"], serde_json::json!(identity.user_id.to_string()));
        assert_eq!(value["email"], serde_json::json!("a@example.com"));
        assert!(value["iat"].is_i64());
        assert!(value.get("exp").is_none());
    }

    #[test]
    fn identity_round_trips_through_claims() {
        let identity = AuthenticatedIdentity::new(UserId::new(), "b@example.com");
        let claims = AccessClaims::issued_now(&identity);
        assert_eq!(claims.identity(), identity);
    }
}
