//! Bearer token issuance and verification (HMAC-SHA256).
//!
//! Tokens carry `AccessClaims` and nothing else. The signing key is
//! process-wide state established at startup; rotating it invalidates every
//! previously issued token, which is the only way a token ever stops
//! verifying, because no expiry claim is issued or required.

use jsonwebtoken::errors::ErrorKind;
use jsonwebtoken::{Algorithm, DecodingKey, EncodingKey, Header, Validation, decode, encode};
use thiserror::Error;

use crate::claims::AccessClaims;
use crate::identity::AuthenticatedIdentity;

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum TokenError {
    #[error("failed to sign token: {0}")]
    Signing(String),

    #[error("token signature is invalid")]
    InvalidSignature,

    #[error("token is malformed")]
    Malformed,
}

/// Issues and verifies bearer tokens.
///
/// Verification must not fail open: every decode or signature problem maps to
/// an error, never to a default identity.
pub trait TokenService: Send + Sync {
    /// Sign claims for the given identity. Succeeds for any well-formed identity.
    fn issue(&self, identity: &AuthenticatedIdentity) -> Result<String, TokenError>;

    /// Verify the signature and decode the claims.
    fn verify(&self, token: &str) -> Result<AccessClaims, TokenError>;
}

/// HS256 implementation holding prepared keys and validation settings.
pub struct Hs256TokenService {
    encoding_key: EncodingKey,
    decoding_key: DecodingKey,
    validation: Validation,
}

impl Hs256TokenService {
    pub fn new(secret: &[u8]) -> Self {
        let mut validation = Validation::new(Algorithm::HS256);
        // No expiry claim is issued, so none is required or checked on verify.
        validation.validate_exp = false;
        validation.required_spec_claims.clear();

        Self {
            encoding_key: EncodingKey::from_secret(secret),
            decoding_key: DecodingKey::from_secret(secret),
            validation,
        }
    }
}

impl TokenService for Hs256TokenService {
    fn issue(&self, identity: &AuthenticatedIdentity) -> Result<String, TokenError> {
        let claims = AccessClaims::issued_now(identity);
        encode(&Header::new(Algorithm::HS256), &claims, &self.encoding_key)
            .map_err(|e| TokenError::Signing(e.to_string()))
    }

    fn verify(&self, token: &str) -> Result<AccessClaims, TokenError> {
        decode::<AccessClaims>(token, &self.decoding_key, &self.validation)
            .map(|data| data.claims)
            .map_err(|e| match e.kind() {
                ErrorKind::InvalidSignature => TokenError::InvalidSignature,
                _ => TokenError::Malformed,
            })
    }
}

// Keys must never leak through debug output.
impl core::fmt::Debug for Hs256TokenService {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("Hs256TokenService").finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use warden_core::UserId;

    const SECRET: &[u8] = b"unit-test-signing-key";

    fn service() -> Hs256TokenService {
        Hs256TokenService::new(SECRET)
    }

    fn identity() -> AuthenticatedIdentity {
        AuthenticatedIdentity::new(UserId::new(), "user@example.com")
    }

    #[test]
    fn round_trip_preserves_subject_and_email() {
        let svc = service();
        let who = identity();

        let token = svc.issue(&who).unwrap();
        let claims = svc.verify(&token).unwrap();

        assert_eq!(claims.sub, who.user_id);
        assert_eq!(claims.email, who.email);
        assert_eq!(claims.identity(), who);
    }

    #[test]
    fn verify_rejects_token_signed_with_different_key() {
        let other = Hs256TokenService::new(b"a-completely-different-key");
        let token = other.issue(&identity()).unwrap();

        assert_eq!(service().verify(&token), Err(TokenError::InvalidSignature));
    }

    #[test]
    fn verify_rejects_tampered_payload() {
        let svc = service();
        let token = svc.issue(&identity()).unwrap();

        // Flip one character inside the payload segment.
        let mut parts: Vec<String> = token.split('.').map(String::from).collect();
        assert_eq!(parts.len(), 3);
        let mut payload: Vec<u8> = parts[1].clone().into_bytes();
        let mid = payload.len() / 2;
        payload[mid] = if payload[mid] == b'A' { b'B' } else { b'A' };
        parts[1] = String::from_utf8(payload).unwrap();
        let tampered = parts.join(".");

        assert!(svc.verify(&tampered).is_err());
    }

    #[test]
    fn verify_rejects_truncated_and_garbage_input() {
        let svc = service();
        let token = svc.issue(&identity()).unwrap();

        assert_eq!(svc.verify(&token[..token.len() / 2]), Err(TokenError::Malformed));
        assert_eq!(svc.verify("not-a-jwt"), Err(TokenError::Malformed));
        assert_eq!(svc.verify(""), Err(TokenError::Malformed));
    }

    #[test]
    fn verify_rejects_claims_missing_required_fields() {
        // Signed with the right key but the payload lacks `email` and `iat`.
        let stub = serde_json::json!({ "sub": uuid::Uuid::now_v7() });
        let token = encode(
            &Header::new(Algorithm::HS256),
            &stub,
            &EncodingKey::from_secret(SECRET),
        )
        .unwrap();

        assert_eq!(service().verify(&token), Err(TokenError::Malformed));
    }

    #[test]
    fn tokens_do_not_expire() {
        // A token stamped years in the past still verifies; lifetime is tied
        // to the signing key, not the clock.
        let stale = AccessClaims {
            sub: UserId::new(),
            email: "old@example.com".to_string(),
            iat: 946_684_800, // 2000-01-01
        };
        let token = encode(
            &Header::new(Algorithm::HS256),
            &stale,
            &EncodingKey::from_secret(SECRET),
        )
        .unwrap();

        let claims = service().verify(&token).unwrap();
        assert_eq!(claims.iat, 946_684_800);
    }
}
