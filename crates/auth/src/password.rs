//! Password hashing and verification.
//!
//! bcrypt with per-hash random salt. Hashing is CPU-bound by construction, so
//! both operations run on the blocking pool rather than stalling the async
//! executor. Comparison happens inside `bcrypt::verify`; there is no
//! short-circuit or case folding on this path.

use bcrypt::{DEFAULT_COST, hash, verify};
use thiserror::Error;

#[derive(Debug, Error)]
pub enum PasswordError {
    #[error("password hashing failed: {0}")]
    Hash(String),

    #[error("stored digest could not be checked: {0}")]
    Verify(String),

    #[error("hashing task did not complete: {0}")]
    TaskJoin(String),
}

/// Hash a plaintext password.
///
/// Used at provisioning/seed time only; the runtime pipeline never writes
/// digests. `cost` defaults to `bcrypt::DEFAULT_COST`; tests pass a low cost
/// to stay fast.
pub async fn hash_password(plain: &str, cost: Option<u32>) -> Result<String, PasswordError> {
    let plain = plain.to_owned();
    let cost = cost.unwrap_or(DEFAULT_COST);
    tokio::task::spawn_blocking(move || hash(plain, cost))
        .await
        .map_err(|e| PasswordError::TaskJoin(e.to_string()))?
        .map_err(|e| PasswordError::Hash(e.to_string()))
}

/// Check a plaintext password against a stored bcrypt digest.
///
/// `Ok(false)` means a well-formed digest that does not match; `Err` is
/// reserved for digests that cannot be evaluated at all.
pub async fn verify_password(plain: &str, digest: &str) -> Result<bool, PasswordError> {
    let plain = plain.to_owned();
    let digest = digest.to_owned();
    tokio::task::spawn_blocking(move || verify(plain, &digest))
        .await
        .map_err(|e| PasswordError::TaskJoin(e.to_string()))?
        .map_err(|e| PasswordError::Verify(e.to_string()))
}

#[cfg(test)]
mod tests {
    use super::*;

    // Low cost keeps the suite quick; production uses DEFAULT_COST.
    const TEST_COST: Option<u32> = Some(4);

    #[tokio::test]
    async fn hash_then_verify_accepts_the_same_password() {
        let digest = hash_password("admin123", TEST_COST).await.unwrap();
        assert!(digest.starts_with("$2"));
        assert!(verify_password("admin123", &digest).await.unwrap());
    }

    #[tokio::test]
    async fn verify_rejects_a_different_password() {
        let digest = hash_password("admin123", TEST_COST).await.unwrap();
        assert!(!verify_password("admin124", &digest).await.unwrap());
        assert!(!verify_password("", &digest).await.unwrap());
        assert!(!verify_password("Admin123", &digest).await.unwrap());
    }

    #[tokio::test]
    async fn each_hash_gets_its_own_salt() {
        let a = hash_password("same-password", TEST_COST).await.unwrap();
        let b = hash_password("same-password", TEST_COST).await.unwrap();
        assert_ne!(a, b);
        assert!(verify_password("same-password", &a).await.unwrap());
        assert!(verify_password("same-password", &b).await.unwrap());
    }

    #[tokio::test]
    async fn verify_errors_on_an_unusable_digest() {
        assert!(verify_password("whatever", "not-a-bcrypt-digest").await.is_err());
    }
}
