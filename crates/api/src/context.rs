use warden_auth::AuthenticatedIdentity;
use warden_core::UserId;

/// Authenticated identity for a request.
///
/// Inserted into request extensions by the authentication middleware after
/// token verification and must be present for everything behind it. Carries
/// only what the token proved; role and permission data is read fresh from
/// the store at each authorization check.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct IdentityContext {
    identity: AuthenticatedIdentity,
}

impl IdentityContext {
    pub fn new(identity: AuthenticatedIdentity) -> Self {
        Self { identity }
    }

    pub fn user_id(&self) -> UserId {
        self.identity.user_id
    }

    pub fn email(&self) -> &str {
        &self.identity.email
    }
}
