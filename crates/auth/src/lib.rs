//! `warden-auth` — pure authentication/authorization core.
//!
//! This crate is intentionally decoupled from HTTP and storage: token claims
//! and HS256 signing, bcrypt password verification, and the permission
//! decision live here with no transport or persistence types in sight.

pub mod authorize;
pub mod claims;
pub mod identity;
pub mod password;
pub mod permissions;
pub mod roles;
pub mod token;

pub use authorize::{AuthzError, authorize};
pub use claims::AccessClaims;
pub use identity::AuthenticatedIdentity;
pub use password::{PasswordError, hash_password, verify_password};
pub use permissions::Permission;
pub use roles::Role;
pub use token::{Hs256TokenService, TokenError, TokenService};
