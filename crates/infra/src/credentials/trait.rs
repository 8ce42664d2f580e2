use std::collections::BTreeSet;

use serde::{Deserialize, Serialize};
use thiserror::Error;

use warden_auth::{Permission, Role};
use warden_core::{PermissionId, RoleId, UserId};

/// A stored user credential record.
///
/// `password_hash` is an opaque bcrypt digest; nothing outside the password
/// module interprets it. Lookups return inactive users too: treating
/// `is_active == false` the same as "no such user" is the caller's rule, and
/// it must be applied on every authentication path.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UserRecord {
    pub id: UserId,
    pub email: String,
    pub password_hash: String,
    pub is_active: bool,
}

/// A role as stored: stable code plus display name.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RoleRecord {
    pub id: RoleId,
    pub code: String,
    pub name: String,
}

/// A permission as stored: stable dotted key plus description.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PermissionRecord {
    pub id: PermissionId,
    pub key: String,
    pub description: String,
}

/// One role assigned to a user, together with everything that role grants.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RoleGrant {
    pub role: RoleRecord,
    pub permissions: Vec<PermissionRecord>,
}

/// Role codes and deduplicated permission keys effective for one user.
///
/// Sets are ordered so serialized output is deterministic.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EffectivePermissions {
    pub roles: BTreeSet<Role>,
    pub permissions: BTreeSet<Permission>,
}

/// Credential store operation error.
///
/// Absence is never an error: lookups return `Option` and an unknown user has
/// an empty grant list. This enum covers backend faults only (connection
/// loss, undecodable rows, poisoned state), which surface as server errors at
/// the boundary, never as an authentication or authorization outcome.
#[derive(Debug, Error)]
pub enum StoreError {
    #[error("credential store backend failure: {0}")]
    Backend(String),
}

/// Read-only boundary over user/role/permission data.
///
/// ## Design
///
/// - **No storage assumptions**: the in-memory implementation backs tests and
///   development, the Postgres one backs production.
/// - **Read-only**: the authorization pipeline never writes through this
///   trait. Provisioning (seeding, activation changes) is implementation
///   surface, not part of the boundary.
/// - **Fresh reads**: nothing here caches across calls. Role or permission
///   changes are visible on the next request without token reissuance.
///
/// ## Lookup semantics
///
/// Email lookup is byte-for-byte against the stored value: no trimming, no
/// case folding. `role_grants` performs one logical traversal of the
/// user→role→permission association graph and yields an empty list for a
/// user with no assignments (or no such user).
#[async_trait::async_trait]
pub trait CredentialStore: Send + Sync {
    /// Look up a user by exact email.
    async fn find_user_by_email(&self, email: &str) -> Result<Option<UserRecord>, StoreError>;

    /// Look up a user by id.
    async fn find_user_by_id(&self, id: UserId) -> Result<Option<UserRecord>, StoreError>;

    /// All roles assigned to a user, each with the permissions it grants.
    async fn role_grants(&self, user_id: UserId) -> Result<Vec<RoleGrant>, StoreError>;

    /// Union of permission keys across every assigned role, recomputed from
    /// current associations on each call. Zero roles yield empty sets.
    async fn effective_permissions(
        &self,
        user_id: UserId,
    ) -> Result<EffectivePermissions, StoreError> {
        let grants = self.role_grants(user_id).await?;

        let mut roles = BTreeSet::new();
        let mut permissions = BTreeSet::new();
        for grant in grants {
            roles.insert(Role::new(grant.role.code));
            for perm in grant.permissions {
                permissions.insert(Permission::new(perm.key));
            }
        }

        Ok(EffectivePermissions { roles, permissions })
    }
}
