//! In-memory credential store for tests and development.

use std::collections::HashMap;
use std::sync::RwLock;

use warden_core::{PermissionId, RoleId, UserId};

use super::r#trait::{
    CredentialStore, PermissionRecord, RoleGrant, RoleRecord, StoreError, UserRecord,
};

/// Credential tables held in RwLock'd maps.
///
/// Provisioning methods mutate; the `CredentialStore` impl only reads. Lock
/// scopes never cross an await point.
#[derive(Debug, Default)]
pub struct InMemoryCredentialStore {
    inner: RwLock<Tables>,
}

#[derive(Debug, Default)]
struct Tables {
    users: HashMap<UserId, UserRecord>,
    roles: HashMap<RoleId, RoleRecord>,
    permissions: HashMap<PermissionId, PermissionRecord>,
    user_roles: HashMap<UserId, Vec<RoleId>>,
    role_permissions: HashMap<RoleId, Vec<PermissionId>>,
}

impl InMemoryCredentialStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert_user(&self, user: UserRecord) {
        if let Ok(mut tables) = self.inner.write() {
            tables.users.insert(user.id, user);
        }
    }

    pub fn define_role(&self, role: RoleRecord) {
        if let Ok(mut tables) = self.inner.write() {
            tables.roles.insert(role.id, role);
        }
    }

    pub fn define_permission(&self, permission: PermissionRecord) {
        if let Ok(mut tables) = self.inner.write() {
            tables.permissions.insert(permission.id, permission);
        }
    }

    /// Assign a role to a user (idempotent).
    pub fn assign_role(&self, user_id: UserId, role_id: RoleId) {
        if let Ok(mut tables) = self.inner.write() {
            let assigned = tables.user_roles.entry(user_id).or_default();
            if !assigned.contains(&role_id) {
                assigned.push(role_id);
            }
        }
    }

    /// Remove a role assignment if present.
    pub fn revoke_role(&self, user_id: UserId, role_id: RoleId) {
        if let Ok(mut tables) = self.inner.write() {
            if let Some(assigned) = tables.user_roles.get_mut(&user_id) {
                assigned.retain(|r| *r != role_id);
            }
        }
    }

    /// Grant a permission to a role (idempotent).
    pub fn grant_permission(&self, role_id: RoleId, permission_id: PermissionId) {
        if let Ok(mut tables) = self.inner.write() {
            let granted = tables.role_permissions.entry(role_id).or_default();
            if !granted.contains(&permission_id) {
                granted.push(permission_id);
            }
        }
    }

    /// Look up a defined role by its code.
    pub fn role_by_code(&self, code: &str) -> Option<RoleRecord> {
        match self.inner.read() {
            Ok(tables) => tables.roles.values().find(|r| r.code == code).cloned(),
            Err(_) => None,
        }
    }

    /// Flip a user's active flag. Returns `false` when the user is unknown.
    pub fn set_user_active(&self, user_id: UserId, active: bool) -> bool {
        match self.inner.write() {
            Ok(mut tables) => match tables.users.get_mut(&user_id) {
                Some(user) => {
                    user.is_active = active;
                    true
                }
                None => false,
            },
            Err(_) => false,
        }
    }
}

#[async_trait::async_trait]
impl CredentialStore for InMemoryCredentialStore {
    async fn find_user_by_email(&self, email: &str) -> Result<Option<UserRecord>, StoreError> {
        // Exact match against the stored value; linear scan is fine at this scale.
        let tables = self.inner.read().map_err(poisoned)?;
        Ok(tables.users.values().find(|u| u.email == email).cloned())
    }

    async fn find_user_by_id(&self, id: UserId) -> Result<Option<UserRecord>, StoreError> {
        let tables = self.inner.read().map_err(poisoned)?;
        Ok(tables.users.get(&id).cloned())
    }

    async fn role_grants(&self, user_id: UserId) -> Result<Vec<RoleGrant>, StoreError> {
        let tables = self.inner.read().map_err(poisoned)?;

        let Some(role_ids) = tables.user_roles.get(&user_id) else {
            return Ok(Vec::new());
        };

        let mut grants = Vec::with_capacity(role_ids.len());
        for role_id in role_ids {
            let Some(role) = tables.roles.get(role_id) else {
                continue;
            };
            let permissions = tables
                .role_permissions
                .get(role_id)
                .map(|ids| {
                    ids.iter()
                        .filter_map(|pid| tables.permissions.get(pid).cloned())
                        .collect()
                })
                .unwrap_or_default();
            grants.push(RoleGrant {
                role: role.clone(),
                permissions,
            });
        }
        Ok(grants)
    }
}

// A poisoned lock is a faulted backend, not a missing user.
fn poisoned<T>(_: std::sync::PoisonError<T>) -> StoreError {
    StoreError::Backend("credential tables lock poisoned".to_string())
}
