//! Built-in bootstrap accounts.
//!
//! Two users, two roles, two permissions. Enough to exercise every
//! authorization path: the admin holds both permissions through one role,
//! the viewer holds a strict subset.

use std::collections::HashMap;

use thiserror::Error;
use tracing::info;

use warden_auth::{hash_password, PasswordError};
use warden_core::{PermissionId, RoleId, UserId};

use crate::credentials::{
    InMemoryCredentialStore, PermissionRecord, PostgresCredentialStore, RoleRecord, StoreError,
    UserRecord,
};

pub const ADMIN_EMAIL: &str = "admin@example.com";
pub const ADMIN_PASSWORD: &str = "admin123";
pub const VIEWER_EMAIL: &str = "viewer@example.com";
pub const VIEWER_PASSWORD: &str = "viewer123";

struct SeedPermission {
    key: &'static str,
    description: &'static str,
}

struct SeedRole {
    code: &'static str,
    name: &'static str,
    grants: &'static [&'static str],
}

struct SeedUser {
    email: &'static str,
    password: &'static str,
    roles: &'static [&'static str],
}

const PERMISSIONS: &[SeedPermission] = &[
    SeedPermission {
        key: "user.read",
        description: "Read user data",
    },
    SeedPermission {
        key: "menu.read",
        description: "Read menu data",
    },
];

const ROLES: &[SeedRole] = &[
    SeedRole {
        code: "admin",
        name: "Administrator",
        grants: &["user.read", "menu.read"],
    },
    SeedRole {
        code: "viewer",
        name: "Viewer",
        grants: &["user.read"],
    },
];

const USERS: &[SeedUser] = &[
    SeedUser {
        email: ADMIN_EMAIL,
        password: ADMIN_PASSWORD,
        roles: &["admin"],
    },
    SeedUser {
        email: VIEWER_EMAIL,
        password: VIEWER_PASSWORD,
        roles: &["viewer"],
    },
];

#[derive(Debug, Error)]
pub enum SeedError {
    #[error("failed to hash seed password: {0}")]
    Password(#[from] PasswordError),

    #[error("seed write failed: {0}")]
    Store(#[from] StoreError),
}

/// Load the built-in accounts into an in-memory store.
///
/// The in-memory store starts empty on every boot, so this runs
/// unconditionally. `bcrypt_cost` lets tests pick a cheap cost; `None` means
/// the bcrypt default.
pub async fn seed_in_memory(
    store: &InMemoryCredentialStore,
    bcrypt_cost: Option<u32>,
) -> Result<(), SeedError> {
    let mut permission_ids: HashMap<&str, PermissionId> = HashMap::new();
    for seed in PERMISSIONS {
        let id = PermissionId::new();
        permission_ids.insert(seed.key, id);
        store.define_permission(PermissionRecord {
            id,
            key: seed.key.to_string(),
            description: seed.description.to_string(),
        });
    }

    let mut role_ids: HashMap<&str, RoleId> = HashMap::new();
    for seed in ROLES {
        let id = RoleId::new();
        role_ids.insert(seed.code, id);
        store.define_role(RoleRecord {
            id,
            code: seed.code.to_string(),
            name: seed.name.to_string(),
        });
        for key in seed.grants {
            if let Some(permission_id) = permission_ids.get(key) {
                store.grant_permission(id, *permission_id);
            }
        }
    }

    for seed in USERS {
        let id = UserId::new();
        let password_hash = hash_password(seed.password, bcrypt_cost).await?;
        store.insert_user(UserRecord {
            id,
            email: seed.email.to_string(),
            password_hash,
            is_active: true,
        });
        for code in seed.roles {
            if let Some(role_id) = role_ids.get(code) {
                store.assign_role(id, *role_id);
            }
        }
    }

    info!(
        users = USERS.len(),
        roles = ROLES.len(),
        "seeded built-in accounts"
    );
    Ok(())
}

/// Load the built-in accounts into Postgres when the users table is empty.
///
/// The database persists across boots, so the seed runs only on the first
/// one. Returns `true` when it ran. Inserts are keyed on natural unique
/// columns (email, role code, permission key) and skip existing rows, so a
/// concurrent bootstrap cannot double-insert.
pub async fn seed_postgres_if_empty(
    store: &PostgresCredentialStore,
    bcrypt_cost: Option<u32>,
) -> Result<bool, SeedError> {
    if store.count_users().await? > 0 {
        info!("credential tables already populated, skipping seed");
        return Ok(false);
    }

    let mut permission_ids: HashMap<&str, PermissionId> = HashMap::new();
    for seed in PERMISSIONS {
        let id = PermissionId::new();
        permission_ids.insert(seed.key, id);
        store
            .insert_permission(&PermissionRecord {
                id,
                key: seed.key.to_string(),
                description: seed.description.to_string(),
            })
            .await?;
    }

    let mut role_ids: HashMap<&str, RoleId> = HashMap::new();
    for seed in ROLES {
        let id = RoleId::new();
        role_ids.insert(seed.code, id);
        store
            .insert_role(&RoleRecord {
                id,
                code: seed.code.to_string(),
                name: seed.name.to_string(),
            })
            .await?;
        for key in seed.grants {
            if let Some(permission_id) = permission_ids.get(key) {
                store.grant_permission(id, *permission_id).await?;
            }
        }
    }

    for seed in USERS {
        let id = UserId::new();
        let password_hash = hash_password(seed.password, bcrypt_cost).await?;
        store
            .insert_user(&UserRecord {
                id,
                email: seed.email.to_string(),
                password_hash,
                is_active: true,
            })
            .await?;
        for code in seed.roles {
            if let Some(role_id) = role_ids.get(code) {
                store.assign_role(id, *role_id).await?;
            }
        }
    }

    info!(
        users = USERS.len(),
        roles = ROLES.len(),
        "seeded built-in accounts"
    );
    Ok(true)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::credentials::CredentialStore;
    use warden_auth::{verify_password, Permission, Role};

    // Cheap cost keeps hashing fast in tests.
    const TEST_COST: Option<u32> = Some(4);

    #[tokio::test]
    async fn seeded_admin_logs_in_with_both_permissions() {
        let store = InMemoryCredentialStore::new();
        seed_in_memory(&store, TEST_COST).await.unwrap();

        let user = store
            .find_user_by_email(ADMIN_EMAIL)
            .await
            .unwrap()
            .expect("admin account present");
        assert!(user.is_active);
        assert!(verify_password(ADMIN_PASSWORD, &user.password_hash)
            .await
            .unwrap());

        let effective = store.effective_permissions(user.id).await.unwrap();
        assert!(effective.roles.contains(&Role::new("admin")));
        assert!(effective.permissions.contains(&Permission::new("user.read")));
        assert!(effective.permissions.contains(&Permission::new("menu.read")));
    }

    #[tokio::test]
    async fn seeded_viewer_holds_a_strict_subset() {
        let store = InMemoryCredentialStore::new();
        seed_in_memory(&store, TEST_COST).await.unwrap();

        let user = store
            .find_user_by_email(VIEWER_EMAIL)
            .await
            .unwrap()
            .expect("viewer account present");
        assert!(verify_password(VIEWER_PASSWORD, &user.password_hash)
            .await
            .unwrap());

        let effective = store.effective_permissions(user.id).await.unwrap();
        assert!(effective.roles.contains(&Role::new("viewer")));
        assert!(effective.permissions.contains(&Permission::new("user.read")));
        assert!(!effective.permissions.contains(&Permission::new("menu.read")));
    }

    #[tokio::test]
    async fn seeded_passwords_reject_the_wrong_secret() {
        let store = InMemoryCredentialStore::new();
        seed_in_memory(&store, TEST_COST).await.unwrap();

        let user = store
            .find_user_by_email(ADMIN_EMAIL)
            .await
            .unwrap()
            .expect("admin account present");
        assert!(!verify_password(VIEWER_PASSWORD, &user.password_hash)
            .await
            .unwrap());
    }
}
