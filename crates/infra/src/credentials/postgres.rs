//! Postgres-backed credential store.
//!
//! Users, roles, permissions, and their two association tables live in five
//! relational tables. All reads go through the connection pool; every sqlx
//! error is mapped to `StoreError::Backend` with the failing operation named,
//! so storage faults surface as server errors rather than authentication
//! outcomes.

use std::sync::Arc;

use sqlx::{FromRow, PgPool, Row};
use tracing::instrument;

use warden_core::{PermissionId, RoleId, UserId};

use super::r#trait::{
    CredentialStore, PermissionRecord, RoleGrant, RoleRecord, StoreError, UserRecord,
};

/// Postgres credential store.
///
/// Holds the sqlx connection pool, which is thread-safe and cheap to share.
/// Email comparison happens in SQL with plain equality, so lookups match the
/// stored value byte-for-byte.
#[derive(Debug, Clone)]
pub struct PostgresCredentialStore {
    pool: Arc<PgPool>,
}

const SCHEMA: &[&str] = &[
    r#"
    CREATE TABLE IF NOT EXISTS users (
        id UUID PRIMARY KEY,
        email TEXT NOT NULL UNIQUE,
        password_hash TEXT NOT NULL,
        is_active BOOLEAN NOT NULL DEFAULT TRUE
    )
    "#,
    r#"
    CREATE TABLE IF NOT EXISTS roles (
        id UUID PRIMARY KEY,
        code TEXT NOT NULL UNIQUE,
        name TEXT NOT NULL
    )
    "#,
    r#"
    CREATE TABLE IF NOT EXISTS permissions (
        id UUID PRIMARY KEY,
        key TEXT NOT NULL UNIQUE,
        description TEXT NOT NULL
    )
    "#,
    r#"
    CREATE TABLE IF NOT EXISTS user_roles (
        user_id UUID NOT NULL REFERENCES users(id) ON DELETE CASCADE,
        role_id UUID NOT NULL REFERENCES roles(id) ON DELETE CASCADE,
        PRIMARY KEY (user_id, role_id)
    )
    "#,
    r#"
    CREATE TABLE IF NOT EXISTS role_permissions (
        role_id UUID NOT NULL REFERENCES roles(id) ON DELETE CASCADE,
        permission_id UUID NOT NULL REFERENCES permissions(id) ON DELETE CASCADE,
        PRIMARY KEY (role_id, permission_id)
    )
    "#,
];

impl PostgresCredentialStore {
    pub fn new(pool: PgPool) -> Self {
        Self {
            pool: Arc::new(pool),
        }
    }

    /// Create the five credential tables if they do not exist yet.
    #[instrument(skip(self), err)]
    pub async fn ensure_schema(&self) -> Result<(), StoreError> {
        for statement in SCHEMA {
            sqlx::query(statement)
                .execute(&*self.pool)
                .await
                .map_err(|e| map_sqlx_error("ensure_schema", e))?;
        }
        Ok(())
    }

    /// Number of user rows; the seed runs only when this is zero.
    pub async fn count_users(&self) -> Result<i64, StoreError> {
        let row = sqlx::query(r#"SELECT COUNT(*) AS count FROM users"#)
            .fetch_one(&*self.pool)
            .await
            .map_err(|e| map_sqlx_error("count_users", e))?;
        row.try_get("count")
            .map_err(|e| map_sqlx_error("count_users", e))
    }

    /// Insert a user unless the email is already taken.
    pub async fn insert_user(&self, user: &UserRecord) -> Result<(), StoreError> {
        sqlx::query(
            r#"
            INSERT INTO users (id, email, password_hash, is_active)
            VALUES ($1, $2, $3, $4)
            ON CONFLICT (email) DO NOTHING
            "#,
        )
        .bind(user.id.as_uuid())
        .bind(&user.email)
        .bind(&user.password_hash)
        .bind(user.is_active)
        .execute(&*self.pool)
        .await
        .map_err(|e| map_sqlx_error("insert_user", e))?;
        Ok(())
    }

    /// Insert a role unless the code is already defined.
    pub async fn insert_role(&self, role: &RoleRecord) -> Result<(), StoreError> {
        sqlx::query(
            r#"
            INSERT INTO roles (id, code, name)
            VALUES ($1, $2, $3)
            ON CONFLICT (code) DO NOTHING
            "#,
        )
        .bind(role.id.as_uuid())
        .bind(&role.code)
        .bind(&role.name)
        .execute(&*self.pool)
        .await
        .map_err(|e| map_sqlx_error("insert_role", e))?;
        Ok(())
    }

    /// Insert a permission unless the key is already defined.
    pub async fn insert_permission(&self, permission: &PermissionRecord) -> Result<(), StoreError> {
        sqlx::query(
            r#"
            INSERT INTO permissions (id, key, description)
            VALUES ($1, $2, $3)
            ON CONFLICT (key) DO NOTHING
            "#,
        )
        .bind(permission.id.as_uuid())
        .bind(&permission.key)
        .bind(&permission.description)
        .execute(&*self.pool)
        .await
        .map_err(|e| map_sqlx_error("insert_permission", e))?;
        Ok(())
    }

    /// Assign a role to a user (idempotent).
    pub async fn assign_role(&self, user_id: UserId, role_id: RoleId) -> Result<(), StoreError> {
        sqlx::query(
            r#"
            INSERT INTO user_roles (user_id, role_id)
            VALUES ($1, $2)
            ON CONFLICT DO NOTHING
            "#,
        )
        .bind(user_id.as_uuid())
        .bind(role_id.as_uuid())
        .execute(&*self.pool)
        .await
        .map_err(|e| map_sqlx_error("assign_role", e))?;
        Ok(())
    }

    /// Grant a permission to a role (idempotent).
    pub async fn grant_permission(
        &self,
        role_id: RoleId,
        permission_id: PermissionId,
    ) -> Result<(), StoreError> {
        sqlx::query(
            r#"
            INSERT INTO role_permissions (role_id, permission_id)
            VALUES ($1, $2)
            ON CONFLICT DO NOTHING
            "#,
        )
        .bind(role_id.as_uuid())
        .bind(permission_id.as_uuid())
        .execute(&*self.pool)
        .await
        .map_err(|e| map_sqlx_error("grant_permission", e))?;
        Ok(())
    }
}

#[async_trait::async_trait]
impl CredentialStore for PostgresCredentialStore {
    #[instrument(skip(self, email), err)]
    async fn find_user_by_email(&self, email: &str) -> Result<Option<UserRecord>, StoreError> {
        let row = sqlx::query(
            r#"
            SELECT id, email, password_hash, is_active
            FROM users
            WHERE email = $1
            "#,
        )
        .bind(email)
        .fetch_optional(&*self.pool)
        .await
        .map_err(|e| map_sqlx_error("find_user_by_email", e))?;

        match row {
            Some(row) => {
                let user = UserRow::from_row(&row)
                    .map_err(|e| StoreError::Backend(format!("failed to read user row: {}", e)))?;
                Ok(Some(user.into()))
            }
            None => Ok(None),
        }
    }

    #[instrument(skip(self), fields(user_id = %id), err)]
    async fn find_user_by_id(&self, id: UserId) -> Result<Option<UserRecord>, StoreError> {
        let row = sqlx::query(
            r#"
            SELECT id, email, password_hash, is_active
            FROM users
            WHERE id = $1
            "#,
        )
        .bind(id.as_uuid())
        .fetch_optional(&*self.pool)
        .await
        .map_err(|e| map_sqlx_error("find_user_by_id", e))?;

        match row {
            Some(row) => {
                let user = UserRow::from_row(&row)
                    .map_err(|e| StoreError::Backend(format!("failed to read user row: {}", e)))?;
                Ok(Some(user.into()))
            }
            None => Ok(None),
        }
    }

    #[instrument(skip(self), fields(user_id = %user_id), err)]
    async fn role_grants(&self, user_id: UserId) -> Result<Vec<RoleGrant>, StoreError> {
        // One traversal for the whole role -> permission graph of this user.
        // LEFT JOINs keep roles that grant nothing.
        let rows = sqlx::query(
            r#"
            SELECT
                r.id AS role_id,
                r.code AS role_code,
                r.name AS role_name,
                p.id AS permission_id,
                p.key AS permission_key,
                p.description AS permission_description
            FROM user_roles ur
            JOIN roles r ON r.id = ur.role_id
            LEFT JOIN role_permissions rp ON rp.role_id = r.id
            LEFT JOIN permissions p ON p.id = rp.permission_id
            WHERE ur.user_id = $1
            ORDER BY r.code
            "#,
        )
        .bind(user_id.as_uuid())
        .fetch_all(&*self.pool)
        .await
        .map_err(|e| map_sqlx_error("role_grants", e))?;

        let mut grants: Vec<RoleGrant> = Vec::new();
        for row in rows {
            let flat = GrantRow::from_row(&row)
                .map_err(|e| StoreError::Backend(format!("failed to read grant row: {}", e)))?;

            let role_id = RoleId::from_uuid(flat.role_id);
            if grants.last().map(|g| g.role.id) != Some(role_id) {
                grants.push(RoleGrant {
                    role: RoleRecord {
                        id: role_id,
                        code: flat.role_code,
                        name: flat.role_name,
                    },
                    permissions: Vec::new(),
                });
            }

            if let (Some(id), Some(key), Some(description)) = (
                flat.permission_id,
                flat.permission_key,
                flat.permission_description,
            ) {
                if let Some(grant) = grants.last_mut() {
                    grant.permissions.push(PermissionRecord {
                        id: PermissionId::from_uuid(id),
                        key,
                        description,
                    });
                }
            }
        }
        Ok(grants)
    }
}

// SQLx row types

#[derive(Debug)]
struct UserRow {
    id: uuid::Uuid,
    email: String,
    password_hash: String,
    is_active: bool,
}

impl<'r> sqlx::FromRow<'r, sqlx::postgres::PgRow> for UserRow {
    fn from_row(row: &'r sqlx::postgres::PgRow) -> Result<Self, sqlx::Error> {
        Ok(UserRow {
            id: row.try_get("id")?,
            email: row.try_get("email")?,
            password_hash: row.try_get("password_hash")?,
            is_active: row.try_get("is_active")?,
        })
    }
}

impl From<UserRow> for UserRecord {
    fn from(row: UserRow) -> Self {
        UserRecord {
            id: UserId::from_uuid(row.id),
            email: row.email,
            password_hash: row.password_hash,
            is_active: row.is_active,
        }
    }
}

/// One row of the flattened role/permission join. Permission columns are
/// nullable because a role may grant nothing.
#[derive(Debug)]
struct GrantRow {
    role_id: uuid::Uuid,
    role_code: String,
    role_name: String,
    permission_id: Option<uuid::Uuid>,
    permission_key: Option<String>,
    permission_description: Option<String>,
}

impl<'r> sqlx::FromRow<'r, sqlx::postgres::PgRow> for GrantRow {
    fn from_row(row: &'r sqlx::postgres::PgRow) -> Result<Self, sqlx::Error> {
        Ok(GrantRow {
            role_id: row.try_get("role_id")?,
            role_code: row.try_get("role_code")?,
            role_name: row.try_get("role_name")?,
            permission_id: row.try_get("permission_id")?,
            permission_key: row.try_get("permission_key")?,
            permission_description: row.try_get("permission_description")?,
        })
    }
}

fn map_sqlx_error(operation: &str, err: sqlx::Error) -> StoreError {
    StoreError::Backend(format!("sqlx error in {}: {}", operation, err))
}
