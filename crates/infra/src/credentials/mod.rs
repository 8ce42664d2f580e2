//! Credential storage boundary.
//!
//! This module defines an infrastructure-facing abstraction for reading user
//! credentials and role grants without making any storage assumptions, plus
//! the two concrete stores the server can run against.

pub mod in_memory;
pub mod postgres;
pub mod r#trait;

pub use in_memory::InMemoryCredentialStore;
pub use postgres::PostgresCredentialStore;
pub use r#trait::{
    CredentialStore, EffectivePermissions, PermissionRecord, RoleGrant, RoleRecord, StoreError,
    UserRecord,
};
