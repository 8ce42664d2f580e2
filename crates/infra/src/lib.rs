//! Infrastructure layer: credential storage and bootstrap data.

pub mod credentials;
pub mod seed;

pub use credentials::{
    CredentialStore, EffectivePermissions, InMemoryCredentialStore, PermissionRecord,
    PostgresCredentialStore, RoleGrant, RoleRecord, StoreError, UserRecord,
};
pub use seed::{SeedError, seed_in_memory, seed_postgres_if_empty};
