use std::sync::Arc;

use anyhow::Context;
use sqlx::PgPool;

use warden_auth::{Hs256TokenService, TokenService};
use warden_infra::{
    CredentialStore, InMemoryCredentialStore, PostgresCredentialStore, seed_in_memory,
    seed_postgres_if_empty,
};

use crate::config::AppConfig;

/// Handles shared by every request: the credential store and the token
/// service. Both are read-only after construction.
pub struct AppServices {
    pub store: Arc<dyn CredentialStore>,
    pub tokens: Arc<dyn TokenService>,
}

impl AppServices {
    pub fn new(store: Arc<dyn CredentialStore>, tokens: Arc<dyn TokenService>) -> Self {
        Self { store, tokens }
    }
}

/// Wire up the stores from configuration.
///
/// `DATABASE_URL` selects Postgres (schema ensured, seed applied when the
/// user table is empty); otherwise an in-memory store is built and seeded,
/// which is the dev/test path.
pub async fn build_services(config: &AppConfig) -> anyhow::Result<AppServices> {
    let tokens: Arc<dyn TokenService> =
        Arc::new(Hs256TokenService::new(config.jwt_secret.as_bytes()));

    let store: Arc<dyn CredentialStore> = match &config.database_url {
        Some(url) => {
            let pool = PgPool::connect(url)
                .await
                .context("failed to connect to Postgres")?;
            let store = PostgresCredentialStore::new(pool);
            store
                .ensure_schema()
                .await
                .context("failed to ensure credential schema")?;
            seed_postgres_if_empty(&store, config.bcrypt_cost)
                .await
                .context("failed to seed credential store")?;
            tracing::info!("using Postgres credential store");
            Arc::new(store)
        }
        None => {
            let store = InMemoryCredentialStore::new();
            seed_in_memory(&store, config.bcrypt_cost)
                .await
                .context("failed to seed credential store")?;
            tracing::info!("using in-memory credential store");
            Arc::new(store)
        }
    };

    Ok(AppServices::new(store, tokens))
}
