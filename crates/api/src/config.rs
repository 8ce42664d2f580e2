//! Process configuration, read once at startup.

/// Everything the server needs from the environment.
///
/// Constructed in `main` (or directly in tests) and passed by value to
/// service construction; nothing reads the environment after startup.
#[derive(Debug, Clone)]
pub struct AppConfig {
    /// HMAC signing key for bearer tokens. Rotating it invalidates every
    /// outstanding token.
    pub jwt_secret: String,

    /// Listen port.
    pub port: u16,

    /// When set, credentials live in Postgres; otherwise in memory.
    pub database_url: Option<String>,

    /// bcrypt cost used when hashing seed passwords. `None` means the bcrypt
    /// default; tests pass a cheap cost.
    pub bcrypt_cost: Option<u32>,
}

impl AppConfig {
    pub fn from_env() -> Self {
        let jwt_secret = std::env::var("JWT_SECRET").unwrap_or_else(|_| {
            tracing::warn!("JWT_SECRET not set; using insecure dev default");
            "dev-secret".to_string()
        });

        let port = std::env::var("API_PORT")
            .ok()
            .and_then(|v| v.parse().ok())
            .unwrap_or(3001);

        Self {
            jwt_secret,
            port,
            database_url: std::env::var("DATABASE_URL").ok(),
            bcrypt_cost: None,
        }
    }
}
