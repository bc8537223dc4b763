//! Database configuration loaded from environment variables.

use std::time::Duration;

/// Connection settings for the PostgreSQL pool.
///
/// All fields except the URL have defaults suitable for local development.
#[derive(Debug, Clone)]
pub struct DbConfig {
    /// Connection string, from `DATABASE_URL` (required).
    pub url: String,
    /// Pool size, from `DATABASE_MAX_CONNECTIONS` (default: `20`).
    pub max_connections: u32,
    /// Pool acquire timeout, from `DATABASE_ACQUIRE_TIMEOUT_SECS` (default: `5`).
    pub acquire_timeout: Duration,
}

impl DbConfig {
    /// Load configuration from the environment, reading a `.env` file first
    /// if one is present.
    pub fn from_env() -> Self {
        dotenvy::dotenv().ok();

        let url = std::env::var("DATABASE_URL").expect("DATABASE_URL must be set");

        let max_connections: u32 = std::env::var("DATABASE_MAX_CONNECTIONS")
            .unwrap_or_else(|_| "20".into())
            .parse()
            .expect("DATABASE_MAX_CONNECTIONS must be a valid u32");

        let acquire_timeout_secs: u64 = std::env::var("DATABASE_ACQUIRE_TIMEOUT_SECS")
            .unwrap_or_else(|_| "5".into())
            .parse()
            .expect("DATABASE_ACQUIRE_TIMEOUT_SECS must be a valid u64");

        Self {
            url,
            max_connections,
            acquire_timeout: Duration::from_secs(acquire_timeout_secs),
        }
    }
}
