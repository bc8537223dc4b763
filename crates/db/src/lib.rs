//! Relational store layer for the stockdesk backend.
//!
//! One repository per administered entity family, all built on the shared
//! query machinery in [`query`]: filter predicates, paginated fetch with a
//! separate count, case-insensitive natural-key probes, and the soft-delete
//! transition. Rows are never physically deleted; `remove` flips the
//! `active` flag and the row stays around for audit history.

pub mod config;
pub mod error;
pub mod models;
pub mod query;
pub mod repositories;

use sqlx::postgres::PgPoolOptions;

use crate::config::DbConfig;

pub type DbPool = sqlx::PgPool;

/// Create a connection pool from configuration.
pub async fn create_pool(config: &DbConfig) -> Result<DbPool, sqlx::Error> {
    PgPoolOptions::new()
        .max_connections(config.max_connections)
        .acquire_timeout(config.acquire_timeout)
        .connect(&config.url)
        .await
}

/// Verify the database is reachable.
pub async fn health_check(pool: &DbPool) -> Result<(), sqlx::Error> {
    sqlx::query("SELECT 1").execute(pool).await?;
    Ok(())
}

/// Apply any pending migrations from `db/migrations`.
pub async fn run_migrations(pool: &DbPool) -> Result<(), sqlx::migrate::MigrateError> {
    sqlx::migrate!("../../db/migrations").run(pool).await
}
