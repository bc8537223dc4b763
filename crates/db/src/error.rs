use stockdesk_core::error::CoreError;
use stockdesk_core::types::DbId;

/// Error type for every repository operation.
///
/// Wraps [`CoreError`] for domain failures (not found, conflict, invalid
/// pagination, validation) and `sqlx::Error` for transient store failures.
/// Store errors are propagated, never retried here; retrying is the caller's
/// call, and the unique indexes make a blindly retried write surface as a
/// `Conflict` rather than a duplicated natural key.
#[derive(Debug, thiserror::Error)]
pub enum DbError {
    #[error(transparent)]
    Core(#[from] CoreError),

    #[error("Database error: {0}")]
    Store(#[from] sqlx::Error),
}

/// Convenience type alias for repository return values.
pub type DbResult<T> = Result<T, DbError>;

impl DbError {
    pub fn not_found(entity: &'static str, id: DbId) -> Self {
        CoreError::NotFound { entity, id }.into()
    }

    pub fn conflict(message: impl Into<String>) -> Self {
        CoreError::Conflict(message.into()).into()
    }

    pub fn validation(message: impl Into<String>) -> Self {
        CoreError::Validation(message.into()).into()
    }
}

/// Classify a write-path sqlx error.
///
/// A PostgreSQL unique-constraint violation (code 23505) on one of our
/// `uq_`-prefixed natural-key indexes becomes a [`CoreError::Conflict`]; the
/// index is the authoritative uniqueness check, the pre-flight probe in
/// `query::natural_key_taken` only exists for a friendlier message ahead of
/// the write. Everything else is a transient store failure.
pub fn classify_write_error(err: sqlx::Error) -> DbError {
    if let sqlx::Error::Database(ref db_err) = err {
        if db_err.code().as_deref() == Some("23505") {
            let constraint = db_err.constraint().unwrap_or("unknown");
            if constraint.starts_with("uq_") {
                tracing::debug!(constraint, "unique constraint violation on write");
                return DbError::conflict(format!(
                    "Duplicate value violates unique constraint: {constraint}"
                ));
            }
        }
    }
    DbError::Store(err)
}
