use crate::types::DbId;

/// Domain-level error taxonomy shared by every entity module.
///
/// - `NotFound` and `Conflict` are surfaced to callers as-is and never
///   retried.
/// - `InvalidPagination` should normally be caught by input validation
///   before a request reaches the repository layer.
/// - Transient store failures are *not* represented here; the db crate wraps
///   them separately so callers can distinguish "your request is wrong" from
///   "the store is unhappy".
#[derive(Debug, thiserror::Error)]
pub enum CoreError {
    #[error("Entity not found: {entity} with id {id}")]
    NotFound { entity: &'static str, id: DbId },

    #[error("Conflict: {0}")]
    Conflict(String),

    #[error("Invalid pagination: {0}")]
    InvalidPagination(String),

    #[error("Validation failed: {0}")]
    Validation(String),
}
