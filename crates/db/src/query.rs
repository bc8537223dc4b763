//! Shared query machinery behind every entity repository.
//!
//! Each repository only describes *what* to filter on; this module owns how
//! sparse filters become SQL predicates, how a page and its total count are
//! fetched over the same condition, how natural keys are probed
//! case-insensitively, and how the soft-delete transition is applied. The
//! per-entity repositories in [`crate::repositories`] are thin declarative
//! layers over these functions.

use sqlx::postgres::{PgArguments, PgRow};
use sqlx::query::{QueryAs, QueryScalar};
use sqlx::{FromRow, PgPool, Postgres};

use stockdesk_core::pagination::{Page, PageRequest};
use stockdesk_core::types::{DbId, Timestamp};

use crate::error::{DbError, DbResult};

/// Default listing order for every entity family.
///
/// `id` is the stable tie-break: two rows with the same name must keep their
/// relative order across pages, or page iteration under concurrent inserts
/// can duplicate or drop rows.
pub const DEFAULT_ORDER: &str = "name DESC, id DESC";

/// One bind value captured while building a predicate list.
#[derive(Debug, Clone)]
enum Bind {
    Text(String),
    Id(DbId),
    Bool(bool),
    Ts(Timestamp),
}

/// Ordered conjunction of filter predicates and their bind values.
///
/// Placeholders are numbered as predicates are pushed, so the same list can
/// back both the page query and the count query of a listing: both render
/// the identical `WHERE` clause and bind the identical values.
///
/// Absent and blank filter fields contribute no predicate at all; an empty
/// list renders as no `WHERE` clause rather than a trivially-true condition.
#[derive(Debug, Default)]
pub struct Predicates {
    clauses: Vec<String>,
    binds: Vec<Bind>,
}

impl Predicates {
    pub fn new() -> Self {
        Self::default()
    }

    /// Case-insensitive substring match. Blank input contributes nothing.
    pub fn ilike(&mut self, column: &str, value: Option<&str>) {
        if let Some(value) = value {
            let value = value.trim();
            if !value.is_empty() {
                let n = self.next_placeholder();
                self.clauses.push(format!("{column} ILIKE ${n}"));
                self.binds.push(Bind::Text(format!("%{value}%")));
            }
        }
    }

    /// Exact match on an identifier column.
    pub fn eq_id(&mut self, column: &str, value: Option<DbId>) {
        if let Some(value) = value {
            let n = self.next_placeholder();
            self.clauses.push(format!("{column} = ${n}"));
            self.binds.push(Bind::Id(value));
        }
    }

    /// Exact match on a boolean column.
    pub fn eq_bool(&mut self, column: &str, value: Option<bool>) {
        if let Some(value) = value {
            let n = self.next_placeholder();
            self.clauses.push(format!("{column} = ${n}"));
            self.binds.push(Bind::Bool(value));
        }
    }

    /// Lower bound (inclusive) on a timestamp column.
    pub fn since(&mut self, column: &str, value: Option<Timestamp>) {
        if let Some(value) = value {
            let n = self.next_placeholder();
            self.clauses.push(format!("{column} >= ${n}"));
            self.binds.push(Bind::Ts(value));
        }
    }

    /// Upper bound (inclusive) on a timestamp column.
    pub fn until(&mut self, column: &str, value: Option<Timestamp>) {
        if let Some(value) = value {
            let n = self.next_placeholder();
            self.clauses.push(format!("{column} <= ${n}"));
            self.binds.push(Bind::Ts(value));
        }
    }

    /// Restrict to rows that have not been soft-deleted.
    ///
    /// Every default read path appends this; listing inactive rows is an
    /// explicit opt-out at the repository level, never the default.
    pub fn only_active(&mut self) {
        self.clauses.push("active = TRUE".to_string());
    }

    /// Number of bind values pushed so far. The next free placeholder for a
    /// caller-appended bind (e.g. `LIMIT`) is `len() + 1`.
    pub fn len(&self) -> usize {
        self.binds.len()
    }

    pub fn is_empty(&self) -> bool {
        self.clauses.is_empty()
    }

    /// `WHERE ...` joining all predicates with `AND`, or the empty string
    /// when nothing restricts the query.
    pub fn where_clause(&self) -> String {
        if self.clauses.is_empty() {
            String::new()
        } else {
            format!("WHERE {}", self.clauses.join(" AND "))
        }
    }

    fn next_placeholder(&self) -> usize {
        self.binds.len() + 1
    }

    fn bind_query_as<'q, T>(
        &'q self,
        mut query: QueryAs<'q, Postgres, T, PgArguments>,
    ) -> QueryAs<'q, Postgres, T, PgArguments> {
        for bind in &self.binds {
            query = match bind {
                Bind::Text(v) => query.bind(v.as_str()),
                Bind::Id(v) => query.bind(*v),
                Bind::Bool(v) => query.bind(*v),
                Bind::Ts(v) => query.bind(*v),
            };
        }
        query
    }

    fn bind_query_scalar<'q, T>(
        &'q self,
        mut query: QueryScalar<'q, Postgres, T, PgArguments>,
    ) -> QueryScalar<'q, Postgres, T, PgArguments> {
        for bind in &self.binds {
            query = match bind {
                Bind::Text(v) => query.bind(v.as_str()),
                Bind::Id(v) => query.bind(*v),
                Bind::Bool(v) => query.bind(*v),
                Bind::Ts(v) => query.bind(*v),
            };
        }
        query
    }
}

/// Fetch one page of `table` plus the total count over the same predicates.
///
/// The page query and the count query are independent reads over the same
/// condition and run concurrently. The total comes from the count query, not
/// from the length of the returned page, since the last page can be shorter than
/// the limit.
pub async fn fetch_page<T>(
    pool: &PgPool,
    table: &str,
    columns: &str,
    predicates: &Predicates,
    order_by: &str,
    page: &PageRequest,
) -> DbResult<Page<T>>
where
    T: for<'r> FromRow<'r, PgRow> + Send + Unpin,
{
    page.validate()?;

    let where_clause = predicates.where_clause();
    let select = if page.all_records {
        format!("SELECT {columns} FROM {table} {where_clause} ORDER BY {order_by}")
    } else {
        let limit_n = predicates.len() + 1;
        let offset_n = predicates.len() + 2;
        format!(
            "SELECT {columns} FROM {table} {where_clause} ORDER BY {order_by} \
             LIMIT ${limit_n} OFFSET ${offset_n}"
        )
    };
    let count = format!("SELECT COUNT(*) FROM {table} {where_clause}");

    let mut records_query = predicates.bind_query_as(sqlx::query_as::<_, T>(&select));
    if !page.all_records {
        records_query = records_query.bind(page.limit).bind(page.offset());
    }
    let count_query = predicates.bind_query_scalar(sqlx::query_scalar::<_, i64>(&count));

    let (records, total) = tokio::try_join!(
        records_query.fetch_all(pool),
        count_query.fetch_one(pool),
    )?;

    Ok(Page::from_query(records, total, page))
}

/// Check whether an active row with the given id exists.
pub async fn exists(pool: &PgPool, table: &str, id: DbId) -> DbResult<bool> {
    let query = format!("SELECT EXISTS(SELECT 1 FROM {table} WHERE id = $1 AND active = TRUE)");
    let found = sqlx::query_scalar::<_, bool>(&query)
        .bind(id)
        .fetch_one(pool)
        .await?;
    Ok(found)
}

/// Existence probe that yields a clean `NotFound` instead of letting a later
/// write silently affect zero rows.
pub async fn require_exists(
    pool: &PgPool,
    table: &str,
    entity: &'static str,
    id: DbId,
) -> DbResult<()> {
    if exists(pool, table, id).await? {
        Ok(())
    } else {
        Err(DbError::not_found(entity, id))
    }
}

/// Case-insensitive natural-key probe among active rows.
///
/// A soft-deleted row's key is considered free for reuse. `exclude` removes
/// the candidate row itself from the check so a no-op update does not
/// self-conflict. Blank values can never "already exist".
///
/// This is a fast-path only: the authoritative uniqueness check is the
/// partial unique index on `LOWER(column) WHERE active`, whose violation is
/// translated by [`crate::error::classify_write_error`].
pub async fn natural_key_taken(
    pool: &PgPool,
    table: &str,
    column: &str,
    value: &str,
    exclude: Option<DbId>,
) -> DbResult<bool> {
    let value = value.trim();
    if value.is_empty() {
        return Ok(false);
    }
    let query = match exclude {
        Some(_) => format!(
            "SELECT EXISTS(SELECT 1 FROM {table} \
             WHERE LOWER({column}) = LOWER($1) AND active = TRUE AND id <> $2)"
        ),
        None => format!(
            "SELECT EXISTS(SELECT 1 FROM {table} \
             WHERE LOWER({column}) = LOWER($1) AND active = TRUE)"
        ),
    };
    let mut probe = sqlx::query_scalar::<_, bool>(&query).bind(value);
    if let Some(id) = exclude {
        probe = probe.bind(id);
    }
    Ok(probe.fetch_one(pool).await?)
}

/// Pre-flight uniqueness guard producing a friendly `Conflict` ahead of the
/// write. `None` values are skipped (nothing to check).
pub async fn guard_unique(
    pool: &PgPool,
    table: &str,
    entity: &'static str,
    column: &str,
    value: Option<&str>,
    exclude: Option<DbId>,
) -> DbResult<()> {
    if let Some(value) = value {
        if natural_key_taken(pool, table, column, value, exclude).await? {
            return Err(DbError::conflict(format!(
                "{entity} with {column} '{}' already exists",
                value.trim()
            )));
        }
    }
    Ok(())
}

/// Flip an active row to inactive, returning the deactivated row.
///
/// Rows are never physically deleted. The `updated_at` stamp comes from the
/// table trigger. An already-inactive or absent id is a `NotFound`, not a
/// silent no-op; default read paths already report such rows as missing.
pub async fn soft_delete<T>(
    pool: &PgPool,
    table: &str,
    columns: &str,
    entity: &'static str,
    id: DbId,
) -> DbResult<T>
where
    T: for<'r> FromRow<'r, PgRow> + Send + Unpin,
{
    let query = format!(
        "UPDATE {table} SET active = FALSE WHERE id = $1 AND active = TRUE RETURNING {columns}"
    );
    sqlx::query_as::<_, T>(&query)
        .bind(id)
        .fetch_optional(pool)
        .await?
        .ok_or_else(|| DbError::not_found(entity, id))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_predicates_render_no_where_clause() {
        let predicates = Predicates::new();
        assert!(predicates.is_empty());
        assert_eq!(predicates.where_clause(), "");
    }

    #[test]
    fn placeholders_are_numbered_in_push_order() {
        let mut predicates = Predicates::new();
        predicates.ilike("name", Some("screw"));
        predicates.eq_id("parent_id", Some(7));
        predicates.only_active();
        assert_eq!(
            predicates.where_clause(),
            "WHERE name ILIKE $1 AND parent_id = $2 AND active = TRUE"
        );
        assert_eq!(predicates.len(), 2);
    }

    #[test]
    fn absent_fields_contribute_nothing() {
        let mut predicates = Predicates::new();
        predicates.ilike("name", None);
        predicates.eq_id("parent_id", None);
        predicates.since("issued_at", None);
        assert!(predicates.is_empty());
    }

    #[test]
    fn blank_strings_contribute_nothing() {
        let mut predicates = Predicates::new();
        predicates.ilike("name", Some(""));
        predicates.ilike("code", Some("   "));
        assert!(predicates.is_empty());
    }

    #[test]
    fn only_active_consumes_no_placeholder() {
        let mut predicates = Predicates::new();
        predicates.only_active();
        predicates.ilike("name", Some("bolt"));
        assert_eq!(
            predicates.where_clause(),
            "WHERE active = TRUE AND name ILIKE $1"
        );
        assert_eq!(predicates.len(), 1);
    }

    #[test]
    fn date_range_bounds_are_inclusive() {
        let mut predicates = Predicates::new();
        let from = chrono::Utc::now();
        predicates.since("issued_at", Some(from));
        predicates.until("issued_at", Some(from));
        assert_eq!(
            predicates.where_clause(),
            "WHERE issued_at >= $1 AND issued_at <= $2"
        );
    }
}
