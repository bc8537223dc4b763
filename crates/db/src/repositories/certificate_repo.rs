//! Repository for the `certificates` table.

use sqlx::PgPool;

use stockdesk_core::pagination::{Page, PageRequest};
use stockdesk_core::types::DbId;

use crate::error::{classify_write_error, DbError, DbResult};
use crate::models::certificate::{
    Certificate, CertificateFilter, CreateCertificate, UpdateCertificate,
};
use crate::query::{self, Predicates, DEFAULT_ORDER};

/// Column list shared across queries to avoid repetition.
const COLUMNS: &str =
    "id, name, authority, issued_at, expires_at, metadata, active, created_at, updated_at";

const TABLE: &str = "certificates";
const ENTITY: &str = "certificate";

/// Provides CRUD operations for certificates.
pub struct CertificateRepo;

impl CertificateRepo {
    /// List active certificates matching the filter, paginated.
    ///
    /// `issued_from`/`issued_to` bound the issue date inclusively.
    pub async fn find_all(
        pool: &PgPool,
        filter: &CertificateFilter,
        page: &PageRequest,
    ) -> DbResult<Page<Certificate>> {
        let mut predicates = Predicates::new();
        predicates.ilike("name", filter.name.as_deref());
        predicates.ilike("authority", filter.authority.as_deref());
        predicates.since("issued_at", filter.issued_from);
        predicates.until("issued_at", filter.issued_to);
        predicates.only_active();
        query::fetch_page(pool, TABLE, COLUMNS, &predicates, DEFAULT_ORDER, page).await
    }

    /// Find an active certificate by id.
    pub async fn find_by_id(pool: &PgPool, id: DbId) -> DbResult<Certificate> {
        let select = format!("SELECT {COLUMNS} FROM {TABLE} WHERE id = $1 AND active = TRUE");
        sqlx::query_as::<_, Certificate>(&select)
            .bind(id)
            .fetch_optional(pool)
            .await?
            .ok_or_else(|| DbError::not_found(ENTITY, id))
    }

    /// Check whether an active certificate with this id exists.
    pub async fn exists(pool: &PgPool, id: DbId) -> DbResult<bool> {
        query::exists(pool, TABLE, id).await
    }

    /// Insert a new certificate. Starts active.
    ///
    /// If `metadata` is `None`, defaults to `'{}'::jsonb`.
    pub async fn create(pool: &PgPool, input: &CreateCertificate) -> DbResult<Certificate> {
        query::guard_unique(pool, TABLE, ENTITY, "name", Some(&input.name), None).await?;

        let insert = format!(
            "INSERT INTO {TABLE} (name, authority, issued_at, expires_at, metadata) \
             VALUES ($1, $2, $3, $4, COALESCE($5, '{{}}'::jsonb)) \
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, Certificate>(&insert)
            .bind(&input.name)
            .bind(&input.authority)
            .bind(input.issued_at)
            .bind(input.expires_at)
            .bind(input.metadata.as_ref())
            .fetch_one(pool)
            .await
            .map_err(classify_write_error)
    }

    /// Partial update. Only non-`None` fields are applied.
    pub async fn update(
        pool: &PgPool,
        id: DbId,
        input: &UpdateCertificate,
    ) -> DbResult<Certificate> {
        query::require_exists(pool, TABLE, ENTITY, id).await?;
        query::guard_unique(pool, TABLE, ENTITY, "name", input.name.as_deref(), Some(id)).await?;

        let update = format!(
            "UPDATE {TABLE} SET \
                name = COALESCE($2, name), \
                authority = COALESCE($3, authority), \
                issued_at = COALESCE($4, issued_at), \
                expires_at = COALESCE($5, expires_at), \
                metadata = COALESCE($6, metadata) \
             WHERE id = $1 AND active = TRUE \
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, Certificate>(&update)
            .bind(id)
            .bind(input.name.as_deref())
            .bind(input.authority.as_deref())
            .bind(input.issued_at)
            .bind(input.expires_at)
            .bind(input.metadata.as_ref())
            .fetch_optional(pool)
            .await
            .map_err(classify_write_error)?
            .ok_or_else(|| DbError::not_found(ENTITY, id))
    }

    /// Soft-delete a certificate, returning the deactivated row.
    pub async fn remove(pool: &PgPool, id: DbId) -> DbResult<Certificate> {
        query::soft_delete(pool, TABLE, COLUMNS, ENTITY, id).await
    }
}
