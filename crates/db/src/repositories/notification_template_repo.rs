//! Repository for the `notification_templates` table.

use sqlx::PgPool;

use stockdesk_core::pagination::{Page, PageRequest};
use stockdesk_core::types::DbId;

use crate::error::{classify_write_error, DbError, DbResult};
use crate::models::notification_template::{
    CreateNotificationTemplate, NotificationTemplate, NotificationTemplateFilter,
    UpdateNotificationTemplate,
};
use crate::query::{self, Predicates, DEFAULT_ORDER};

/// Column list shared across queries to avoid repetition.
const COLUMNS: &str = "id, name, subject, body, active, created_at, updated_at";

const TABLE: &str = "notification_templates";
const ENTITY: &str = "notification template";

/// Provides CRUD operations for notification templates.
pub struct NotificationTemplateRepo;

impl NotificationTemplateRepo {
    /// List active templates matching the filter, paginated.
    pub async fn find_all(
        pool: &PgPool,
        filter: &NotificationTemplateFilter,
        page: &PageRequest,
    ) -> DbResult<Page<NotificationTemplate>> {
        let mut predicates = Predicates::new();
        predicates.ilike("name", filter.name.as_deref());
        predicates.ilike("subject", filter.subject.as_deref());
        predicates.only_active();
        query::fetch_page(pool, TABLE, COLUMNS, &predicates, DEFAULT_ORDER, page).await
    }

    /// Find an active template by id.
    pub async fn find_by_id(pool: &PgPool, id: DbId) -> DbResult<NotificationTemplate> {
        let select = format!("SELECT {COLUMNS} FROM {TABLE} WHERE id = $1 AND active = TRUE");
        sqlx::query_as::<_, NotificationTemplate>(&select)
            .bind(id)
            .fetch_optional(pool)
            .await?
            .ok_or_else(|| DbError::not_found(ENTITY, id))
    }

    /// Check whether an active template with this id exists.
    pub async fn exists(pool: &PgPool, id: DbId) -> DbResult<bool> {
        query::exists(pool, TABLE, id).await
    }

    /// Insert a new template. Starts active.
    pub async fn create(
        pool: &PgPool,
        input: &CreateNotificationTemplate,
    ) -> DbResult<NotificationTemplate> {
        query::guard_unique(pool, TABLE, ENTITY, "name", Some(&input.name), None).await?;

        let insert = format!(
            "INSERT INTO {TABLE} (name, subject, body) VALUES ($1, $2, $3) RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, NotificationTemplate>(&insert)
            .bind(&input.name)
            .bind(&input.subject)
            .bind(&input.body)
            .fetch_one(pool)
            .await
            .map_err(classify_write_error)
    }

    /// Partial update. Only non-`None` fields are applied.
    pub async fn update(
        pool: &PgPool,
        id: DbId,
        input: &UpdateNotificationTemplate,
    ) -> DbResult<NotificationTemplate> {
        query::require_exists(pool, TABLE, ENTITY, id).await?;
        query::guard_unique(pool, TABLE, ENTITY, "name", input.name.as_deref(), Some(id)).await?;

        let update = format!(
            "UPDATE {TABLE} SET \
                name = COALESCE($2, name), \
                subject = COALESCE($3, subject), \
                body = COALESCE($4, body) \
             WHERE id = $1 AND active = TRUE \
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, NotificationTemplate>(&update)
            .bind(id)
            .bind(input.name.as_deref())
            .bind(input.subject.as_deref())
            .bind(input.body.as_deref())
            .fetch_optional(pool)
            .await
            .map_err(classify_write_error)?
            .ok_or_else(|| DbError::not_found(ENTITY, id))
    }

    /// Soft-delete a template, returning the deactivated row.
    pub async fn remove(pool: &PgPool, id: DbId) -> DbResult<NotificationTemplate> {
        query::soft_delete(pool, TABLE, COLUMNS, ENTITY, id).await
    }
}
