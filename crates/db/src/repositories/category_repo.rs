//! Repository for the `categories` table.
//!
//! Categories form a hierarchy through `parent_id`. Writes validate the
//! parent reference: it must point at an existing *active* category, and an
//! update may not make a category its own ancestor.

use sqlx::PgPool;

use stockdesk_core::pagination::{Page, PageRequest};
use stockdesk_core::types::DbId;

use crate::error::{classify_write_error, DbError, DbResult};
use crate::models::category::{Category, CategoryFilter, CreateCategory, UpdateCategory};
use crate::query::{self, Predicates, DEFAULT_ORDER};

/// Column list shared across queries to avoid repetition.
const COLUMNS: &str = "id, name, code, description, parent_id, active, created_at, updated_at";

const TABLE: &str = "categories";
const ENTITY: &str = "category";

/// Provides CRUD operations for categories plus hierarchy helpers.
pub struct CategoryRepo;

impl CategoryRepo {
    /// List active categories matching the filter, paginated.
    pub async fn find_all(
        pool: &PgPool,
        filter: &CategoryFilter,
        page: &PageRequest,
    ) -> DbResult<Page<Category>> {
        let mut predicates = Predicates::new();
        predicates.ilike("name", filter.name.as_deref());
        predicates.ilike("code", filter.code.as_deref());
        predicates.ilike("description", filter.description.as_deref());
        predicates.eq_id("parent_id", filter.parent_id);
        predicates.only_active();
        query::fetch_page(pool, TABLE, COLUMNS, &predicates, DEFAULT_ORDER, page).await
    }

    /// Find an active category by id.
    pub async fn find_by_id(pool: &PgPool, id: DbId) -> DbResult<Category> {
        let select = format!("SELECT {COLUMNS} FROM {TABLE} WHERE id = $1 AND active = TRUE");
        sqlx::query_as::<_, Category>(&select)
            .bind(id)
            .fetch_optional(pool)
            .await?
            .ok_or_else(|| DbError::not_found(ENTITY, id))
    }

    /// Check whether an active category with this id exists.
    pub async fn exists(pool: &PgPool, id: DbId) -> DbResult<bool> {
        query::exists(pool, TABLE, id).await
    }

    /// List the direct active children of a category, ordered by name.
    pub async fn list_children(pool: &PgPool, parent_id: DbId) -> DbResult<Vec<Category>> {
        let select = format!(
            "SELECT {COLUMNS} FROM {TABLE} \
             WHERE parent_id = $1 AND active = TRUE \
             ORDER BY name ASC"
        );
        Ok(sqlx::query_as::<_, Category>(&select)
            .bind(parent_id)
            .fetch_all(pool)
            .await?)
    }

    /// Insert a new category. Starts active.
    pub async fn create(pool: &PgPool, input: &CreateCategory) -> DbResult<Category> {
        query::guard_unique(pool, TABLE, ENTITY, "name", Some(&input.name), None).await?;
        query::guard_unique(pool, TABLE, ENTITY, "code", input.code.as_deref(), None).await?;
        if let Some(parent_id) = input.parent_id {
            Self::require_parent(pool, parent_id).await?;
        }

        let insert = format!(
            "INSERT INTO {TABLE} (name, code, description, parent_id) \
             VALUES ($1, $2, $3, $4) RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, Category>(&insert)
            .bind(&input.name)
            .bind(input.code.as_deref())
            .bind(input.description.as_deref())
            .bind(input.parent_id)
            .fetch_one(pool)
            .await
            .map_err(classify_write_error)
    }

    /// Partial update. Re-parenting is validated against missing parents and
    /// ancestry cycles.
    pub async fn update(pool: &PgPool, id: DbId, input: &UpdateCategory) -> DbResult<Category> {
        query::require_exists(pool, TABLE, ENTITY, id).await?;
        query::guard_unique(pool, TABLE, ENTITY, "name", input.name.as_deref(), Some(id)).await?;
        query::guard_unique(pool, TABLE, ENTITY, "code", input.code.as_deref(), Some(id)).await?;
        if let Some(parent_id) = input.parent_id {
            Self::require_parent(pool, parent_id).await?;
            if Self::would_create_cycle(pool, id, parent_id).await? {
                return Err(DbError::validation(format!(
                    "category {id} cannot become a descendant of itself via parent {parent_id}"
                )));
            }
        }

        let update = format!(
            "UPDATE {TABLE} SET \
                name = COALESCE($2, name), \
                code = COALESCE($3, code), \
                description = COALESCE($4, description), \
                parent_id = COALESCE($5, parent_id) \
             WHERE id = $1 AND active = TRUE \
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, Category>(&update)
            .bind(id)
            .bind(input.name.as_deref())
            .bind(input.code.as_deref())
            .bind(input.description.as_deref())
            .bind(input.parent_id)
            .fetch_optional(pool)
            .await
            .map_err(classify_write_error)?
            .ok_or_else(|| DbError::not_found(ENTITY, id))
    }

    /// Soft-delete a category, returning the deactivated row.
    ///
    /// Children keep their `parent_id`; the parent row persists inactive, so
    /// the link stays resolvable for history even though default reads no
    /// longer see it.
    pub async fn remove(pool: &PgPool, id: DbId) -> DbResult<Category> {
        query::soft_delete(pool, TABLE, COLUMNS, ENTITY, id).await
    }

    /// Validate that a proposed parent is an existing active category.
    async fn require_parent(pool: &PgPool, parent_id: DbId) -> DbResult<()> {
        if query::exists(pool, TABLE, parent_id).await? {
            Ok(())
        } else {
            Err(DbError::validation(format!(
                "parent category {parent_id} does not exist"
            )))
        }
    }

    /// Walk the ancestor chain of the proposed parent and check whether it
    /// passes through the category being re-parented.
    ///
    /// `parent_id == id` is the degenerate one-node cycle and is caught by
    /// the same walk (the chain starts at the proposed parent).
    async fn would_create_cycle(pool: &PgPool, id: DbId, parent_id: DbId) -> DbResult<bool> {
        let cycle = sqlx::query_scalar::<_, bool>(
            "WITH RECURSIVE ancestors AS (
                SELECT c.id, c.parent_id FROM categories c WHERE c.id = $1
                UNION ALL
                SELECT c.id, c.parent_id
                FROM categories c
                JOIN ancestors a ON c.id = a.parent_id
             )
             SELECT EXISTS(SELECT 1 FROM ancestors WHERE id = $2)",
        )
        .bind(parent_id)
        .bind(id)
        .fetch_one(pool)
        .await?;
        Ok(cycle)
    }
}
