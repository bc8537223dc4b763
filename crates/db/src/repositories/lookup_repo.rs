//! One repository for all simple lookup families.
//!
//! Colors, conditions, materials, locations, and states share one row shape
//! and one contract, so the repository logic exists once. A [`LookupTable`]
//! descriptor supplies the table name and the entity label used in error
//! messages; the five families are the descriptor constants below.

use sqlx::PgPool;

use stockdesk_core::pagination::{Page, PageRequest};
use stockdesk_core::types::DbId;

use crate::error::{classify_write_error, DbError, DbResult};
use crate::models::lookup::{CreateLookupItem, LookupFilter, LookupItem, UpdateLookupItem};
use crate::query::{self, Predicates, DEFAULT_ORDER};

/// Column list shared across queries to avoid repetition.
const COLUMNS: &str = "id, name, code, description, active, created_at, updated_at";

/// Declarative descriptor for one lookup family.
#[derive(Debug, Clone, Copy)]
pub struct LookupTable {
    table: &'static str,
    entity: &'static str,
}

pub const COLORS: LookupTable = LookupTable::new("colors", "color");
pub const CONDITIONS: LookupTable = LookupTable::new("conditions", "condition");
pub const MATERIALS: LookupTable = LookupTable::new("materials", "material");
pub const LOCATIONS: LookupTable = LookupTable::new("locations", "location");
pub const STATES: LookupTable = LookupTable::new("states", "state");

impl LookupTable {
    const fn new(table: &'static str, entity: &'static str) -> Self {
        Self { table, entity }
    }

    pub fn table(&self) -> &'static str {
        self.table
    }

    pub fn entity(&self) -> &'static str {
        self.entity
    }

    /// List active items matching the filter, paginated.
    pub async fn find_all(
        &self,
        pool: &PgPool,
        filter: &LookupFilter,
        page: &PageRequest,
    ) -> DbResult<Page<LookupItem>> {
        let mut predicates = Predicates::new();
        predicates.ilike("name", filter.name.as_deref());
        predicates.ilike("code", filter.code.as_deref());
        predicates.ilike("description", filter.description.as_deref());
        predicates.only_active();
        query::fetch_page(pool, self.table, COLUMNS, &predicates, DEFAULT_ORDER, page).await
    }

    /// Find an active item by id.
    pub async fn find_by_id(&self, pool: &PgPool, id: DbId) -> DbResult<LookupItem> {
        let select = format!("SELECT {COLUMNS} FROM {} WHERE id = $1 AND active = TRUE", self.table);
        sqlx::query_as::<_, LookupItem>(&select)
            .bind(id)
            .fetch_optional(pool)
            .await?
            .ok_or_else(|| DbError::not_found(self.entity, id))
    }

    /// Check whether an active item with this id exists.
    pub async fn exists(&self, pool: &PgPool, id: DbId) -> DbResult<bool> {
        query::exists(pool, self.table, id).await
    }

    /// Insert a new item. Starts active.
    pub async fn create(&self, pool: &PgPool, input: &CreateLookupItem) -> DbResult<LookupItem> {
        query::guard_unique(pool, self.table, self.entity, "name", Some(&input.name), None).await?;
        query::guard_unique(pool, self.table, self.entity, "code", input.code.as_deref(), None)
            .await?;

        let insert = format!(
            "INSERT INTO {} (name, code, description) VALUES ($1, $2, $3) RETURNING {COLUMNS}",
            self.table
        );
        sqlx::query_as::<_, LookupItem>(&insert)
            .bind(&input.name)
            .bind(input.code.as_deref())
            .bind(input.description.as_deref())
            .fetch_one(pool)
            .await
            .map_err(classify_write_error)
    }

    /// Partial update. Only non-`None` fields are applied; natural keys being
    /// changed are re-checked for uniqueness excluding the row itself.
    pub async fn update(
        &self,
        pool: &PgPool,
        id: DbId,
        input: &UpdateLookupItem,
    ) -> DbResult<LookupItem> {
        query::require_exists(pool, self.table, self.entity, id).await?;
        query::guard_unique(
            pool,
            self.table,
            self.entity,
            "name",
            input.name.as_deref(),
            Some(id),
        )
        .await?;
        query::guard_unique(
            pool,
            self.table,
            self.entity,
            "code",
            input.code.as_deref(),
            Some(id),
        )
        .await?;

        let update = format!(
            "UPDATE {} SET \
                name = COALESCE($2, name), \
                code = COALESCE($3, code), \
                description = COALESCE($4, description) \
             WHERE id = $1 AND active = TRUE \
             RETURNING {COLUMNS}",
            self.table
        );
        sqlx::query_as::<_, LookupItem>(&update)
            .bind(id)
            .bind(input.name.as_deref())
            .bind(input.code.as_deref())
            .bind(input.description.as_deref())
            .fetch_optional(pool)
            .await
            .map_err(classify_write_error)?
            .ok_or_else(|| DbError::not_found(self.entity, id))
    }

    /// Soft-delete an item, returning the deactivated row.
    pub async fn remove(&self, pool: &PgPool, id: DbId) -> DbResult<LookupItem> {
        query::soft_delete(pool, self.table, COLUMNS, self.entity, id).await
    }
}
