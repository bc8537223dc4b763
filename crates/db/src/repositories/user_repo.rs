//! Repository for the `users` table.
//!
//! Both `username` and `email` are natural keys; the generated `uuid` is the
//! immutable public identifier handed to external systems.

use sqlx::PgPool;
use uuid::Uuid;

use stockdesk_core::pagination::{Page, PageRequest};
use stockdesk_core::types::DbId;

use crate::error::{classify_write_error, DbError, DbResult};
use crate::models::user::{CreateUser, UpdateUser, User, UserFilter};
use crate::query::{self, Predicates};

/// Column list shared across queries to avoid repetition.
const COLUMNS: &str = "id, uuid, username, email, display_name, active, created_at, updated_at";

const TABLE: &str = "users";
const ENTITY: &str = "user";

/// Users sort by account name; `id` is the stable tie-break.
const ORDER: &str = "username DESC, id DESC";

/// Provides CRUD operations for administrative users.
pub struct UserRepo;

impl UserRepo {
    /// List active users matching the filter, paginated.
    pub async fn find_all(
        pool: &PgPool,
        filter: &UserFilter,
        page: &PageRequest,
    ) -> DbResult<Page<User>> {
        let mut predicates = Predicates::new();
        predicates.ilike("username", filter.username.as_deref());
        predicates.ilike("email", filter.email.as_deref());
        predicates.ilike("display_name", filter.display_name.as_deref());
        predicates.only_active();
        query::fetch_page(pool, TABLE, COLUMNS, &predicates, ORDER, page).await
    }

    /// Find an active user by internal id.
    pub async fn find_by_id(pool: &PgPool, id: DbId) -> DbResult<User> {
        let select = format!("SELECT {COLUMNS} FROM {TABLE} WHERE id = $1 AND active = TRUE");
        sqlx::query_as::<_, User>(&select)
            .bind(id)
            .fetch_optional(pool)
            .await?
            .ok_or_else(|| DbError::not_found(ENTITY, id))
    }

    /// Find an active user by public UUID.
    pub async fn find_by_uuid(pool: &PgPool, uuid: Uuid) -> DbResult<Option<User>> {
        let select = format!("SELECT {COLUMNS} FROM {TABLE} WHERE uuid = $1 AND active = TRUE");
        Ok(sqlx::query_as::<_, User>(&select)
            .bind(uuid)
            .fetch_optional(pool)
            .await?)
    }

    /// Check whether an active user with this id exists.
    pub async fn exists(pool: &PgPool, id: DbId) -> DbResult<bool> {
        query::exists(pool, TABLE, id).await
    }

    /// Insert a new user. Starts active; the public UUID is generated by the
    /// store.
    pub async fn create(pool: &PgPool, input: &CreateUser) -> DbResult<User> {
        query::guard_unique(pool, TABLE, ENTITY, "username", Some(&input.username), None).await?;
        query::guard_unique(pool, TABLE, ENTITY, "email", Some(&input.email), None).await?;

        let insert = format!(
            "INSERT INTO {TABLE} (username, email, display_name) \
             VALUES ($1, $2, $3) RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, User>(&insert)
            .bind(&input.username)
            .bind(&input.email)
            .bind(input.display_name.as_deref())
            .fetch_one(pool)
            .await
            .map_err(classify_write_error)
    }

    /// Partial update. Only non-`None` fields are applied; `uuid` never
    /// changes.
    pub async fn update(pool: &PgPool, id: DbId, input: &UpdateUser) -> DbResult<User> {
        query::require_exists(pool, TABLE, ENTITY, id).await?;
        query::guard_unique(
            pool,
            TABLE,
            ENTITY,
            "username",
            input.username.as_deref(),
            Some(id),
        )
        .await?;
        query::guard_unique(pool, TABLE, ENTITY, "email", input.email.as_deref(), Some(id))
            .await?;

        let update = format!(
            "UPDATE {TABLE} SET \
                username = COALESCE($2, username), \
                email = COALESCE($3, email), \
                display_name = COALESCE($4, display_name) \
             WHERE id = $1 AND active = TRUE \
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, User>(&update)
            .bind(id)
            .bind(input.username.as_deref())
            .bind(input.email.as_deref())
            .bind(input.display_name.as_deref())
            .fetch_optional(pool)
            .await
            .map_err(classify_write_error)?
            .ok_or_else(|| DbError::not_found(ENTITY, id))
    }

    /// Soft-delete a user, returning the deactivated row.
    pub async fn remove(pool: &PgPool, id: DbId) -> DbResult<User> {
        query::soft_delete(pool, TABLE, COLUMNS, ENTITY, id).await
    }
}
