//! Administrative user models and DTOs.
//!
//! Authentication is out of scope here; this is the administered account
//! record only. `uuid` is the generated, immutable public identifier exposed
//! outside the backend; the internal `id` stays a BIGSERIAL like every other
//! table.

use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use uuid::Uuid;

use stockdesk_core::types::{DbId, Timestamp};

/// A row from the `users` table.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct User {
    pub id: DbId,
    pub uuid: Uuid,
    pub username: String,
    pub email: String,
    pub display_name: Option<String>,
    pub active: bool,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

/// DTO for creating a user.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct CreateUser {
    pub username: String,
    pub email: String,
    pub display_name: Option<String>,
}

/// DTO for updating a user. All fields are optional; `uuid` is immutable.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct UpdateUser {
    pub username: Option<String>,
    pub email: Option<String>,
    pub display_name: Option<String>,
}

/// Sparse listing filter for users.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct UserFilter {
    pub username: Option<String>,
    pub email: Option<String>,
    pub display_name: Option<String>,
}
