//! Category models and DTOs.
//!
//! Categories are the one hierarchical family: a category may reference
//! another category as its parent. Parent references are validated at write
//! time: the parent must be an active category and the link must not form a
//! cycle.

use serde::{Deserialize, Serialize};
use sqlx::FromRow;

use stockdesk_core::types::{DbId, Timestamp};

/// A row from the `categories` table.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct Category {
    pub id: DbId,
    pub name: String,
    pub code: Option<String>,
    pub description: Option<String>,
    pub parent_id: Option<DbId>,
    pub active: bool,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

/// DTO for creating a category.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct CreateCategory {
    pub name: String,
    pub code: Option<String>,
    pub description: Option<String>,
    pub parent_id: Option<DbId>,
}

/// DTO for updating a category. All fields are optional; `parent_id` can be
/// changed but not cleared through this DTO.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct UpdateCategory {
    pub name: Option<String>,
    pub code: Option<String>,
    pub description: Option<String>,
    pub parent_id: Option<DbId>,
}

/// Sparse listing filter for categories.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct CategoryFilter {
    pub name: Option<String>,
    pub code: Option<String>,
    pub description: Option<String>,
    pub parent_id: Option<DbId>,
}
