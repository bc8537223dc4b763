//! Shared model for the simple lookup families: colors, conditions,
//! materials, locations, and states.
//!
//! These tables are structurally identical, so one row shape and one set of
//! DTOs serve all five; the table each maps to is picked by the
//! [`crate::repositories::LookupTable`] descriptor.

use serde::{Deserialize, Serialize};
use sqlx::FromRow;

use stockdesk_core::types::{DbId, Timestamp};

/// A row from one of the lookup tables.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct LookupItem {
    pub id: DbId,
    pub name: String,
    pub code: Option<String>,
    pub description: Option<String>,
    pub active: bool,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

/// DTO for creating a lookup item.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct CreateLookupItem {
    pub name: String,
    pub code: Option<String>,
    pub description: Option<String>,
}

/// DTO for updating a lookup item. All fields are optional.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct UpdateLookupItem {
    pub name: Option<String>,
    pub code: Option<String>,
    pub description: Option<String>,
}

/// Sparse listing filter. Absent or blank fields do not restrict the query.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct LookupFilter {
    pub name: Option<String>,
    pub code: Option<String>,
    pub description: Option<String>,
}
