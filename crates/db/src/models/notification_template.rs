//! Notification template models and DTOs.
//!
//! Subject and body are opaque text here; rendering and placeholder
//! semantics live elsewhere.

use serde::{Deserialize, Serialize};
use sqlx::FromRow;

use stockdesk_core::types::{DbId, Timestamp};

/// A row from the `notification_templates` table.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct NotificationTemplate {
    pub id: DbId,
    pub name: String,
    pub subject: String,
    pub body: String,
    pub active: bool,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

/// DTO for creating a notification template.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct CreateNotificationTemplate {
    pub name: String,
    pub subject: String,
    pub body: String,
}

/// DTO for updating a notification template. All fields are optional.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct UpdateNotificationTemplate {
    pub name: Option<String>,
    pub subject: Option<String>,
    pub body: Option<String>,
}

/// Sparse listing filter for notification templates.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct NotificationTemplateFilter {
    pub name: Option<String>,
    pub subject: Option<String>,
}
