//! Certificate models and DTOs.

use serde::{Deserialize, Serialize};
use sqlx::FromRow;

use stockdesk_core::types::{DbId, Timestamp};

/// A row from the `certificates` table.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct Certificate {
    pub id: DbId,
    pub name: String,
    pub authority: String,
    pub issued_at: Timestamp,
    pub expires_at: Option<Timestamp>,
    /// Free-form attributes of the certified document (scan reference,
    /// serial numbers, ...). Opaque to the repository.
    pub metadata: serde_json::Value,
    pub active: bool,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

/// DTO for creating a certificate.
#[derive(Debug, Clone, Deserialize)]
pub struct CreateCertificate {
    pub name: String,
    pub authority: String,
    pub issued_at: Timestamp,
    pub expires_at: Option<Timestamp>,
    pub metadata: Option<serde_json::Value>,
}

/// DTO for updating a certificate. All fields are optional.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct UpdateCertificate {
    pub name: Option<String>,
    pub authority: Option<String>,
    pub issued_at: Option<Timestamp>,
    pub expires_at: Option<Timestamp>,
    pub metadata: Option<serde_json::Value>,
}

/// Sparse listing filter. `issued_from`/`issued_to` bound the issue date
/// inclusively.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct CertificateFilter {
    pub name: Option<String>,
    pub authority: Option<String>,
    pub issued_from: Option<Timestamp>,
    pub issued_to: Option<Timestamp>,
}
