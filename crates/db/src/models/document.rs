//! Rendered document entity model and DTOs.

use serde::{Deserialize, Serialize};
use serde_json::Value;
use sqlx::FromRow;

use lexforge_core::types::{DbId, Timestamp};

/// A rendered document. `substituted_values` is the encrypted context
/// blob; it is deliberately excluded from serialized API responses.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct Document {
    pub id: DbId,
    pub tenant_id: DbId,
    pub template_id: DbId,
    pub case_id: DbId,
    pub title: String,
    pub status: String,
    pub recipient_email: String,
    pub recipient_name: Option<String>,
    pub recipient_type: String,
    #[serde(skip_serializing)]
    pub rendered_html: String,
    pub pdf_url: String,
    pub pdf_storage_path: String,
    #[serde(skip_serializing)]
    pub substituted_values: String,
    pub signature_fields: Value,
    pub created_by: DbId,
    pub created_at: Timestamp,
    pub sent_by: Option<DbId>,
    pub sent_at: Option<Timestamp>,
    pub sent_via: Option<String>,
    pub signed_by: Option<String>,
    pub signed_at: Option<Timestamp>,
    pub signature_url: Option<String>,
    pub updated_at: Timestamp,
}

/// Listing row for case views.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct DocumentSummary {
    pub id: DbId,
    pub case_id: DbId,
    pub title: String,
    pub status: String,
    pub recipient_email: String,
    pub pdf_url: String,
    pub created_at: Timestamp,
}

/// DTO for inserting a freshly rendered document (always status
/// `rendered`).
#[derive(Debug, Clone, Deserialize)]
pub struct CreateDocument {
    pub tenant_id: DbId,
    pub template_id: DbId,
    pub case_id: DbId,
    pub title: String,
    pub recipient_email: String,
    pub recipient_name: Option<String>,
    pub recipient_type: String,
    pub rendered_html: String,
    pub pdf_url: String,
    pub pdf_storage_path: String,
    pub substituted_values: String,
    pub signature_fields: Value,
    pub created_by: DbId,
}
