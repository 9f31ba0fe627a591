//! Document template entity model and DTOs.

use serde::{Deserialize, Serialize};
use serde_json::Value;
use sqlx::FromRow;

use lexforge_core::types::{DbId, Timestamp};

/// A stored document template. `field_mappings` and `signature_fields`
/// are JSONB columns deserialized on demand by the pipeline.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct DocumentTemplate {
    pub id: DbId,
    pub tenant_id: DbId,
    pub name: String,
    pub slug: String,
    pub category: String,
    pub html_content: String,
    pub required_fields: Value,
    pub field_mappings: Value,
    pub signature_fields: Value,
    pub created_by: DbId,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

/// Tenant-scoped listing row (no html body -- list views don't need it).
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct DocumentTemplateSummary {
    pub id: DbId,
    pub name: String,
    pub slug: String,
    pub category: String,
    pub created_at: Timestamp,
}

/// DTO for inserting a validated template.
#[derive(Debug, Clone, Deserialize)]
pub struct CreateDocumentTemplate {
    pub tenant_id: DbId,
    pub name: String,
    pub slug: String,
    pub category: String,
    pub html_content: String,
    pub required_fields: Value,
    pub field_mappings: Value,
    pub signature_fields: Value,
    pub created_by: DbId,
}
