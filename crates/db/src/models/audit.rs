//! Audit log entity model and insert DTO.
//!
//! Audit entries are immutable once created (no updated_at). The
//! BIGSERIAL id is the canonical replay order for a document's history.

use serde::{Deserialize, Serialize};
use serde_json::Value;
use sqlx::FromRow;

use lexforge_core::types::{DbId, Timestamp};

/// A single append-only audit entry.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct DocumentAuditLog {
    pub id: i64,
    pub tenant_id: DbId,
    pub document_id: Option<DbId>,
    pub action: String,
    pub action_details: String,
    pub user_id: Option<DbId>,
    pub user_email: String,
    pub new_values: Option<Value>,
    pub integrity_hash: Option<String>,
    pub created_at: Timestamp,
}

/// DTO for appending an audit entry.
#[derive(Debug, Clone, Deserialize)]
pub struct CreateDocumentAuditLog {
    pub tenant_id: DbId,
    pub document_id: Option<DbId>,
    pub action: String,
    pub action_details: String,
    pub user_id: Option<DbId>,
    pub user_email: String,
    pub new_values: Option<Value>,
    pub integrity_hash: Option<String>,
}
