//! Repository for the append-only `document_audit_logs` table.
//!
//! Insert and read only -- there is deliberately no update or delete.

use sqlx::{PgExecutor, PgPool};

use lexforge_core::types::DbId;

use crate::models::audit::{CreateDocumentAuditLog, DocumentAuditLog};

/// Column list for SELECT queries.
const COLUMNS: &str = "\
    id, tenant_id, document_id, action, action_details, \
    user_id, user_email, new_values, integrity_hash, created_at";

/// Append and replay operations for the document audit trail.
pub struct DocumentAuditLogRepo;

impl DocumentAuditLogRepo {
    /// Append one entry. Takes an executor so lifecycle transitions can
    /// write the entry in the same transaction as the row they audit.
    pub async fn insert<'e, E: PgExecutor<'e>>(
        executor: E,
        entry: &CreateDocumentAuditLog,
    ) -> Result<DocumentAuditLog, sqlx::Error> {
        sqlx::query_as::<_, DocumentAuditLog>(&format!(
            "INSERT INTO document_audit_logs \
             (tenant_id, document_id, action, action_details, user_id, user_email, \
              new_values, integrity_hash) \
             VALUES ($1, $2, $3, $4, $5, $6, $7, $8) \
             RETURNING {COLUMNS}"
        ))
        .bind(entry.tenant_id)
        .bind(entry.document_id)
        .bind(&entry.action)
        .bind(&entry.action_details)
        .bind(entry.user_id)
        .bind(&entry.user_email)
        .bind(&entry.new_values)
        .bind(&entry.integrity_hash)
        .fetch_one(executor)
        .await
    }

    /// Integrity hash of a document's most recent entry, for chaining.
    pub async fn find_last_hash<'e, E: PgExecutor<'e>>(
        executor: E,
        document_id: DbId,
    ) -> Result<Option<String>, sqlx::Error> {
        sqlx::query_scalar::<_, Option<String>>(
            "SELECT integrity_hash FROM document_audit_logs \
             WHERE document_id = $1 ORDER BY id DESC LIMIT 1",
        )
        .bind(document_id)
        .fetch_optional(executor)
        .await
        .map(|opt| opt.flatten())
    }

    /// A document's full history in insertion order -- the replayable
    /// canonical record of what happened.
    pub async fn list_for_document(
        pool: &PgPool,
        tenant_id: DbId,
        document_id: DbId,
    ) -> Result<Vec<DocumentAuditLog>, sqlx::Error> {
        sqlx::query_as::<_, DocumentAuditLog>(&format!(
            "SELECT {COLUMNS} FROM document_audit_logs \
             WHERE document_id = $1 AND tenant_id = $2 \
             ORDER BY id ASC"
        ))
        .bind(document_id)
        .bind(tenant_id)
        .fetch_all(pool)
        .await
    }
}
