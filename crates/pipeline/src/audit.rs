//! Audit writing with explicit durability.
//!
//! Template-creation entries are best-effort: a failed write logs locally
//! and the parent operation still succeeds. Document lifecycle entries
//! are the compliance record: they are written inside the same database
//! transaction as the state change, so the transition and its audit entry
//! commit or fail together.

use sqlx::{Postgres, Transaction};

use lexforge_core::audit::compute_integrity_hash;
use lexforge_core::error::{CoreError, CoreResult};
use lexforge_db::models::audit::{CreateDocumentAuditLog, DocumentAuditLog};
use lexforge_db::repositories::DocumentAuditLogRepo;
use lexforge_db::DbPool;

/// Canonical string form of an entry, the input to the integrity hash.
fn canonical_entry_data(entry: &CreateDocumentAuditLog) -> String {
    format!("{}|{}", entry.action, entry.action_details)
}

/// Chain the entry onto the document's existing hash chain.
async fn with_integrity_hash<'c>(
    tx: &mut Transaction<'c, Postgres>,
    mut entry: CreateDocumentAuditLog,
) -> Result<CreateDocumentAuditLog, sqlx::Error> {
    if let Some(document_id) = entry.document_id {
        let prev = DocumentAuditLogRepo::find_last_hash(&mut **tx, document_id).await?;
        entry.integrity_hash = Some(compute_integrity_hash(
            prev.as_deref(),
            &canonical_entry_data(&entry),
        ));
    }
    Ok(entry)
}

/// Append a critical (document-lifecycle) entry inside the caller's
/// transaction. Failure fails the whole transition.
pub async fn append_critical<'c>(
    tx: &mut Transaction<'c, Postgres>,
    entry: CreateDocumentAuditLog,
) -> CoreResult<DocumentAuditLog> {
    let entry = with_integrity_hash(tx, entry).await.map_err(|e| {
        tracing::error!(error = %e, "failed to read audit hash chain");
        CoreError::Internal("audit log write failed".into())
    })?;

    DocumentAuditLogRepo::insert(&mut **tx, &entry)
        .await
        .map_err(|e| {
            tracing::error!(error = %e, action = entry.action, "critical audit write failed");
            CoreError::Internal("audit log write failed".into())
        })
}

/// Append a best-effort entry. Never fails the caller; a write failure
/// is logged and swallowed.
pub async fn append_best_effort(pool: &DbPool, entry: CreateDocumentAuditLog) {
    if let Err(err) = DocumentAuditLogRepo::insert(pool, &entry).await {
        tracing::warn!(
            error = %err,
            action = entry.action,
            "best-effort audit write failed; continuing"
        );
    }
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;

    #[test]
    fn canonical_form_covers_action_and_details() {
        let entry = CreateDocumentAuditLog {
            tenant_id: uuid::Uuid::nil(),
            document_id: None,
            action: "DOCUMENT_SENT".into(),
            action_details: json!({ "sentVia": "email" }).to_string(),
            user_id: None,
            user_email: "staff@firm.example".into(),
            new_values: None,
            integrity_hash: None,
        };
        let canonical = canonical_entry_data(&entry);
        assert!(canonical.starts_with("DOCUMENT_SENT|"));
        assert!(canonical.contains("sentVia"));
    }
}
