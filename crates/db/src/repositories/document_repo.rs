//! Repository for the `documents` table.
//!
//! Lifecycle transitions are guarded UPDATEs: the WHERE clause pins the
//! expected current status, so a concurrent or out-of-order transition
//! simply matches zero rows and the caller reports a conflict. Status
//! never moves backward.

use sqlx::{PgExecutor, PgPool};

use lexforge_core::types::{DbId, Timestamp};

use crate::models::document::{CreateDocument, Document, DocumentSummary};

/// Column list for SELECT queries.
const COLUMNS: &str = "\
    id, tenant_id, template_id, case_id, title, status, \
    recipient_email, recipient_name, recipient_type, rendered_html, \
    pdf_url, pdf_storage_path, substituted_values, signature_fields, \
    created_by, created_at, sent_by, sent_at, sent_via, \
    signed_by, signed_at, signature_url, updated_at";

/// Provides tenant-scoped persistence for rendered documents.
pub struct DocumentRepo;

impl DocumentRepo {
    /// Insert a freshly rendered document (status `rendered`).
    ///
    /// Takes an executor so the render pipeline can run it inside the
    /// same transaction as the audit entry.
    pub async fn insert<'e, E: PgExecutor<'e>>(
        executor: E,
        doc: &CreateDocument,
    ) -> Result<Document, sqlx::Error> {
        sqlx::query_as::<_, Document>(&format!(
            "INSERT INTO documents \
             (tenant_id, template_id, case_id, title, status, recipient_email, \
              recipient_name, recipient_type, rendered_html, pdf_url, \
              pdf_storage_path, substituted_values, signature_fields, created_by) \
             VALUES ($1, $2, $3, $4, 'rendered', $5, $6, $7, $8, $9, $10, $11, $12, $13) \
             RETURNING {COLUMNS}"
        ))
        .bind(doc.tenant_id)
        .bind(doc.template_id)
        .bind(doc.case_id)
        .bind(&doc.title)
        .bind(&doc.recipient_email)
        .bind(&doc.recipient_name)
        .bind(&doc.recipient_type)
        .bind(&doc.rendered_html)
        .bind(&doc.pdf_url)
        .bind(&doc.pdf_storage_path)
        .bind(&doc.substituted_values)
        .bind(&doc.signature_fields)
        .bind(doc.created_by)
        .fetch_one(executor)
        .await
    }

    /// Find a document by id within a tenant.
    pub async fn find_by_id(
        pool: &PgPool,
        tenant_id: DbId,
        id: DbId,
    ) -> Result<Option<Document>, sqlx::Error> {
        sqlx::query_as::<_, Document>(&format!(
            "SELECT {COLUMNS} FROM documents WHERE id = $1 AND tenant_id = $2"
        ))
        .bind(id)
        .bind(tenant_id)
        .fetch_optional(pool)
        .await
    }

    /// List documents, optionally filtered to one case, newest first.
    pub async fn list(
        pool: &PgPool,
        tenant_id: DbId,
        case_id: Option<DbId>,
    ) -> Result<Vec<DocumentSummary>, sqlx::Error> {
        match case_id {
            Some(case_id) => {
                sqlx::query_as::<_, DocumentSummary>(
                    "SELECT id, case_id, title, status, recipient_email, pdf_url, created_at \
                     FROM documents WHERE tenant_id = $1 AND case_id = $2 \
                     ORDER BY created_at DESC",
                )
                .bind(tenant_id)
                .bind(case_id)
                .fetch_all(pool)
                .await
            }
            None => {
                sqlx::query_as::<_, DocumentSummary>(
                    "SELECT id, case_id, title, status, recipient_email, pdf_url, created_at \
                     FROM documents WHERE tenant_id = $1 \
                     ORDER BY created_at DESC",
                )
                .bind(tenant_id)
                .fetch_all(pool)
                .await
            }
        }
    }

    /// Transition `rendered -> sent`, recording sender and channel.
    ///
    /// Returns `None` when the document is not currently `rendered`
    /// (or does not exist in the tenant).
    pub async fn mark_sent<'e, E: PgExecutor<'e>>(
        executor: E,
        tenant_id: DbId,
        id: DbId,
        sent_by: DbId,
        sent_via: &str,
        sent_at: Timestamp,
    ) -> Result<Option<Document>, sqlx::Error> {
        sqlx::query_as::<_, Document>(&format!(
            "UPDATE documents \
             SET status = 'sent', sent_by = $1, sent_via = $2, sent_at = $3, updated_at = now() \
             WHERE id = $4 AND tenant_id = $5 AND status = 'rendered' \
             RETURNING {COLUMNS}"
        ))
        .bind(sent_by)
        .bind(sent_via)
        .bind(sent_at)
        .bind(id)
        .bind(tenant_id)
        .fetch_optional(executor)
        .await
    }

    /// Transition `sent -> signed`, recording the signer identity and the
    /// optional signature image reference.
    pub async fn record_signature<'e, E: PgExecutor<'e>>(
        executor: E,
        tenant_id: DbId,
        id: DbId,
        signed_by: &str,
        signature_url: Option<&str>,
        signed_at: Timestamp,
    ) -> Result<Option<Document>, sqlx::Error> {
        sqlx::query_as::<_, Document>(&format!(
            "UPDATE documents \
             SET status = 'signed', signed_by = $1, signature_url = $2, signed_at = $3, \
                 updated_at = now() \
             WHERE id = $4 AND tenant_id = $5 AND status = 'sent' \
             RETURNING {COLUMNS}"
        ))
        .bind(signed_by)
        .bind(signature_url)
        .bind(signed_at)
        .bind(id)
        .bind(tenant_id)
        .fetch_optional(executor)
        .await
    }

    /// Current status of a document, if it exists in the tenant. Used to
    /// distinguish "not found" from "illegal transition" after a guarded
    /// UPDATE matched nothing.
    pub async fn find_status(
        pool: &PgPool,
        tenant_id: DbId,
        id: DbId,
    ) -> Result<Option<String>, sqlx::Error> {
        sqlx::query_scalar::<_, String>(
            "SELECT status FROM documents WHERE id = $1 AND tenant_id = $2",
        )
        .bind(id)
        .bind(tenant_id)
        .fetch_optional(pool)
        .await
    }
}
