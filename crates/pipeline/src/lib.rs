//! The document lifecycle manager.
//!
//! Orchestrates resolve -> compile -> encrypt -> render -> upload ->
//! persist -> audit for new documents, drives the sent/signed transitions,
//! runs the template creation gate, and serves the no-persistence preview
//! path.

pub mod audit;
pub mod preview;

use std::collections::BTreeMap;
use std::sync::Arc;

use serde_json::json;

use lexforge_cloud::BlobStore;
use lexforge_core::audit::actions;
use lexforge_core::compiler::compile;
use lexforge_core::context::resolve_context;
use lexforge_core::crypto::SensitiveValueCipher;
use lexforge_core::document::{check_transition, DocumentStatus};
use lexforge_core::error::{CoreError, CoreResult};
use lexforge_core::roles::is_firm_author;
use lexforge_core::signature::{validate_signature_fields, SignatureField};
use lexforge_core::template::{slugify, validate_field_mappings};
use lexforge_core::types::DbId;
use lexforge_db::models::audit::CreateDocumentAuditLog;
use lexforge_db::models::document::CreateDocument;
use lexforge_db::models::template::CreateDocumentTemplate;
use lexforge_db::repositories::{CaseRepo, DocumentRepo, TemplateRepo};
use lexforge_db::DbPool;
use lexforge_render::{PdfRenderer, SignatureOverlay};

pub use preview::{preview_draft, TemplateDraft};

/// The authenticated caller, as supplied by the session layer. The
/// pipeline trusts this identity and enforces only tenant match and role.
#[derive(Debug, Clone)]
pub struct Actor {
    pub user_id: DbId,
    pub tenant_id: DbId,
    pub email: String,
    pub role: String,
}

/// Input for template creation.
#[derive(Debug, Clone)]
pub struct CreateTemplateInput {
    pub name: String,
    pub category: String,
    pub html_content: String,
    pub field_mappings: BTreeMap<String, String>,
    pub signature_fields: Vec<SignatureField>,
}

/// Input for rendering a document against a case.
#[derive(Debug, Clone)]
pub struct RenderDocumentInput {
    pub template_id: DbId,
    pub case_id: DbId,
    pub recipient_email: String,
    pub recipient_name: Option<String>,
    pub recipient_type: String,
}

/// Result of a successful render.
#[derive(Debug, Clone)]
pub struct RenderOutcome {
    pub document_id: DbId,
    pub pdf_url: String,
}

/// Accepted recipient kinds.
const RECIPIENT_TYPES: &[&str] = &["client", "third_party", "opposing_counsel", "witness"];

/// Blob path for a rendered PDF: tenant/case/timestamp scoped.
pub fn document_storage_path(tenant_id: DbId, case_id: DbId, unix_millis: i64) -> String {
    format!("documents/{tenant_id}/{case_id}/{unix_millis}.pdf")
}

fn ensure_firm_author(actor: &Actor) -> CoreResult<()> {
    if is_firm_author(&actor.role) {
        Ok(())
    } else {
        Err(CoreError::Forbidden(
            "Only law firm owners or staff can manage templates and documents".into(),
        ))
    }
}

/// Map database failures onto domain errors without leaking internals.
fn map_db_err(err: sqlx::Error) -> CoreError {
    if let sqlx::Error::Database(db_err) = &err {
        // PostgreSQL unique constraint violation: error code 23505.
        if db_err.code().as_deref() == Some("23505") {
            let constraint = db_err.constraint().unwrap_or("unknown");
            if constraint.starts_with("uq_") {
                return CoreError::Conflict("A record with this identity already exists".into());
            }
        }
    }
    tracing::error!(error = %err, "database error");
    CoreError::Internal("database operation failed".into())
}

/// The lifecycle manager. Cheaply cloneable; renderer and blob store are
/// behind `Arc`, the cipher is a fixed-size key.
#[derive(Clone)]
pub struct DocumentPipeline {
    pool: DbPool,
    renderer: Arc<dyn PdfRenderer>,
    blobs: Arc<dyn BlobStore>,
    cipher: SensitiveValueCipher,
}

impl DocumentPipeline {
    pub fn new(
        pool: DbPool,
        renderer: Arc<dyn PdfRenderer>,
        blobs: Arc<dyn BlobStore>,
        cipher: SensitiveValueCipher,
    ) -> Self {
        Self {
            pool,
            renderer,
            blobs,
            cipher,
        }
    }

    // -----------------------------------------------------------------------
    // Template creation
    // -----------------------------------------------------------------------

    /// Create a template, enforcing the mapping-completeness gate.
    ///
    /// Fails with a validation error naming every unmapped placeholder.
    /// The TEMPLATE_CREATED audit entry is best-effort: a failed write is
    /// logged and the creation still succeeds.
    pub async fn create_template(
        &self,
        actor: &Actor,
        input: CreateTemplateInput,
    ) -> CoreResult<DbId> {
        ensure_firm_author(actor)?;

        if input.name.trim().is_empty() {
            return Err(CoreError::Validation("Template name is required".into()));
        }
        if input.category.trim().is_empty() {
            return Err(CoreError::Validation("Template category is required".into()));
        }

        let required_fields = validate_field_mappings(&input.html_content, &input.field_mappings)?;
        validate_signature_fields(&input.signature_fields)?;

        let slug = slugify(&input.name);
        if slug.is_empty() {
            return Err(CoreError::Validation(
                "Template name must contain at least one alphanumeric character".into(),
            ));
        }
        if TemplateRepo::slug_exists(&self.pool, actor.tenant_id, &slug)
            .await
            .map_err(map_db_err)?
        {
            return Err(CoreError::Conflict(format!(
                "Template with slug \"{slug}\" already exists"
            )));
        }

        let create = CreateDocumentTemplate {
            tenant_id: actor.tenant_id,
            name: input.name.clone(),
            slug: slug.clone(),
            category: input.category.clone(),
            html_content: input.html_content,
            required_fields: json!(required_fields),
            field_mappings: json!(input.field_mappings),
            signature_fields: json!(input.signature_fields),
            created_by: actor.user_id,
        };
        let template = TemplateRepo::insert(&self.pool, &create)
            .await
            .map_err(map_db_err)?;

        // Best-effort audit: names and structure only, never data values.
        let entry = CreateDocumentAuditLog {
            tenant_id: actor.tenant_id,
            document_id: None,
            action: actions::TEMPLATE_CREATED.into(),
            action_details: json!({
                "templateId": template.id,
                "slug": slug,
                "name": input.name,
                "category": input.category,
                "requiredFields": required_fields,
            })
            .to_string(),
            user_id: Some(actor.user_id),
            user_email: actor.email.clone(),
            new_values: None,
            integrity_hash: None,
        };
        audit::append_best_effort(&self.pool, entry).await;

        tracing::info!(template_id = %template.id, slug, "template created");
        Ok(template.id)
    }

    // -----------------------------------------------------------------------
    // Render
    // -----------------------------------------------------------------------

    /// Render a document from a template against a case.
    ///
    /// The Document row and its DOCUMENT_RENDERED audit entry commit in
    /// one transaction after the PDF upload succeeds; if that transaction
    /// fails the uploaded blob is best-effort deleted so it does not
    /// orphan.
    pub async fn render_document(
        &self,
        actor: &Actor,
        input: RenderDocumentInput,
    ) -> CoreResult<RenderOutcome> {
        ensure_firm_author(actor)?;

        if !input.recipient_email.contains('@') {
            return Err(CoreError::Validation(
                "Recipient email address is invalid".into(),
            ));
        }
        if !RECIPIENT_TYPES.contains(&input.recipient_type.as_str()) {
            return Err(CoreError::Validation(format!(
                "Recipient type must be one of: {}",
                RECIPIENT_TYPES.join(", ")
            )));
        }

        let template = TemplateRepo::find_by_id(&self.pool, actor.tenant_id, input.template_id)
            .await
            .map_err(map_db_err)?
            .ok_or(CoreError::NotFound { entity: "Template" })?;

        let case_row = CaseRepo::find_render_row(&self.pool, actor.tenant_id, input.case_id)
            .await
            .map_err(map_db_err)?
            .ok_or(CoreError::NotFound { entity: "Case" })?;

        let field_mappings: BTreeMap<String, String> =
            serde_json::from_value(template.field_mappings.clone()).map_err(|e| {
                CoreError::Internal(format!("stored field mappings are malformed: {e}"))
            })?;
        let signature_fields: Vec<SignatureField> =
            serde_json::from_value(template.signature_fields.clone()).map_err(|e| {
                CoreError::Internal(format!("stored signature fields are malformed: {e}"))
            })?;

        // Resolve and compile. Resolution soft-fails per path; compilation
        // is pure substitution and cannot fail.
        let source = CaseRepo::render_source(&case_row);
        let context = resolve_context(&field_mappings, &source);
        let rendered_html = compile(&template.html_content, &context);

        // Encrypt before anything durable exists: a crypto failure here
        // leaves no blob behind to clean up.
        let encrypted_values = self.cipher.encrypt(&context)?;
        let substituted_fields: Vec<&String> = context.keys().collect();

        // Rasterize with placeholder overlays (nothing is signed yet).
        let overlays: Vec<SignatureOverlay> = signature_fields
            .iter()
            .cloned()
            .map(SignatureOverlay::placeholder)
            .collect();
        let pdf_bytes = self
            .renderer
            .render(&rendered_html, &overlays)
            .await
            .map_err(|e| CoreError::Render(e.to_string()))?;

        // Upload before the database transaction so a failed upload never
        // leaves a Document row pointing at nothing.
        let storage_path = document_storage_path(
            actor.tenant_id,
            input.case_id,
            chrono::Utc::now().timestamp_millis(),
        );
        let pdf_url = self
            .blobs
            .upload(&storage_path, pdf_bytes, "application/pdf")
            .await
            .map_err(|e| {
                tracing::error!(error = %e, path = storage_path, "pdf upload failed");
                CoreError::Internal("failed to store rendered PDF".into())
            })?;

        let create = CreateDocument {
            tenant_id: actor.tenant_id,
            template_id: template.id,
            case_id: case_row.id,
            title: format!("{} - {}", template.name, case_row.title),
            recipient_email: input.recipient_email.clone(),
            recipient_name: input.recipient_name.clone(),
            recipient_type: input.recipient_type.clone(),
            rendered_html,
            pdf_url: pdf_url.clone(),
            pdf_storage_path: storage_path.clone(),
            substituted_values: encrypted_values,
            signature_fields: json!(signature_fields),
            created_by: actor.user_id,
        };

        let action_details = json!({
            "templateId": template.id,
            "caseId": case_row.id,
            "recipientEmail": input.recipient_email,
            // Field names only -- the values themselves are encrypted at
            // rest and never appear in plaintext audit detail.
            "fieldsSubstituted": substituted_fields,
        })
        .to_string();

        let persist = async {
            let mut tx = self.pool.begin().await.map_err(map_db_err)?;
            let document = DocumentRepo::insert(&mut *tx, &create)
                .await
                .map_err(map_db_err)?;

            let entry = CreateDocumentAuditLog {
                tenant_id: actor.tenant_id,
                document_id: Some(document.id),
                action: actions::DOCUMENT_RENDERED.into(),
                action_details,
                user_id: Some(actor.user_id),
                user_email: actor.email.clone(),
                new_values: Some(json!({ "status": "rendered", "pdfUrl": pdf_url })),
                integrity_hash: None,
            };
            audit::append_critical(&mut tx, entry).await?;

            tx.commit().await.map_err(map_db_err)?;
            Ok::<_, CoreError>(document)
        };

        let document = match persist.await {
            Ok(document) => document,
            Err(err) => {
                // The blob is already uploaded; clean it up rather than
                // leaving an orphan.
                if let Err(cleanup) = self.blobs.delete(&storage_path).await {
                    tracing::warn!(error = %cleanup, path = storage_path, "orphan blob cleanup failed");
                }
                return Err(err);
            }
        };

        tracing::info!(document_id = %document.id, "document rendered");
        Ok(RenderOutcome {
            document_id: document.id,
            pdf_url: document.pdf_url,
        })
    }

    // -----------------------------------------------------------------------
    // Sent / signed transitions
    // -----------------------------------------------------------------------

    /// Transition a document `rendered -> sent`, recording sender and
    /// delivery channel. No re-render happens here.
    pub async fn mark_sent(
        &self,
        actor: &Actor,
        document_id: DbId,
        sent_via: &str,
    ) -> CoreResult<()> {
        ensure_firm_author(actor)?;
        if sent_via.trim().is_empty() {
            return Err(CoreError::Validation("Delivery channel is required".into()));
        }

        let mut tx = self.pool.begin().await.map_err(map_db_err)?;
        let updated = DocumentRepo::mark_sent(
            &mut *tx,
            actor.tenant_id,
            document_id,
            actor.user_id,
            sent_via,
            chrono::Utc::now(),
        )
        .await
        .map_err(map_db_err)?;

        let Some(document) = updated else {
            drop(tx);
            return Err(self
                .transition_failure(actor.tenant_id, document_id, DocumentStatus::Sent)
                .await);
        };

        let entry = CreateDocumentAuditLog {
            tenant_id: actor.tenant_id,
            document_id: Some(document.id),
            action: actions::DOCUMENT_SENT.into(),
            action_details: json!({ "sentVia": sent_via }).to_string(),
            user_id: Some(actor.user_id),
            user_email: actor.email.clone(),
            new_values: Some(json!({ "status": "sent", "sentVia": sent_via })),
            integrity_hash: None,
        };
        audit::append_critical(&mut tx, entry).await?;
        tx.commit().await.map_err(map_db_err)?;

        tracing::info!(document_id = %document_id, sent_via, "document marked sent");
        Ok(())
    }

    /// Record a signature, transitioning `sent -> signed`.
    ///
    /// Unlike the other operations this does not require the firm-author
    /// role: the signer may be an external recipient. Any authenticated
    /// identity in the document's tenant may record it.
    pub async fn record_signature(
        &self,
        actor: &Actor,
        document_id: DbId,
        signed_by: &str,
        signature_url: Option<&str>,
    ) -> CoreResult<()> {
        if signed_by.trim().is_empty() {
            return Err(CoreError::Validation("Signer identity is required".into()));
        }

        let signed_at = chrono::Utc::now();
        let mut tx = self.pool.begin().await.map_err(map_db_err)?;
        let updated = DocumentRepo::record_signature(
            &mut *tx,
            actor.tenant_id,
            document_id,
            signed_by,
            signature_url,
            signed_at,
        )
        .await
        .map_err(map_db_err)?;

        let Some(document) = updated else {
            drop(tx);
            return Err(self
                .transition_failure(actor.tenant_id, document_id, DocumentStatus::Signed)
                .await);
        };

        let entry = CreateDocumentAuditLog {
            tenant_id: actor.tenant_id,
            document_id: Some(document.id),
            action: actions::DOCUMENT_SIGNED.into(),
            action_details: json!({ "signedBy": signed_by }).to_string(),
            user_id: Some(actor.user_id),
            user_email: actor.email.clone(),
            new_values: Some(json!({ "status": "signed", "signedAt": signed_at })),
            integrity_hash: None,
        };
        audit::append_critical(&mut tx, entry).await?;
        tx.commit().await.map_err(map_db_err)?;

        tracing::info!(document_id = %document_id, "document signature recorded");
        Ok(())
    }

    /// A guarded transition UPDATE matched no rows: either the document
    /// does not exist in the tenant, or its current status forbids the
    /// transition. Produce the precise error.
    async fn transition_failure(
        &self,
        tenant_id: DbId,
        document_id: DbId,
        target: DocumentStatus,
    ) -> CoreError {
        match DocumentRepo::find_status(&self.pool, tenant_id, document_id).await {
            Ok(Some(status)) => match DocumentStatus::parse(&status) {
                Ok(current) => check_transition(current, target)
                    .err()
                    .unwrap_or(CoreError::Internal("transition check inconsistency".into())),
                Err(err) => err,
            },
            Ok(None) => CoreError::NotFound { entity: "Document" },
            Err(err) => map_db_err(err),
        }
    }

    // -----------------------------------------------------------------------
    // Preview
    // -----------------------------------------------------------------------

    /// Preview a stored template against the canned sample dataset.
    ///
    /// Returns base64 PDF bytes; creates no Document and no audit entry.
    pub async fn preview_template(&self, actor: &Actor, template_id: DbId) -> CoreResult<String> {
        ensure_firm_author(actor)?;

        let template = TemplateRepo::find_by_id(&self.pool, actor.tenant_id, template_id)
            .await
            .map_err(map_db_err)?
            .ok_or(CoreError::NotFound { entity: "Template" })?;

        let field_mappings: BTreeMap<String, String> =
            serde_json::from_value(template.field_mappings.clone()).map_err(|e| {
                CoreError::Internal(format!("stored field mappings are malformed: {e}"))
            })?;
        let signature_fields: Vec<SignatureField> =
            serde_json::from_value(template.signature_fields.clone()).map_err(|e| {
                CoreError::Internal(format!("stored signature fields are malformed: {e}"))
            })?;

        let draft = TemplateDraft {
            html_content: template.html_content,
            field_mappings,
            signature_fields,
        };
        preview_draft(self.renderer.as_ref(), &draft).await
    }

    /// Preview an unsaved draft payload. Same guarantees as
    /// [`Self::preview_template`].
    pub async fn preview_draft(&self, actor: &Actor, draft: &TemplateDraft) -> CoreResult<String> {
        ensure_firm_author(actor)?;
        preview_draft(self.renderer.as_ref(), draft).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn storage_path_is_tenant_case_timestamp_scoped() {
        let tenant = uuid::Uuid::nil();
        let case = uuid::Uuid::nil();
        let path = document_storage_path(tenant, case, 1_700_000_000_000);
        assert_eq!(
            path,
            format!("documents/{tenant}/{case}/1700000000000.pdf")
        );
    }

    #[test]
    fn firm_author_gate() {
        let mut actor = Actor {
            user_id: uuid::Uuid::nil(),
            tenant_id: uuid::Uuid::nil(),
            email: "staff@firm.example".into(),
            role: "firm_staff".into(),
        };
        assert!(ensure_firm_author(&actor).is_ok());

        actor.role = "client".into();
        assert!(matches!(
            ensure_firm_author(&actor),
            Err(CoreError::Forbidden(_))
        ));
    }

    #[test]
    fn recipient_types_match_api_contract() {
        for t in ["client", "third_party", "opposing_counsel", "witness"] {
            assert!(RECIPIENT_TYPES.contains(&t));
        }
        assert!(!RECIPIENT_TYPES.contains(&"stranger"));
    }
}
