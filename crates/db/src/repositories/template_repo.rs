//! Repository for the `document_templates` table.

use sqlx::PgPool;

use lexforge_core::types::DbId;

use crate::models::template::{
    CreateDocumentTemplate, DocumentTemplate, DocumentTemplateSummary,
};

/// Column list for SELECT queries.
const COLUMNS: &str = "\
    id, tenant_id, name, slug, category, html_content, \
    required_fields, field_mappings, signature_fields, \
    created_by, created_at, updated_at";

/// Provides tenant-scoped query and insert operations for templates.
pub struct TemplateRepo;

impl TemplateRepo {
    /// Insert a validated template.
    ///
    /// The unique constraint `uq_document_templates_tenant_slug` backs
    /// the per-tenant slug invariant; a violation surfaces as a database
    /// error the caller maps to a conflict.
    pub async fn insert(
        pool: &PgPool,
        template: &CreateDocumentTemplate,
    ) -> Result<DocumentTemplate, sqlx::Error> {
        sqlx::query_as::<_, DocumentTemplate>(&format!(
            "INSERT INTO document_templates \
             (tenant_id, name, slug, category, html_content, required_fields, \
              field_mappings, signature_fields, created_by) \
             VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9) \
             RETURNING {COLUMNS}"
        ))
        .bind(template.tenant_id)
        .bind(&template.name)
        .bind(&template.slug)
        .bind(&template.category)
        .bind(&template.html_content)
        .bind(&template.required_fields)
        .bind(&template.field_mappings)
        .bind(&template.signature_fields)
        .bind(template.created_by)
        .fetch_one(pool)
        .await
    }

    /// Find a template by id within a tenant. Cross-tenant ids come back
    /// as `None`, indistinguishable from missing rows.
    pub async fn find_by_id(
        pool: &PgPool,
        tenant_id: DbId,
        id: DbId,
    ) -> Result<Option<DocumentTemplate>, sqlx::Error> {
        sqlx::query_as::<_, DocumentTemplate>(&format!(
            "SELECT {COLUMNS} FROM document_templates WHERE id = $1 AND tenant_id = $2"
        ))
        .bind(id)
        .bind(tenant_id)
        .fetch_optional(pool)
        .await
    }

    /// Whether a slug is already taken within a tenant.
    pub async fn slug_exists(
        pool: &PgPool,
        tenant_id: DbId,
        slug: &str,
    ) -> Result<bool, sqlx::Error> {
        sqlx::query_scalar::<_, bool>(
            "SELECT EXISTS(SELECT 1 FROM document_templates WHERE tenant_id = $1 AND slug = $2)",
        )
        .bind(tenant_id)
        .bind(slug)
        .fetch_one(pool)
        .await
    }

    /// List a tenant's templates, newest first.
    pub async fn list(
        pool: &PgPool,
        tenant_id: DbId,
    ) -> Result<Vec<DocumentTemplateSummary>, sqlx::Error> {
        sqlx::query_as::<_, DocumentTemplateSummary>(
            "SELECT id, name, slug, category, created_at \
             FROM document_templates WHERE tenant_id = $1 \
             ORDER BY created_at DESC",
        )
        .bind(tenant_id)
        .fetch_all(pool)
        .await
    }
}
