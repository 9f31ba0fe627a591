//! Handlers for document template management and preview.
//!
//! Template creation enforces the mapping-completeness gate; both preview
//! endpoints render against the canned sample dataset and persist nothing.

use std::collections::BTreeMap;

use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::response::IntoResponse;
use axum::Json;
use serde::{Deserialize, Serialize};
use validator::Validate;

use lexforge_core::error::CoreError;
use lexforge_core::signature::SignatureField;
use lexforge_core::types::DbId;
use lexforge_db::repositories::TemplateRepo;
use lexforge_pipeline::{CreateTemplateInput, TemplateDraft};

use crate::error::{AppError, AppResult};
use crate::middleware::rbac::RequireFirmAuthor;
use crate::response::DataResponse;
use crate::state::AppState;

/// Request body for POST /api/v1/templates.
#[derive(Debug, Deserialize, Validate)]
pub struct CreateTemplateRequest {
    #[validate(length(min = 1, max = 200))]
    pub name: String,
    #[validate(length(min = 1, max = 100))]
    pub category: String,
    pub html_content: String,
    #[serde(default)]
    pub field_mappings: BTreeMap<String, String>,
    #[serde(default)]
    pub signature_fields: Vec<SignatureField>,
}

/// Request body for POST /api/v1/templates/preview.
#[derive(Debug, Deserialize)]
pub struct PreviewDraftRequest {
    #[serde(default)]
    pub html_content: String,
    #[serde(default)]
    pub field_mappings: BTreeMap<String, String>,
    #[serde(default)]
    pub signature_fields: Vec<SignatureField>,
}

#[derive(Debug, Serialize)]
pub struct CreatedTemplate {
    pub id: DbId,
}

#[derive(Debug, Serialize)]
pub struct TemplatePreview {
    /// Base64-encoded PDF bytes.
    pub pdf_base64: String,
}

/// POST /api/v1/templates
///
/// Create a template. Every `{{placeholder}}` in the body must carry a
/// field mapping; the error names each one that does not.
pub async fn create_template(
    RequireFirmAuthor(user): RequireFirmAuthor,
    State(state): State<AppState>,
    Json(input): Json<CreateTemplateRequest>,
) -> AppResult<impl IntoResponse> {
    input
        .validate()
        .map_err(|e| AppError::BadRequest(e.to_string()))?;

    let id = state
        .pipeline
        .create_template(
            &user.actor(),
            CreateTemplateInput {
                name: input.name,
                category: input.category,
                html_content: input.html_content,
                field_mappings: input.field_mappings,
                signature_fields: input.signature_fields,
            },
        )
        .await?;

    Ok((
        StatusCode::CREATED,
        Json(DataResponse {
            data: CreatedTemplate { id },
        }),
    ))
}

/// GET /api/v1/templates
///
/// List the tenant's templates, newest first.
pub async fn list_templates(
    RequireFirmAuthor(user): RequireFirmAuthor,
    State(state): State<AppState>,
) -> AppResult<impl IntoResponse> {
    let templates = TemplateRepo::list(&state.pool, user.tenant_id).await?;

    Ok(Json(DataResponse { data: templates }))
}

/// GET /api/v1/templates/{id}
pub async fn get_template(
    RequireFirmAuthor(user): RequireFirmAuthor,
    State(state): State<AppState>,
    Path(template_id): Path<DbId>,
) -> AppResult<impl IntoResponse> {
    let template = TemplateRepo::find_by_id(&state.pool, user.tenant_id, template_id)
        .await?
        .ok_or(AppError::Core(CoreError::NotFound { entity: "Template" }))?;

    Ok(Json(DataResponse { data: template }))
}

/// GET /api/v1/templates/{id}/preview
///
/// Render a stored template against the sample dataset. No document is
/// created and no audit entry is written.
pub async fn preview_template(
    RequireFirmAuthor(user): RequireFirmAuthor,
    State(state): State<AppState>,
    Path(template_id): Path<DbId>,
) -> AppResult<impl IntoResponse> {
    let pdf_base64 = state
        .pipeline
        .preview_template(&user.actor(), template_id)
        .await?;

    Ok(Json(DataResponse {
        data: TemplatePreview { pdf_base64 },
    }))
}

/// POST /api/v1/templates/preview
///
/// Render an unsaved draft payload against the sample dataset. Used by
/// the template editor before the template is persisted.
pub async fn preview_draft(
    RequireFirmAuthor(user): RequireFirmAuthor,
    State(state): State<AppState>,
    Json(input): Json<PreviewDraftRequest>,
) -> AppResult<impl IntoResponse> {
    let draft = TemplateDraft {
        html_content: input.html_content,
        field_mappings: input.field_mappings,
        signature_fields: input.signature_fields,
    };
    let pdf_base64 = state.pipeline.preview_draft(&user.actor(), &draft).await?;

    Ok(Json(DataResponse {
        data: TemplatePreview { pdf_base64 },
    }))
}
