//! Handlers for document rendering, lifecycle transitions, and the audit
//! trail.
//!
//! Rendering and sending require a firm role; signature recording accepts
//! any authenticated identity because the signer is often the client.

use axum::extract::{Path, Query, State};
use axum::http::StatusCode;
use axum::response::IntoResponse;
use axum::Json;
use serde::{Deserialize, Serialize};
use validator::Validate;

use lexforge_core::error::CoreError;
use lexforge_core::types::DbId;
use lexforge_db::repositories::{DocumentAuditLogRepo, DocumentRepo};
use lexforge_pipeline::RenderDocumentInput;

use crate::error::{AppError, AppResult};
use crate::middleware::rbac::{RequireAuth, RequireFirmAuthor};
use crate::response::DataResponse;
use crate::state::AppState;

/// Request body for POST /api/v1/documents.
#[derive(Debug, Deserialize, Validate)]
pub struct RenderDocumentRequest {
    pub template_id: DbId,
    pub case_id: DbId,
    #[validate(email)]
    pub recipient_email: String,
    pub recipient_name: Option<String>,
    pub recipient_type: String,
}

/// Query parameters for GET /api/v1/documents.
#[derive(Debug, Deserialize)]
pub struct ListDocumentsParams {
    pub case_id: Option<DbId>,
}

/// Request body for POST /api/v1/documents/{id}/send.
#[derive(Debug, Deserialize, Validate)]
pub struct SendDocumentRequest {
    /// Delivery channel, e.g. `email` or `portal`.
    #[validate(length(min = 1, max = 50))]
    pub sent_via: String,
}

/// Request body for POST /api/v1/documents/{id}/signature.
#[derive(Debug, Deserialize, Validate)]
pub struct RecordSignatureRequest {
    /// Who signed: a name or email, recorded verbatim.
    #[validate(length(min = 1, max = 200))]
    pub signed_by: String,
    /// Optional reference to a signature image.
    pub signature_url: Option<String>,
}

#[derive(Debug, Serialize)]
pub struct RenderedDocument {
    pub document_id: DbId,
    pub pdf_url: String,
}

#[derive(Debug, Serialize)]
pub struct TransitionOutcome {
    pub document_id: DbId,
    pub status: &'static str,
}

/// POST /api/v1/documents
///
/// Render a document from a template against a case. Returns the new
/// document's id and its PDF URL.
pub async fn render_document(
    RequireFirmAuthor(user): RequireFirmAuthor,
    State(state): State<AppState>,
    Json(input): Json<RenderDocumentRequest>,
) -> AppResult<impl IntoResponse> {
    input
        .validate()
        .map_err(|e| AppError::BadRequest(e.to_string()))?;

    let outcome = state
        .pipeline
        .render_document(
            &user.actor(),
            RenderDocumentInput {
                template_id: input.template_id,
                case_id: input.case_id,
                recipient_email: input.recipient_email,
                recipient_name: input.recipient_name,
                recipient_type: input.recipient_type,
            },
        )
        .await?;

    Ok((
        StatusCode::CREATED,
        Json(DataResponse {
            data: RenderedDocument {
                document_id: outcome.document_id,
                pdf_url: outcome.pdf_url,
            },
        }),
    ))
}

/// GET /api/v1/documents?case_id=...
///
/// List the tenant's documents, optionally scoped to one case.
pub async fn list_documents(
    RequireFirmAuthor(user): RequireFirmAuthor,
    State(state): State<AppState>,
    Query(params): Query<ListDocumentsParams>,
) -> AppResult<impl IntoResponse> {
    let documents = DocumentRepo::list(&state.pool, user.tenant_id, params.case_id).await?;

    Ok(Json(DataResponse { data: documents }))
}

/// GET /api/v1/documents/{id}
///
/// Fetch one document. The rendered HTML and the encrypted substituted
/// values never serialize into the response.
pub async fn get_document(
    RequireFirmAuthor(user): RequireFirmAuthor,
    State(state): State<AppState>,
    Path(document_id): Path<DbId>,
) -> AppResult<impl IntoResponse> {
    let document = DocumentRepo::find_by_id(&state.pool, user.tenant_id, document_id)
        .await?
        .ok_or(AppError::Core(CoreError::NotFound { entity: "Document" }))?;

    Ok(Json(DataResponse { data: document }))
}

/// POST /api/v1/documents/{id}/send
///
/// Transition `rendered -> sent`. An out-of-order call reports a
/// conflict, never a silent success.
pub async fn send_document(
    RequireFirmAuthor(user): RequireFirmAuthor,
    State(state): State<AppState>,
    Path(document_id): Path<DbId>,
    Json(input): Json<SendDocumentRequest>,
) -> AppResult<impl IntoResponse> {
    input
        .validate()
        .map_err(|e| AppError::BadRequest(e.to_string()))?;

    state
        .pipeline
        .mark_sent(&user.actor(), document_id, &input.sent_via)
        .await?;

    Ok(Json(DataResponse {
        data: TransitionOutcome {
            document_id,
            status: "sent",
        },
    }))
}

/// POST /api/v1/documents/{id}/signature
///
/// Transition `sent -> signed`. Any authenticated identity may record a
/// signature; the document must currently be `sent`.
pub async fn record_signature(
    RequireAuth(user): RequireAuth,
    State(state): State<AppState>,
    Path(document_id): Path<DbId>,
    Json(input): Json<RecordSignatureRequest>,
) -> AppResult<impl IntoResponse> {
    input
        .validate()
        .map_err(|e| AppError::BadRequest(e.to_string()))?;

    state
        .pipeline
        .record_signature(
            &user.actor(),
            document_id,
            &input.signed_by,
            input.signature_url.as_deref(),
        )
        .await?;

    Ok(Json(DataResponse {
        data: TransitionOutcome {
            document_id,
            status: "signed",
        },
    }))
}

/// GET /api/v1/documents/{id}/audit
///
/// The document's full audit history in insertion order. Details carry
/// field names and structure only, never substituted values.
pub async fn get_audit_trail(
    RequireFirmAuthor(user): RequireFirmAuthor,
    State(state): State<AppState>,
    Path(document_id): Path<DbId>,
) -> AppResult<impl IntoResponse> {
    // Distinguish an unknown document from one with no history yet.
    DocumentRepo::find_status(&state.pool, user.tenant_id, document_id)
        .await?
        .ok_or(AppError::Core(CoreError::NotFound { entity: "Document" }))?;

    let entries =
        DocumentAuditLogRepo::list_for_document(&state.pool, user.tenant_id, document_id).await?;

    Ok(Json(DataResponse { data: entries }))
}
