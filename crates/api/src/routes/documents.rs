//! Route definitions for the document lifecycle, mounted at `/documents`.

use axum::routing::{get, post};
use axum::Router;

use crate::handlers::documents;
use crate::state::AppState;

/// ```text
/// GET  /                 -> list_documents
/// POST /                 -> render_document
/// GET  /{id}             -> get_document
/// POST /{id}/send        -> send_document
/// POST /{id}/signature   -> record_signature
/// GET  /{id}/audit       -> get_audit_trail
/// ```
pub fn router() -> Router<AppState> {
    Router::new()
        .route(
            "/",
            get(documents::list_documents).post(documents::render_document),
        )
        .route("/{id}", get(documents::get_document))
        .route("/{id}/send", post(documents::send_document))
        .route("/{id}/signature", post(documents::record_signature))
        .route("/{id}/audit", get(documents::get_audit_trail))
}
