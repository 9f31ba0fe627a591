//! Route definitions for template management, mounted at `/templates`.

use axum::routing::{get, post};
use axum::Router;

use crate::handlers::templates;
use crate::state::AppState;

/// ```text
/// GET  /                -> list_templates
/// POST /                -> create_template
/// POST /preview         -> preview_draft
/// GET  /{id}            -> get_template
/// GET  /{id}/preview    -> preview_template
/// ```
pub fn router() -> Router<AppState> {
    Router::new()
        .route(
            "/",
            get(templates::list_templates).post(templates::create_template),
        )
        .route("/preview", post(templates::preview_draft))
        .route("/{id}", get(templates::get_template))
        .route("/{id}/preview", get(templates::preview_template))
}
