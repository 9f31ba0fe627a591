pub mod documents;
pub mod health;
pub mod templates;

use axum::Router;

use crate::state::AppState;

/// Build the `/api/v1` route tree.
///
/// Route hierarchy:
///
/// ```text
/// /templates                     list (GET), create (POST)
/// /templates/preview             preview an unsaved draft (POST)
/// /templates/{id}                get (GET)
/// /templates/{id}/preview        preview against sample data (GET)
///
/// /documents                     list (GET), render (POST)
/// /documents/{id}                get (GET)
/// /documents/{id}/send           rendered -> sent (POST)
/// /documents/{id}/signature      sent -> signed (POST)
/// /documents/{id}/audit          audit history (GET)
/// ```
///
/// All routes require authentication; everything except signature
/// recording additionally requires a firm role.
pub fn api_routes() -> Router<AppState> {
    Router::new()
        .nest("/templates", templates::router())
        .nest("/documents", documents::router())
}
