//! Role-based access control extractors.
//!
//! These wrap [`AuthUser`] and reject callers whose role does not permit
//! the operation. Use them as handler arguments so the check happens
//! before the handler body runs.

use axum::extract::FromRequestParts;
use axum::http::request::Parts;

use lexforge_core::error::CoreError;
use lexforge_core::roles::is_firm_author;

use crate::error::AppError;
use crate::middleware::auth::AuthUser;
use crate::state::AppState;

/// Requires the caller to hold a firm authoring role (`firm_owner` or
/// `firm_staff`). Clients are rejected with 403.
#[derive(Debug, Clone)]
pub struct RequireFirmAuthor(pub AuthUser);

impl FromRequestParts<AppState> for RequireFirmAuthor {
    type Rejection = AppError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        let user = AuthUser::from_request_parts(parts, state).await?;
        if !is_firm_author(&user.role) {
            return Err(AppError::Core(CoreError::Forbidden(
                "This operation requires a firm role".into(),
            )));
        }
        Ok(RequireFirmAuthor(user))
    }
}

/// Requires any authenticated identity, regardless of role. Signature
/// recording is the main consumer: clients sign their own documents.
#[derive(Debug, Clone)]
pub struct RequireAuth(pub AuthUser);

impl FromRequestParts<AppState> for RequireAuth {
    type Rejection = AppError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        let user = AuthUser::from_request_parts(parts, state).await?;
        Ok(RequireAuth(user))
    }
}
