//! Case read model used as the render data source.

use serde::Serialize;
use sqlx::FromRow;

use lexforge_core::types::{DbId, Timestamp};

/// A case joined with its tenant and (optional) assigned user, read-only.
/// The repository turns this into the nested source tree the field
/// resolver walks.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct CaseRenderRow {
    pub id: DbId,
    pub tenant_id: DbId,
    pub title: String,
    pub reference: Option<String>,
    pub case_type: Option<String>,
    pub amount: Option<String>,
    pub status: String,
    pub client_name: Option<String>,
    pub client_email: Option<String>,
    pub client_phone: Option<String>,
    pub client_address: Option<String>,
    pub created_at: Timestamp,
    pub tenant_name: String,
    pub tenant_email: Option<String>,
    pub tenant_phone: Option<String>,
    pub assigned_user_name: Option<String>,
    pub assigned_user_email: Option<String>,
}
