//! Read-only repository over cases, used to assemble the render source.

use serde_json::{json, Value};
use sqlx::PgPool;

use lexforge_core::types::DbId;

use crate::models::case::CaseRenderRow;

/// Read-only access to cases for the render pipeline.
pub struct CaseRepo;

impl CaseRepo {
    /// Fetch a case (tenant-scoped) joined with its firm and assigned
    /// user.
    pub async fn find_render_row(
        pool: &PgPool,
        tenant_id: DbId,
        case_id: DbId,
    ) -> Result<Option<CaseRenderRow>, sqlx::Error> {
        sqlx::query_as::<_, CaseRenderRow>(
            "SELECT c.id, c.tenant_id, c.title, c.reference, c.case_type, c.amount, \
                    c.status, c.client_name, c.client_email, c.client_phone, \
                    c.client_address, c.created_at, \
                    t.name AS tenant_name, t.email AS tenant_email, t.phone AS tenant_phone, \
                    u.name AS assigned_user_name, u.email AS assigned_user_email \
             FROM cases c \
             JOIN tenants t ON t.id = c.tenant_id \
             LEFT JOIN users u ON u.id = c.assigned_user_id \
             WHERE c.id = $1 AND c.tenant_id = $2",
        )
        .bind(case_id)
        .bind(tenant_id)
        .fetch_optional(pool)
        .await
    }

    /// Build the nested source tree the field resolver walks.
    ///
    /// Shape mirrors the canned preview dataset: `case`, `client`, `firm`,
    /// `assignedUser`, `date`. A case with no assigned user gets a null
    /// `assignedUser` subtree, which path resolution soft-fails through.
    pub fn render_source(row: &CaseRenderRow) -> Value {
        let assigned_user = match &row.assigned_user_name {
            Some(name) => json!({
                "name": name,
                "email": row.assigned_user_email,
            }),
            None => Value::Null,
        };

        json!({
            "case": {
                "id": row.id,
                "title": row.title,
                "reference": row.reference,
                "type": row.case_type,
                "amount": row.amount,
                "status": row.status,
            },
            "client": {
                "name": row.client_name,
                "email": row.client_email,
                "phone": row.client_phone,
                "address": row.client_address,
            },
            "firm": {
                "name": row.tenant_name,
                "email": row.tenant_email,
                "phone": row.tenant_phone,
            },
            "assignedUser": assigned_user,
            "date": chrono::Utc::now().format("%B %-d, %Y").to_string(),
            "amount": row.amount,
        })
    }
}

#[cfg(test)]
mod tests {
    use std::collections::BTreeMap;

    use lexforge_core::context::resolve_context;

    use super::*;

    fn sample_row(assigned: bool) -> CaseRenderRow {
        CaseRenderRow {
            id: uuid::Uuid::nil(),
            tenant_id: uuid::Uuid::nil(),
            title: "Smith v. State".into(),
            reference: Some("2025-CV-001".into()),
            case_type: Some("Civil Litigation".into()),
            amount: Some("$50,000".into()),
            status: "open".into(),
            client_name: Some("Jane Doe".into()),
            client_email: Some("jane.doe@example.com".into()),
            client_phone: None,
            client_address: None,
            created_at: chrono::Utc::now(),
            tenant_name: "Aurora Legal Group".into(),
            tenant_email: Some("hello@auroralegal.com".into()),
            tenant_phone: None,
            assigned_user_name: assigned.then(|| "Alex Morgan, Esq.".into()),
            assigned_user_email: assigned.then(|| "alex@auroralegal.com".into()),
        }
    }

    fn mappings(pairs: &[(&str, &str)]) -> BTreeMap<String, String> {
        pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect()
    }

    #[test]
    fn source_tree_resolves_expected_paths() {
        let source = CaseRepo::render_source(&sample_row(true));
        let ctx = resolve_context(
            &mappings(&[
                ("clientName", "client.name"),
                ("firmName", "firm.name"),
                ("caseTitle", "case.title"),
                ("attorney", "assignedUser.name"),
            ]),
            &source,
        );
        assert_eq!(ctx["clientName"], "Jane Doe");
        assert_eq!(ctx["firmName"], "Aurora Legal Group");
        assert_eq!(ctx["caseTitle"], "Smith v. State");
        assert_eq!(ctx["attorney"], "Alex Morgan, Esq.");
    }

    #[test]
    fn missing_assigned_user_soft_fails_to_blank() {
        let source = CaseRepo::render_source(&sample_row(false));
        let ctx = resolve_context(&mappings(&[("attorney", "assignedUser.name")]), &source);
        assert_eq!(ctx["attorney"], "");
    }
}
