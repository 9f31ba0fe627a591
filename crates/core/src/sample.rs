//! Canned sample dataset for template preview.
//!
//! Preview resolves against this fixed identity instead of live case data,
//! so authors see realistic output without touching any tenant rows. The
//! values are stable on purpose: previews are reproducible.

use serde_json::{json, Value};

/// The nested source tree preview renders against.
pub fn sample_render_source() -> Value {
    json!({
        "case": {
            "id": "CASE-2025-001",
            "title": "Smith v. State",
            "reference": "2025-CV-001",
            "type": "Civil Litigation",
            "amount": "$50,000",
            "status": "Open",
        },
        "client": {
            "name": "Jane Doe",
            "email": "jane.doe@example.com",
            "phone": "(555) 123-4567",
            "address": "123 Main Street, Springfield, NY",
        },
        "firm": {
            "name": "Aurora Legal Group",
            "email": "hello@auroralegal.com",
            "phone": "(555) 987-6543",
        },
        "assignedUser": {
            "name": "Alex Morgan, Esq.",
            "email": "alex@auroralegal.com",
        },
        "date": "January 15, 2026",
        "amount": "$50,000",
    })
}

#[cfg(test)]
mod tests {
    use std::collections::BTreeMap;

    use super::*;
    use crate::context::resolve_context;

    #[test]
    fn common_paths_resolve_against_sample() {
        let mappings: BTreeMap<String, String> = [
            ("clientName", "client.name"),
            ("firmName", "firm.name"),
            ("caseTitle", "case.title"),
            ("attorney", "assignedUser.name"),
        ]
        .iter()
        .map(|(k, v)| (k.to_string(), v.to_string()))
        .collect();

        let ctx = resolve_context(&mappings, &sample_render_source());
        assert_eq!(ctx["clientName"], "Jane Doe");
        assert_eq!(ctx["firmName"], "Aurora Legal Group");
        assert_eq!(ctx["caseTitle"], "Smith v. State");
        assert_eq!(ctx["attorney"], "Alex Morgan, Esq.");
    }
}
