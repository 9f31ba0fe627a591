//! Dotted-path resolution of field mappings against a nested data source.
//!
//! The render source is a `serde_json::Value` tree assembled from the case,
//! its tenant, and its assigned user. Resolution soft-fails: a missing or
//! null intermediate resolves the placeholder to the empty string so a
//! client-facing document degrades to a blank instead of erroring out or
//! rendering the literal string "null".

use std::collections::BTreeMap;

use serde_json::Value;

/// The resolved placeholder -> value mapping for one render. Recomputed on
/// every render; never cached.
pub type RenderContext = BTreeMap<String, String>;

/// Walk `source` along `path` (segments separated by `.`).
///
/// Stops early on a null or missing intermediate and returns `None`.
fn lookup_path<'a>(source: &'a Value, path: &str) -> Option<&'a Value> {
    let mut current = source;
    for segment in path.split('.') {
        if current.is_null() {
            return None;
        }
        current = current.get(segment)?;
    }
    Some(current)
}

/// Render a resolved leaf as document text.
///
/// Strings pass through verbatim; numbers and booleans use their canonical
/// display form. Null, objects, and arrays resolve to the empty string --
/// only scalars belong in a document body.
fn scalar_text(value: &Value) -> String {
    match value {
        Value::String(s) => s.clone(),
        Value::Number(n) => n.to_string(),
        Value::Bool(b) => b.to_string(),
        Value::Null | Value::Object(_) | Value::Array(_) => String::new(),
    }
}

/// Resolve every field mapping against the source tree.
///
/// Every mapped placeholder gets an entry in the result, possibly empty.
/// This function never fails: unresolvable paths yield `""`.
pub fn resolve_context(
    field_mappings: &BTreeMap<String, String>,
    source: &Value,
) -> RenderContext {
    field_mappings
        .iter()
        .map(|(placeholder, path)| {
            let text = lookup_path(source, path).map(scalar_text).unwrap_or_default();
            (placeholder.clone(), text)
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;

    fn mappings(pairs: &[(&str, &str)]) -> BTreeMap<String, String> {
        pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect()
    }

    #[test]
    fn resolves_nested_path() {
        let source = json!({ "case": { "client": { "name": "Jane Doe" } } });
        let ctx = resolve_context(&mappings(&[("clientName", "case.client.name")]), &source);
        assert_eq!(ctx["clientName"], "Jane Doe");
    }

    #[test]
    fn null_intermediate_resolves_to_empty_string() {
        let source = json!({ "case": { "client": null } });
        let ctx = resolve_context(&mappings(&[("clientName", "case.client.name")]), &source);
        assert_eq!(ctx["clientName"], "");
    }

    #[test]
    fn missing_intermediate_resolves_to_empty_string() {
        let source = json!({ "case": {} });
        let ctx = resolve_context(&mappings(&[("clientName", "case.client.name")]), &source);
        assert_eq!(ctx["clientName"], "");
    }

    #[test]
    fn null_leaf_resolves_to_empty_string_not_literal_null() {
        let source = json!({ "client": { "name": null } });
        let ctx = resolve_context(&mappings(&[("clientName", "client.name")]), &source);
        assert_eq!(ctx["clientName"], "");
        assert_ne!(ctx["clientName"], "null");
    }

    #[test]
    fn number_and_bool_leaves_are_stringified() {
        let source = json!({ "case": { "amount": 50000, "open": true } });
        let ctx = resolve_context(
            &mappings(&[("amount", "case.amount"), ("open", "case.open")]),
            &source,
        );
        assert_eq!(ctx["amount"], "50000");
        assert_eq!(ctx["open"], "true");
    }

    #[test]
    fn object_leaf_resolves_to_empty_string() {
        let source = json!({ "case": { "client": { "name": "Jane" } } });
        let ctx = resolve_context(&mappings(&[("client", "case.client")]), &source);
        assert_eq!(ctx["client"], "");
    }

    #[test]
    fn every_mapping_gets_an_entry() {
        let source = json!({});
        let ctx = resolve_context(
            &mappings(&[("a", "x.y"), ("b", "p.q.r")]),
            &source,
        );
        assert_eq!(ctx.len(), 2);
        assert_eq!(ctx["a"], "");
        assert_eq!(ctx["b"], "");
    }

    #[test]
    fn top_level_scalar_path() {
        let source = json!({ "date": "January 15, 2026" });
        let ctx = resolve_context(&mappings(&[("date", "date")]), &source);
        assert_eq!(ctx["date"], "January 15, 2026");
    }
}
