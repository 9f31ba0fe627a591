//! Template placeholder extraction, slug derivation, and the
//! mapping-completeness gate that runs at template creation time.

use std::collections::BTreeSet;
use std::sync::OnceLock;

use regex::Regex;

use crate::error::{CoreError, CoreResult};

/// Control keywords of the template language. These appear in block
/// openers (`{{#if ...}}`) and are not data fields.
const RESERVED: &[&str] = &["if", "each", "with", "unless", "else"];

fn placeholder_regex() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    // Matches `{{name}}` and block openers `{{#name ...}}`; the identifier
    // is alphanumeric + underscore. Malformed markup simply yields no
    // matches -- extraction never fails.
    RE.get_or_init(|| Regex::new(r"\{\{#?\s*([A-Za-z0-9_]+)").expect("static regex is valid"))
}

/// Extract the set of data-field identifiers a template consumes.
///
/// Reserved control keywords are excluded. The result is de-duplicated and
/// ordered (BTreeSet) so validation error messages are stable.
pub fn extract_placeholders(template_source: &str) -> BTreeSet<String> {
    placeholder_regex()
        .captures_iter(template_source)
        .map(|cap| cap[1].to_string())
        .filter(|ident| !RESERVED.contains(&ident.as_str()))
        .collect()
}

/// Derive a URL-safe slug from a template name: lowercased, whitespace
/// replaced with `-`, everything outside `[a-z0-9-]` stripped.
///
/// Slugs are unique per tenant; uniqueness is enforced by the repository.
pub fn slugify(name: &str) -> String {
    let lowered = name.to_lowercase();
    let mut slug = String::with_capacity(lowered.len());
    let mut last_was_hyphen = false;
    for ch in lowered.chars() {
        if ch.is_whitespace() {
            if !last_was_hyphen {
                slug.push('-');
                last_was_hyphen = true;
            }
        } else if ch.is_ascii_lowercase() || ch.is_ascii_digit() || ch == '-' {
            slug.push(ch);
            last_was_hyphen = ch == '-';
        }
        // Any other character is dropped.
    }
    slug
}

/// The creation-time validation gate: every placeholder the template
/// references must have a data-path mapping.
///
/// Returns the required field set on success. On failure the error names
/// every unmapped placeholder so the author can fix them all at once.
pub fn validate_field_mappings(
    html_content: &str,
    field_mappings: &std::collections::BTreeMap<String, String>,
) -> CoreResult<BTreeSet<String>> {
    let required = extract_placeholders(html_content);

    let missing: Vec<&str> = required
        .iter()
        .filter(|field| !field_mappings.contains_key(*field))
        .map(String::as_str)
        .collect();

    if !missing.is_empty() {
        return Err(CoreError::Validation(format!(
            "Missing field mappings for: {}",
            missing.join(", ")
        )));
    }

    Ok(required)
}

#[cfg(test)]
mod tests {
    use std::collections::BTreeMap;

    use assert_matches::assert_matches;

    use super::*;
    use crate::error::CoreError;

    fn mappings(pairs: &[(&str, &str)]) -> BTreeMap<String, String> {
        pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect()
    }

    // -----------------------------------------------------------------------
    // extract_placeholders
    // -----------------------------------------------------------------------

    #[test]
    fn extracts_simple_placeholders() {
        let fields = extract_placeholders("Hello {{name}}, case {{caseRef}}");
        assert_eq!(fields.len(), 2);
        assert!(fields.contains("name"));
        assert!(fields.contains("caseRef"));
    }

    #[test]
    fn deduplicates_repeated_placeholders() {
        let fields = extract_placeholders("{{name}} and {{name}} and {{ name }}");
        assert_eq!(fields.len(), 1);
    }

    #[test]
    fn excludes_reserved_block_keywords() {
        let fields = extract_placeholders("{{#if hasClient}}{{clientName}}{{else}}none{{/if}}");
        assert!(!fields.contains("if"));
        assert!(!fields.contains("else"));
        // Only the leading identifier of each token is scanned; a block
        // opener's argument is not a data field.
        assert!(!fields.contains("hasClient"));
        assert!(fields.contains("clientName"));
    }

    #[test]
    fn malformed_markup_yields_empty_set() {
        assert!(extract_placeholders("{{").is_empty());
        assert!(extract_placeholders("no placeholders here").is_empty());
        assert!(extract_placeholders("").is_empty());
    }

    #[test]
    fn tolerates_whitespace_inside_braces() {
        let fields = extract_placeholders("{{  clientName  }}");
        assert!(fields.contains("clientName"));
    }

    // -----------------------------------------------------------------------
    // slugify
    // -----------------------------------------------------------------------

    #[test]
    fn slug_lowercases_and_hyphenates() {
        assert_eq!(slugify("Retainer Agreement"), "retainer-agreement");
    }

    #[test]
    fn slug_strips_non_alphanumerics() {
        assert_eq!(slugify("NDA (v2.1)!"), "nda-v21");
    }

    #[test]
    fn slug_collapses_consecutive_whitespace() {
        assert_eq!(slugify("a   b"), "a-b");
    }

    // -----------------------------------------------------------------------
    // validate_field_mappings
    // -----------------------------------------------------------------------

    #[test]
    fn accepts_fully_mapped_template() {
        let result = validate_field_mappings(
            "Client {{clientName}} agrees...",
            &mappings(&[("clientName", "client.name")]),
        );
        let required = result.unwrap();
        assert_eq!(required.len(), 1);
        assert!(required.contains("clientName"));
    }

    #[test]
    fn rejects_and_names_every_missing_mapping() {
        let err = validate_field_mappings(
            "{{clientName}} and {{caseRef}} and {{firmName}}",
            &mappings(&[("clientName", "client.name")]),
        )
        .unwrap_err();

        assert_matches!(err, CoreError::Validation(msg) => {
            assert!(msg.contains("caseRef"), "should name caseRef: {msg}");
            assert!(msg.contains("firmName"), "should name firmName: {msg}");
            assert!(!msg.contains("clientName"), "clientName is mapped: {msg}");
        });
    }

    #[test]
    fn template_without_placeholders_needs_no_mappings() {
        let required = validate_field_mappings("<p>static text</p>", &mappings(&[])).unwrap();
        assert!(required.is_empty());
    }
}
