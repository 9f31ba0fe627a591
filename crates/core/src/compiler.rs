//! Template compilation: placeholder substitution against a resolved
//! context.
//!
//! Substitution policy differs deliberately from path resolution: a
//! placeholder with *no entry in the context at all* is an authoring error
//! and stays verbatim in the output so it is visible during preview. A
//! mapped placeholder whose data resolved empty renders as a blank.

use std::sync::OnceLock;

use regex::{Captures, Regex};

use crate::context::RenderContext;

fn token_regex() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| {
        Regex::new(r"\{\{\s*([A-Za-z0-9_]+)\s*\}\}").expect("static regex is valid")
    })
}

/// Substitute every `{{ name }}` token that has an entry in `context`.
///
/// Deterministic and side-effect-free: the same `(html, context)` pair
/// always yields identical output. Tokens absent from the context are left
/// untouched; block markers (`{{#if ...}}` etc.) are not substitution
/// tokens and pass through unchanged.
pub fn compile(html_content: &str, context: &RenderContext) -> String {
    token_regex()
        .replace_all(html_content, |caps: &Captures| {
            let name = &caps[1];
            match context.get(name) {
                Some(value) => value.clone(),
                // Unmapped placeholder: keep the raw token visible.
                None => caps[0].to_string(),
            }
        })
        .into_owned()
}

#[cfg(test)]
mod tests {
    use std::collections::BTreeMap;

    use super::*;

    fn ctx(pairs: &[(&str, &str)]) -> BTreeMap<String, String> {
        pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect()
    }

    #[test]
    fn substitutes_known_placeholders() {
        let out = compile(
            "Client {{clientName}} agrees...",
            &ctx(&[("clientName", "Jane Doe")]),
        );
        assert_eq!(out, "Client Jane Doe agrees...");
    }

    #[test]
    fn substitutes_every_occurrence() {
        let out = compile("{{a}} {{a}} {{ a }}", &ctx(&[("a", "x")]));
        assert_eq!(out, "x x x");
    }

    #[test]
    fn unmapped_placeholder_stays_visible() {
        let out = compile("{{clientName}} vs {{caseRef}}", &ctx(&[("clientName", "Jane")]));
        assert_eq!(out, "Jane vs {{caseRef}}");
    }

    #[test]
    fn mapped_but_empty_value_renders_blank() {
        let out = compile("Name: {{clientName}}.", &ctx(&[("clientName", "")]));
        assert_eq!(out, "Name: .");
    }

    #[test]
    fn block_markers_pass_through() {
        let out = compile("{{#if x}}body{{/if}}", &ctx(&[("x", "1")]));
        assert_eq!(out, "{{#if x}}body{{/if}}");
    }

    #[test]
    fn is_deterministic() {
        let context = ctx(&[("a", "1"), ("b", "2")]);
        let html = "<p>{{a}}-{{b}}-{{c}}</p>";
        assert_eq!(compile(html, &context), compile(html, &context));
    }

    #[test]
    fn empty_template_compiles_to_empty() {
        assert_eq!(compile("", &ctx(&[])), "");
    }
}
