//! Template preview: compile and render against the canned sample
//! dataset. Performs no persistence and writes no audit entry -- nothing
//! durable changes.

use std::collections::BTreeMap;

use base64::engine::general_purpose::STANDARD as BASE64;
use base64::Engine as _;

use lexforge_core::compiler::compile;
use lexforge_core::context::resolve_context;
use lexforge_core::error::{CoreError, CoreResult};
use lexforge_core::sample::sample_render_source;
use lexforge_core::signature::SignatureField;
use lexforge_render::{PdfRenderer, SignatureOverlay};

/// A template payload that may not be persisted yet.
#[derive(Debug, Clone)]
pub struct TemplateDraft {
    pub html_content: String,
    pub field_mappings: BTreeMap<String, String>,
    pub signature_fields: Vec<SignatureField>,
}

/// Render a draft to base64 PDF bytes against the sample dataset.
pub async fn preview_draft(
    renderer: &dyn PdfRenderer,
    draft: &TemplateDraft,
) -> CoreResult<String> {
    let context = resolve_context(&draft.field_mappings, &sample_render_source());

    let html = if draft.html_content.trim().is_empty() {
        "<p>(empty template)</p>".to_string()
    } else {
        compile(&draft.html_content, &context)
    };

    let overlays: Vec<SignatureOverlay> = draft
        .signature_fields
        .iter()
        .cloned()
        .map(SignatureOverlay::placeholder)
        .collect();

    let pdf_bytes = renderer
        .render(&html, &overlays)
        .await
        .map_err(|e| CoreError::Render(e.to_string()))?;

    Ok(BASE64.encode(pdf_bytes))
}

#[cfg(test)]
mod tests {
    use async_trait::async_trait;
    use lexforge_render::RenderError;

    use super::*;

    /// Captures the HTML it was asked to render and returns fixed bytes.
    struct CapturingRenderer {
        captured: std::sync::Mutex<Option<(String, usize)>>,
        fail: bool,
    }

    impl CapturingRenderer {
        fn new(fail: bool) -> Self {
            Self {
                captured: std::sync::Mutex::new(None),
                fail,
            }
        }
    }

    #[async_trait]
    impl PdfRenderer for CapturingRenderer {
        async fn render(
            &self,
            html: &str,
            overlays: &[SignatureOverlay],
        ) -> Result<Vec<u8>, RenderError> {
            *self.captured.lock().unwrap() = Some((html.to_string(), overlays.len()));
            if self.fail {
                Err(RenderError::Rasterize("boom".into()))
            } else {
                Ok(b"%PDF-1.7 fake".to_vec())
            }
        }
    }

    fn draft(html: &str, mappings: &[(&str, &str)]) -> TemplateDraft {
        TemplateDraft {
            html_content: html.to_string(),
            field_mappings: mappings
                .iter()
                .map(|(k, v)| (k.to_string(), v.to_string()))
                .collect(),
            signature_fields: vec![],
        }
    }

    #[tokio::test]
    async fn preview_resolves_against_sample_data() {
        let renderer = CapturingRenderer::new(false);
        let d = draft(
            "Client {{clientName}} agrees...",
            &[("clientName", "client.name")],
        );

        let encoded = preview_draft(&renderer, &d).await.unwrap();
        assert_eq!(BASE64.decode(encoded).unwrap(), b"%PDF-1.7 fake");

        let (html, _) = renderer.captured.lock().unwrap().clone().unwrap();
        assert!(html.contains("Client Jane Doe agrees..."));
    }

    #[tokio::test]
    async fn empty_draft_renders_placeholder_body() {
        let renderer = CapturingRenderer::new(false);
        let d = draft("   ", &[]);

        preview_draft(&renderer, &d).await.unwrap();
        let (html, _) = renderer.captured.lock().unwrap().clone().unwrap();
        assert_eq!(html, "<p>(empty template)</p>");
    }

    #[tokio::test]
    async fn signature_fields_become_overlays() {
        let renderer = CapturingRenderer::new(false);
        let mut d = draft("<p>x</p>", &[]);
        d.signature_fields.push(SignatureField {
            id: "sig-1".into(),
            name: "signature_1".into(),
            label: "Sign here".into(),
            x: 50.0,
            y: 900.0,
            width: 180.0,
            height: 40.0,
        });

        preview_draft(&renderer, &d).await.unwrap();
        let (_, overlay_count) = renderer.captured.lock().unwrap().clone().unwrap();
        assert_eq!(overlay_count, 1);
    }

    #[tokio::test]
    async fn renderer_failure_surfaces_as_render_error() {
        let renderer = CapturingRenderer::new(true);
        let err = preview_draft(&renderer, &draft("<p>x</p>", &[]))
            .await
            .unwrap_err();
        assert!(matches!(err, CoreError::Render(_)));
    }
}
