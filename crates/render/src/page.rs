//! Print-page construction.
//!
//! The compiled document HTML is wrapped in a fixed 816x1056px page with
//! the 0.5in margin applied as *interior padding* of the content container,
//! never as PDF-engine page margins: overlay coordinates are absolute from
//! the unpadded page origin and must line up 1:1 with the authoring
//! editor's canvas.

use lexforge_core::signature::{PAGE_HEIGHT_PX, PAGE_MARGIN_PX, PAGE_WIDTH_PX};

use crate::SignatureOverlay;

/// Escape text for safe interpolation into HTML attribute/body positions.
fn escape_html(input: &str) -> String {
    let mut out = String::with_capacity(input.len());
    for ch in input.chars() {
        match ch {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#39;"),
            other => out.push(other),
        }
    }
    out
}

/// Inline position style shared by placeholder boxes and signed images.
fn position_style(overlay: &SignatureOverlay) -> String {
    let f = &overlay.field;
    format!(
        "left:{}px;top:{}px;width:{}px;height:{}px;",
        f.x, f.y, f.width, f.height
    )
}

fn overlay_markup(overlay: &SignatureOverlay) -> String {
    match &overlay.image_url {
        // Signed: the image fills the box, decoration removed.
        Some(url) => format!(
            r#"<img class="signature-image" src="{}" alt="{}" style="{}">"#,
            escape_html(url),
            escape_html(&overlay.field.label),
            position_style(overlay),
        ),
        // Unsigned: visually distinct placeholder box with the label.
        None => format!(
            r#"<div class="signature-box" style="{}"><span class="signature-label">{}</span></div>"#,
            position_style(overlay),
            escape_html(&overlay.field.label),
        ),
    }
}

/// Build the complete printable HTML document.
///
/// `body_html` is the compiled template output. Template authors are firm
/// staff, so their markup is embedded as-is; overlays are appended after
/// the content container so they stack above it.
pub fn build_print_page(body_html: &str, overlays: &[SignatureOverlay]) -> String {
    let overlay_html: String = overlays.iter().map(overlay_markup).collect();
    let content_width = PAGE_WIDTH_PX - 2 * PAGE_MARGIN_PX;

    format!(
        r#"<!DOCTYPE html>
<html>
<head>
<meta charset="utf-8">
<style>
  @page {{ size: 8.5in 11in; margin: 0; }}
  html, body {{ margin: 0; padding: 0; }}
  .page {{
    position: relative;
    width: {page_w}px;
    min-height: {page_h}px;
    background: #ffffff;
  }}
  .content {{
    padding: {margin}px;
    width: {content_w}px;
    font-family: Georgia, 'Times New Roman', serif;
    font-size: 14px;
    line-height: 1.6;
    color: #111827;
  }}
  .signature-box {{
    position: absolute;
    box-sizing: border-box;
    border: 2px dashed #2563eb;
    background: rgba(37, 99, 235, 0.08);
    display: flex;
    align-items: center;
    justify-content: center;
  }}
  .signature-label {{
    font-family: Arial, sans-serif;
    font-size: 11px;
    color: #1d4ed8;
  }}
  .signature-image {{
    position: absolute;
    object-fit: contain;
  }}
</style>
</head>
<body>
<div class="page">
<div class="content">{body}</div>
{overlays}</div>
</body>
</html>
"#,
        page_w = PAGE_WIDTH_PX,
        page_h = PAGE_HEIGHT_PX,
        margin = PAGE_MARGIN_PX,
        content_w = content_width,
        body = body_html,
        overlays = overlay_html,
    )
}

#[cfg(test)]
mod tests {
    use lexforge_core::signature::SignatureField;

    use super::*;

    fn field(x: f64, y: f64, width: f64, height: f64) -> SignatureField {
        SignatureField {
            id: "sig-1".into(),
            name: "signature_1".into(),
            label: "Client signature".into(),
            x,
            y,
            width,
            height,
        }
    }

    #[test]
    fn page_uses_letter_canvas_and_interior_padding() {
        let page = build_print_page("<p>hi</p>", &[]);
        assert!(page.contains("size: 8.5in 11in; margin: 0;"));
        assert!(page.contains("width: 816px"));
        assert!(page.contains("min-height: 1056px"));
        assert!(page.contains("padding: 48px"));
        // Content region is the page minus 2 * 48px padding.
        assert!(page.contains("width: 720px"));
    }

    #[test]
    fn body_html_is_embedded_verbatim() {
        let page = build_print_page("<p>Client Jane Doe agrees...</p>", &[]);
        assert!(page.contains("<p>Client Jane Doe agrees...</p>"));
    }

    #[test]
    fn zero_overlays_produce_plain_document() {
        // The style block always defines the classes; no overlay markup
        // means no element carries them.
        let page = build_print_page("<p>plain</p>", &[]);
        assert!(!page.contains(r#"class="signature-box""#));
        assert!(!page.contains(r#"class="signature-image""#));
    }

    #[test]
    fn overlay_is_positioned_at_stored_coordinates() {
        let overlays = [SignatureOverlay::placeholder(field(100.0, 600.0, 200.0, 60.0))];
        let page = build_print_page("<p>x</p>", &overlays);
        assert!(page.contains("left:100px;top:600px;width:200px;height:60px;"));
    }

    #[test]
    fn coordinates_are_independent_of_other_fields() {
        let overlays = [
            SignatureOverlay::placeholder(field(100.0, 600.0, 200.0, 60.0)),
            SignatureOverlay::placeholder(field(50.0, 900.0, 180.0, 40.0)),
        ];
        let page = build_print_page("<p>x</p>", &overlays);
        assert!(page.contains("left:100px;top:600px;width:200px;height:60px;"));
        assert!(page.contains("left:50px;top:900px;width:180px;height:40px;"));
    }

    #[test]
    fn placeholder_box_shows_label() {
        let overlays = [SignatureOverlay::placeholder(field(50.0, 900.0, 180.0, 40.0))];
        let page = build_print_page("<p>x</p>", &overlays);
        assert!(page.contains("Client signature"));
        assert!(page.contains(r#"class="signature-box""#));
    }

    #[test]
    fn signed_overlay_renders_image_without_box() {
        let overlays = [SignatureOverlay {
            field: field(50.0, 900.0, 180.0, 40.0),
            image_url: Some("https://blobs.example/sig.png".into()),
        }];
        let page = build_print_page("<p>x</p>", &overlays);
        assert!(page.contains(r#"src="https://blobs.example/sig.png""#));
        assert!(page.contains(r#"class="signature-image""#));
        assert!(!page.contains(r#"class="signature-box""#));
    }

    #[test]
    fn label_text_is_html_escaped() {
        let mut f = field(0.0, 0.0, 10.0, 10.0);
        f.label = r#"<b>"sign" & date</b>"#.into();
        let page = build_print_page("<p>x</p>", &[SignatureOverlay::placeholder(f)]);
        assert!(page.contains("&lt;b&gt;&quot;sign&quot; &amp; date&lt;/b&gt;"));
    }
}
