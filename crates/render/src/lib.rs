//! PDF rasterization for rendered document HTML.
//!
//! [`page`] builds the fixed-size print page (US Letter, 816x1056 logical
//! pixels) with signature overlays positioned absolutely in the same
//! coordinate space the authoring editor uses. [`chromium`] rasterizes
//! that page to PDF bytes through a headless Chromium instance acquired
//! per render and released on every exit path.

pub mod chromium;
pub mod page;

use async_trait::async_trait;
use lexforge_core::signature::SignatureField;

/// A signature field paired with its render-time state. A field carrying
/// an image reference renders as the embedded image; otherwise it renders
/// as the dashed placeholder box.
#[derive(Debug, Clone)]
pub struct SignatureOverlay {
    pub field: SignatureField,
    pub image_url: Option<String>,
}

impl SignatureOverlay {
    /// A plain, unsigned placeholder overlay.
    pub fn placeholder(field: SignatureField) -> Self {
        Self {
            field,
            image_url: None,
        }
    }
}

/// Errors from the rasterization backend.
#[derive(Debug, thiserror::Error)]
pub enum RenderError {
    /// The browser process could not be launched or connected to.
    #[error("failed to launch rendering browser: {0}")]
    Launch(String),

    /// Loading the page content failed.
    #[error("failed to load document content: {0}")]
    Navigation(String),

    /// The print-to-PDF call itself failed.
    #[error("failed to rasterize PDF: {0}")]
    Rasterize(String),

    /// Rasterization exceeded the configured deadline. The browser
    /// instance is still released.
    #[error("rendering timed out after {0} seconds")]
    Timeout(u64),
}

/// Rasterizes compiled document HTML plus signature overlays into a
/// binary PDF. Implementations acquire their own rendering resources per
/// call; concurrent renders never share an instance.
#[async_trait]
pub trait PdfRenderer: Send + Sync {
    async fn render(
        &self,
        html: &str,
        overlays: &[SignatureOverlay],
    ) -> Result<Vec<u8>, RenderError>;
}
