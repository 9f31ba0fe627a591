//! Headless-Chromium rasterization backend.
//!
//! Each render launches its own browser instance, prints the page over CDP
//! (`Page.printToPDF`), and shuts the instance down on every exit path,
//! including timeout. Concurrent renders therefore never contend on a
//! shared browser.

use std::time::Duration;

use async_trait::async_trait;
use chromiumoxide::browser::{Browser, BrowserConfig};
use chromiumoxide::cdp::browser_protocol::page::PrintToPdfParams;
use futures::StreamExt;

use crate::page::build_print_page;
use crate::{PdfRenderer, RenderError, SignatureOverlay};

/// US Letter paper size in inches, matching the 816x1056px logical canvas.
const PAPER_WIDTH_IN: f64 = 8.5;
const PAPER_HEIGHT_IN: f64 = 11.0;

/// Default rasterization deadline.
const DEFAULT_TIMEOUT_SECS: u64 = 30;

/// Configuration for the Chromium backend.
#[derive(Debug, Clone)]
pub struct ChromiumConfig {
    /// Maximum wall-clock seconds for one render (default: 30). Overrun
    /// is reported as [`RenderError::Timeout`], not an indefinite hang.
    pub timeout_secs: u64,
    /// Explicit Chromium binary path; auto-detected when `None`.
    pub executable: Option<String>,
}

impl Default for ChromiumConfig {
    fn default() -> Self {
        Self {
            timeout_secs: DEFAULT_TIMEOUT_SECS,
            executable: None,
        }
    }
}

impl ChromiumConfig {
    /// Load from environment variables.
    ///
    /// | Env Var               | Default       |
    /// |-----------------------|---------------|
    /// | `RENDER_TIMEOUT_SECS` | `30`          |
    /// | `CHROMIUM_PATH`       | auto-detected |
    pub fn from_env() -> Self {
        let timeout_secs = std::env::var("RENDER_TIMEOUT_SECS")
            .ok()
            .and_then(|v| v.parse().ok())
            .unwrap_or(DEFAULT_TIMEOUT_SECS);
        let executable = std::env::var("CHROMIUM_PATH").ok();
        Self {
            timeout_secs,
            executable,
        }
    }
}

/// Per-render headless Chromium renderer.
#[derive(Debug, Clone)]
pub struct ChromiumRenderer {
    config: ChromiumConfig,
}

impl ChromiumRenderer {
    pub fn new(config: ChromiumConfig) -> Self {
        Self { config }
    }

    fn browser_config(&self) -> Result<BrowserConfig, RenderError> {
        let mut builder = BrowserConfig::builder()
            .arg("--no-sandbox")
            .arg("--disable-dev-shm-usage");
        if let Some(path) = &self.config.executable {
            builder = builder.chrome_executable(path);
        }
        builder.build().map_err(RenderError::Launch)
    }
}

/// Load the page content and print it. Runs under the caller's timeout.
async fn print_page(browser: &Browser, page_html: &str) -> Result<Vec<u8>, RenderError> {
    let page = browser
        .new_page("about:blank")
        .await
        .map_err(|e| RenderError::Navigation(e.to_string()))?;

    page.set_content(page_html)
        .await
        .map_err(|e| RenderError::Navigation(e.to_string()))?;

    // Deterministic completion point: resource loading has settled before
    // rasterization starts.
    page.wait_for_navigation()
        .await
        .map_err(|e| RenderError::Navigation(e.to_string()))?;

    let params = PrintToPdfParams {
        print_background: Some(true),
        paper_width: Some(PAPER_WIDTH_IN),
        paper_height: Some(PAPER_HEIGHT_IN),
        // The 0.5in margin lives inside the page markup as content
        // padding; engine margins must stay zero or overlay coordinates
        // would shift relative to the editor canvas.
        margin_top: Some(0.0),
        margin_bottom: Some(0.0),
        margin_left: Some(0.0),
        margin_right: Some(0.0),
        prefer_css_page_size: Some(true),
        ..Default::default()
    };

    page.pdf(params)
        .await
        .map_err(|e| RenderError::Rasterize(e.to_string()))
}

#[async_trait]
impl PdfRenderer for ChromiumRenderer {
    async fn render(
        &self,
        html: &str,
        overlays: &[SignatureOverlay],
    ) -> Result<Vec<u8>, RenderError> {
        let page_html = build_print_page(html, overlays);

        let (mut browser, mut handler) = Browser::launch(self.browser_config()?)
            .await
            .map_err(|e| RenderError::Launch(e.to_string()))?;

        // CDP message pump; runs until the browser connection closes.
        let event_task = tokio::spawn(async move {
            while let Some(event) = handler.next().await {
                if let Err(err) = event {
                    tracing::debug!(error = %err, "browser event error");
                }
            }
        });

        let deadline = Duration::from_secs(self.config.timeout_secs);
        let result = match tokio::time::timeout(deadline, print_page(&browser, &page_html)).await
        {
            Ok(inner) => inner,
            Err(_) => Err(RenderError::Timeout(self.config.timeout_secs)),
        };

        // Release the instance on success and failure alike.
        if let Err(err) = browser.close().await {
            tracing::warn!(error = %err, "failed to close rendering browser");
        }
        event_task.abort();

        if let Ok(bytes) = &result {
            tracing::debug!(pdf_bytes = bytes.len(), "rasterized document");
        }
        result
    }
}
