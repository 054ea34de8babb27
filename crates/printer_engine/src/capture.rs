//! Live snapshot capture of a rendered view.
use std::sync::Arc;
use std::time::Duration;

use printer_logging::{printer_debug, printer_info};
use scraper::Html;
use tokio::time;

use crate::error::CaptureError;
use crate::frontmatter::render_metadata_block;
use crate::host::{ContentElement, RenderedView};
use crate::stability::{await_quiescence, StabilitySettings};
use crate::types::{FrontMatter, ViewMode};
use crate::view_mode::{with_mode, RefreshPolicy};

pub const PREVIEW_CLASS: &str = "markdown-preview-view";
pub const SIZER_CLASS: &str = "markdown-preview-sizer";

/// Style overrides that let the content root grow to the full document height.
const LAYOUT_OVERRIDES: [(&str, &str); 3] = [
    ("height", "auto"),
    ("overflow", "visible"),
    ("max-height", "none"),
];

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CaptureSettings {
    pub stability: StabilitySettings,
    /// Pause between the two transitions of a forced refresh.
    pub toggle_delay: Duration,
    /// Extra wait after quiescence for work that never shows up as a mutation.
    pub settle_delay: Duration,
    pub force_refresh: bool,
    pub content_class: String,
    pub sizer_class: String,
}

impl Default for CaptureSettings {
    fn default() -> Self {
        Self {
            stability: StabilitySettings::default(),
            toggle_delay: Duration::from_millis(300),
            settle_delay: Duration::from_millis(300),
            force_refresh: true,
            content_class: PREVIEW_CLASS.to_string(),
            sizer_class: SIZER_CLASS.to_string(),
        }
    }
}

impl CaptureSettings {
    fn refresh_policy(&self) -> RefreshPolicy {
        if self.force_refresh {
            RefreshPolicy::ForceRefresh {
                toggle_delay: self.toggle_delay,
            }
        } else {
            RefreshPolicy::Direct
        }
    }
}

/// Per-capture options.
#[derive(Debug, Clone, Default)]
pub struct CaptureOptions {
    /// Front-matter to prepend; `None` disables the metadata block.
    pub metadata: Option<FrontMatter>,
}

/// A detached, immutable HTML fragment ready for styling and printing.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CaptureResult {
    html: Arc<str>,
}

impl CaptureResult {
    pub(crate) fn new(html: String) -> Self {
        Self { html: html.into() }
    }

    pub fn html(&self) -> &str {
        &self.html
    }

    /// Parsed copy for inspection.
    pub fn document(&self) -> Html {
        Html::parse_fragment(&self.html)
    }
}

/// Wraps the content of a capture in a preview container, metadata first.
pub(crate) fn wrap_container(class: &str, metadata: Option<&FrontMatter>, content: &str) -> String {
    let metadata = metadata.and_then(render_metadata_block).unwrap_or_default();
    format!("<div class=\"{class}\">{metadata}{content}</div>")
}

/// Inline styles applied to the live content root; the previous values come back on drop.
struct LayoutOverrides {
    element: Arc<dyn ContentElement>,
    previous: Vec<(&'static str, Option<String>)>,
}

impl LayoutOverrides {
    fn apply(element: Arc<dyn ContentElement>) -> Self {
        let previous = LAYOUT_OVERRIDES
            .iter()
            .map(|(property, value)| {
                let old = element.style(property);
                element.set_style(property, Some(value));
                (*property, old)
            })
            .collect();
        Self { element, previous }
    }
}

impl Drop for LayoutOverrides {
    fn drop(&mut self) {
        for (property, old) in self.previous.drain(..).rev() {
            self.element.set_style(property, old.as_deref());
        }
    }
}

#[derive(Debug, Clone, Default)]
pub struct SnapshotCapturer {
    settings: CaptureSettings,
}

impl SnapshotCapturer {
    pub fn new(settings: CaptureSettings) -> Self {
        Self { settings }
    }

    pub fn settings(&self) -> &CaptureSettings {
        &self.settings
    }

    /// Captures the fully rendered, settled content of `view`.
    ///
    /// `Ok(None)` means the view has no rendered content root to capture.
    pub async fn capture(
        &self,
        view: &dyn RenderedView,
        options: &CaptureOptions,
    ) -> Result<Option<CaptureResult>, CaptureError> {
        let preview = match view
            .content_root()
            .and_then(|root| root.find_by_class(&self.settings.content_class))
        {
            Some(preview) => preview,
            None => {
                printer_info!(
                    "view has no .{} element; nothing to capture",
                    self.settings.content_class
                );
                return Ok(None);
            }
        };

        with_mode(
            view,
            ViewMode::Rendered,
            self.settings.refresh_policy(),
            || self.capture_rendered(preview, options),
        )
        .await
        .map(Some)
    }

    async fn capture_rendered(
        &self,
        preview: Arc<dyn ContentElement>,
        options: &CaptureOptions,
    ) -> Result<CaptureResult, CaptureError> {
        let _overrides = LayoutOverrides::apply(preview.clone());

        await_quiescence(preview.as_ref(), self.settings.stability).await;

        let sizer = preview
            .find_by_class(&self.settings.sizer_class)
            .ok_or_else(|| CaptureError::MissingStructuralElement {
                selector: self.settings.sizer_class.clone(),
            })?;

        time::sleep(self.settings.settle_delay).await;

        let sizer_html = sizer.outer_html();
        printer_debug!("cloned sizer subtree ({} bytes)", sizer_html.len());
        Ok(CaptureResult::new(wrap_container(
            &self.settings.content_class,
            options.metadata.as_ref(),
            &sizer_html,
        )))
    }
}
