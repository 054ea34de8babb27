//! A note view that renders like a live editor preview: switching to rendered mode
//! rebuilds the preview block by block in the background.
use std::sync::{Arc, Mutex, PoisonError};
use std::time::Duration;

use printer_engine::{
    basename, render_markdown, split_front_matter, ContentElement, HostError, MemoryElement,
    RenderedView, SourceIdentity, ViewMode, INLINE_TITLE_CLASS, PREVIEW_CLASS, SIZER_CLASS,
};
use printer_logging::{printer_debug, printer_warn};
use tokio::task::JoinHandle;

/// Delay between two rendered blocks.
const BLOCK_DELAY: Duration = Duration::from_millis(120);

pub(crate) struct SimulatedView {
    path: String,
    markdown: String,
    selection: Option<String>,
    mode: Mutex<ViewMode>,
    root: MemoryElement,
    sizer: MemoryElement,
    renderer: Mutex<Option<JoinHandle<()>>>,
    block_delay: Duration,
}

impl SimulatedView {
    pub(crate) fn new(path: &str, markdown: String) -> Self {
        let root = MemoryElement::with_class("div", "view-content");
        let preview = MemoryElement::with_class("div", PREVIEW_CLASS);
        let sizer = MemoryElement::with_class("div", SIZER_CLASS);
        preview.append_child(&sizer);
        root.append_child(&preview);
        Self {
            path: path.to_string(),
            markdown,
            selection: None,
            mode: Mutex::new(ViewMode::Edit),
            root,
            sizer,
            renderer: Mutex::new(None),
            block_delay: BLOCK_DELAY,
        }
    }

    pub(crate) fn with_selection(mut self, selection: String) -> Self {
        self.selection = Some(selection);
        self
    }

    #[cfg(test)]
    fn with_block_delay(mut self, delay: Duration) -> Self {
        self.block_delay = delay;
        self
    }

    /// Clears the preview and starts rendering it again, cancelling any render still
    /// in progress.
    fn start_render(&self) {
        let mut renderer = self.renderer.lock().unwrap_or_else(PoisonError::into_inner);
        if let Some(previous) = renderer.take() {
            previous.abort();
        }
        self.sizer.clear();

        let sizer = self.sizer.clone();
        let title = basename(&self.path).to_string();
        let blocks = markdown_blocks(split_front_matter(&self.markdown).1);
        let delay = self.block_delay;
        *renderer = Some(tokio::spawn(async move {
            let heading = MemoryElement::with_class("h1", INLINE_TITLE_CLASS);
            heading.append_text(&title);
            sizer.append_child(&heading);
            for block in blocks {
                tokio::time::sleep(delay).await;
                match render_markdown(&block) {
                    Ok(html) => sizer.append_html(&html),
                    Err(err) => printer_warn!("block failed to render: {}", err),
                }
            }
            printer_debug!("preview render finished");
        }));
    }
}

impl Drop for SimulatedView {
    fn drop(&mut self) {
        let renderer = self.renderer.get_mut().unwrap_or_else(PoisonError::into_inner);
        if let Some(handle) = renderer.take() {
            handle.abort();
        }
    }
}

#[async_trait::async_trait]
impl RenderedView for SimulatedView {
    fn mode(&self) -> ViewMode {
        *self.mode.lock().unwrap_or_else(PoisonError::into_inner)
    }

    async fn set_mode(&self, mode: ViewMode) -> Result<(), HostError> {
        let previous = std::mem::replace(
            &mut *self.mode.lock().unwrap_or_else(PoisonError::into_inner),
            mode,
        );
        printer_debug!("view mode {} -> {}", previous, mode);
        if mode == ViewMode::Rendered {
            self.start_render();
        }
        Ok(())
    }

    fn rebuild(&self) {
        printer_debug!("view rebuilt");
    }

    fn content_root(&self) -> Option<Arc<dyn ContentElement>> {
        Some(Arc::new(self.root.clone()))
    }

    fn source(&self) -> SourceIdentity {
        SourceIdentity::File(self.path.clone())
    }

    async fn save(&self) -> Result<(), HostError> {
        // Notes are read straight from disk; there are no unsaved edits.
        Ok(())
    }

    fn selection(&self) -> Option<String> {
        self.selection.clone()
    }
}

/// Splits markdown at blank lines, keeping fenced code blocks whole.
fn markdown_blocks(markdown: &str) -> Vec<String> {
    let mut blocks = Vec::new();
    let mut current: Vec<&str> = Vec::new();
    let mut in_fence = false;
    for line in markdown.lines() {
        if line.trim_start().starts_with("```") {
            in_fence = !in_fence;
        }
        if line.trim().is_empty() && !in_fence {
            if !current.is_empty() {
                blocks.push(current.join("\n"));
                current.clear();
            }
            continue;
        }
        current.push(line);
    }
    if !current.is_empty() {
        blocks.push(current.join("\n"));
    }
    blocks
}

#[cfg(test)]
mod tests {
    use std::time::Duration;

    use pretty_assertions::assert_eq;
    use printer_engine::{
        CaptureOptions, CaptureSettings, RenderedView, SnapshotCapturer, ViewMode,
    };

    use super::{markdown_blocks, SimulatedView};

    #[test]
    fn blocks_split_on_blank_lines_outside_fences() {
        let blocks = markdown_blocks("# T\n\npara\nmore\n\n```\na\n\nb\n```\n");
        assert_eq!(blocks, vec!["# T", "para\nmore", "```\na\n\nb\n```"]);
    }

    #[tokio::test(start_paused = true)]
    async fn capture_waits_for_every_block() {
        let markdown = "---\ntags: [a]\n---\n# One\n\ntwo\n\nthree\n".to_string();
        let view =
            SimulatedView::new("notes/demo.md", markdown).with_block_delay(Duration::from_millis(400));

        let capture = SnapshotCapturer::new(CaptureSettings::default())
            .capture(&view, &CaptureOptions::default())
            .await
            .unwrap()
            .unwrap();

        let html = capture.html();
        assert!(html.contains("<h1 class=\"inline-title\">demo</h1>"));
        assert!(html.contains("<h1>One</h1>"));
        assert!(html.contains("<p>two</p>"));
        assert!(html.contains("<p>three</p>"));
        assert!(!html.contains("tags"));
        assert_eq!(view.mode(), ViewMode::Edit);
    }
}
