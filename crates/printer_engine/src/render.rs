//! Synchronous (non-live) rendering used by the basic and standard strategies.
use markdown::{CompileOptions, Constructs, Options, ParseOptions};
use printer_core::PrintSettings;
use printer_logging::printer_debug;

use crate::capture::{wrap_container, CaptureResult, PREVIEW_CLASS, SIZER_CLASS};
use crate::dom::escape_text;
use crate::error::{CaptureError, RenderError};
use crate::host::{MarkdownRenderer, Vault};
use crate::types::basename;

pub const INLINE_TITLE_CLASS: &str = "inline-title";

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RenderInput {
    /// A note in the vault.
    File(String),
    /// Loose text, such as an editor selection. Metadata is taken from
    /// `metadata_path` when given.
    Text {
        text: String,
        metadata_path: Option<String>,
    },
}

/// Renders `input` into a detached preview container:
/// metadata block, then the sizer holding the inline title and the rendered markdown.
pub async fn generate_html(
    vault: &dyn Vault,
    renderer: &dyn MarkdownRenderer,
    settings: &PrintSettings,
    input: &RenderInput,
) -> Result<CaptureResult, CaptureError> {
    let (source, source_path, metadata_path, title) = match input {
        RenderInput::File(path) => (
            vault.read(path).await?,
            path.as_str(),
            Some(path.as_str()),
            settings.print_title.then(|| basename(path)),
        ),
        RenderInput::Text {
            text,
            metadata_path,
        } => (text.clone(), "", metadata_path.as_deref(), None),
    };

    let metadata = if settings.show_metadata {
        metadata_path.and_then(|path| vault.front_matter(path))
    } else {
        None
    };

    let body = renderer.render(&source, source_path).await?;
    printer_debug!(
        "rendered {} ({} bytes of html)",
        if source_path.is_empty() { "text" } else { source_path },
        body.len()
    );

    let title = title
        .map(|title| format!("<h1 class=\"{INLINE_TITLE_CLASS}\">{}</h1>", escape_text(title)))
        .unwrap_or_default();
    let sizer = format!("<div class=\"{SIZER_CLASS}\">{title}{body}</div>");
    Ok(CaptureResult::new(wrap_container(
        PREVIEW_CLASS,
        metadata.as_ref(),
        &sizer,
    )))
}

/// [`MarkdownRenderer`] backed by the `markdown` crate (GFM, front-matter skipped).
#[derive(Debug, Default, Clone, Copy)]
pub struct MarkdownRsRenderer;

#[async_trait::async_trait]
impl MarkdownRenderer for MarkdownRsRenderer {
    async fn render(&self, source: &str, _source_path: &str) -> Result<String, RenderError> {
        render_markdown(source)
    }
}

pub fn render_markdown(source: &str) -> Result<String, RenderError> {
    let options = Options {
        parse: ParseOptions {
            constructs: Constructs {
                frontmatter: true,
                ..Constructs::gfm()
            },
            ..ParseOptions::gfm()
        },
        compile: CompileOptions {
            allow_dangerous_html: true,
            ..CompileOptions::gfm()
        },
    };
    markdown::to_html_with_options(source, &options).map_err(|err| RenderError(err.to_string()))
}
