use printer_core::PrintSettings;
use printer_logging::printer_debug;

use crate::capture::CaptureResult;
use crate::error::CaptureError;
use crate::host::{MarkdownRenderer, Vault};
use crate::render::{generate_html, RenderInput};

/// Markdown notes directly inside `folder`, in the vault's listing order.
pub fn markdown_files(vault: &dyn Vault, folder: &str) -> Result<Vec<String>, CaptureError> {
    let files: Vec<String> = vault
        .list_children(folder)?
        .iter()
        .filter_map(|entry| entry.markdown_path())
        .map(str::to_string)
        .collect();
    if files.is_empty() {
        return Err(CaptureError::EmptyFolderSelection {
            folder: folder.to_string(),
        });
    }
    Ok(files)
}

/// Renders every note of `files` independently through the synchronous path.
/// The first failing note aborts the batch.
pub async fn render_folder(
    vault: &dyn Vault,
    renderer: &dyn MarkdownRenderer,
    settings: &PrintSettings,
    files: &[String],
) -> Result<Vec<CaptureResult>, CaptureError> {
    let mut documents = Vec::with_capacity(files.len());
    for file in files {
        printer_debug!("rendering folder note {}", file);
        documents.push(generate_html(vault, renderer, settings, &RenderInput::File(file.clone())).await?);
    }
    Ok(documents)
}
