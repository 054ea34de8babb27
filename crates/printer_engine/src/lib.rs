//! Printer engine: live snapshot capture, synchronous rendering and print dispatch.
mod capture;
mod dispatch;
mod dom;
mod error;
mod folder;
mod frontmatter;
mod host;
mod orchestrator;
mod print;
mod render;
mod stability;
mod styles;
mod theme;
mod types;
mod view_mode;

pub use capture::{
    CaptureOptions, CaptureResult, CaptureSettings, SnapshotCapturer, PREVIEW_CLASS, SIZER_CLASS,
};
pub use dispatch::{document_filename, write_atomically, HtmlFileDispatcher};
pub use dom::MemoryElement;
pub use error::{CaptureError, DispatchError, HostError, RenderError};
pub use folder::{markdown_files, render_folder};
pub use frontmatter::{
    format_value, metadata_lines, parse_front_matter, render_metadata_block, split_front_matter,
    METADATA_CONTAINER_CLASS, METADATA_CONTENT_CLASS,
};
pub use host::{
    ConfirmationPrompt, ContentElement, HostServices, MarkdownRenderer, Notifier, PrintDispatcher,
    RenderedView, SettingsStore, StyleSource, ThemeHost, Vault, Workspace,
};
pub use orchestrator::{PrintOrchestrator, PrintOutcome};
pub use print::{
    PageBreaks, PrintJob, PrintManager, PrintPath, PrintableDocument, ADVANCED_CLASS,
    PAGE_BREAK_CLASS, PRINT_ROOT_CLASS,
};
pub use render::{generate_html, render_markdown, MarkdownRsRenderer, RenderInput, INLINE_TITLE_CLASS};
pub use stability::{await_quiescence, SettledBy, StabilityOutcome, StabilitySettings};
pub use styles::assemble_print_styles;
pub use theme::{MemoryTheme, ThemeGuard};
pub use types::{
    basename, FrontMatter, MutationKind, MutationRecord, SourceIdentity, Theme, VaultEntry,
    ViewMode, UNTITLED,
};
pub use view_mode::{enter_mode, with_mode, ModeRestore, RefreshPolicy};
