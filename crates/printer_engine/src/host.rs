//! Interfaces the print engine consumes from the host application.
//!
//! The engine never reaches into a concrete host; everything it needs (views, the
//! vault, the markdown renderer, the theme, printing) comes through these traits.
use std::sync::Arc;

use printer_core::{ConfirmationView, DialogEvent, HeadingPalette, PrintSettings};
use tokio::sync::broadcast;

use crate::error::{DispatchError, HostError, RenderError};
use crate::print::PrintableDocument;
use crate::types::{FrontMatter, MutationRecord, SourceIdentity, Theme, VaultEntry, ViewMode};

/// A live element of the host's document tree.
pub trait ContentElement: Send + Sync {
    /// First descendant (or self) carrying `class`.
    fn find_by_class(&self, class: &str) -> Option<Arc<dyn ContentElement>>;

    /// Subscribes to mutations of this element and all of its descendants.
    /// Dropping the receiver disconnects the observer.
    fn observe(&self) -> broadcast::Receiver<MutationRecord>;

    fn style(&self, property: &str) -> Option<String>;

    /// Sets an inline style property; `None` removes it.
    fn set_style(&self, property: &str, value: Option<&str>);

    /// Serialized copy of the element and its subtree.
    fn outer_html(&self) -> String;
}

/// A note view managed by the host.
#[async_trait::async_trait]
pub trait RenderedView: Send + Sync {
    fn mode(&self) -> ViewMode;

    async fn set_mode(&self, mode: ViewMode) -> Result<(), HostError>;

    /// Asks the host to rebuild the view's backing surface.
    fn rebuild(&self);

    /// Root of the rendered output, if the host has created one.
    fn content_root(&self) -> Option<Arc<dyn ContentElement>>;

    fn source(&self) -> SourceIdentity;

    async fn save(&self) -> Result<(), HostError>;

    /// Current editor selection; `None` when nothing is selected.
    fn selection(&self) -> Option<String>;
}

pub trait Workspace: Send + Sync {
    fn active_view(&self) -> Option<Arc<dyn RenderedView>>;

    /// Vault path of the active note.
    fn active_file(&self) -> Option<String>;
}

#[async_trait::async_trait]
pub trait Vault: Send + Sync {
    async fn read(&self, path: &str) -> Result<String, HostError>;

    fn front_matter(&self, path: &str) -> Option<FrontMatter>;

    /// Direct children of a folder, in the host's listing order.
    fn list_children(&self, folder: &str) -> Result<Vec<VaultEntry>, HostError>;

    fn parent_folder(&self, path: &str) -> Option<String>;
}

/// Turns markdown into HTML outside of any live view.
#[async_trait::async_trait]
pub trait MarkdownRenderer: Send + Sync {
    async fn render(&self, source: &str, source_path: &str) -> Result<String, RenderError>;
}

pub trait ThemeHost: Send + Sync {
    fn theme(&self) -> Theme;

    fn set_theme(&self, theme: Theme);

    /// Heading colors of the current theme, used to seed first-run settings.
    fn heading_palette(&self) -> Option<HeadingPalette> {
        None
    }
}

pub trait StyleSource: Send + Sync {
    /// The plugin's own stylesheet; `None` when it could not be located.
    fn plugin_stylesheet(&self) -> Option<String>;

    /// The user's print snippet, only when it exists and is enabled.
    fn print_snippet(&self) -> Option<String>;
}

#[async_trait::async_trait]
pub trait PrintDispatcher: Send + Sync {
    async fn dispatch(&self, document: PrintableDocument) -> Result<(), DispatchError>;
}

pub trait Notifier: Send + Sync {
    fn notice(&self, message: &str);
}

/// The interactive advanced/standard/cancel decision.
#[async_trait::async_trait]
pub trait ConfirmationPrompt: Send + Sync {
    /// Waits for the next interaction with the dialog described by `view`.
    async fn next_event(&self, view: ConfirmationView) -> DialogEvent;
}

pub trait SettingsStore: Send + Sync {
    /// `Ok(None)` when nothing has been stored yet. An error means stored settings
    /// exist but cannot be used, and must not be overwritten.
    fn load(&self) -> Result<Option<PrintSettings>, HostError>;

    fn save(&self, settings: &PrintSettings) -> Result<(), HostError>;
}

/// Every host collaborator the orchestrator talks to.
#[derive(Clone)]
pub struct HostServices {
    pub workspace: Arc<dyn Workspace>,
    pub vault: Arc<dyn Vault>,
    pub renderer: Arc<dyn MarkdownRenderer>,
    pub theme: Arc<dyn ThemeHost>,
    pub styles: Arc<dyn StyleSource>,
    pub printer: Arc<dyn PrintDispatcher>,
    pub notifier: Arc<dyn Notifier>,
    pub prompt: Arc<dyn ConfirmationPrompt>,
    pub settings: Arc<dyn SettingsStore>,
}
