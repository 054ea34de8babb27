#![allow(dead_code)]

use std::collections::VecDeque;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex, Once};
use std::time::Duration;

use printer_core::{ConfirmationView, DialogEvent, PrintSettings};
use printer_engine::{
    parse_front_matter, CaptureSettings, ConfirmationPrompt, ContentElement, DispatchError,
    FrontMatter, HostError, HostServices, MarkdownRenderer, MarkdownRsRenderer, MemoryElement,
    MemoryTheme, Notifier, PrintDispatcher, PrintOrchestrator, PrintableDocument, RenderError,
    RenderedView, SettingsStore, SourceIdentity, StyleSource, Theme, Vault, VaultEntry, ViewMode,
    Workspace, PREVIEW_CLASS, SIZER_CLASS,
};

pub fn init_logging() {
    static INIT: Once = Once::new();
    INIT.call_once(printer_logging::initialize_for_tests);
}

/// Host view whose rendered output is produced block by block after switching to
/// rendered mode, like a host rendering widgets in the background.
pub struct FakeView {
    mode: Mutex<ViewMode>,
    pub transitions: Mutex<Vec<ViewMode>>,
    pub rebuilds: AtomicUsize,
    pub saves: AtomicUsize,
    set_mode_calls: AtomicUsize,
    fail_on_call: Option<usize>,
    pub root: MemoryElement,
    pub preview: MemoryElement,
    sizer: Option<MemoryElement>,
    blocks: Vec<String>,
    block_interval: Duration,
    source: SourceIdentity,
    selection: Option<String>,
}

pub struct FakeViewBuilder {
    mode: ViewMode,
    with_preview: bool,
    with_sizer: bool,
    fail_on_call: Option<usize>,
    blocks: Vec<String>,
    block_interval: Duration,
    source: SourceIdentity,
    selection: Option<String>,
}

impl FakeViewBuilder {
    pub fn mode(mut self, mode: ViewMode) -> Self {
        self.mode = mode;
        self
    }

    pub fn without_preview(mut self) -> Self {
        self.with_preview = false;
        self
    }

    pub fn without_sizer(mut self) -> Self {
        self.with_sizer = false;
        self
    }

    /// `set_mode` fails on the given call, counting from 1.
    pub fn fail_on_call(mut self, call: usize) -> Self {
        self.fail_on_call = Some(call);
        self
    }

    pub fn blocks(mut self, blocks: &[&str], interval: Duration) -> Self {
        self.blocks = blocks.iter().map(|block| block.to_string()).collect();
        self.block_interval = interval;
        self
    }

    pub fn source(mut self, path: &str) -> Self {
        self.source = SourceIdentity::File(path.to_string());
        self
    }

    pub fn selection(mut self, text: &str) -> Self {
        self.selection = Some(text.to_string());
        self
    }

    pub fn build(self) -> Arc<FakeView> {
        let root = MemoryElement::with_class("div", "view-content");
        let preview = MemoryElement::with_class("div", PREVIEW_CLASS);
        let sizer = self
            .with_sizer
            .then(|| MemoryElement::with_class("div", SIZER_CLASS));
        if let Some(sizer) = &sizer {
            preview.append_child(sizer);
        }
        if self.with_preview {
            root.append_child(&preview);
        }
        Arc::new(FakeView {
            mode: Mutex::new(self.mode),
            transitions: Mutex::new(Vec::new()),
            rebuilds: AtomicUsize::new(0),
            saves: AtomicUsize::new(0),
            set_mode_calls: AtomicUsize::new(0),
            fail_on_call: self.fail_on_call,
            root,
            preview,
            sizer,
            blocks: self.blocks,
            block_interval: self.block_interval,
            source: self.source,
            selection: self.selection,
        })
    }
}

impl FakeView {
    pub fn builder() -> FakeViewBuilder {
        FakeViewBuilder {
            mode: ViewMode::Edit,
            with_preview: true,
            with_sizer: true,
            fail_on_call: None,
            blocks: Vec::new(),
            block_interval: Duration::from_millis(100),
            source: SourceIdentity::File("notes/current.md".to_string()),
            selection: None,
        }
    }

    pub fn transitions(&self) -> Vec<ViewMode> {
        self.transitions.lock().unwrap().clone()
    }

    pub fn rebuild_count(&self) -> usize {
        self.rebuilds.load(Ordering::SeqCst)
    }

    fn start_rendering(&self) {
        let Some(sizer) = self.sizer.clone() else {
            return;
        };
        sizer.clear();
        let blocks = self.blocks.clone();
        let interval = self.block_interval;
        tokio::spawn(async move {
            for block in blocks {
                tokio::time::sleep(interval).await;
                sizer.append_html(&block);
            }
        });
    }
}

#[async_trait::async_trait]
impl RenderedView for FakeView {
    fn mode(&self) -> ViewMode {
        *self.mode.lock().unwrap()
    }

    async fn set_mode(&self, mode: ViewMode) -> Result<(), HostError> {
        let call = self.set_mode_calls.fetch_add(1, Ordering::SeqCst) + 1;
        if self.fail_on_call == Some(call) {
            return Err(HostError::new("host rejected mode change"));
        }
        *self.mode.lock().unwrap() = mode;
        self.transitions.lock().unwrap().push(mode);
        if mode == ViewMode::Rendered {
            self.start_rendering();
        }
        Ok(())
    }

    fn rebuild(&self) {
        self.rebuilds.fetch_add(1, Ordering::SeqCst);
    }

    fn content_root(&self) -> Option<Arc<dyn ContentElement>> {
        Some(Arc::new(self.root.clone()))
    }

    fn source(&self) -> SourceIdentity {
        self.source.clone()
    }

    async fn save(&self) -> Result<(), HostError> {
        self.saves.fetch_add(1, Ordering::SeqCst);
        Ok(())
    }

    fn selection(&self) -> Option<String> {
        self.selection.clone()
    }
}

pub struct FakeWorkspace {
    pub view: Option<Arc<FakeView>>,
    pub active_file: Option<String>,
}

impl Workspace for FakeWorkspace {
    fn active_view(&self) -> Option<Arc<dyn RenderedView>> {
        self.view
            .clone()
            .map(|view| view as Arc<dyn RenderedView>)
    }

    fn active_file(&self) -> Option<String> {
        self.active_file.clone()
    }
}

/// Vault of in-memory notes, listed in insertion order.
#[derive(Default)]
pub struct FakeVault {
    files: Vec<(String, String)>,
}

impl FakeVault {
    pub fn with(mut self, path: &str, content: &str) -> Self {
        self.files.push((path.to_string(), content.to_string()));
        self
    }
}

#[async_trait::async_trait]
impl Vault for FakeVault {
    async fn read(&self, path: &str) -> Result<String, HostError> {
        self.files
            .iter()
            .find(|(p, _)| p == path)
            .map(|(_, content)| content.clone())
            .ok_or_else(|| HostError::new(format!("{path} not found")))
    }

    fn front_matter(&self, path: &str) -> Option<FrontMatter> {
        self.files
            .iter()
            .find(|(p, _)| p == path)
            .and_then(|(_, content)| parse_front_matter(content))
    }

    fn list_children(&self, folder: &str) -> Result<Vec<VaultEntry>, HostError> {
        Ok(self
            .files
            .iter()
            .filter(|(path, _)| self.parent_folder(path).as_deref() == Some(folder))
            .map(|(path, _)| VaultEntry::File {
                path: path.clone(),
                extension: path.rsplit('.').next().unwrap_or_default().to_string(),
            })
            .collect())
    }

    fn parent_folder(&self, path: &str) -> Option<String> {
        Some(
            path.rsplit_once('/')
                .map(|(folder, _)| folder.to_string())
                .unwrap_or_default(),
        )
    }
}

/// Markdown renderer that counts calls and can be told to fail.
#[derive(Default)]
pub struct CountingRenderer {
    pub calls: AtomicUsize,
    pub fail: bool,
}

#[async_trait::async_trait]
impl MarkdownRenderer for CountingRenderer {
    async fn render(&self, source: &str, source_path: &str) -> Result<String, RenderError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        if self.fail {
            return Err(RenderError("renderer exploded".to_string()));
        }
        MarkdownRsRenderer.render(source, source_path).await
    }
}

#[derive(Default)]
pub struct RecordingDispatcher {
    pub documents: Mutex<Vec<PrintableDocument>>,
}

impl RecordingDispatcher {
    pub fn documents(&self) -> Vec<PrintableDocument> {
        self.documents.lock().unwrap().clone()
    }
}

#[async_trait::async_trait]
impl PrintDispatcher for RecordingDispatcher {
    async fn dispatch(&self, document: PrintableDocument) -> Result<(), DispatchError> {
        self.documents.lock().unwrap().push(document);
        Ok(())
    }
}

#[derive(Default)]
pub struct Notices {
    pub messages: Mutex<Vec<String>>,
}

impl Notices {
    pub fn messages(&self) -> Vec<String> {
        self.messages.lock().unwrap().clone()
    }
}

impl Notifier for Notices {
    fn notice(&self, message: &str) {
        self.messages.lock().unwrap().push(message.to_string());
    }
}

/// Plays back a fixed list of dialog interactions, then cancels.
#[derive(Default)]
pub struct ScriptedPrompt {
    events: Mutex<VecDeque<DialogEvent>>,
    pub views: Mutex<Vec<ConfirmationView>>,
}

impl ScriptedPrompt {
    pub fn new(events: Vec<DialogEvent>) -> Self {
        Self {
            events: Mutex::new(events.into()),
            views: Mutex::new(Vec::new()),
        }
    }
}

#[async_trait::async_trait]
impl ConfirmationPrompt for ScriptedPrompt {
    async fn next_event(&self, view: ConfirmationView) -> DialogEvent {
        self.views.lock().unwrap().push(view);
        self.events
            .lock()
            .unwrap()
            .pop_front()
            .unwrap_or(DialogEvent::Cancelled)
    }
}

#[derive(Default)]
pub struct MemorySettings {
    pub stored: Mutex<Option<PrintSettings>>,
    pub saves: AtomicUsize,
    /// Stored settings exist but cannot be parsed.
    pub unreadable: bool,
}

impl MemorySettings {
    pub fn with(settings: PrintSettings) -> Self {
        Self {
            stored: Mutex::new(Some(settings)),
            saves: AtomicUsize::new(0),
            unreadable: false,
        }
    }

    pub fn stored(&self) -> Option<PrintSettings> {
        self.stored.lock().unwrap().clone()
    }
}

impl SettingsStore for MemorySettings {
    fn load(&self) -> Result<Option<PrintSettings>, HostError> {
        if self.unreadable {
            return Err(HostError::new("failed to parse settings: unexpected end of input"));
        }
        Ok(self.stored())
    }

    fn save(&self, settings: &PrintSettings) -> Result<(), HostError> {
        self.saves.fetch_add(1, Ordering::SeqCst);
        *self.stored.lock().unwrap() = Some(settings.clone());
        Ok(())
    }
}

pub struct StaticStyles;

impl StyleSource for StaticStyles {
    fn plugin_stylesheet(&self) -> Option<String> {
        Some(".plugin { margin: 0; }".to_string())
    }

    fn print_snippet(&self) -> Option<String> {
        None
    }
}

pub struct Harness {
    pub view: Option<Arc<FakeView>>,
    pub theme: Arc<MemoryTheme>,
    pub renderer: Arc<CountingRenderer>,
    pub dispatcher: Arc<RecordingDispatcher>,
    pub notices: Arc<Notices>,
    pub prompt: Arc<ScriptedPrompt>,
    pub settings: Arc<MemorySettings>,
    pub orchestrator: PrintOrchestrator,
}

pub struct HarnessBuilder {
    view: Option<Arc<FakeView>>,
    active_file: Option<String>,
    vault: FakeVault,
    theme: Theme,
    renderer: CountingRenderer,
    prompt: ScriptedPrompt,
    settings: PrintSettings,
    unreadable_settings: bool,
}

impl HarnessBuilder {
    pub fn view(mut self, view: Arc<FakeView>) -> Self {
        self.view = Some(view);
        self
    }

    pub fn active_file(mut self, path: &str) -> Self {
        self.active_file = Some(path.to_string());
        self
    }

    pub fn vault(mut self, vault: FakeVault) -> Self {
        self.vault = vault;
        self
    }

    pub fn theme(mut self, theme: Theme) -> Self {
        self.theme = theme;
        self
    }

    pub fn failing_renderer(mut self) -> Self {
        self.renderer.fail = true;
        self
    }

    pub fn prompt(mut self, events: Vec<DialogEvent>) -> Self {
        self.prompt = ScriptedPrompt::new(events);
        self
    }

    pub fn settings(mut self, settings: PrintSettings) -> Self {
        self.settings = settings;
        self
    }

    pub fn unreadable_settings(mut self) -> Self {
        self.unreadable_settings = true;
        self
    }

    pub fn build(self) -> Harness {
        let theme = Arc::new(MemoryTheme::new(self.theme));
        let renderer = Arc::new(self.renderer);
        let dispatcher = Arc::new(RecordingDispatcher::default());
        let notices = Arc::new(Notices::default());
        let prompt = Arc::new(self.prompt);
        let settings = Arc::new(MemorySettings {
            unreadable: self.unreadable_settings,
            ..MemorySettings::with(self.settings)
        });
        let services = HostServices {
            workspace: Arc::new(FakeWorkspace {
                view: self.view.clone(),
                active_file: self.active_file,
            }),
            vault: Arc::new(self.vault),
            renderer: renderer.clone(),
            theme: theme.clone(),
            styles: Arc::new(StaticStyles),
            printer: dispatcher.clone(),
            notifier: notices.clone(),
            prompt: prompt.clone(),
            settings: settings.clone(),
        };
        Harness {
            view: self.view,
            theme,
            renderer,
            dispatcher,
            notices,
            prompt,
            settings,
            orchestrator: PrintOrchestrator::new(services, CaptureSettings::default()),
        }
    }
}

impl Harness {
    pub fn builder() -> HarnessBuilder {
        HarnessBuilder {
            view: None,
            active_file: None,
            vault: FakeVault::default(),
            theme: Theme::Light,
            renderer: CountingRenderer::default(),
            prompt: ScriptedPrompt::default(),
            settings: PrintSettings::default(),
            unreadable_settings: false,
        }
    }

    pub fn render_calls(&self) -> usize {
        self.renderer.calls.load(Ordering::SeqCst)
    }
}
