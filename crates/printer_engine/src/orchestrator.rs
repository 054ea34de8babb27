//! Top-level print flow: strategy selection, confirmation, capture and dispatch.
//!
//! Decisions come from the pure state machine in `printer_core`; this module executes
//! its effects against the host. Every capture failure ends here as a notice and a log
//! line, never as an error returned to the host.
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Mutex, MutexGuard, PoisonError};

use printer_core::{
    update, ConfirmationView, Effect, Msg, PrintPlan, PrintRequest, PrintSettings, PrintState,
    Strategy,
};
use printer_logging::{printer_debug, printer_error, printer_info, printer_warn, set_job_id};

use crate::capture::{CaptureOptions, CaptureResult, CaptureSettings, SnapshotCapturer};
use crate::error::CaptureError;
use crate::folder::{markdown_files, render_folder};
use crate::host::{HostServices, RenderedView};
use crate::print::{PageBreaks, PrintJob, PrintManager, PrintPath};
use crate::render::{generate_html, RenderInput};
use crate::styles::assemble_print_styles;
use crate::theme::ThemeGuard;
use crate::types::UNTITLED;

#[derive(Debug)]
pub enum PrintOutcome {
    Printed { title: String, documents: usize },
    /// The user declined the confirmation dialog.
    Cancelled,
    /// The job stopped before anything was printed; the user has been told why.
    Aborted(CaptureError),
    /// Another print is waiting for confirmation; this request was dropped.
    Ignored,
}

pub struct PrintOrchestrator {
    services: HostServices,
    capturer: SnapshotCapturer,
    printer: PrintManager,
    state: Mutex<PrintState>,
    jobs: AtomicU64,
    /// False when the stored settings failed to load.
    persist: bool,
}

impl PrintOrchestrator {
    /// Loads settings from the store, seeding first-run heading defaults.
    ///
    /// When the stored settings cannot be loaded the session runs on defaults and
    /// never writes back, so the user's file survives for repair.
    pub fn new(services: HostServices, capture: CaptureSettings) -> Self {
        let (mut settings, persist) = match services.settings.load() {
            Ok(loaded) => (loaded.unwrap_or_default(), true),
            Err(err) => {
                printer_warn!("stored settings unusable, running on defaults: {}", err);
                services.notifier.notice(
                    "Print settings could not be loaded; defaults are used and changes will not be saved",
                );
                (PrintSettings::default(), false)
            }
        };
        let palette = services.theme.heading_palette();
        if settings.initialize_defaults(palette.as_ref()) && persist {
            if let Err(err) = services.settings.save(&settings) {
                printer_error!("failed to persist initialized settings: {}", err);
            }
        }
        let printer = PrintManager::new(services.printer.clone());
        let orchestrator = Self {
            services,
            capturer: SnapshotCapturer::new(capture),
            printer,
            state: Mutex::new(PrintState::default()),
            jobs: AtomicU64::new(0),
            persist,
        };
        orchestrator.apply(Msg::SettingsLoaded(settings));
        orchestrator
    }

    pub fn settings(&self) -> PrintSettings {
        self.state().settings().clone()
    }

    pub fn confirmation_view(&self) -> ConfirmationView {
        self.state().view()
    }

    /// Live capture of `view` without printing it.
    pub async fn capture_preview(
        &self,
        view: &dyn RenderedView,
        options: &CaptureOptions,
    ) -> Result<Option<CaptureResult>, CaptureError> {
        self.capturer.capture(view, options).await
    }

    /// Ribbon and editor-menu entry: asks for confirmation when enabled.
    pub async fn handle_print(&self) -> PrintOutcome {
        self.handle(PrintRequest::Note {
            file: None,
            strategy: None,
        })
        .await
    }

    pub async fn print_current_note(
        &self,
        strategy: Option<Strategy>,
        selection_only: bool,
    ) -> PrintOutcome {
        if selection_only {
            self.handle(PrintRequest::Selection).await
        } else {
            self.handle(PrintRequest::Note {
                file: None,
                strategy,
            })
            .await
        }
    }

    /// File-menu entry: prints one note through the standard path.
    pub async fn print_file(&self, path: &str) -> PrintOutcome {
        self.handle(PrintRequest::Note {
            file: Some(path.to_string()),
            strategy: Some(Strategy::Standard),
        })
        .await
    }

    pub async fn print_selection(&self) -> PrintOutcome {
        self.handle(PrintRequest::Selection).await
    }

    /// Prints every markdown note of `folder`, or of the active note's folder.
    pub async fn print_folder(&self, folder: Option<&str>) -> PrintOutcome {
        self.handle(PrintRequest::Folder {
            folder: folder.map(str::to_string),
        })
        .await
    }

    pub async fn handle(&self, request: PrintRequest) -> PrintOutcome {
        let job = self.jobs.fetch_add(1, Ordering::Relaxed) + 1;
        set_job_id(job);
        printer_info!("print requested: {:?}", request);

        let mut effects = self.apply(Msg::PrintRequested(request));
        if effects.is_empty() {
            printer_warn!("a print is already waiting for confirmation; request dropped");
            return PrintOutcome::Ignored;
        }
        loop {
            for effect in effects {
                match effect {
                    Effect::PersistSettings(settings) => self.persist(&settings),
                    Effect::OpenConfirmation => printer_info!("waiting for print confirmation"),
                    Effect::Run(plan) => return self.run(plan).await,
                    Effect::Cancelled => {
                        self.report(&CaptureError::UserCancelled);
                        return PrintOutcome::Cancelled;
                    }
                }
            }
            if !self.state().is_confirming() {
                return PrintOutcome::Ignored;
            }
            let event = self.services.prompt.next_event(self.confirmation_view()).await;
            effects = self.apply(Msg::Dialog(event));
        }
    }

    async fn run(&self, plan: PrintPlan) -> PrintOutcome {
        let settings = self.settings();
        let result = match plan {
            PrintPlan::Note {
                file,
                strategy: Strategy::Advanced,
            } => self.print_advanced(file, &settings).await,
            PrintPlan::Note { file, strategy } => self.print_note(file, strategy, &settings).await,
            PrintPlan::Selection => self.print_selected_text(&settings).await,
            PrintPlan::Folder { folder, combine } => {
                self.print_folder_notes(folder, combine, &settings).await
            }
        };
        match result {
            Ok((title, documents)) => PrintOutcome::Printed { title, documents },
            Err(err) => {
                self.report(&err);
                PrintOutcome::Aborted(err)
            }
        }
    }

    async fn print_note(
        &self,
        file: Option<String>,
        strategy: Strategy,
        settings: &PrintSettings,
    ) -> Result<(String, usize), CaptureError> {
        let path = self.resolve_note(file).await?;
        let document = generate_html(
            self.services.vault.as_ref(),
            self.services.renderer.as_ref(),
            settings,
            &RenderInput::File(path.clone()),
        )
        .await?;
        let route = match strategy {
            Strategy::Basic => PrintPath::HostNative,
            Strategy::Standard | Strategy::Advanced => PrintPath::Browser,
        };
        self.dispatch(vec![document], path, PageBreaks::Combined, false, route, settings)
            .await
    }

    async fn print_advanced(
        &self,
        file: Option<String>,
        settings: &PrintSettings,
    ) -> Result<(String, usize), CaptureError> {
        let active = self.services.workspace.active_file();
        if let Some(file) = file.filter(|file| Some(file) != active.as_ref()) {
            // Only the active view has a live preview to capture.
            printer_warn!("{} is not open; falling back to standard print", file);
            return self.print_note(Some(file), Strategy::Standard, settings).await;
        }

        let view = self
            .services
            .workspace
            .active_view()
            .ok_or(CaptureError::NoActiveView)?;
        let _theme = ThemeGuard::force_light(self.services.theme.clone());

        let source = view.source();
        let metadata = if settings.show_metadata {
            source.path().and_then(|path| self.services.vault.front_matter(path))
        } else {
            None
        };
        let capture = self
            .capturer
            .capture(view.as_ref(), &CaptureOptions { metadata })
            .await?
            .ok_or_else(|| CaptureError::MissingStructuralElement {
                selector: self.capturer.settings().content_class.clone(),
            })?;

        self.dispatch(
            vec![capture],
            source.display_title(),
            PageBreaks::Combined,
            true,
            PrintPath::Browser,
            settings,
        )
        .await
    }

    async fn print_selected_text(
        &self,
        settings: &PrintSettings,
    ) -> Result<(String, usize), CaptureError> {
        let view = self
            .services
            .workspace
            .active_view()
            .ok_or(CaptureError::NoActiveView)?;
        let text = view
            .selection()
            .filter(|text| !text.is_empty())
            .ok_or(CaptureError::NoSelection)?;
        let input = RenderInput::Text {
            text,
            metadata_path: self.services.workspace.active_file(),
        };
        let document = generate_html(
            self.services.vault.as_ref(),
            self.services.renderer.as_ref(),
            settings,
            &input,
        )
        .await?;
        self.dispatch(
            vec![document],
            view.source().display_title(),
            PageBreaks::Combined,
            false,
            PrintPath::Browser,
            settings,
        )
        .await
    }

    async fn print_folder_notes(
        &self,
        folder: Option<String>,
        combine: bool,
        settings: &PrintSettings,
    ) -> Result<(String, usize), CaptureError> {
        let folder = match folder {
            Some(folder) => folder,
            None => {
                self.save_active_view().await?;
                self.services
                    .workspace
                    .active_file()
                    .and_then(|file| self.services.vault.parent_folder(&file))
                    .ok_or(CaptureError::NoFolder)?
            }
        };
        let vault = self.services.vault.as_ref();
        let files = markdown_files(vault, &folder)?;
        let documents =
            render_folder(vault, self.services.renderer.as_ref(), settings, &files).await?;
        let page_breaks = if combine {
            PageBreaks::Combined
        } else {
            PageBreaks::BetweenDocuments
        };
        let title = if folder.is_empty() {
            UNTITLED.to_string()
        } else {
            folder
        };
        self.dispatch(documents, title, page_breaks, false, PrintPath::Browser, settings)
            .await
    }

    /// The file to print: an explicit other file as is, otherwise the active note after
    /// saving it so its latest edits are included.
    async fn resolve_note(&self, file: Option<String>) -> Result<String, CaptureError> {
        let active = self.services.workspace.active_file();
        match file {
            Some(file) if Some(&file) != active.as_ref() => Ok(file),
            _ => {
                self.save_active_view().await?;
                active.ok_or(CaptureError::NoActiveView)
            }
        }
    }

    async fn save_active_view(&self) -> Result<(), CaptureError> {
        if let Some(view) = self.services.workspace.active_view() {
            view.save().await?;
        }
        Ok(())
    }

    async fn dispatch(
        &self,
        documents: Vec<CaptureResult>,
        title: String,
        page_breaks: PageBreaks,
        advanced: bool,
        path: PrintPath,
        settings: &PrintSettings,
    ) -> Result<(String, usize), CaptureError> {
        let css = assemble_print_styles(
            settings,
            self.services.styles.as_ref(),
            self.services.notifier.as_ref(),
        );
        let count = documents.len();
        self.printer
            .print(PrintJob {
                documents,
                css,
                title: title.clone(),
                page_breaks,
                advanced,
                path,
            })
            .await?;
        Ok((title, count))
    }

    fn report(&self, err: &CaptureError) {
        match err {
            CaptureError::UserCancelled | CaptureError::EmptyFolderSelection { .. } => {
                printer_info!("print stopped: {}", err)
            }
            _ => printer_warn!("print aborted: {}", err),
        }
        self.services.notifier.notice(&err.notice());
    }

    fn persist(&self, settings: &PrintSettings) {
        if !self.persist {
            printer_debug!("settings change kept in memory only");
            return;
        }
        if let Err(err) = self.services.settings.save(settings) {
            printer_error!("failed to persist settings: {}", err);
        }
    }

    fn apply(&self, msg: Msg) -> Vec<Effect> {
        let mut state = self.state();
        let (next, effects) = update(std::mem::take(&mut *state), msg);
        *state = next;
        effects
    }

    fn state(&self) -> MutexGuard<'_, PrintState> {
        self.state.lock().unwrap_or_else(PoisonError::into_inner)
    }
}
