//! Print settings stored as RON beside the vault.
use std::fs;
use std::io;
use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicBool, Ordering};

use printer_core::{HeadingStyle, PrintSettings, Strategy};
use printer_engine::{write_atomically, DispatchError, HostError, SettingsStore};
use printer_logging::{printer_debug, printer_info, printer_warn};
use serde::{Deserialize, Serialize};
use thiserror::Error;

pub(crate) const SETTINGS_FILENAME: &str = ".notesnap_settings.ron";

#[derive(Debug, Error)]
pub(crate) enum SettingsError {
    #[error("failed to read settings: {0}")]
    Read(#[from] io::Error),
    #[error("failed to parse settings: {0}")]
    Parse(#[from] ron::error::SpannedError),
    #[error("failed to serialize settings: {0}")]
    Serialize(#[from] ron::Error),
    #[error("failed to write settings: {0}")]
    Write(#[from] DispatchError),
}

#[derive(Debug, Clone, Serialize, Deserialize)]
struct PersistedHeading {
    size: String,
    color: String,
}

/// On-disk shape of [`PrintSettings`]. Missing fields take their defaults so older
/// files keep loading.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
struct PersistedSettings {
    print_title: bool,
    show_metadata: bool,
    hr_page_breaks: bool,
    combine_folder_notes: bool,
    use_confirmation: bool,
    default_strategy: String,
    font_size: String,
    inline_title_size: String,
    inline_title_color: String,
    headings: Vec<PersistedHeading>,
    has_initialized_colors: bool,
    has_initialized_sizes: bool,
}

impl Default for PersistedSettings {
    fn default() -> Self {
        Self::from(&PrintSettings::default())
    }
}

impl From<&PrintSettings> for PersistedSettings {
    fn from(settings: &PrintSettings) -> Self {
        Self {
            print_title: settings.print_title,
            show_metadata: settings.show_metadata,
            hr_page_breaks: settings.hr_page_breaks,
            combine_folder_notes: settings.combine_folder_notes,
            use_confirmation: settings.use_confirmation,
            default_strategy: settings.default_strategy.to_string(),
            font_size: settings.font_size.clone(),
            inline_title_size: settings.inline_title_size.clone(),
            inline_title_color: settings.inline_title_color.clone(),
            headings: settings
                .headings
                .iter()
                .map(|heading| PersistedHeading {
                    size: heading.size.clone(),
                    color: heading.color.clone(),
                })
                .collect(),
            has_initialized_colors: settings.has_initialized_colors,
            has_initialized_sizes: settings.has_initialized_sizes,
        }
    }
}

impl From<PersistedSettings> for PrintSettings {
    fn from(persisted: PersistedSettings) -> Self {
        let mut settings = PrintSettings {
            print_title: persisted.print_title,
            show_metadata: persisted.show_metadata,
            hr_page_breaks: persisted.hr_page_breaks,
            combine_folder_notes: persisted.combine_folder_notes,
            use_confirmation: persisted.use_confirmation,
            default_strategy: persisted
                .default_strategy
                .parse()
                .unwrap_or_else(|err| {
                    printer_warn!("{}; using standard", err);
                    Strategy::Standard
                }),
            font_size: persisted.font_size,
            inline_title_size: persisted.inline_title_size,
            inline_title_color: persisted.inline_title_color,
            has_initialized_colors: persisted.has_initialized_colors,
            has_initialized_sizes: persisted.has_initialized_sizes,
            ..PrintSettings::default()
        };
        for (slot, heading) in settings.headings.iter_mut().zip(persisted.headings) {
            *slot = HeadingStyle {
                size: heading.size,
                color: heading.color,
            };
        }
        settings
    }
}

/// [`SettingsStore`] writing `.notesnap_settings.ron` into a directory.
pub(crate) struct RonSettingsStore {
    dir: PathBuf,
    force_confirmation: bool,
    /// `use_confirmation` as last read from or written to disk.
    stored_confirmation: AtomicBool,
}

impl RonSettingsStore {
    pub(crate) fn new(dir: PathBuf) -> Self {
        Self {
            dir,
            force_confirmation: false,
            stored_confirmation: AtomicBool::new(PrintSettings::default().use_confirmation),
        }
    }

    /// Loaded settings have the confirmation dialog enabled for this session only;
    /// saving keeps the stored choice.
    pub(crate) fn force_confirmation(mut self, enabled: bool) -> Self {
        self.force_confirmation = enabled;
        self
    }

    fn read(&self) -> Result<Option<PrintSettings>, SettingsError> {
        let path = settings_path(&self.dir);
        let content = match fs::read_to_string(&path) {
            Ok(text) => text,
            Err(err) if err.kind() == io::ErrorKind::NotFound => return Ok(None),
            Err(err) => return Err(err.into()),
        };
        let persisted: PersistedSettings = ron::from_str(&content)?;
        printer_info!("loaded print settings from {:?}", path);
        Ok(Some(persisted.into()))
    }

    fn write(&self, settings: &PrintSettings) -> Result<(), SettingsError> {
        let pretty = ron::ser::PrettyConfig::new();
        let content = ron::ser::to_string_pretty(&PersistedSettings::from(settings), pretty)?;
        write_atomically(&self.dir, SETTINGS_FILENAME, &content)?;
        Ok(())
    }
}

impl SettingsStore for RonSettingsStore {
    fn load(&self) -> Result<Option<PrintSettings>, HostError> {
        let loaded = self.read().map_err(|err| {
            printer_warn!("stored settings rejected: {}", err);
            HostError::new(err.to_string())
        })?;
        if let Some(settings) = &loaded {
            self.stored_confirmation
                .store(settings.use_confirmation, Ordering::SeqCst);
        }
        if !self.force_confirmation {
            return Ok(loaded);
        }
        let mut settings = loaded.unwrap_or_default();
        settings.use_confirmation = true;
        Ok(Some(settings))
    }

    fn save(&self, settings: &PrintSettings) -> Result<(), HostError> {
        let result = if self.force_confirmation {
            printer_debug!("saving settings without the session confirmation override");
            self.write(&PrintSettings {
                use_confirmation: self.stored_confirmation.load(Ordering::SeqCst),
                ..settings.clone()
            })
        } else {
            self.stored_confirmation
                .store(settings.use_confirmation, Ordering::SeqCst);
            self.write(settings)
        };
        result.map_err(|err| HostError::new(err.to_string()))
    }
}

pub(crate) fn settings_path(dir: &Path) -> PathBuf {
    dir.join(SETTINGS_FILENAME)
}
