use std::sync::{Arc, Mutex, PoisonError};

use printer_core::HeadingPalette;
use printer_logging::printer_debug;

use crate::host::ThemeHost;
use crate::types::Theme;

/// Keeps the host in the light theme while alive; the original theme comes back on drop,
/// including when the capture it wraps fails.
#[must_use = "the light theme is reverted as soon as the guard is dropped"]
pub struct ThemeGuard {
    host: Arc<dyn ThemeHost>,
    original: Theme,
}

impl ThemeGuard {
    pub fn force_light(host: Arc<dyn ThemeHost>) -> Self {
        let original = host.theme();
        if original != Theme::Light {
            printer_debug!("switching {} to {}", original.class_name(), Theme::Light.class_name());
            host.set_theme(Theme::Light);
        }
        Self { host, original }
    }

    pub fn original(&self) -> Theme {
        self.original
    }
}

impl Drop for ThemeGuard {
    fn drop(&mut self) {
        if self.host.theme() != self.original {
            printer_debug!("restoring {}", self.original.class_name());
            self.host.set_theme(self.original);
        }
    }
}

/// Theme flag held in memory, for hosts without a document body of their own.
pub struct MemoryTheme {
    current: Mutex<Theme>,
    palette: Option<HeadingPalette>,
}

impl MemoryTheme {
    pub fn new(theme: Theme) -> Self {
        Self {
            current: Mutex::new(theme),
            palette: None,
        }
    }

    pub fn with_palette(mut self, palette: HeadingPalette) -> Self {
        self.palette = Some(palette);
        self
    }
}

impl ThemeHost for MemoryTheme {
    fn theme(&self) -> Theme {
        *self.current.lock().unwrap_or_else(PoisonError::into_inner)
    }

    fn set_theme(&self, theme: Theme) {
        *self.current.lock().unwrap_or_else(PoisonError::into_inner) = theme;
    }

    fn heading_palette(&self) -> Option<HeadingPalette> {
        self.palette.clone()
    }
}
