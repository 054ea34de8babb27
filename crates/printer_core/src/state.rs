use crate::view_model::ConfirmationView;
use crate::PrintSettings;

/// A note print waiting for the user's decision.
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) struct PendingConfirmation {
    pub(crate) file: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct PrintState {
    settings: PrintSettings,
    pending: Option<PendingConfirmation>,
}

impl PrintState {
    pub fn new(settings: PrintSettings) -> Self {
        Self {
            settings,
            pending: None,
        }
    }

    pub fn settings(&self) -> &PrintSettings {
        &self.settings
    }

    pub fn is_confirming(&self) -> bool {
        self.pending.is_some()
    }

    pub fn view(&self) -> ConfirmationView {
        ConfirmationView {
            open: self.pending.is_some(),
            print_title: self.settings.print_title,
            show_metadata: self.settings.show_metadata,
            hr_page_breaks: self.settings.hr_page_breaks,
        }
    }

    pub(crate) fn settings_mut(&mut self) -> &mut PrintSettings {
        &mut self.settings
    }

    pub(crate) fn replace_settings(&mut self, settings: PrintSettings) {
        self.settings = settings;
    }

    pub(crate) fn open_confirmation(&mut self, file: Option<String>) {
        self.pending = Some(PendingConfirmation { file });
    }

    pub(crate) fn close_confirmation(&mut self) -> Option<PendingConfirmation> {
        self.pending.take()
    }
}
