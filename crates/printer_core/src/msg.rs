use crate::{PrintOption, PrintRequest, PrintSettings, Strategy};

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Msg {
    /// A command, menu item or ribbon click asked for a print.
    PrintRequested(PrintRequest),
    /// User interaction with the open confirmation dialog.
    Dialog(DialogEvent),
    /// Replace the settings with a freshly loaded copy.
    SettingsLoaded(PrintSettings),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DialogEvent {
    /// A quick toggle was flipped.
    Toggled { option: PrintOption, enabled: bool },
    /// One of the print buttons was pressed.
    Chosen(Strategy),
    /// The dialog was dismissed.
    Cancelled,
}
