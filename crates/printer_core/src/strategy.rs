use std::fmt;
use std::str::FromStr;

use crate::PrintSettings;

/// How a source is turned into printable HTML.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Strategy {
    /// Synchronous render, handed to the host's native print path.
    Basic,
    /// Synchronous render, handed to the browser print path.
    Standard,
    /// Live preview capture after the rendered view has settled.
    Advanced,
}

impl fmt::Display for Strategy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Strategy::Basic => write!(f, "basic"),
            Strategy::Standard => write!(f, "standard"),
            Strategy::Advanced => write!(f, "advanced"),
        }
    }
}

impl FromStr for Strategy {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "basic" => Ok(Strategy::Basic),
            "standard" | "normal" => Ok(Strategy::Standard),
            "advanced" => Ok(Strategy::Advanced),
            other => Err(format!("unknown print strategy '{other}'")),
        }
    }
}

/// Quick toggles offered next to the confirmation buttons.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PrintOption {
    Title,
    Metadata,
    HrPageBreaks,
}

impl PrintOption {
    pub fn get(self, settings: &PrintSettings) -> bool {
        match self {
            PrintOption::Title => settings.print_title,
            PrintOption::Metadata => settings.show_metadata,
            PrintOption::HrPageBreaks => settings.hr_page_breaks,
        }
    }

    pub fn set(self, settings: &mut PrintSettings, enabled: bool) {
        match self {
            PrintOption::Title => settings.print_title = enabled,
            PrintOption::Metadata => settings.show_metadata = enabled,
            PrintOption::HrPageBreaks => settings.hr_page_breaks = enabled,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PrintRequest {
    /// Print a note. `file: None` means the active note; `strategy: None` defers to
    /// the confirmation dialog or the configured default.
    Note {
        file: Option<String>,
        strategy: Option<Strategy>,
    },
    /// Print only the editor selection.
    Selection,
    /// Print every markdown note of a folder; `None` means the active note's folder.
    Folder { folder: Option<String> },
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PrintPlan {
    Note {
        file: Option<String>,
        strategy: Strategy,
    },
    /// Selections have no stable backing element, so they always render synchronously.
    Selection,
    Folder {
        folder: Option<String>,
        combine: bool,
    },
}

/// Resolves a request against the settings.
///
/// Returns `None` when the user has to confirm the strategy first.
pub fn plan_request(request: &PrintRequest, settings: &PrintSettings) -> Option<PrintPlan> {
    match request {
        PrintRequest::Note {
            file,
            strategy: Some(strategy),
        } => Some(PrintPlan::Note {
            file: file.clone(),
            strategy: *strategy,
        }),
        PrintRequest::Note {
            file,
            strategy: None,
        } => {
            if settings.use_confirmation {
                None
            } else {
                Some(PrintPlan::Note {
                    file: file.clone(),
                    strategy: settings.default_strategy,
                })
            }
        }
        PrintRequest::Selection => Some(PrintPlan::Selection),
        PrintRequest::Folder { folder } => Some(PrintPlan::Folder {
            folder: folder.clone(),
            combine: settings.combine_folder_notes,
        }),
    }
}

#[cfg(test)]
mod tests {
    use super::{plan_request, PrintPlan, PrintRequest, Strategy};
    use crate::PrintSettings;

    #[test]
    fn strategy_parses_case_insensitively() {
        assert_eq!("Advanced".parse::<Strategy>(), Ok(Strategy::Advanced));
        assert_eq!("normal".parse::<Strategy>(), Ok(Strategy::Standard));
        assert!("fancy".parse::<Strategy>().is_err());
    }

    #[test]
    fn explicit_strategy_skips_confirmation() {
        let settings = PrintSettings {
            use_confirmation: true,
            ..PrintSettings::default()
        };
        let plan = plan_request(
            &PrintRequest::Note {
                file: None,
                strategy: Some(Strategy::Basic),
            },
            &settings,
        );
        assert_eq!(
            plan,
            Some(PrintPlan::Note {
                file: None,
                strategy: Strategy::Basic
            })
        );
    }

    #[test]
    fn folder_plan_carries_combine_setting() {
        let settings = PrintSettings {
            combine_folder_notes: true,
            ..PrintSettings::default()
        };
        let plan = plan_request(&PrintRequest::Folder { folder: None }, &settings);
        assert_eq!(
            plan,
            Some(PrintPlan::Folder {
                folder: None,
                combine: true
            })
        );
    }
}
