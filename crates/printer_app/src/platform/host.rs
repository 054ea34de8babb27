//! Terminal stand-ins for the host collaborators the print engine expects.
use std::fs;
use std::path::PathBuf;
use std::sync::Arc;

use printer_core::{ConfirmationView, DialogEvent, PrintOption, Strategy};
use printer_engine::{ConfirmationPrompt, Notifier, RenderedView, StyleSource, Workspace};
use printer_logging::{printer_info, printer_warn};
use tokio::io::{self, AsyncBufReadExt, AsyncWriteExt, BufReader, Lines, Stdin};
use tokio::sync::Mutex;

use super::view::SimulatedView;

/// Stylesheet shipped with the application.
const DEFAULT_STYLESHEET: &str = include_str!("../../assets/print.css");

/// Workspace with at most one open note.
pub(crate) struct CliWorkspace {
    view: Option<Arc<SimulatedView>>,
    file: Option<String>,
}

impl CliWorkspace {
    pub(crate) fn empty() -> Self {
        Self {
            view: None,
            file: None,
        }
    }

    pub(crate) fn open(file: &str, view: SimulatedView) -> Self {
        Self {
            view: Some(Arc::new(view)),
            file: Some(file.to_string()),
        }
    }
}

impl Workspace for CliWorkspace {
    fn active_view(&self) -> Option<Arc<dyn RenderedView>> {
        self.view
            .clone()
            .map(|view| view as Arc<dyn RenderedView>)
    }

    fn active_file(&self) -> Option<String> {
        self.file.clone()
    }
}

/// Styles from the bundled stylesheet, overridable per vault, plus the user's print
/// snippet when one exists.
pub(crate) struct VaultStyles {
    plugin_override: PathBuf,
    snippet: PathBuf,
}

impl VaultStyles {
    pub(crate) fn new(vault_root: PathBuf) -> Self {
        let dir = vault_root.join(".notesnap");
        Self {
            plugin_override: dir.join("styles.css"),
            snippet: dir.join("snippets").join("print.css"),
        }
    }
}

impl StyleSource for VaultStyles {
    fn plugin_stylesheet(&self) -> Option<String> {
        match fs::read_to_string(&self.plugin_override) {
            Ok(css) => Some(css),
            Err(_) => Some(DEFAULT_STYLESHEET.to_string()),
        }
    }

    fn print_snippet(&self) -> Option<String> {
        fs::read_to_string(&self.snippet).ok()
    }
}

/// Prints notices on standard output.
pub(crate) struct TerminalNotifier;

impl Notifier for TerminalNotifier {
    fn notice(&self, message: &str) {
        printer_info!("notice: {}", message);
        println!("{message}");
    }
}

/// Confirmation dialog driven by single-letter commands on standard input.
pub(crate) struct TerminalPrompt {
    input: Mutex<Lines<BufReader<Stdin>>>,
}

impl TerminalPrompt {
    pub(crate) fn new() -> Self {
        Self {
            input: Mutex::new(BufReader::new(io::stdin()).lines()),
        }
    }
}

fn checkbox(enabled: bool) -> &'static str {
    if enabled {
        "[x]"
    } else {
        "[ ]"
    }
}

fn render_dialog(view: ConfirmationView) -> String {
    format!(
        "Print mode\n  {} (t) title\n  {} (m) metadata\n  {} (h) page break at horizontal rules\n  (a) advanced  (s) standard  (c) cancel\n> ",
        checkbox(view.print_title),
        checkbox(view.show_metadata),
        checkbox(view.hr_page_breaks),
    )
}

/// Maps one line of input to a dialog event; `None` for unrecognised input.
pub(crate) fn parse_answer(answer: &str, view: ConfirmationView) -> Option<DialogEvent> {
    let toggle = |option: PrintOption, current: bool| DialogEvent::Toggled {
        option,
        enabled: !current,
    };
    match answer.trim().to_ascii_lowercase().as_str() {
        "t" => Some(toggle(PrintOption::Title, view.print_title)),
        "m" => Some(toggle(PrintOption::Metadata, view.show_metadata)),
        "h" => Some(toggle(PrintOption::HrPageBreaks, view.hr_page_breaks)),
        "a" => Some(DialogEvent::Chosen(Strategy::Advanced)),
        "s" => Some(DialogEvent::Chosen(Strategy::Standard)),
        "c" | "q" => Some(DialogEvent::Cancelled),
        _ => None,
    }
}

#[async_trait::async_trait]
impl ConfirmationPrompt for TerminalPrompt {
    async fn next_event(&self, view: ConfirmationView) -> DialogEvent {
        let mut input = self.input.lock().await;
        let mut stdout = io::stdout();
        loop {
            let _ = stdout.write_all(render_dialog(view).as_bytes()).await;
            let _ = stdout.flush().await;
            match input.next_line().await {
                Ok(Some(line)) => match parse_answer(&line, view) {
                    Some(event) => return event,
                    None => println!("unrecognised choice '{}'", line.trim()),
                },
                Ok(None) => return DialogEvent::Cancelled,
                Err(err) => {
                    printer_warn!("cannot read confirmation answer: {}", err);
                    return DialogEvent::Cancelled;
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use printer_core::{ConfirmationView, DialogEvent, PrintOption, Strategy};

    use super::parse_answer;

    #[test]
    fn answers_map_to_dialog_events() {
        let view = ConfirmationView {
            open: true,
            print_title: true,
            show_metadata: false,
            hr_page_breaks: false,
        };
        assert_eq!(
            parse_answer("t", view),
            Some(DialogEvent::Toggled {
                option: PrintOption::Title,
                enabled: false
            })
        );
        assert_eq!(
            parse_answer(" M ", view),
            Some(DialogEvent::Toggled {
                option: PrintOption::Metadata,
                enabled: true
            })
        );
        assert_eq!(parse_answer("a", view), Some(DialogEvent::Chosen(Strategy::Advanced)));
        assert_eq!(parse_answer("c", view), Some(DialogEvent::Cancelled));
        assert_eq!(parse_answer("x", view), None);
    }
}
