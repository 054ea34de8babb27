use std::sync::Arc;

use anyhow::{bail, Context};
use chrono::Local;
use printer_core::HeadingPalette;
use printer_engine::{
    CaptureSettings, HostServices, HtmlFileDispatcher, MarkdownRsRenderer, MemoryTheme,
    PrintOrchestrator, PrintOutcome, Theme,
};
use printer_logging::printer_info;

use super::host::{CliWorkspace, TerminalNotifier, TerminalPrompt, VaultStyles};
use super::logging;
use super::persistence::RonSettingsStore;
use super::vault::FsVault;
use super::view::SimulatedView;
use crate::cli::{Cli, Command};

/// Heading colors the simulated host reports for each theme.
fn palette(theme: Theme) -> HeadingPalette {
    let color = match theme {
        Theme::Light => "#222222",
        Theme::Dark => "#dadada",
    };
    HeadingPalette {
        headings: std::array::from_fn(|_| color.to_string()),
        inline_title: color.to_string(),
    }
}

pub async fn run_app(cli: Cli) -> anyhow::Result<()> {
    logging::initialize(cli.log);

    if !cli.vault.is_dir() {
        bail!("vault {} is not a directory", cli.vault.display());
    }
    let vault = FsVault::new(cli.vault.clone());
    let workspace = match cli.command.opened_file() {
        Some(file) => {
            let markdown = vault
                .read_sync(file)
                .with_context(|| format!("cannot open note {file}"))?;
            let mut view = SimulatedView::new(file, markdown.clone());
            if let Command::Selection { lines, .. } = &cli.command {
                view = view.with_selection(lines.slice(&markdown));
            }
            CliWorkspace::open(file, view)
        }
        None => CliWorkspace::empty(),
    };

    let theme = if cli.dark { Theme::Dark } else { Theme::Light };
    let services = HostServices {
        workspace: Arc::new(workspace),
        renderer: Arc::new(MarkdownRsRenderer),
        theme: Arc::new(MemoryTheme::new(theme).with_palette(palette(theme))),
        styles: Arc::new(VaultStyles::new(vault.root().to_path_buf())),
        printer: Arc::new(HtmlFileDispatcher::new(cli.out.clone())),
        notifier: Arc::new(TerminalNotifier),
        prompt: Arc::new(TerminalPrompt::new()),
        settings: Arc::new(
            RonSettingsStore::new(cli.vault.clone()).force_confirmation(cli.confirm),
        ),
        vault: Arc::new(vault),
    };
    let orchestrator = PrintOrchestrator::new(services, CaptureSettings::default());

    let outcome = match &cli.command {
        Command::Note { mode, .. } => orchestrator.print_current_note(*mode, false).await,
        Command::Selection { .. } => orchestrator.print_selection().await,
        Command::Folder { dir } => {
            orchestrator
                .print_folder(Some(dir.as_deref().unwrap_or("")))
                .await
        }
        Command::Print { .. } => orchestrator.handle_print().await,
    };

    match outcome {
        PrintOutcome::Printed { title, documents } => {
            let printed_at = Local::now().format("%Y-%m-%d %H:%M:%S");
            printer_info!("printed '{}' ({} documents)", title, documents);
            println!(
                "Printed '{title}' ({documents} document{}) to {} at {printed_at}",
                if documents == 1 { "" } else { "s" },
                cli.out.display()
            );
        }
        PrintOutcome::Cancelled | PrintOutcome::Ignored => {}
        PrintOutcome::Aborted(err) => {
            return Err(anyhow::Error::new(err).context("print aborted"));
        }
    }
    Ok(())
}
