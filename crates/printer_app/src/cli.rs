//! Command-line arguments for `notesnap`.

use std::fmt;
use std::path::PathBuf;
use std::str::FromStr;

use clap::{Parser, Subcommand};
use printer_core::Strategy;

use crate::platform::logging::LogDestination;

#[derive(Parser)]
#[command(
    name = "notesnap",
    version,
    about = "Print markdown notes from a vault to standalone HTML documents"
)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,

    /// Vault root directory.
    #[arg(long, value_name = "DIR", default_value = ".", global = true)]
    pub vault: PathBuf,

    /// Directory receiving the printable documents.
    #[arg(long, value_name = "DIR", default_value = "print-output", global = true)]
    pub out: PathBuf,

    /// Start with the dark theme active.
    #[arg(long, global = true)]
    pub dark: bool,

    /// Ask for the print mode and options before printing.
    #[arg(long, global = true)]
    pub confirm: bool,

    /// Where log output goes.
    #[arg(long, value_enum, default_value = "file", global = true)]
    pub log: LogDestination,
}

#[derive(Subcommand)]
pub enum Command {
    /// Print one note.
    Note {
        /// Vault-relative path of the note to open.
        #[arg(long, value_name = "PATH")]
        file: Option<String>,

        /// Print mode (basic, standard or advanced); the configured default otherwise.
        #[arg(long, value_name = "MODE")]
        mode: Option<Strategy>,
    },
    /// Print a range of lines of a note.
    Selection {
        #[arg(long, value_name = "PATH")]
        file: String,

        /// One-based inclusive line range, such as `3:10`.
        #[arg(long, value_name = "A:B")]
        lines: LineRange,
    },
    /// Print every note of a folder, the vault root by default.
    Folder {
        #[arg(value_name = "DIR")]
        dir: Option<String>,
    },
    /// Print the open note the way the ribbon button does, honouring `--confirm`.
    Print {
        #[arg(long, value_name = "PATH")]
        file: Option<String>,
    },
}

impl Command {
    /// The note the simulated workspace opens before printing.
    pub fn opened_file(&self) -> Option<&str> {
        match self {
            Command::Note { file, .. } | Command::Print { file } => file.as_deref(),
            Command::Selection { file, .. } => Some(file),
            Command::Folder { .. } => None,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LineRange {
    pub first: usize,
    pub last: usize,
}

impl LineRange {
    /// The selected lines of `text`, joined back with newlines.
    pub fn slice(&self, text: &str) -> String {
        text.lines()
            .skip(self.first - 1)
            .take(self.last + 1 - self.first)
            .collect::<Vec<_>>()
            .join("\n")
    }
}

impl FromStr for LineRange {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let (first, last) = s
            .split_once(':')
            .ok_or_else(|| format!("expected A:B, got '{s}'"))?;
        let first: usize = first
            .trim()
            .parse()
            .map_err(|_| format!("invalid start line '{first}'"))?;
        let last: usize = last
            .trim()
            .parse()
            .map_err(|_| format!("invalid end line '{last}'"))?;
        if first == 0 || last < first {
            return Err(format!("invalid line range {first}:{last}"));
        }
        Ok(Self { first, last })
    }
}

impl fmt::Display for LineRange {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}", self.first, self.last)
    }
}

#[cfg(test)]
mod tests {
    use clap::Parser;

    use super::{Cli, Command, LineRange};
    use printer_core::Strategy;

    #[test]
    fn parses_line_ranges() {
        assert_eq!("3:5".parse(), Ok(LineRange { first: 3, last: 5 }));
        assert!("0:2".parse::<LineRange>().is_err());
        assert!("5:3".parse::<LineRange>().is_err());
        assert!("7".parse::<LineRange>().is_err());
    }

    #[test]
    fn slices_inclusive_one_based_lines() {
        let range = LineRange { first: 2, last: 3 };
        assert_eq!(range.slice("a\nb\nc\nd"), "b\nc");
        assert_eq!(LineRange { first: 4, last: 9 }.slice("a\nb\nc\nd"), "d");
    }

    #[test]
    fn note_command_accepts_mode_and_globals() {
        let cli = Cli::parse_from([
            "notesnap", "note", "--file", "a.md", "--mode", "advanced", "--dark",
        ]);
        assert!(cli.dark);
        match cli.command {
            Command::Note { file, mode } => {
                assert_eq!(file.as_deref(), Some("a.md"));
                assert_eq!(mode, Some(Strategy::Advanced));
            }
            _ => panic!("expected note command"),
        }
    }

    #[test]
    fn folder_command_defaults_to_vault_root() {
        let cli = Cli::parse_from(["notesnap", "--vault", "/tmp/v", "folder"]);
        assert!(matches!(cli.command, Command::Folder { dir: None }));
        assert_eq!(cli.command.opened_file(), None);
    }
}
