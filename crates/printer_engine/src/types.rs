use std::fmt;

/// Front-matter of a note, in source order.
pub type FrontMatter = serde_json::Map<String, serde_json::Value>;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ViewMode {
    /// Source editing.
    Edit,
    /// Reading view produced by the host renderer.
    Rendered,
}

impl ViewMode {
    pub fn opposite(self) -> Self {
        match self {
            ViewMode::Edit => ViewMode::Rendered,
            ViewMode::Rendered => ViewMode::Edit,
        }
    }
}

impl fmt::Display for ViewMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ViewMode::Edit => write!(f, "edit"),
            ViewMode::Rendered => write!(f, "rendered"),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Theme {
    Light,
    Dark,
}

impl Theme {
    /// Class the host puts on its document body for this theme.
    pub fn class_name(self) -> &'static str {
        match self {
            Theme::Light => "theme-light",
            Theme::Dark => "theme-dark",
        }
    }
}

/// What a view is showing.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SourceIdentity {
    /// A note stored in the vault, by vault-relative path.
    File(String),
    /// Text with no backing file.
    Ephemeral,
}

impl SourceIdentity {
    pub fn path(&self) -> Option<&str> {
        match self {
            SourceIdentity::File(path) => Some(path),
            SourceIdentity::Ephemeral => None,
        }
    }

    /// Title used for the printed document.
    pub fn display_title(&self) -> String {
        self.path().unwrap_or(UNTITLED).to_string()
    }
}

pub const UNTITLED: &str = "Untitled";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MutationKind {
    ChildList,
    Attributes,
    CharacterData,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MutationRecord {
    pub kind: MutationKind,
    /// Tag of the element that changed.
    pub target: String,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum VaultEntry {
    File { path: String, extension: String },
    Folder { path: String },
}

impl VaultEntry {
    pub fn markdown_path(&self) -> Option<&str> {
        match self {
            VaultEntry::File { path, extension } if extension.eq_ignore_ascii_case("md") => {
                Some(path)
            }
            _ => None,
        }
    }
}

/// Returns the file name of a vault path without its extension.
pub fn basename(path: &str) -> &str {
    let name = path.rsplit('/').next().unwrap_or(path);
    match name.rfind('.') {
        Some(idx) if idx > 0 => &name[..idx],
        _ => name,
    }
}
