//! Vault backed by a directory on disk. Paths are vault-relative with `/` separators.
use std::fs;
use std::path::{Path, PathBuf};

use printer_engine::{parse_front_matter, FrontMatter, HostError, Vault, VaultEntry};
use printer_logging::printer_debug;

pub(crate) struct FsVault {
    root: PathBuf,
}

impl FsVault {
    pub(crate) fn new(root: PathBuf) -> Self {
        Self { root }
    }

    pub(crate) fn root(&self) -> &Path {
        &self.root
    }

    fn resolve(&self, path: &str) -> PathBuf {
        path.split('/')
            .filter(|part| !part.is_empty())
            .fold(self.root.clone(), |acc, part| acc.join(part))
    }

    /// Synchronous read used where the host API is synchronous.
    pub(crate) fn read_sync(&self, path: &str) -> Result<String, HostError> {
        fs::read_to_string(self.resolve(path))
            .map_err(|err| HostError::new(format!("cannot read {path}: {err}")))
    }
}

fn join(folder: &str, name: &str) -> String {
    if folder.is_empty() {
        name.to_string()
    } else {
        format!("{}/{name}", folder.trim_end_matches('/'))
    }
}

#[async_trait::async_trait]
impl Vault for FsVault {
    async fn read(&self, path: &str) -> Result<String, HostError> {
        tokio::fs::read_to_string(self.resolve(path))
            .await
            .map_err(|err| HostError::new(format!("cannot read {path}: {err}")))
    }

    fn front_matter(&self, path: &str) -> Option<FrontMatter> {
        self.read_sync(path)
            .ok()
            .and_then(|content| parse_front_matter(&content))
    }

    /// Children sorted by name; hidden entries are skipped.
    fn list_children(&self, folder: &str) -> Result<Vec<VaultEntry>, HostError> {
        let dir = self.resolve(folder);
        let read_dir = fs::read_dir(&dir)
            .map_err(|err| HostError::new(format!("cannot list {}: {err}", dir.display())))?;
        let mut entries = Vec::new();
        for entry in read_dir {
            let entry = entry.map_err(|err| HostError::new(err.to_string()))?;
            let name = entry.file_name().to_string_lossy().into_owned();
            if name.starts_with('.') {
                continue;
            }
            let path = join(folder, &name);
            let is_dir = entry
                .file_type()
                .map(|kind| kind.is_dir())
                .unwrap_or(false);
            entries.push(if is_dir {
                VaultEntry::Folder { path }
            } else {
                let extension = Path::new(&name)
                    .extension()
                    .map(|ext| ext.to_string_lossy().into_owned())
                    .unwrap_or_default();
                VaultEntry::File { path, extension }
            });
        }
        entries.sort_by(|a, b| entry_path(a).cmp(entry_path(b)));
        printer_debug!("listed {} entries in '{}'", entries.len(), folder);
        Ok(entries)
    }

    fn parent_folder(&self, path: &str) -> Option<String> {
        Some(
            path.rsplit_once('/')
                .map(|(folder, _)| folder.to_string())
                .unwrap_or_default(),
        )
    }
}

fn entry_path(entry: &VaultEntry) -> &str {
    match entry {
        VaultEntry::File { path, .. } | VaultEntry::Folder { path } => path,
    }
}
