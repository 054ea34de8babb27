//! Writing printable documents to disk, the stand-in for a print dialog.
use std::fs;
use std::io::Write;
use std::path::{Path, PathBuf};

use printer_logging::printer_info;
use tempfile::NamedTempFile;

use crate::error::DispatchError;
use crate::host::PrintDispatcher;
use crate::print::{PrintPath, PrintableDocument};

/// Writes `content` to `{dir}/{filename}` through a temp file and a rename, so readers
/// never see a half-written file. `dir` is created when missing.
pub fn write_atomically(dir: &Path, filename: &str, content: &str) -> Result<PathBuf, DispatchError> {
    let output_dir = |e: std::io::Error| DispatchError::OutputDir(e.to_string());
    match fs::metadata(dir) {
        Ok(meta) if !meta.is_dir() => {
            return Err(DispatchError::OutputDir("path is not a directory".into()))
        }
        Ok(_) => {}
        Err(_) => fs::create_dir_all(dir).map_err(output_dir)?,
    }

    let target = dir.join(filename);
    // Failing to create the temp file means the directory is not writable.
    let mut tmp = NamedTempFile::new_in(dir).map_err(output_dir)?;
    tmp.write_all(content.as_bytes())?;
    tmp.flush()?;
    tmp.as_file_mut().sync_all()?;
    tmp.persist(&target).map_err(|e| DispatchError::Io(e.error))?;
    Ok(target)
}

/// File name for a printed document: path separators and unsafe characters become `_`.
pub fn document_filename(title: &str, path: PrintPath) -> String {
    let stem: String = title
        .trim_end_matches(".md")
        .chars()
        .map(|c| {
            if c.is_alphanumeric() || matches!(c, '-' | '_' | '.' | ' ') {
                c
            } else {
                '_'
            }
        })
        .collect();
    let stem = stem.trim();
    let stem = if stem.is_empty() { "print" } else { stem };
    match path {
        PrintPath::HostNative => format!("{stem}.native.html"),
        PrintPath::Browser => format!("{stem}.html"),
    }
}

/// Dispatcher that saves every printable document as an HTML file.
#[derive(Debug, Clone)]
pub struct HtmlFileDispatcher {
    dir: PathBuf,
}

impl HtmlFileDispatcher {
    pub fn new(dir: PathBuf) -> Self {
        Self { dir }
    }
}

#[async_trait::async_trait]
impl PrintDispatcher for HtmlFileDispatcher {
    async fn dispatch(&self, document: PrintableDocument) -> Result<(), DispatchError> {
        let filename = document_filename(&document.title, document.path);
        let target = write_atomically(&self.dir, &filename, &document.html)?;
        printer_info!("printable document written to {:?}", target);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use std::fs;

    use tempfile::TempDir;

    use super::{document_filename, write_atomically};
    use crate::error::DispatchError;
    use crate::print::PrintPath;

    #[test]
    fn write_creates_missing_directories_and_replaces_content() {
        let root = TempDir::new().unwrap();
        let dir = root.path().join("out/nested");

        write_atomically(&dir, "doc.html", "first").unwrap();
        let target = write_atomically(&dir, "doc.html", "second").unwrap();

        assert_eq!(target, dir.join("doc.html"));
        assert_eq!(fs::read_to_string(&target).unwrap(), "second");
        assert_eq!(fs::read_dir(&dir).unwrap().count(), 1, "no temp files left behind");
    }

    #[test]
    fn write_rejects_a_file_in_place_of_the_directory() {
        let root = TempDir::new().unwrap();
        let blocker = root.path().join("out");
        fs::write(&blocker, "").unwrap();

        let err = write_atomically(&blocker, "doc.html", "x").unwrap_err();

        assert!(matches!(err, DispatchError::OutputDir(_)));
    }

    #[test]
    fn filenames_are_flattened_and_suffixed_by_path() {
        assert_eq!(
            document_filename("notes/daily/today.md", PrintPath::Browser),
            "notes_daily_today.html"
        );
        assert_eq!(
            document_filename("Untitled", PrintPath::HostNative),
            "Untitled.native.html"
        );
        assert_eq!(document_filename("///", PrintPath::Browser), "___.html");
        assert_eq!(document_filename("", PrintPath::Browser), "print.html");
    }
}
