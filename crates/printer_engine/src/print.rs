use std::sync::Arc;

use printer_logging::printer_info;

use crate::capture::CaptureResult;
use crate::dom::escape_text;
use crate::error::DispatchError;
use crate::host::PrintDispatcher;

pub const PRINT_ROOT_CLASS: &str = "print-root";
pub const ADVANCED_CLASS: &str = "print-advanced";
pub const PAGE_BREAK_CLASS: &str = "print-page-break";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PrintPath {
    HostNative,
    Browser,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PageBreaks {
    /// A page-break marker goes between consecutive documents.
    BetweenDocuments,
    /// Documents run on without forced breaks.
    Combined,
}

/// One unit of output: captured documents plus everything needed to print them.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PrintJob {
    pub documents: Vec<CaptureResult>,
    pub css: String,
    pub title: String,
    pub page_breaks: PageBreaks,
    pub advanced: bool,
    pub path: PrintPath,
}

impl PrintJob {
    pub fn body_html(&self) -> String {
        let separator = match self.page_breaks {
            PageBreaks::BetweenDocuments => format!("<div class=\"{PAGE_BREAK_CLASS}\"></div>"),
            PageBreaks::Combined => String::new(),
        };
        self.documents
            .iter()
            .map(CaptureResult::html)
            .collect::<Vec<_>>()
            .join(&separator)
    }

    pub fn into_document(self) -> PrintableDocument {
        let body_class = if self.advanced {
            format!("{PRINT_ROOT_CLASS} {ADVANCED_CLASS}")
        } else {
            PRINT_ROOT_CLASS.to_string()
        };
        let html = format!(
            "<!DOCTYPE html>\n<html>\n<head>\n<meta charset=\"utf-8\">\n<title>{title}</title>\n<style>\n{css}\n</style>\n</head>\n<body class=\"{body_class}\">\n{body}\n</body>\n</html>\n",
            title = escape_text(&self.title),
            css = self.css,
            body = self.body_html(),
        );
        PrintableDocument {
            title: self.title,
            html,
            path: self.path,
            advanced: self.advanced,
        }
    }
}

/// A complete HTML document handed to the host's print facility.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PrintableDocument {
    pub title: String,
    pub html: String,
    pub path: PrintPath,
    pub advanced: bool,
}

#[derive(Clone)]
pub struct PrintManager {
    dispatcher: Arc<dyn PrintDispatcher>,
}

impl PrintManager {
    pub fn new(dispatcher: Arc<dyn PrintDispatcher>) -> Self {
        Self { dispatcher }
    }

    pub async fn print(&self, job: PrintJob) -> Result<(), DispatchError> {
        printer_info!(
            "printing '{}' ({} documents, {:?} path, advanced={})",
            job.title,
            job.documents.len(),
            job.path,
            job.advanced
        );
        self.dispatcher.dispatch(job.into_document()).await
    }
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;

    use super::{PageBreaks, PrintJob, PrintPath};
    use crate::capture::CaptureResult;

    fn job(page_breaks: PageBreaks) -> PrintJob {
        PrintJob {
            documents: vec![
                CaptureResult::new("<p>A</p>".to_string()),
                CaptureResult::new("<p>B</p>".to_string()),
            ],
            css: "p { color: red; }".to_string(),
            title: "notes/<A>.md".to_string(),
            page_breaks,
            advanced: true,
            path: PrintPath::Browser,
        }
    }

    #[test]
    fn marker_goes_between_documents_only() {
        assert_eq!(
            job(PageBreaks::BetweenDocuments).body_html(),
            "<p>A</p><div class=\"print-page-break\"></div><p>B</p>"
        );
        assert_eq!(job(PageBreaks::Combined).body_html(), "<p>A</p><p>B</p>");
    }

    #[test]
    fn document_carries_title_css_and_body_class() {
        let document = job(PageBreaks::Combined).into_document();
        assert!(document.html.contains("<title>notes/&lt;A&gt;.md</title>"));
        assert!(document.html.contains("p { color: red; }"));
        assert!(document.html.contains("<body class=\"print-root print-advanced\">"));
        assert_eq!(document.title, "notes/<A>.md");
    }
}
