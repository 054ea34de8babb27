use printer_core::PrintSettings;
use printer_logging::printer_warn;

use crate::frontmatter::METADATA_CONTAINER_CLASS;
use crate::host::{Notifier, StyleSource};
use crate::print::{PAGE_BREAK_CLASS, PRINT_ROOT_CLASS};
use crate::render::INLINE_TITLE_CLASS;

const MATH_RULES: &str = "\
.print-root .math-block { display: block !important; margin: 1em 0; }
.print-root .math-inline { display: inline-block !important; }
.print-root mjx-container { display: inline-block !important; }
.print-root mjx-container[jax=\"CHTML\"][display=\"true\"] { display: block !important; margin: 1em 0; }";

/// Builds the CSS bundle for a print: settings-driven rules first, then the plugin
/// stylesheet and the user's print snippet.
pub fn assemble_print_styles(
    settings: &PrintSettings,
    source: &dyn StyleSource,
    notifier: &dyn Notifier,
) -> String {
    let root = format!(".{PRINT_ROOT_CLASS}");
    let mut rules = vec![format!("{root} {{ font-size: {}; }}", settings.font_size)];

    if settings.print_title {
        rules.push(format!(
            "{root} .{INLINE_TITLE_CLASS} {{ display: block !important; font-size: {} !important; color: {} !important; }}",
            settings.inline_title_size, settings.inline_title_color
        ));
    } else {
        rules.push(format!(
            "{root} .{INLINE_TITLE_CLASS} {{ display: none !important; }}"
        ));
    }

    for (level, heading) in settings.headings.iter().enumerate() {
        rules.push(format!(
            "{root} h{} {{ font-size: {}; color: {}; }}",
            level + 1,
            heading.size,
            heading.color
        ));
    }

    if settings.hr_page_breaks {
        rules.push(format!(
            "{root} hr {{ page-break-before: always; border: none; }}"
        ));
    }
    if !settings.show_metadata {
        rules.push(format!(
            "{root} .{METADATA_CONTAINER_CLASS} {{ display: none !important; }}"
        ));
    }
    rules.push(format!(
        ".{PAGE_BREAK_CLASS} {{ page-break-after: always; break-after: page; height: 0; }}"
    ));
    rules.push(MATH_RULES.to_string());

    match source.plugin_stylesheet() {
        Some(css) => rules.push(css),
        None => {
            printer_warn!("plugin stylesheet not found; printing without default styles");
            notifier.notice("Default styling could not be located.");
        }
    }
    if let Some(snippet) = source.print_snippet() {
        rules.push(snippet);
    }

    rules.join("\n")
}
