use printer_logging::printer_warn;
use serde_json::Value;

use crate::dom::escape_text;
use crate::types::FrontMatter;

pub const METADATA_CONTAINER_CLASS: &str = "custom-metadata-container";
pub const METADATA_CONTENT_CLASS: &str = "custom-metadata-content";

/// Splits a leading `---` YAML block off `markdown`.
///
/// Returns `(None, markdown)` when there is no well-formed block.
pub fn split_front_matter(markdown: &str) -> (Option<&str>, &str) {
    let rest = match markdown
        .strip_prefix("---\n")
        .or_else(|| markdown.strip_prefix("---\r\n"))
    {
        Some(rest) => rest,
        None => return (None, markdown),
    };
    let mut offset = 0;
    for line in rest.split_inclusive('\n') {
        if line.trim_end() == "---" {
            let yaml = &rest[..offset];
            let body = &rest[offset + line.len()..];
            return (Some(yaml), body.trim_start_matches(['\r', '\n']));
        }
        offset += line.len();
    }
    (None, markdown)
}

/// Parses the front-matter of a note. Empty or malformed blocks yield `None`.
pub fn parse_front_matter(markdown: &str) -> Option<FrontMatter> {
    let (yaml, _) = split_front_matter(markdown);
    let yaml = yaml?;
    if yaml.trim().is_empty() {
        return None;
    }
    match serde_yaml::from_str::<Value>(yaml) {
        Ok(Value::Object(map)) if !map.is_empty() => Some(map),
        Ok(_) => None,
        Err(err) => {
            printer_warn!("ignoring malformed front-matter: {}", err);
            None
        }
    }
}

/// Printed form of a front-matter value: arrays joined with `, `, objects as JSON,
/// scalars as they are. Nested structures inside arrays are flattened lossily.
pub fn format_value(value: &Value) -> String {
    match value {
        Value::Array(items) => items
            .iter()
            .map(format_item)
            .collect::<Vec<_>>()
            .join(", "),
        Value::Object(_) => value.to_string(),
        Value::String(text) => text.clone(),
        other => other.to_string(),
    }
}

fn format_item(value: &Value) -> String {
    match value {
        Value::Array(items) => items.iter().map(format_item).collect::<Vec<_>>().join(","),
        Value::String(text) => text.clone(),
        other => other.to_string(),
    }
}

pub fn metadata_lines(front_matter: &FrontMatter) -> Vec<String> {
    front_matter
        .iter()
        .map(|(key, value)| format!("{key}: {}", format_value(value)))
        .collect()
}

/// HTML block listing every front-matter entry on its own line.
pub fn render_metadata_block(front_matter: &FrontMatter) -> Option<String> {
    if front_matter.is_empty() {
        return None;
    }
    let lines: String = metadata_lines(front_matter)
        .iter()
        .map(|line| format!("<div>{}</div>", escape_text(line)))
        .collect();
    Some(format!(
        "<div class=\"{METADATA_CONTAINER_CLASS}\"><div class=\"{METADATA_CONTENT_CLASS}\">{lines}</div></div>"
    ))
}
