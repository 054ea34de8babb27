use crate::Strategy;

/// Heading sizes used on first run, `h1` through `h6`.
pub const DEFAULT_HEADING_SIZES: [&str; 6] = ["2em", "1.6em", "1.37em", "1.25em", "1.12em", "1em"];

const FALLBACK_COLOR: &str = "#000000";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HeadingStyle {
    pub size: String,
    pub color: String,
}

impl Default for HeadingStyle {
    fn default() -> Self {
        Self {
            size: "1em".to_string(),
            color: FALLBACK_COLOR.to_string(),
        }
    }
}

/// Heading colors read from the host theme.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HeadingPalette {
    pub headings: [String; 6],
    pub inline_title: String,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PrintSettings {
    pub print_title: bool,
    pub show_metadata: bool,
    pub hr_page_breaks: bool,
    pub combine_folder_notes: bool,
    pub use_confirmation: bool,
    pub default_strategy: Strategy,
    pub font_size: String,
    pub inline_title_size: String,
    pub inline_title_color: String,
    pub headings: [HeadingStyle; 6],
    pub has_initialized_colors: bool,
    pub has_initialized_sizes: bool,
}

impl Default for PrintSettings {
    fn default() -> Self {
        Self {
            print_title: true,
            show_metadata: false,
            hr_page_breaks: false,
            combine_folder_notes: false,
            use_confirmation: false,
            default_strategy: Strategy::Standard,
            font_size: "14px".to_string(),
            inline_title_size: "2em".to_string(),
            inline_title_color: FALLBACK_COLOR.to_string(),
            headings: Default::default(),
            has_initialized_colors: false,
            has_initialized_sizes: false,
        }
    }
}

impl PrintSettings {
    /// Fills heading sizes and colors the first time the settings are used.
    ///
    /// Returns `true` when anything changed and the settings should be persisted.
    pub fn initialize_defaults(&mut self, palette: Option<&HeadingPalette>) -> bool {
        let mut changed = false;
        if !self.has_initialized_sizes {
            for (heading, size) in self.headings.iter_mut().zip(DEFAULT_HEADING_SIZES) {
                heading.size = size.to_string();
            }
            self.has_initialized_sizes = true;
            changed = true;
        }
        if !self.has_initialized_colors {
            match palette {
                Some(palette) => {
                    for (heading, color) in self.headings.iter_mut().zip(&palette.headings) {
                        heading.color = color.clone();
                    }
                    self.inline_title_color = palette.inline_title.clone();
                }
                None => {
                    for heading in &mut self.headings {
                        heading.color = FALLBACK_COLOR.to_string();
                    }
                    self.inline_title_color = FALLBACK_COLOR.to_string();
                }
            }
            self.has_initialized_colors = true;
            changed = true;
        }
        changed
    }
}
