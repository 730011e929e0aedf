//! FFmpeg video filter definitions.

use std::path::{Path, PathBuf};

/// Portrait output width.
pub const VERTICAL_WIDTH: u32 = 1080;
/// Portrait output height.
pub const VERTICAL_HEIGHT: u32 = 1920;

/// Scale to portrait height and centre-crop to 9:16.
pub const FILTER_VERTICAL: &str = "scale=-2:1920,crop=1080:1920";

/// Characters per caption line before wrapping.
pub const CAPTION_LINE_WIDTH: usize = 28;

/// Caption appearance.
#[derive(Debug, Clone)]
pub struct CaptionStyle {
    /// Font file; when unset FFmpeg's fontconfig default is used.
    pub font_file: Option<PathBuf>,
    pub font_size: u32,
    pub font_color: String,
    pub border_width: u32,
    pub border_color: String,
}

impl Default for CaptionStyle {
    fn default() -> Self {
        Self {
            font_file: None,
            font_size: 64,
            font_color: "white".to_string(),
            border_width: 4,
            border_color: "black".to_string(),
        }
    }
}

/// Escape a value for use inside a quoted filter option.
pub fn escape_filter_value(value: &str) -> String {
    value
        .replace('\\', "\\\\")
        .replace('\'', "\\'")
        .replace(':', "\\:")
}

/// Build the `drawtext` filter that renders the contents of `text_file`
/// centred horizontally in the lower third of the frame.
///
/// Text comes from a file with expansion disabled, so caption content never
/// needs filter escaping.
pub fn build_caption_filter(text_file: &Path, style: &CaptionStyle) -> String {
    let mut filter = format!(
        "drawtext=textfile='{file}':expansion=none:fontsize={size}:fontcolor={color}:\
         borderw={border}:bordercolor={border_color}:line_spacing=8:\
         x=(w-text_w)/2:y=h*2/3-text_h/2",
        file = escape_filter_value(&text_file.to_string_lossy()),
        size = style.font_size,
        color = style.font_color,
        border = style.border_width,
        border_color = style.border_color,
    );

    if let Some(font) = &style.font_file {
        filter.push_str(&format!(
            ":fontfile='{}'",
            escape_filter_value(&font.to_string_lossy())
        ));
    }

    filter
}

/// Greedy word wrap for caption text.
///
/// Words longer than `width` are kept whole on their own line.
pub fn wrap_caption(text: &str, width: usize) -> String {
    let mut lines: Vec<String> = Vec::new();
    let mut current = String::new();

    for word in text.split_whitespace() {
        if !current.is_empty() && current.chars().count() + 1 + word.chars().count() > width {
            lines.push(std::mem::take(&mut current));
        }
        if !current.is_empty() {
            current.push(' ');
        }
        current.push_str(word);
    }
    if !current.is_empty() {
        lines.push(current);
    }

    lines.join("\n")
}
