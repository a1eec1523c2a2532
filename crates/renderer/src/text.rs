//! Font loading, text measurement, truncation and wrapping.

use std::path::Path;

use rusttype::{point, Font, Scale};

use crate::error::{RenderError, RenderResult};

/// Marker appended to truncated text.
pub const ELLIPSIS: &str = "…";

const REGULAR_FONT_DATA: &[u8] = include_bytes!("../assets/DejaVuSans.ttf");
const BOLD_FONT_DATA: &[u8] = include_bytes!("../assets/DejaVuSans-Bold.ttf");

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Weight {
    Regular,
    Bold,
}

/// The two font faces the layout uses.
pub struct Fonts {
    regular: Font<'static>,
    bold: Font<'static>,
}

impl std::fmt::Debug for Fonts {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Fonts").finish_non_exhaustive()
    }
}

impl Fonts {
    /// DejaVu Sans, compiled into the binary.
    pub fn embedded() -> RenderResult<Self> {
        let regular = Font::try_from_bytes(REGULAR_FONT_DATA)
            .ok_or_else(|| RenderError::FontLoad("embedded regular face".to_string()))?;
        let bold = Font::try_from_bytes(BOLD_FONT_DATA)
            .ok_or_else(|| RenderError::FontLoad("embedded bold face".to_string()))?;
        Ok(Self { regular, bold })
    }

    /// Load TrueType faces from disk.
    pub fn from_files(regular: &Path, bold: &Path) -> RenderResult<Self> {
        Ok(Self {
            regular: load_font(regular)?,
            bold: load_font(bold)?,
        })
    }

    /// A face of `weight` sized so one em is `size` pixels.
    pub fn face(&self, weight: Weight, size: f32) -> Face<'_> {
        let font = match weight {
            Weight::Regular => &self.regular,
            Weight::Bold => &self.bold,
        };
        Face {
            font,
            scale: em_scale(font, size),
        }
    }
}

fn load_font(path: &Path) -> RenderResult<Font<'static>> {
    let data = std::fs::read(path)
        .map_err(|e| RenderError::FontLoad(format!("{}: {}", path.display(), e)))?;
    Font::try_from_vec(data)
        .ok_or_else(|| RenderError::FontLoad(format!("{}: not a TrueType font", path.display())))
}

/// rusttype scales by ascent-to-descent height; convert from an em size.
fn em_scale(font: &Font<'_>, size: f32) -> Scale {
    let units_per_em = font.units_per_em() as f32;
    let v = font.v_metrics_unscaled();
    let height = v.ascent - v.descent;
    if units_per_em <= 0.0 || height <= 0.0 {
        return Scale::uniform(size);
    }
    Scale::uniform(size * height / units_per_em)
}

/// A font at a fixed size.
#[derive(Clone, Copy)]
pub struct Face<'f> {
    font: &'f Font<'static>,
    scale: Scale,
}

impl<'f> Face<'f> {
    pub fn font(&self) -> &'f Font<'static> {
        self.font
    }

    pub fn scale(&self) -> Scale {
        self.scale
    }

    /// Distance from the top of the line box to the baseline.
    pub fn ascent(&self) -> f32 {
        self.font.v_metrics(self.scale).ascent
    }

    /// Advance width of `text` in pixels.
    pub fn measure(&self, text: &str) -> f32 {
        self.font
            .layout(text, self.scale, point(0.0, 0.0))
            .last()
            .map(|g| g.position().x + g.unpositioned().h_metrics().advance_width)
            .unwrap_or(0.0)
    }

    pub fn truncate(&self, text: &str, max_width: f32) -> String {
        truncate_text(text, max_width, |s| self.measure(s))
    }

    pub fn wrap(&self, text: &str, max_width: f32) -> Vec<String> {
        wrap_text(text, max_width, |s| self.measure(s))
    }
}

/// Shorten `text` to fit `max_width`.
///
/// Text that fits is returned unchanged. Otherwise the longest prefix (on
/// char boundaries) whose width with [`ELLIPSIS`] appended fits is used;
/// when no prefix fits the bare ellipsis is returned even if it overflows.
pub fn truncate_text<M>(text: &str, max_width: f32, measure: M) -> String
where
    M: Fn(&str) -> f32,
{
    if text.is_empty() || measure(text) <= max_width {
        return text.to_string();
    }

    let mut candidate = String::with_capacity(text.len() + ELLIPSIS.len());
    for (end, _) in text.char_indices().rev() {
        candidate.clear();
        candidate.push_str(&text[..end]);
        candidate.push_str(ELLIPSIS);
        if measure(&candidate) <= max_width {
            return candidate;
        }
    }
    ELLIPSIS.to_string()
}

/// Greedy word wrap to `max_width`. Words wider than a line are broken
/// between characters; explicit newlines start a new line.
pub fn wrap_text<M>(text: &str, max_width: f32, measure: M) -> Vec<String>
where
    M: Fn(&str) -> f32,
{
    let mut lines = Vec::new();

    for paragraph in text.lines() {
        let mut line = String::new();

        for word in paragraph.split_whitespace() {
            let joined = if line.is_empty() {
                word.to_string()
            } else {
                format!("{} {}", line, word)
            };
            if measure(&joined) <= max_width {
                line = joined;
                continue;
            }

            if !line.is_empty() {
                lines.push(std::mem::take(&mut line));
            }
            if measure(word) <= max_width {
                line = word.to_string();
                continue;
            }

            for ch in word.chars() {
                let mut next = line.clone();
                next.push(ch);
                if !line.is_empty() && measure(&next) > max_width {
                    lines.push(std::mem::replace(&mut line, ch.to_string()));
                } else {
                    line = next;
                }
            }
        }

        lines.push(line);
    }

    lines
}
