//! Colour theme for the month view.

use image::Rgba;
use serde::{Deserialize, Serialize};

use crate::error::{RenderError, RenderResult};

pub const DEFAULT_BACKGROUND: &str = "#ffffff";
pub const DEFAULT_INK: &str = "#343a40";
pub const DEFAULT_ACCENT: &str = "#dc3545";
pub const DEFAULT_MUTED: &str = "#6c757d";

/// Parse a hex color string (#RRGGBB) into an opaque pixel.
pub fn hex_to_rgba(hex: &str) -> Option<Rgba<u8>> {
    let digits = hex.trim().trim_start_matches('#');
    if digits.len() != 6 || !digits.is_ascii() {
        return None;
    }

    let r = u8::from_str_radix(&digits[0..2], 16).ok()?;
    let g = u8::from_str_radix(&digits[2..4], 16).ok()?;
    let b = u8::from_str_radix(&digits[4..6], 16).ok()?;

    Some(Rgba([r, g, b, 255]))
}

fn parse_color(hex: &str) -> RenderResult<Rgba<u8>> {
    hex_to_rgba(hex).ok_or_else(|| RenderError::InvalidColor(hex.to_string()))
}

/// Resolved colours.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Theme {
    /// Canvas fill and text on dark pills.
    pub background: Rgba<u8>,
    /// Body text, all-day pills and headings.
    pub ink: Rgba<u8>,
    /// Today marker, event times, status line and error panel.
    pub accent: Rgba<u8>,
    /// Rules, padding-day numbers, night temperatures and past events.
    pub muted: Rgba<u8>,
}

impl Default for Theme {
    fn default() -> Self {
        Self {
            background: Rgba([255, 255, 255, 255]),
            ink: Rgba([52, 58, 64, 255]),
            accent: Rgba([220, 53, 69, 255]),
            muted: Rgba([108, 117, 125, 255]),
        }
    }
}

/// Theme as written in the configuration file; unset entries keep defaults.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize, Serialize)]
#[serde(default, deny_unknown_fields)]
pub struct ThemeConfig {
    pub background: Option<String>,
    pub ink: Option<String>,
    pub accent: Option<String>,
    pub muted: Option<String>,
}

impl ThemeConfig {
    pub fn resolve(&self) -> RenderResult<Theme> {
        let pick = |value: &Option<String>, default: &str| parse_color(value.as_deref().unwrap_or(default));
        Ok(Theme {
            background: pick(&self.background, DEFAULT_BACKGROUND)?,
            ink: pick(&self.ink, DEFAULT_INK)?,
            accent: pick(&self.accent, DEFAULT_ACCENT)?,
            muted: pick(&self.muted, DEFAULT_MUTED)?,
        })
    }
}
