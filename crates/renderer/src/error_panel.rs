//! Full-screen error panel shown when producing the month view fails.

use std::path::Path;

use image::RgbaImage;

use crate::calendar::Renderer;
use crate::canvas::Canvas;
use crate::error::{RenderError, RenderResult};
use crate::png::write_png;
use crate::text::Weight;

const PANEL_INSET: i32 = 40;
const BORDER_WIDTH: i32 = 3;
const CONTENT_LEFT: i32 = 70;
const VALUE_LEFT: i32 = 190;
const TITLE_SIZE: f32 = 32.0;
const MESSAGE_SIZE: f32 = 18.0;
const DETAIL_SIZE: f32 = 14.0;
const DETAIL_STEP: i32 = 25;

const MIN_WIDTH: u32 = 320;
const MIN_HEIGHT: u32 = 200;

pub const ERROR_TITLE: &str = "Error Generating Calendar";

/// What went wrong, plus labelled context rows.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ErrorReport {
    pub message: String,
    /// Key/value rows drawn in order under the message.
    pub details: Vec<(String, String)>,
}

impl ErrorReport {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
            details: Vec::new(),
        }
    }

    pub fn with_detail(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.details.push((key.into(), value.into()));
        self
    }
}

impl Renderer {
    /// Draw `report` onto a fresh canvas.
    pub fn render_error(&self, report: &ErrorReport, width: u32, height: u32) -> RenderResult<RgbaImage> {
        if width == 0 || height == 0 {
            return Err(RenderError::InvalidDimensions { width, height });
        }
        if width < MIN_WIDTH || height < MIN_HEIGHT {
            return Err(RenderError::too_small("error panel", (width, height), (MIN_WIDTH, MIN_HEIGHT)));
        }

        let theme = &self.theme;
        let mut canvas = Canvas::new(width, height, theme.background)?;
        let (w, h) = (width as i32, height as i32);

        canvas.stroke_rect(
            PANEL_INSET,
            PANEL_INSET,
            w - 2 * PANEL_INSET,
            h - 2 * PANEL_INSET,
            BORDER_WIDTH,
            theme.accent,
        );

        let right = (w - PANEL_INSET - 30) as f32;
        let bottom = h - PANEL_INSET - 10;

        let title_face = self.fonts.face(Weight::Bold, TITLE_SIZE);
        let title = title_face.truncate(ERROR_TITLE, right - CONTENT_LEFT as f32);
        canvas.text(&title_face, theme.accent, CONTENT_LEFT as f32, 100.0, &title);

        let message_face = self.fonts.face(Weight::Regular, MESSAGE_SIZE);
        let line_height = MESSAGE_SIZE * 1.5;
        let mut baseline = 160.0;
        for line in message_face.wrap(&report.message, right - CONTENT_LEFT as f32) {
            if baseline > bottom as f32 {
                break;
            }
            canvas.text(&message_face, theme.ink, CONTENT_LEFT as f32, baseline, &line);
            baseline += line_height;
        }

        let detail_face = self.fonts.face(Weight::Regular, DETAIL_SIZE);
        let mut row = (baseline - line_height + 30.0).max(260.0) as i32;
        for (key, value) in &report.details {
            if row > bottom {
                break;
            }
            let key = detail_face.truncate(&format!("{}:", key), (VALUE_LEFT - CONTENT_LEFT - 8) as f32);
            canvas.text(&detail_face, theme.ink, CONTENT_LEFT as f32, row as f32, &key);
            let value = detail_face.truncate(value, right - VALUE_LEFT as f32);
            canvas.text(&detail_face, theme.muted, VALUE_LEFT as f32, row as f32, &value);
            row += DETAIL_STEP;
        }

        tracing::debug!(width, height, details = report.details.len(), "Rendered error panel");
        Ok(canvas.into_image())
    }

    /// Render the error panel and write it to `path`.
    pub fn render_error_to_file(
        &self,
        report: &ErrorReport,
        width: u32,
        height: u32,
        path: &Path,
    ) -> RenderResult<usize> {
        let image = self.render_error(report, width, height)?;
        write_png(&image, path)
    }
}
