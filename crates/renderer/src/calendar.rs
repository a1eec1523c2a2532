//! Month view layout and drawing.
//!
//! The canvas is split top to bottom into a header band, a weekday label
//! band and the grid. Columns are `width / 7` wide and rows share the
//! remaining height equally; cell edges are placed by rounding cumulative
//! boundaries so the cells tile the grid without gaps.

use std::path::Path;

use image::RgbaImage;

use calendar_common::time::weekday_labels;
use month_grid::{DayCell, EventSummary, MonthGrid};

use crate::canvas::Canvas;
use crate::error::{RenderError, RenderResult};
use crate::png::write_png;
use crate::text::{Fonts, Weight};
use crate::theme::Theme;

pub const HEADER_HEIGHT: u32 = 60;
pub const WEEKDAY_BAND_HEIGHT: u32 = 35;
const HEADER_PADDING: f32 = 24.0;

const MIN_COLUMN_WIDTH: u32 = 40;
const MIN_ROW_HEIGHT: u32 = 40;
const MIN_WEEKS: usize = 4;
const MAX_WEEKS: usize = 6;

const TITLE_SIZE: f32 = 28.0;
const INFO_SIZE: f32 = 12.0;
const WEEKDAY_SIZE: f32 = 13.0;
const DAY_NUMBER_SIZE: f32 = 18.0;
const MONTH_LABEL_SIZE: f32 = 12.0;
const TEMPERATURE_SIZE: f32 = 13.0;
const EVENT_SIZE: f32 = 13.0;

const CELL_PADDING: i32 = 10;
const TODAY_RADIUS: i32 = 16;
const EVENTS_TOP: i32 = 40;
const EVENT_ROW_HEIGHT: i32 = 22;
const EVENT_ROW_GAP: i32 = 2;
const EVENT_PADDING: i32 = 6;
const PILL_RADIUS: i32 = 3;

/// Extra lines shown in the header band.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct HeaderInfo {
    /// Generation timestamp, already formatted.
    pub generated_at: String,
    pub battery: Option<String>,
    /// Degraded-input notice, drawn in the accent colour.
    pub status: Option<String>,
}

impl HeaderInfo {
    /// "Generated: … | Battery: …", skipping parts that are unset.
    pub fn summary_line(&self) -> String {
        let mut parts = Vec::with_capacity(2);
        if !self.generated_at.is_empty() {
            parts.push(format!("Generated: {}", self.generated_at));
        }
        if let Some(battery) = self.battery.as_deref().filter(|b| !b.is_empty()) {
            parts.push(format!("Battery: {}", battery));
        }
        parts.join(" | ")
    }
}

/// Pixel rectangle of one cell.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CellRect {
    pub x: i32,
    pub y: i32,
    pub width: i32,
    pub height: i32,
}

/// Column and row placement for a canvas size and week count.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct GridGeometry {
    width: u32,
    height: u32,
    weeks: usize,
}

fn boundary(total: u32, parts: usize, index: usize) -> i32 {
    (total as f64 * index as f64 / parts as f64).round() as i32
}

impl GridGeometry {
    pub fn new(width: u32, height: u32, weeks: usize) -> RenderResult<Self> {
        if width == 0 || height == 0 {
            return Err(RenderError::InvalidDimensions { width, height });
        }
        if !(MIN_WEEKS..=MAX_WEEKS).contains(&weeks) {
            return Err(RenderError::InvalidGrid(format!(
                "{} week rows, expected {} to {}",
                weeks, MIN_WEEKS, MAX_WEEKS
            )));
        }

        let min_width = 7 * MIN_COLUMN_WIDTH;
        let min_height = HEADER_HEIGHT + WEEKDAY_BAND_HEIGHT + weeks as u32 * MIN_ROW_HEIGHT;
        if width < min_width || height < min_height {
            return Err(RenderError::too_small(
                format!("{} week rows", weeks),
                (width, height),
                (min_width, min_height),
            ));
        }

        Ok(Self { width, height, weeks })
    }

    pub fn grid_top(&self) -> i32 {
        (HEADER_HEIGHT + WEEKDAY_BAND_HEIGHT) as i32
    }

    fn grid_height(&self) -> u32 {
        self.height - HEADER_HEIGHT - WEEKDAY_BAND_HEIGHT
    }

    /// Left edge and width of column `index` (0 = Monday).
    pub fn column(&self, index: usize) -> (i32, i32) {
        let x0 = boundary(self.width, 7, index);
        let x1 = boundary(self.width, 7, index + 1);
        (x0, x1 - x0)
    }

    /// Top edge and height of week row `index`.
    pub fn row(&self, index: usize) -> (i32, i32) {
        let top = self.grid_top();
        let y0 = boundary(self.grid_height(), self.weeks, index);
        let y1 = boundary(self.grid_height(), self.weeks, index + 1);
        (top + y0, y1 - y0)
    }

    pub fn cell(&self, week: usize, day: usize) -> CellRect {
        let (x, width) = self.column(day);
        let (y, height) = self.row(week);
        CellRect { x, y, width, height }
    }
}

/// How many event rows made it onto the canvas.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct RenderStats {
    pub events_drawn: usize,
    /// Events in the grid that did not fit their cell.
    pub events_hidden: usize,
}

/// A rendered month view.
#[derive(Debug)]
pub struct MonthImage {
    pub image: RgbaImage,
    pub stats: RenderStats,
}

/// Draws month grids and error panels with one set of fonts and colours.
#[derive(Debug)]
pub struct Renderer {
    pub(crate) fonts: Fonts,
    pub(crate) theme: Theme,
}

impl Renderer {
    pub fn new(fonts: Fonts, theme: Theme) -> Self {
        Self { fonts, theme }
    }

    /// Embedded fonts and the default theme.
    pub fn with_defaults() -> RenderResult<Self> {
        Ok(Self::new(Fonts::embedded()?, Theme::default()))
    }

    pub fn theme(&self) -> &Theme {
        &self.theme
    }

    /// Render `grid` onto a fresh `width` x `height` canvas.
    pub fn render_month(
        &self,
        grid: &MonthGrid,
        header: &HeaderInfo,
        width: u32,
        height: u32,
    ) -> RenderResult<MonthImage> {
        let geometry = GridGeometry::new(width, height, grid.num_weeks())?;
        let mut canvas = Canvas::new(width, height, self.theme.background)?;

        self.draw_header(&mut canvas, grid, header);
        self.draw_weekday_band(&mut canvas, &geometry);

        let mut stats = RenderStats::default();
        for (week_index, week) in grid.weeks.iter().enumerate() {
            for (day_index, cell) in week.days.iter().enumerate() {
                let rect = geometry.cell(week_index, day_index);
                let drawn = self.draw_cell(&mut canvas, cell, rect);
                stats.events_drawn += drawn;
                stats.events_hidden += cell.events.len() - drawn;
            }
        }
        self.draw_grid_lines(&mut canvas, &geometry);

        tracing::debug!(
            month = %grid.month,
            width,
            height,
            events_drawn = stats.events_drawn,
            events_hidden = stats.events_hidden,
            "Rendered month view"
        );

        Ok(MonthImage {
            image: canvas.into_image(),
            stats,
        })
    }

    /// Render and write a PNG to `path`.
    pub fn render_month_to_file(
        &self,
        grid: &MonthGrid,
        header: &HeaderInfo,
        width: u32,
        height: u32,
        path: &Path,
    ) -> RenderResult<RenderStats> {
        let rendered = self.render_month(grid, header, width, height)?;
        write_png(&rendered.image, path)?;
        Ok(rendered.stats)
    }

    fn draw_header(&self, canvas: &mut Canvas, grid: &MonthGrid, header: &HeaderInfo) {
        let theme = &self.theme;
        let width = canvas.width() as f32;

        let title_face = self.fonts.face(Weight::Bold, TITLE_SIZE);
        let title = grid.title();
        canvas.text(&title_face, theme.ink, HEADER_PADDING, 40.0, &title);

        let right = width - HEADER_PADDING;
        let room = right - (HEADER_PADDING + title_face.measure(&title)) - HEADER_PADDING;

        let info_face = self.fonts.face(Weight::Regular, INFO_SIZE);
        let summary = info_face.truncate(&header.summary_line(), room);
        canvas.text_right(&info_face, theme.muted, right, 35.0, &summary);

        if let Some(status) = header.status.as_deref().filter(|s| !s.is_empty()) {
            let status = info_face.truncate(status, room);
            canvas.text_right(&info_face, theme.accent, right, 50.0, &status);
        }

        canvas.fill_rect(0, HEADER_HEIGHT as i32 - 2, canvas.width() as i32, 2, theme.muted);
    }

    fn draw_weekday_band(&self, canvas: &mut Canvas, geometry: &GridGeometry) {
        let theme = &self.theme;
        let top = HEADER_HEIGHT as i32;
        let bottom = geometry.grid_top();
        let face = self.fonts.face(Weight::Bold, WEEKDAY_SIZE);

        for (i, label) in weekday_labels().iter().enumerate() {
            let (x, w) = geometry.column(i);
            canvas.text(&face, theme.ink, (x + 12) as f32, (top + 22) as f32, label);
            if i < 6 {
                canvas.vline(x + w, top, bottom, 1, theme.muted);
            }
        }

        canvas.fill_rect(0, bottom - 2, canvas.width() as i32, 2, theme.muted);
    }

    fn draw_grid_lines(&self, canvas: &mut Canvas, geometry: &GridGeometry) {
        let color = self.theme.muted;
        let top = geometry.grid_top();
        let bottom = canvas.height() as i32;
        let right = canvas.width() as i32;

        for i in 0..6 {
            let (x, w) = geometry.column(i);
            canvas.vline(x + w, top, bottom, 1, color);
        }
        for k in 0..geometry.weeks.saturating_sub(1) {
            let (y, h) = geometry.row(k);
            canvas.hline(0, right, y + h, 1, color);
        }
    }

    /// Draw one cell; returns how many of its events were drawn.
    fn draw_cell(&self, canvas: &mut Canvas, cell: &DayCell, rect: CellRect) -> usize {
        let theme = &self.theme;
        let CellRect { x, y, width, height } = rect;

        let mut number_color = if cell.is_current_month {
            theme.ink
        } else {
            theme.muted
        };
        if cell.is_today {
            canvas.fill_circle(x + 26, y + 24, TODAY_RADIUS, theme.accent);
            number_color = theme.background;
        }

        let number_face = self.fonts.face(Weight::Regular, DAY_NUMBER_SIZE);
        canvas.text(&number_face, number_color, (x + 16) as f32, (y + 30) as f32, &cell.day_label);

        if cell.is_first_of_month() {
            let face = self.fonts.face(Weight::Bold, MONTH_LABEL_SIZE);
            let room = (width - 46 - CELL_PADDING) as f32;
            let label = face.truncate(&cell.month_short, room);
            canvas.text(&face, theme.ink, (x + 46) as f32, (y + 26) as f32, &label);
        }

        if cell.has_temperatures() {
            let face = self.fonts.face(Weight::Regular, TEMPERATURE_SIZE);
            let right = (x + width - CELL_PADDING) as f32;
            canvas.text_right(&face, theme.ink, right, (y + 21) as f32, &cell.day_temp);
            canvas.text_right(&face, theme.muted, right, (y + 34) as f32, &cell.night_temp);
        }

        let area = CellRect {
            x,
            y: y + EVENTS_TOP,
            width,
            height: height - EVENTS_TOP,
        };
        self.draw_events(canvas, &cell.events, cell.is_past, area)
    }

    /// Stack event rows from the top of `area`, stopping at the first row
    /// that would cross its bottom edge.
    fn draw_events(&self, canvas: &mut Canvas, events: &[EventSummary], is_past: bool, area: CellRect) -> usize {
        let theme = &self.theme;
        let face = self.fonts.face(Weight::Regular, EVENT_SIZE);
        let bottom = area.y + area.height;
        let mut cursor = area.y;
        let mut drawn = 0;

        for event in events {
            if cursor + EVENT_ROW_HEIGHT > bottom {
                break;
            }
            let baseline = (cursor + 16) as f32;

            if event.all_day {
                let fill = if is_past { theme.muted } else { theme.ink };
                canvas.fill_rounded_rect(
                    area.x + EVENT_PADDING,
                    cursor,
                    area.width - 2 * EVENT_PADDING,
                    EVENT_ROW_HEIGHT,
                    PILL_RADIUS,
                    fill,
                );
                let room = (area.width - 4 * EVENT_PADDING) as f32;
                let text = face.truncate(&event.summary, room);
                canvas.text(&face, theme.background, (area.x + 2 * EVENT_PADDING) as f32, baseline, &text);
            } else {
                let (time_color, text_color) = if is_past {
                    (theme.muted, theme.muted)
                } else {
                    (theme.accent, theme.ink)
                };
                let time_x = (area.x + 2 * EVENT_PADDING) as f32;
                let time_width = face.measure(&event.time);
                canvas.text(&face, time_color, time_x, baseline, &event.time);

                let summary_x = time_x + time_width + EVENT_PADDING as f32;
                let room = area.width as f32 - 4.0 * EVENT_PADDING as f32 - time_width - EVENT_PADDING as f32;
                let text = face.truncate(&event.summary, room);
                canvas.text(&face, text_color, summary_x, baseline, &text);
            }

            cursor += EVENT_ROW_HEIGHT + EVENT_ROW_GAP;
            drawn += 1;
        }

        drawn
    }
}
