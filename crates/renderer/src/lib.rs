//! Raster rendering of the month view for e-ink displays.
//!
//! Draws a composed [`month_grid::MonthGrid`] onto a fixed-size canvas:
//! - Header band with title, generation time and status line
//! - Weekday label band
//! - Equal-width, equal-height day cells with temperatures and event rows
//!
//! A simpler error panel shares the same fonts and primitives so fatal
//! failures still end up on the display.

pub mod calendar;
pub mod canvas;
pub mod error;
pub mod error_panel;
pub mod png;
pub mod text;
pub mod theme;

pub use calendar::{CellRect, GridGeometry, HeaderInfo, MonthImage, RenderStats, Renderer};
pub use error::{RenderError, RenderResult};
pub use error_panel::ErrorReport;
pub use text::{truncate_text, wrap_text, Face, Fonts, Weight, ELLIPSIS};
pub use theme::{Theme, ThemeConfig};
