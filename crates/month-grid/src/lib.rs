//! Month-view grid composition.
//!
//! Turns a flat event list and an hourly forecast into a [`MonthGrid`] of
//! fully resolved day cells, ready to be drawn:
//!
//! 1. [`range`] - Monday-aligned date span covering the month
//! 2. [`mapper`] - spreads events over every date they occupy
//! 3. [`temperature`] - day/night temperature per date
//! 4. [`compose`] - builds week rows of [`DayCell`]s

pub mod compose;
pub mod mapper;
pub mod range;
pub mod temperature;
pub mod types;

pub use compose::{compose_month, sort_events, ComposeConfig};
pub use mapper::{map_events_by_date, map_events_in_range, EventsByDate};
pub use range::GridRange;
pub use temperature::{day_night_temperatures, Temperatures};
pub use types::{DayCell, EventSummary, MonthGrid, WeekRow};
