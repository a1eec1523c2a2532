//! Common types and utilities shared across the calendar crates.

pub mod error;
pub mod event;
pub mod forecast;
pub mod time;

pub use error::{CalendarError, CalendarResult};
pub use event::{parse_events_json, Event, EventRecord, EventTime};
pub use forecast::{Forecast, HourlyForecastSample};
pub use time::{monday_weekday, weekday_labels, weekday_short_name, YearMonth};
