//! View-model types of a composed month grid.

use chrono::NaiveDate;
use serde::Serialize;

use calendar_common::YearMonth;

/// Render-ready projection of an event.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct EventSummary {
    /// Start time as `HH:MM`; empty for all-day events.
    pub time: String,
    pub summary: String,
    pub all_day: bool,
}

/// One day of the grid.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DayCell {
    pub date: NaiveDate,
    /// Day of month without padding, e.g. "7".
    pub day_label: String,
    /// Month abbreviation, e.g. "Mar". Only drawn on the 1st.
    pub month_short: String,
    pub is_today: bool,
    pub is_past: bool,
    pub is_weekend: bool,
    pub is_current_month: bool,
    /// Daytime temperature label, empty when unknown.
    pub day_temp: String,
    /// Night temperature label, empty exactly when `day_temp` is.
    pub night_temp: String,
    /// All-day events first, then timed events by start time.
    pub events: Vec<EventSummary>,
}

impl DayCell {
    pub fn is_first_of_month(&self) -> bool {
        self.day_label == "1"
    }

    pub fn has_temperatures(&self) -> bool {
        !self.day_temp.is_empty()
    }
}

/// One calendar week, Monday through Sunday.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct WeekRow {
    pub days: [DayCell; 7],
}

/// The composed month view.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct MonthGrid {
    pub month: YearMonth,
    pub weeks: Vec<WeekRow>,
}

impl MonthGrid {
    pub fn num_weeks(&self) -> usize {
        self.weeks.len()
    }

    /// All cells in row-major order.
    pub fn days(&self) -> impl Iterator<Item = &DayCell> {
        self.weeks.iter().flat_map(|week| week.days.iter())
    }

    pub fn cell(&self, date: NaiveDate) -> Option<&DayCell> {
        self.days().find(|cell| cell.date == date)
    }

    /// "March 2024".
    pub fn title(&self) -> String {
        self.month.title()
    }
}
