//! Monday-aligned date span of a month view.

use chrono::{Days, NaiveDate};
use serde::Serialize;

use calendar_common::time::monday_weekday;
use calendar_common::{CalendarError, CalendarResult, YearMonth};

/// Inclusive span of whole weeks covering one month.
///
/// `start` is always a Monday and `end` always a Sunday.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct GridRange {
    pub start: NaiveDate,
    pub end: NaiveDate,
}

impl GridRange {
    /// Grid for `month`, padded with days of the neighbouring months.
    pub fn for_month(month: YearMonth) -> CalendarResult<Self> {
        let first = month.first_day()?;
        let last = month.last_day()?;

        let lead = u64::from(monday_weekday(first) - 1);
        let trail = u64::from(7 - monday_weekday(last));

        let start = first
            .checked_sub_days(Days::new(lead))
            .ok_or_else(|| CalendarError::DateOverflow(format!("grid start before {}", first)))?;
        let end = last
            .checked_add_days(Days::new(trail))
            .ok_or_else(|| CalendarError::DateOverflow(format!("grid end after {}", last)))?;

        let range = Self { start, end };
        if range.num_days() % 7 != 0 {
            return Err(CalendarError::InvalidGrid(format!(
                "{} days from {} to {} is not a whole number of weeks",
                range.num_days(),
                start,
                end
            )));
        }

        tracing::debug!(%month, %start, %end, weeks = range.num_weeks(), "Computed month grid range");
        Ok(range)
    }

    /// Number of days, both ends included.
    pub fn num_days(&self) -> usize {
        ((self.end - self.start).num_days() + 1).max(0) as usize
    }

    pub fn num_weeks(&self) -> usize {
        self.num_days() / 7
    }

    pub fn contains(&self, date: NaiveDate) -> bool {
        date >= self.start && date <= self.end
    }

    /// Every date of the span in ascending order.
    pub fn dates(&self) -> impl Iterator<Item = NaiveDate> {
        self.start.iter_days().take(self.num_days())
    }
}
