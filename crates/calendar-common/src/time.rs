//! Date helpers for month-based calendar layouts.

use std::fmt;
use std::str::FromStr;

use chrono::{Datelike, Month, NaiveDate, Weekday};
use serde::{Deserialize, Serialize};

use crate::error::{CalendarError, CalendarResult};

/// Weekday number with Monday = 1 through Sunday = 7.
pub fn monday_weekday(date: NaiveDate) -> u32 {
    date.weekday().number_from_monday()
}

/// Weekdays in display order, Monday first.
pub const fn all_weekdays() -> [Weekday; 7] {
    [
        Weekday::Mon,
        Weekday::Tue,
        Weekday::Wed,
        Weekday::Thu,
        Weekday::Fri,
        Weekday::Sat,
        Weekday::Sun,
    ]
}

const WEEKDAYS_SHORT_EN: [&str; 7] = ["Mon", "Tue", "Wed", "Thu", "Fri", "Sat", "Sun"];

/// Three-letter English label, e.g. "Mon".
pub const fn weekday_short_name(val: Weekday) -> &'static str {
    WEEKDAYS_SHORT_EN[val.num_days_from_monday() as usize]
}

/// Column labels of a Monday-first week.
pub fn weekday_labels() -> [&'static str; 7] {
    all_weekdays().map(weekday_short_name)
}

/// Saturday or Sunday.
pub fn is_weekend(date: NaiveDate) -> bool {
    matches!(date.weekday(), Weekday::Sat | Weekday::Sun)
}

/// A calendar month in the proleptic Gregorian calendar.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct YearMonth {
    year: i32,
    month: u32,
}

impl YearMonth {
    /// Create a year/month pair, rejecting months outside 1..=12.
    pub fn new(year: i32, month: u32) -> CalendarResult<Self> {
        if !(1..=12).contains(&month) || NaiveDate::from_ymd_opt(year, month, 1).is_none() {
            return Err(CalendarError::InvalidMonth { year, month });
        }
        Ok(Self { year, month })
    }

    /// The month a date falls in.
    pub fn of(date: NaiveDate) -> Self {
        Self {
            year: date.year(),
            month: date.month(),
        }
    }

    pub fn year(self) -> i32 {
        self.year
    }

    pub fn month(self) -> u32 {
        self.month
    }

    pub fn first_day(self) -> CalendarResult<NaiveDate> {
        NaiveDate::from_ymd_opt(self.year, self.month, 1).ok_or(CalendarError::InvalidMonth {
            year: self.year,
            month: self.month,
        })
    }

    /// Last day of the month (28th through 31st).
    pub fn last_day(self) -> CalendarResult<NaiveDate> {
        let (year, month) = if self.month == 12 {
            (self.year + 1, 1)
        } else {
            (self.year, self.month + 1)
        };
        NaiveDate::from_ymd_opt(year, month, 1)
            .and_then(|next| next.pred_opt())
            .ok_or(CalendarError::InvalidMonth {
                year: self.year,
                month: self.month,
            })
    }

    pub fn contains(self, date: NaiveDate) -> bool {
        date.year() == self.year && date.month() == self.month
    }

    /// Full English month name, e.g. "March".
    pub fn name(self) -> &'static str {
        month_of(self.month).name()
    }

    /// Title used by the month view header, e.g. "March 2024".
    pub fn title(self) -> String {
        format!("{} {}", self.name(), self.year)
    }
}

impl fmt::Display for YearMonth {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:04}-{:02}", self.year, self.month)
    }
}

impl FromStr for YearMonth {
    type Err = CalendarError;

    /// Parse `YYYY-MM`.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let invalid = || CalendarError::invalid_parameter("month", format!("expected YYYY-MM, got '{}'", s));
        let (year, month) = s.trim().split_once('-').ok_or_else(invalid)?;
        let year: i32 = year.parse().map_err(|_| invalid())?;
        let month: u32 = month.parse().map_err(|_| invalid())?;
        Self::new(year, month)
    }
}

fn month_of(number: u32) -> Month {
    // YearMonth guarantees 1..=12
    Month::try_from(number as u8).unwrap_or(Month::January)
}

/// Three-letter English month abbreviation, e.g. "Mar".
pub fn month_short_name(date: NaiveDate) -> String {
    date.format("%b").to_string()
}
