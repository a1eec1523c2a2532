//! Common test fixtures for calendar tests.
//!
//! This module provides pre-defined events and clock values that represent
//! the scenarios the month view has to get right.

use calendar_common::Event;
use chrono::{DateTime, FixedOffset, NaiveDate, NaiveDateTime};

/// Shorthand for a date; panics on invalid input.
pub fn date(year: i32, month: u32, day: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(year, month, day)
        .unwrap_or_else(|| panic!("invalid fixture date {}-{}-{}", year, month, day))
}

/// Shorthand for a local wall-clock time; panics on invalid input.
pub fn local_time(date: NaiveDate, hour: u32, minute: u32) -> NaiveDateTime {
    date.and_hms_opt(hour, minute, 0)
        .unwrap_or_else(|| panic!("invalid fixture time {}:{}", hour, minute))
}

/// Parse an RFC 3339 instant; panics on invalid input.
pub fn instant(s: &str) -> DateTime<FixedOffset> {
    DateTime::parse_from_rfc3339(s).unwrap_or_else(|e| panic!("invalid fixture instant {}: {}", s, e))
}

/// Common clock values for testing.
pub mod clock {
    use super::*;

    /// Friday 2024-03-15 09:30, mid-month in a 5-week March.
    pub fn mid_march_2024() -> NaiveDateTime {
        local_time(date(2024, 3, 15), 9, 30)
    }

    /// Monday 2024-04-01 07:00, a month starting on Monday.
    pub fn first_of_april_2024() -> NaiveDateTime {
        local_time(date(2024, 4, 1), 7, 0)
    }
}

/// Common event sets for testing.
pub mod events {
    use super::*;

    /// All-day "Conference" on March 10-12 2024 (provider end March 13).
    pub fn conference() -> Event {
        Event::all_day("Conference", date(2024, 3, 10), date(2024, 3, 13)).with_calendar("Work")
    }

    /// One-hour timed event starting at `hour:minute` UTC on `day`.
    pub fn meeting(summary: &str, day: NaiveDate, hour: u32, minute: u32) -> Event {
        let start = local_time(day, hour, minute).and_utc().fixed_offset();
        let end = start + chrono::Duration::hours(1);
        Event::timed(summary, start, end)
    }

    /// `count` timed events on one day, listed latest first so sorting matters.
    ///
    /// Summaries are "Event 00" (earliest) through "Event NN".
    pub fn busy_day(day: NaiveDate, count: u32) -> Vec<Event> {
        (0..count)
            .rev()
            .map(|i| meeting(&format!("Event {:02}", i), day, 7 + i / 2, (i % 2) * 30))
            .collect()
    }

    /// A realistic mix for a March 2024 render.
    pub fn march_2024_mix() -> Vec<Event> {
        let mut events = vec![
            conference(),
            meeting("Dentist", date(2024, 3, 5), 8, 15),
            meeting("Team sync", date(2024, 3, 15), 10, 0),
            meeting("Quarterly planning with the extended leadership group", date(2024, 3, 15), 13, 0),
            Event::all_day("Pay day", date(2024, 3, 15), date(2024, 3, 16)),
            Event::all_day("Ski trip", date(2024, 2, 27), date(2024, 3, 2)).with_location("Alps"),
            meeting("Late flight", date(2024, 3, 31), 22, 30),
        ];
        events.extend(busy_day(date(2024, 3, 20), 12));
        events
    }
}
