//! Calendar events as delivered by the calendar provider.
//!
//! The provider hands over single instances (recurrences already expanded)
//! as JSON records whose `start`/`end` carry either a `date` (all-day) or a
//! `date_time` (timed). [`EventRecord::into_event`] validates a record and
//! resolves it into an [`Event`] in the display timezone.

use chrono::{DateTime, FixedOffset, NaiveDate, NaiveTime, TimeZone};
use serde::{Deserialize, Serialize};

use crate::error::{CalendarError, CalendarResult};

/// One calendar occurrence.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Event {
    pub summary: String,
    pub description: String,
    pub location: String,
    pub start: DateTime<FixedOffset>,
    /// Exclusive end. For all-day events this is midnight of the day after
    /// the last occupied day.
    pub end: DateTime<FixedOffset>,
    pub all_day: bool,
    pub calendar_name: String,
}

impl Event {
    /// All-day event covering `start` up to but not including `end`.
    pub fn all_day(summary: impl Into<String>, start: NaiveDate, end: NaiveDate) -> Self {
        Self {
            summary: summary.into(),
            description: String::new(),
            location: String::new(),
            start: midnight(start),
            end: midnight(end),
            all_day: true,
            calendar_name: String::new(),
        }
    }

    /// Timed event between two instants.
    pub fn timed(
        summary: impl Into<String>,
        start: DateTime<FixedOffset>,
        end: DateTime<FixedOffset>,
    ) -> Self {
        Self {
            summary: summary.into(),
            description: String::new(),
            location: String::new(),
            start,
            end,
            all_day: false,
            calendar_name: String::new(),
        }
    }

    pub fn with_calendar(mut self, name: impl Into<String>) -> Self {
        self.calendar_name = name.into();
        self
    }

    pub fn with_location(mut self, location: impl Into<String>) -> Self {
        self.location = location.into();
        self
    }

    /// Calendar date of the start instant, in the event's own offset.
    pub fn start_date(&self) -> NaiveDate {
        self.start.date_naive()
    }

    /// Calendar date of the end instant, in the event's own offset.
    pub fn end_date(&self) -> NaiveDate {
        self.end.date_naive()
    }
}

fn midnight(date: NaiveDate) -> DateTime<FixedOffset> {
    date.and_time(NaiveTime::MIN).and_utc().fixed_offset()
}

/// Start or end of a provider event. Exactly one field is expected.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct EventTime {
    /// `YYYY-MM-DD` for all-day events.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub date: Option<String>,
    /// RFC 3339 timestamp for timed events.
    #[serde(default, alias = "dateTime", skip_serializing_if = "Option::is_none")]
    pub date_time: Option<String>,
}

enum ParsedTime {
    Date(NaiveDate),
    Instant(DateTime<FixedOffset>),
}

impl EventTime {
    fn parse(&self, summary: &str, field: &str) -> CalendarResult<ParsedTime> {
        if let Some(date_time) = &self.date_time {
            return DateTime::parse_from_rfc3339(date_time.trim())
                .map(ParsedTime::Instant)
                .map_err(|e| {
                    CalendarError::invalid_event(
                        summary,
                        format!("{}.date_time '{}': {}", field, date_time, e),
                    )
                });
        }
        if let Some(date) = &self.date {
            return NaiveDate::parse_from_str(date.trim(), "%Y-%m-%d")
                .map(ParsedTime::Date)
                .map_err(|e| {
                    CalendarError::invalid_event(summary, format!("{}.date '{}': {}", field, date, e))
                });
        }
        Err(CalendarError::invalid_event(
            summary,
            format!("{} has neither date nor date_time", field),
        ))
    }
}

/// Event record in the provider's wire shape.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct EventRecord {
    #[serde(default)]
    pub summary: String,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub location: String,
    pub start: EventTime,
    pub end: EventTime,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub calendar_name: Option<String>,
}

impl EventRecord {
    /// Validate the record and resolve timed instants into `tz`.
    ///
    /// A `date` start makes the event all-day. Mixing a `date` start with a
    /// `date_time` end (or vice versa), unparsable values and an end before
    /// the start are all rejected.
    pub fn into_event<Tz: TimeZone>(self, tz: &Tz) -> CalendarResult<Event> {
        let start = self.start.parse(&self.summary, "start")?;
        let end = self.end.parse(&self.summary, "end")?;

        let (start, end, all_day) = match (start, end) {
            (ParsedTime::Date(s), ParsedTime::Date(e)) => (midnight(s), midnight(e), true),
            (ParsedTime::Instant(s), ParsedTime::Instant(e)) => (
                s.with_timezone(tz).fixed_offset(),
                e.with_timezone(tz).fixed_offset(),
                false,
            ),
            _ => {
                return Err(CalendarError::invalid_event(
                    &self.summary,
                    "start and end mix date and date_time",
                ))
            }
        };

        if end < start {
            return Err(CalendarError::invalid_event(
                &self.summary,
                format!("end {} is before start {}", end, start),
            ));
        }

        Ok(Event {
            summary: self.summary,
            description: self.description,
            location: self.location,
            start,
            end,
            all_day,
            calendar_name: self.calendar_name.unwrap_or_default(),
        })
    }
}

/// One calendar's worth of records in a grouped events file.
#[derive(Debug, Clone, Deserialize)]
struct CalendarFeed {
    #[serde(default)]
    name: String,
    #[serde(default)]
    events: Vec<EventRecord>,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(untagged)]
enum EventsFile {
    Flat(Vec<EventRecord>),
    Grouped { calendars: Vec<CalendarFeed> },
}

/// Parse an events file into a flat, file-ordered event list.
///
/// Accepts either a bare array of records or `{"calendars": [{"name", "events"}]}`.
/// In the grouped form each calendar's name is stamped onto records that
/// don't carry one.
pub fn parse_events_json<Tz: TimeZone>(json: &str, tz: &Tz) -> CalendarResult<Vec<Event>> {
    let file: EventsFile = serde_json::from_str(json)?;

    let records: Vec<EventRecord> = match file {
        EventsFile::Flat(records) => records,
        EventsFile::Grouped { calendars } => calendars
            .into_iter()
            .flat_map(|feed| {
                let name = feed.name;
                feed.events.into_iter().map(move |mut record| {
                    if record.calendar_name.is_none() && !name.is_empty() {
                        record.calendar_name = Some(name.clone());
                    }
                    record
                })
            })
            .collect(),
    };

    let events = records
        .into_iter()
        .map(|record| record.into_event(tz))
        .collect::<CalendarResult<Vec<_>>>()?;

    tracing::debug!(count = events.len(), "Parsed calendar events");
    Ok(events)
}
