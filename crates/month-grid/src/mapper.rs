//! Spreads events over the calendar dates they occupy.

use std::collections::BTreeMap;

use chrono::NaiveDate;

use calendar_common::{CalendarError, CalendarResult, Event};

use crate::range::GridRange;

/// Date to events active on that date, in input order.
///
/// Built and consumed within a single render; it borrows the events it
/// indexes.
#[derive(Debug, Default, Clone)]
pub struct EventsByDate<'a> {
    buckets: BTreeMap<NaiveDate, Vec<&'a Event>>,
}

impl<'a> EventsByDate<'a> {
    /// Events on `date`, empty when there are none.
    pub fn on(&self, date: NaiveDate) -> &[&'a Event] {
        self.buckets.get(&date).map(Vec::as_slice).unwrap_or(&[])
    }

    /// Number of dates with at least one event.
    pub fn num_dates(&self) -> usize {
        self.buckets.len()
    }

    pub fn dates(&self) -> impl Iterator<Item = NaiveDate> + '_ {
        self.buckets.keys().copied()
    }

    fn push(&mut self, date: NaiveDate, event: &'a Event) {
        self.buckets.entry(date).or_default().push(event);
    }
}

/// Inclusive date span an event occupies.
///
/// Providers give all-day events an exclusive end date (the day after the
/// last occupied day), so that end is pulled back by one day. A zero-length
/// all-day event still occupies its start date.
pub fn occupied_dates(event: &Event) -> CalendarResult<(NaiveDate, NaiveDate)> {
    let start = event.start_date();
    let mut end = event.end_date();

    if event.all_day && end > start {
        end = end.pred_opt().ok_or_else(|| {
            CalendarError::invalid_event(&event.summary, format!("end date {} underflows", end))
        })?;
    }

    if end < start {
        return Err(CalendarError::invalid_event(
            &event.summary,
            format!("ends on {} before it starts on {}", end, start),
        ));
    }

    Ok((start, end))
}

/// Map every event to each date it occupies.
pub fn map_events_by_date(events: &[Event]) -> CalendarResult<EventsByDate<'_>> {
    map_events(events, None)
}

/// Like [`map_events_by_date`], but only dates inside `range` get buckets.
///
/// Long-running events are clipped to the range instead of being expanded
/// day by day across their whole span.
pub fn map_events_in_range(events: &[Event], range: GridRange) -> CalendarResult<EventsByDate<'_>> {
    map_events(events, Some(range))
}

fn map_events(events: &[Event], range: Option<GridRange>) -> CalendarResult<EventsByDate<'_>> {
    let mut by_date = EventsByDate::default();

    for event in events {
        let (mut start, mut end) = occupied_dates(event)?;

        if let Some(range) = range {
            if end < range.start || start > range.end {
                continue;
            }
            start = start.max(range.start);
            end = end.min(range.end);
        }

        for date in start.iter_days().take_while(|d| *d <= end) {
            by_date.push(date, event);
        }
    }

    tracing::debug!(
        events = events.len(),
        dates = by_date.num_dates(),
        "Mapped events to dates"
    );
    Ok(by_date)
}
