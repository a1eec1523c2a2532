//! Builds the week rows of day cells for one month.

use std::cmp::Ordering;

use chrono::{Datelike, NaiveDate, NaiveDateTime};

use calendar_common::time::{is_weekend, month_short_name};
use calendar_common::{CalendarError, CalendarResult, Event, Forecast, YearMonth};

use crate::mapper::{map_events_in_range, EventsByDate};
use crate::range::GridRange;
use crate::temperature::day_night_temperatures;
use crate::types::{DayCell, EventSummary, MonthGrid, WeekRow};

/// Default cap on events listed per day.
pub const DEFAULT_MAX_EVENTS_PER_DAY: usize = 10;

/// Options for composing a month grid.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ComposeConfig {
    /// Maximum events kept per day; the rest are dropped after sorting.
    pub max_events_per_day: usize,
    /// Month to show. Defaults to the month of `now`.
    pub month: Option<YearMonth>,
}

impl Default for ComposeConfig {
    fn default() -> Self {
        Self {
            max_events_per_day: DEFAULT_MAX_EVENTS_PER_DAY,
            month: None,
        }
    }
}

/// Display order: all-day events first, then ascending start. Stable.
pub fn event_order(a: &Event, b: &Event) -> Ordering {
    b.all_day
        .cmp(&a.all_day)
        .then_with(|| a.start.cmp(&b.start))
}

/// Sort a day's events into display order.
pub fn sort_events(events: &mut [&Event]) {
    events.sort_by(|a, b| event_order(a, b));
}

fn summarize(event: &Event) -> EventSummary {
    EventSummary {
        time: if event.all_day {
            String::new()
        } else {
            event.start.format("%H:%M").to_string()
        },
        summary: event.summary.clone(),
        all_day: event.all_day,
    }
}

struct DayContext<'a> {
    today: NaiveDate,
    month: YearMonth,
    by_date: &'a EventsByDate<'a>,
    forecast: Option<&'a Forecast>,
    max_events: usize,
}

impl DayContext<'_> {
    fn cell(&self, date: NaiveDate) -> DayCell {
        let mut events: Vec<&Event> = self.by_date.on(date).to_vec();
        sort_events(&mut events);
        if events.len() > self.max_events {
            tracing::debug!(
                %date,
                dropped = events.len() - self.max_events,
                "Dropping events over the per-day cap"
            );
            events.truncate(self.max_events);
        }

        let temps = day_night_temperatures(self.forecast, date, self.today);

        DayCell {
            date,
            day_label: date.day().to_string(),
            month_short: month_short_name(date),
            is_today: date == self.today,
            is_past: date < self.today,
            is_weekend: is_weekend(date),
            is_current_month: self.month.contains(date),
            day_temp: temps.day,
            night_temp: temps.night,
            events: events.into_iter().map(summarize).collect(),
        }
    }
}

/// Compose the month view.
///
/// `now` is the local wall-clock time; it decides the today/past flags, the
/// temperature window and, unless `config.month` is set, which month is shown.
pub fn compose_month(
    events: &[Event],
    forecast: Option<&Forecast>,
    now: NaiveDateTime,
    config: &ComposeConfig,
) -> CalendarResult<MonthGrid> {
    if config.max_events_per_day == 0 {
        return Err(CalendarError::invalid_parameter(
            "max_events_per_day",
            "must be at least 1",
        ));
    }

    let today = now.date();
    let month = config.month.unwrap_or_else(|| YearMonth::of(today));
    let range = GridRange::for_month(month)?;
    let by_date = map_events_in_range(events, range)?;

    let ctx = DayContext {
        today,
        month,
        by_date: &by_date,
        forecast,
        max_events: config.max_events_per_day,
    };

    let cells: Vec<DayCell> = range.dates().map(|date| ctx.cell(date)).collect();
    if cells.len() % 7 != 0 {
        return Err(CalendarError::InvalidGrid(format!(
            "{} cells do not split into weeks",
            cells.len()
        )));
    }

    let mut weeks = Vec::with_capacity(cells.len() / 7);
    let mut cells = cells.into_iter();
    loop {
        let week: Vec<DayCell> = cells.by_ref().take(7).collect();
        if week.is_empty() {
            break;
        }
        let days: [DayCell; 7] = week.try_into().map_err(|week: Vec<DayCell>| {
            CalendarError::InvalidGrid(format!("week row with {} days", week.len()))
        })?;
        weeks.push(WeekRow { days });
    }

    tracing::debug!(%month, weeks = weeks.len(), events = events.len(), "Composed month grid");
    Ok(MonthGrid { month, weeks })
}
