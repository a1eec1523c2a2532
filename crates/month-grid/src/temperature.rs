//! Representative day and night temperature per date.

use std::ops::Range;

use chrono::{Days, NaiveDate};
use serde::Serialize;

use calendar_common::Forecast;

/// Temperatures are only shown for `[today, today + TEMPERATURE_WINDOW_DAYS)`.
pub const TEMPERATURE_WINDOW_DAYS: u64 = 8;

/// Hours averaged for the daytime figure.
pub const DAY_HOURS: Range<u32> = 12..18;

/// Hours averaged for the night figure.
pub const NIGHT_HOURS: Range<u32> = 0..6;

/// Formatted day/night temperatures of one date. Both empty or both set.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct Temperatures {
    pub day: String,
    pub night: String,
}

impl Temperatures {
    pub fn is_empty(&self) -> bool {
        self.day.is_empty()
    }
}

/// Whether `date` falls in the forecast display window starting at `today`.
pub fn in_window(date: NaiveDate, today: NaiveDate) -> bool {
    match today.checked_add_days(Days::new(TEMPERATURE_WINDOW_DAYS)) {
        Some(window_end) => date >= today && date < window_end,
        None => false,
    }
}

/// Mean temperature of the samples on `date` whose hour is in `hours`.
pub fn mean_temperature(forecast: &Forecast, date: NaiveDate, hours: Range<u32>) -> Option<f64> {
    let (sum, count) = forecast
        .samples_on(date)
        .filter(|s| hours.contains(&s.hour()))
        .fold((0.0, 0usize), |(sum, count), s| (sum + s.temperature, count + 1));

    (count > 0).then(|| sum / count as f64)
}

/// Whole-degree label, rounded half away from zero, e.g. "21°".
pub fn format_temperature(value: f64) -> String {
    format!("{}°", value.round() as i64)
}

/// Day and night temperature labels for `date`.
///
/// Empty when there is no forecast, when `date` is outside the display
/// window, or when either hour band has no samples. A missing band never
/// shows up as "0°".
pub fn day_night_temperatures(
    forecast: Option<&Forecast>,
    date: NaiveDate,
    today: NaiveDate,
) -> Temperatures {
    let Some(forecast) = forecast else {
        return Temperatures::default();
    };
    if !in_window(date, today) {
        return Temperatures::default();
    }

    match (
        mean_temperature(forecast, date, DAY_HOURS),
        mean_temperature(forecast, date, NIGHT_HOURS),
    ) {
        (Some(day), Some(night)) => Temperatures {
            day: format_temperature(day),
            night: format_temperature(night),
        },
        _ => Temperatures::default(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use calendar_common::HourlyForecastSample;

    fn d(day: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(2024, 3, day).unwrap()
    }

    fn sample(day: u32, hour: u32, temperature: f64) -> HourlyForecastSample {
        HourlyForecastSample::new(d(day).and_hms_opt(hour, 0, 0).unwrap(), temperature)
    }

    fn forecast_for(day: u32) -> Forecast {
        Forecast::new(vec![
            sample(day, 1, 2.0),
            sample(day, 3, 4.0),
            sample(day, 12, 20.0),
            sample(day, 17, 23.0),
            // Outside both bands
            sample(day, 9, 100.0),
            sample(day, 18, 100.0),
        ])
    }

    #[test]
    fn test_means_per_band() {
        let forecast = forecast_for(10);
        assert_eq!(mean_temperature(&forecast, d(10), DAY_HOURS), Some(21.5));
        assert_eq!(mean_temperature(&forecast, d(10), NIGHT_HOURS), Some(3.0));
        assert_eq!(mean_temperature(&forecast, d(11), DAY_HOURS), None);
    }

    #[test]
    fn test_formatted_in_window() {
        let forecast = forecast_for(10);
        let temps = day_night_temperatures(Some(&forecast), d(10), d(10));
        assert_eq!(temps.day, "22°");
        assert_eq!(temps.night, "3°");
    }

    #[test]
    fn test_window_bounds() {
        let today = d(10);
        assert!(!in_window(d(9), today));
        assert!(in_window(d(10), today));
        assert!(in_window(d(17), today));
        assert!(!in_window(d(18), today));

        let forecast = forecast_for(18);
        assert!(day_night_temperatures(Some(&forecast), d(18), today).is_empty());
        let forecast = forecast_for(9);
        assert!(day_night_temperatures(Some(&forecast), d(9), today).is_empty());
    }

    #[test]
    fn test_missing_band_empties_both() {
        let forecast = Forecast::new(vec![sample(10, 13, 15.0)]);
        let temps = day_night_temperatures(Some(&forecast), d(10), d(10));
        assert_eq!(temps, Temperatures::default());
    }

    #[test]
    fn test_zero_degrees_is_a_real_value() {
        let forecast = Forecast::new(vec![sample(10, 2, 0.0), sample(10, 14, 0.2)]);
        let temps = day_night_temperatures(Some(&forecast), d(10), d(10));
        assert_eq!(temps.day, "0°");
        assert_eq!(temps.night, "0°");
    }

    #[test]
    fn test_no_forecast() {
        assert!(day_night_temperatures(None, d(10), d(10)).is_empty());
    }

    #[test]
    fn test_format_temperature() {
        assert_eq!(format_temperature(21.4), "21°");
        assert_eq!(format_temperature(21.5), "22°");
        assert_eq!(format_temperature(-0.3), "0°");
        assert_eq!(format_temperature(-2.5), "-3°");
    }
}
