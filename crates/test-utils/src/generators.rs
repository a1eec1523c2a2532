//! Test data generators for creating synthetic forecast data.
//!
//! These generators create predictable, verifiable forecasts so expected
//! day/night temperatures can be worked out by hand.

use calendar_common::{Forecast, HourlyForecastSample};
use chrono::NaiveDate;

use crate::fixtures::local_time;

/// Creates an hourly forecast for `days` consecutive days from `start`.
///
/// Each sample's temperature is `temperature(day_index, hour)`.
///
/// # Example
///
/// ```
/// use test_utils::{date, hourly_forecast};
///
/// let forecast = hourly_forecast(date(2024, 3, 15), 2, |day, hour| (day * 100 + hour) as f64);
/// assert_eq!(forecast.hourly.len(), 48);
/// assert_eq!(forecast.hourly[25].temperature, 101.0);
/// ```
pub fn hourly_forecast<F>(start: NaiveDate, days: u32, temperature: F) -> Forecast
where
    F: Fn(u32, u32) -> f64,
{
    let mut hourly = Vec::with_capacity(days as usize * 24);
    for (day_index, day) in start.iter_days().take(days as usize).enumerate() {
        for hour in 0..24 {
            hourly.push(HourlyForecastSample::new(
                local_time(day, hour, 0),
                temperature(day_index as u32, hour),
            ));
        }
    }
    Forecast::new(hourly)
}

/// Creates a forecast with a simple diurnal cycle.
///
/// Night hours (00-05) read `night`, afternoon hours (12-17) read `day`
/// and every other hour reads the midpoint, so the windowed means are
/// exactly `day` and `night`.
pub fn diurnal_forecast(start: NaiveDate, days: u32, day: f64, night: f64) -> Forecast {
    hourly_forecast(start, days, |_, hour| match hour {
        0..=5 => night,
        12..=17 => day,
        _ => (day + night) / 2.0,
    })
}

/// Creates the provider's columnar JSON for a forecast.
pub fn forecast_json(forecast: &Forecast) -> String {
    let times: Vec<String> = forecast
        .hourly
        .iter()
        .map(|s| format!("\"{}\"", s.time.format("%Y-%m-%dT%H:%M")))
        .collect();
    let temps: Vec<String> = forecast
        .hourly
        .iter()
        .map(|s| format!("{}", s.temperature))
        .collect();
    format!(
        "{{\"hourly\":{{\"time\":[{}],\"temperature_2m\":[{}]}}}}",
        times.join(","),
        temps.join(",")
    )
}
