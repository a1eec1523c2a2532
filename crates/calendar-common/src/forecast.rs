//! Hourly weather forecast samples.

use chrono::{NaiveDate, NaiveDateTime, Timelike};
use serde::{Deserialize, Serialize};

use crate::error::{CalendarError, CalendarResult};

/// Timestamp format of the provider's hourly columns (local wall clock).
const HOURLY_TIME_FORMAT: &str = "%Y-%m-%dT%H:%M";

/// One hourly weather reading.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct HourlyForecastSample {
    /// Local wall-clock time of the reading.
    pub time: NaiveDateTime,
    /// Temperature in °C.
    pub temperature: f64,
}

impl HourlyForecastSample {
    pub fn new(time: NaiveDateTime, temperature: f64) -> Self {
        Self { time, temperature }
    }

    pub fn date(&self) -> NaiveDate {
        self.time.date()
    }

    pub fn hour(&self) -> u32 {
        self.time.hour()
    }
}

/// Hourly forecast, in no particular order.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Forecast {
    pub hourly: Vec<HourlyForecastSample>,
}

#[derive(Debug, Deserialize)]
struct HourlyColumns {
    time: Vec<String>,
    temperature_2m: Vec<f64>,
}

#[derive(Debug, Deserialize)]
struct ForecastResponse {
    hourly: HourlyColumns,
}

impl Forecast {
    pub fn new(hourly: Vec<HourlyForecastSample>) -> Self {
        Self { hourly }
    }

    pub fn is_empty(&self) -> bool {
        self.hourly.is_empty()
    }

    /// Samples whose local date is `date`.
    pub fn samples_on(&self, date: NaiveDate) -> impl Iterator<Item = &HourlyForecastSample> + '_ {
        self.hourly.iter().filter(move |s| s.date() == date)
    }

    /// Parse the provider's columnar hourly response.
    ///
    /// Timestamps that don't parse are skipped; columns of different lengths
    /// are rejected.
    pub fn from_json(json: &str) -> CalendarResult<Self> {
        let response: ForecastResponse = serde_json::from_str(json)
            .map_err(|e| CalendarError::InvalidForecast(e.to_string()))?;
        let HourlyColumns {
            time,
            temperature_2m,
        } = response.hourly;

        if time.len() != temperature_2m.len() {
            return Err(CalendarError::InvalidForecast(format!(
                "hourly.time has {} entries but hourly.temperature_2m has {}",
                time.len(),
                temperature_2m.len()
            )));
        }

        let mut skipped = 0usize;
        let hourly: Vec<_> = time
            .iter()
            .zip(temperature_2m)
            .filter_map(|(ts, temperature)| {
                match NaiveDateTime::parse_from_str(ts, HOURLY_TIME_FORMAT) {
                    Ok(time) => Some(HourlyForecastSample { time, temperature }),
                    Err(_) => {
                        skipped += 1;
                        None
                    }
                }
            })
            .collect();

        if skipped > 0 {
            tracing::warn!(skipped, "Skipped forecast samples with unparsable timestamps");
        }
        tracing::debug!(samples = hourly.len(), "Parsed hourly forecast");

        Ok(Self { hourly })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_from_json() {
        let json = r#"{
            "hourly": {
                "time": ["2024-03-10T00:00", "2024-03-10T01:00", "garbage"],
                "temperature_2m": [1.5, 2.0, 3.0]
            }
        }"#;
        let forecast = Forecast::from_json(json).unwrap();
        assert_eq!(forecast.hourly.len(), 2);
        assert_eq!(forecast.hourly[1].hour(), 1);
        assert_eq!(forecast.hourly[1].temperature, 2.0);
    }

    #[test]
    fn test_from_json_mismatched_columns() {
        let json = r#"{"hourly": {"time": ["2024-03-10T00:00"], "temperature_2m": []}}"#;
        let err = Forecast::from_json(json).unwrap_err();
        assert_eq!(err.stage(), "forecast");
    }

    #[test]
    fn test_samples_on() {
        let day = NaiveDate::from_ymd_opt(2024, 3, 10).unwrap();
        let forecast = Forecast::new(vec![
            HourlyForecastSample::new(day.and_hms_opt(13, 0, 0).unwrap(), 10.0),
            HourlyForecastSample::new(day.succ_opt().unwrap().and_hms_opt(13, 0, 0).unwrap(), 11.0),
        ]);
        assert_eq!(forecast.samples_on(day).count(), 1);
    }
}
