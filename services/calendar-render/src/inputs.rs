//! Reading the files left by the calendar and weather fetchers.

use std::fs;
use std::path::Path;

use anyhow::{Context, Result};
use chrono_tz::Tz;

use calendar_common::{parse_events_json, Event, Forecast};

/// Load events, converting timed ones into `tz`.
///
/// No configured file means no events. A configured file that cannot be
/// read or contains an invalid record is fatal.
pub fn load_events(path: Option<&Path>, tz: &Tz) -> Result<Vec<Event>> {
    let path = match path {
        Some(path) => path,
        None => {
            tracing::info!("No events file configured, rendering an empty month");
            return Ok(Vec::new());
        }
    };

    let json = fs::read_to_string(path)
        .with_context(|| format!("Failed to read events from {:?}", path))?;
    let events = parse_events_json(&json, tz)
        .with_context(|| format!("Failed to parse events from {:?}", path))?;

    tracing::info!(path = %path.display(), count = events.len(), "Loaded events");
    Ok(events)
}

/// Forecast plus the header notice to show when it is unusable.
#[derive(Debug, Default)]
pub struct ForecastInput {
    pub forecast: Option<Forecast>,
    pub status: Option<String>,
}

impl ForecastInput {
    fn degraded(reason: impl Into<String>) -> Self {
        let reason = reason.into();
        tracing::warn!(%reason, "Rendering without temperatures");
        Self {
            forecast: None,
            status: Some(format!("Weather: {}", reason)),
        }
    }
}

/// Load the hourly forecast. Never fails: problems become a status line.
pub fn load_forecast(path: Option<&Path>) -> ForecastInput {
    let path = match path {
        Some(path) => path,
        None => return ForecastInput::default(),
    };

    let json = match fs::read_to_string(path) {
        Ok(json) => json,
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
            return ForecastInput::degraded("forecast unavailable");
        }
        Err(e) => return ForecastInput::degraded(format!("cannot read forecast ({})", e)),
    };

    match Forecast::from_json(&json) {
        Ok(forecast) if forecast.is_empty() => ForecastInput::degraded("no forecast data"),
        Ok(forecast) => {
            tracing::info!(path = %path.display(), samples = forecast.hourly.len(), "Loaded forecast");
            ForecastInput {
                forecast: Some(forecast),
                status: None,
            }
        }
        Err(e) => ForecastInput::degraded(format!("invalid forecast ({})", e)),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use test_utils::{date, diurnal_forecast, forecast_json, scratch_file};

    #[test]
    fn test_no_forecast_configured_is_silent() {
        let input = load_forecast(None);
        assert!(input.forecast.is_none());
        assert!(input.status.is_none());
    }

    #[test]
    fn test_missing_forecast_is_degraded() {
        let input = load_forecast(Some(Path::new("/nonexistent/forecast.json")));
        assert!(input.forecast.is_none());
        assert_eq!(input.status.as_deref(), Some("Weather: forecast unavailable"));
    }

    #[test]
    fn test_malformed_forecast_is_degraded() {
        let (_dir, path) = scratch_file("forecast.json");
        fs::write(&path, "{\"hourly\": ").unwrap();
        let input = load_forecast(Some(&path));
        assert!(input.forecast.is_none());
        assert!(input.status.unwrap().starts_with("Weather: invalid forecast"));
    }

    #[test]
    fn test_empty_forecast_is_degraded() {
        let (_dir, path) = scratch_file("forecast.json");
        fs::write(&path, r#"{"hourly":{"time":[],"temperature_2m":[]}}"#).unwrap();
        let input = load_forecast(Some(&path));
        assert_eq!(input.status.as_deref(), Some("Weather: no forecast data"));
    }

    #[test]
    fn test_forecast_loads() {
        let (_dir, path) = scratch_file("forecast.json");
        let forecast = diurnal_forecast(date(2024, 3, 15), 2, 15.0, 5.0);
        fs::write(&path, forecast_json(&forecast)).unwrap();

        let input = load_forecast(Some(&path));
        assert_eq!(input.forecast, Some(forecast));
        assert!(input.status.is_none());
    }

    #[test]
    fn test_events_file_errors_are_fatal() {
        let tz = chrono_tz::UTC;
        assert!(load_events(Some(Path::new("/nonexistent/events.json")), &tz).is_err());

        let (_dir, path) = scratch_file("events.json");
        fs::write(&path, r#"[{"summary": "Broken", "start": {}, "end": {}}]"#).unwrap();
        let err = load_events(Some(&path), &tz).unwrap_err();
        assert!(format!("{:#}", err).contains("Broken"));
    }

    #[test]
    fn test_no_events_configured() {
        assert!(load_events(None, &chrono_tz::UTC).unwrap().is_empty());
    }
}
