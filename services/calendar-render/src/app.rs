//! One render run: inputs to PNG, with the error panel as fallback.

use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use chrono::{DateTime, FixedOffset, Utc};
use chrono_tz::Tz;

use calendar_common::YearMonth;
use month_grid::{compose_month, ComposeConfig};
use renderer::{ErrorReport, HeaderInfo, RenderStats, Renderer};

use crate::config::AppConfig;
use crate::inputs::{load_events, load_forecast};

/// Per-invocation overrides on top of the configuration file.
#[derive(Debug, Clone, Default)]
pub struct RunOptions {
    pub output: Option<PathBuf>,
    pub events: Option<PathBuf>,
    pub forecast: Option<PathBuf>,
    /// Month to show instead of the current one.
    pub month: Option<YearMonth>,
    /// Fixed clock, mostly for reproducible output.
    pub now: Option<DateTime<FixedOffset>>,
    /// Extra header notice; a forecast problem takes precedence.
    pub status: Option<String>,
    pub battery: Option<String>,
    /// Write the composed grid as JSON instead of drawing it.
    pub dump_json: bool,
    /// Command line as invoked, shown on the error panel.
    pub invocation: String,
}

impl RunOptions {
    pub fn output_path(&self, config: &AppConfig) -> PathBuf {
        self.output.clone().unwrap_or_else(|| config.output.path.clone())
    }

    fn events_path<'a>(&'a self, config: &'a AppConfig) -> Option<&'a Path> {
        self.events.as_deref().or(config.inputs.events.as_deref())
    }

    fn forecast_path<'a>(&'a self, config: &'a AppConfig) -> Option<&'a Path> {
        self.forecast.as_deref().or(config.inputs.forecast.as_deref())
    }

    /// The current time in the display timezone.
    pub fn local_now(&self, tz: &Tz) -> DateTime<Tz> {
        match self.now {
            Some(now) => now.with_timezone(tz),
            None => Utc::now().with_timezone(tz),
        }
    }
}

/// What a successful run produced.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Outcome {
    Image { path: PathBuf, stats: RenderStats },
    Json { path: PathBuf },
}

/// Compose and render the month view.
pub fn run(config: &AppConfig, options: &RunOptions) -> Result<Outcome> {
    let tz = config.timezone()?;
    let now = options.local_now(&tz);

    let events = load_events(options.events_path(config), &tz)?;
    let forecast_input = load_forecast(options.forecast_path(config));

    let compose_config = ComposeConfig {
        max_events_per_day: config.calendar.max_events_per_day,
        month: options.month,
    };
    let grid = compose_month(
        &events,
        forecast_input.forecast.as_ref(),
        now.naive_local(),
        &compose_config,
    )
    .context("Failed to compose month grid")?;

    let output = options.output_path(config);

    if options.dump_json {
        let path = output.with_extension("json");
        let json = serde_json::to_string_pretty(&grid).context("Failed to serialize month grid")?;
        fs::write(&path, json).with_context(|| format!("Failed to write {:?}", path))?;
        tracing::info!(path = %path.display(), "Wrote month grid JSON");
        return Ok(Outcome::Json { path });
    }

    let header = HeaderInfo {
        generated_at: now.format("%Y-%m-%d %H:%M").to_string(),
        battery: options.battery.clone(),
        status: forecast_input.status.or_else(|| options.status.clone()),
    };

    let renderer = config.renderer()?;
    let stats = renderer
        .render_month_to_file(&grid, &header, config.display.width, config.display.height, &output)
        .context("Failed to render month view")?;

    tracing::info!(
        path = %output.display(),
        month = %grid.month,
        events = events.len(),
        hidden = stats.events_hidden,
        "Rendered calendar"
    );
    Ok(Outcome::Image { path: output, stats })
}

/// Detail rows for the error panel, in display order.
pub fn error_report(error: &anyhow::Error, options: &RunOptions, now: &str) -> ErrorReport {
    ErrorReport::new(format!("{:#}", error))
        .with_detail("Error", error.root_cause().to_string())
        .with_detail("Time", now)
        .with_detail("Args", options.invocation.clone())
        .with_detail("Version", env!("CARGO_PKG_VERSION"))
        .with_detail("OS/Arch", format!("{}/{}", std::env::consts::OS, std::env::consts::ARCH))
}

/// Pipeline stage the error came from, for the failure log.
fn failed_stage(error: &anyhow::Error) -> &'static str {
    for cause in error.chain() {
        if let Some(e) = cause.downcast_ref::<calendar_common::CalendarError>() {
            return e.stage();
        }
        if let Some(e) = cause.downcast_ref::<renderer::RenderError>() {
            return e.stage();
        }
    }
    "run"
}

/// Draw `error` as the error panel at the output path.
///
/// Falls back to the embedded fonts and default theme when the configured
/// ones are what failed.
pub fn render_failure(config: &AppConfig, options: &RunOptions, error: &anyhow::Error) -> Result<PathBuf> {
    let now = match config.timezone() {
        Ok(tz) => options.local_now(&tz).format("%Y-%m-%d %H:%M:%S").to_string(),
        Err(_) => options.local_now(&Tz::UTC).format("%Y-%m-%d %H:%M:%S UTC").to_string(),
    };
    let report = error_report(error, options, &now);
    tracing::debug!(stage = failed_stage(error), "Drawing error panel");

    let renderer = match config.renderer() {
        Ok(renderer) => renderer,
        Err(e) => {
            tracing::warn!(error = %e, "Using default fonts and theme for the error panel");
            Renderer::with_defaults()?
        }
    };

    let output = options.output_path(config);
    renderer
        .render_error_to_file(&report, config.display.width, config.display.height, &output)
        .context("Failed to render error panel")?;

    tracing::info!(path = %output.display(), "Wrote error panel");
    Ok(output)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_report_rows_in_order() {
        let error = anyhow::Error::new(calendar_common::CalendarError::invalid_event("Dentist", "missing start"))
            .context("Failed to parse events");
        let options = RunOptions {
            invocation: "calendar-render --events events.json".to_string(),
            ..Default::default()
        };
        let report = error_report(&error, &options, "2024-03-15 09:30:00");

        let keys: Vec<_> = report.details.iter().map(|(k, _)| k.as_str()).collect();
        assert_eq!(keys, vec!["Error", "Time", "Args", "Version", "OS/Arch"]);
        assert!(report.details[0].1.contains("Dentist"));
        assert!(report.details[0].1.contains("missing start"));
        assert!(!report.details[0].1.contains("Failed to parse events"));
        assert_eq!(report.details[2].1, "calendar-render --events events.json");
        assert!(report.message.contains("Failed to parse events"));
        assert!(report.message.contains("Dentist"));
    }

    #[test]
    fn test_failed_stage_walks_context_chain() {
        let error = anyhow::Error::new(calendar_common::CalendarError::invalid_event("Dentist", "missing start"))
            .context("Failed to parse events");
        assert_eq!(failed_stage(&error), "events");
        assert_eq!(failed_stage(&anyhow::anyhow!("plain")), "run");
    }

    #[test]
    fn test_options_override_config() {
        let mut config = AppConfig::default();
        config.inputs.events = Some(PathBuf::from("from-config.json"));
        let options = RunOptions {
            output: Some(PathBuf::from("/tmp/out.png")),
            ..Default::default()
        };
        assert_eq!(options.output_path(&config), PathBuf::from("/tmp/out.png"));
        assert_eq!(options.events_path(&config), Some(Path::new("from-config.json")));
        assert_eq!(RunOptions::default().output_path(&config), PathBuf::from("calendar.png"));
    }
}
