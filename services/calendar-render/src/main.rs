//! Calendar Renderer
//!
//! Draws the month view for the e-ink display from the events and forecast
//! files written by the fetchers.

use std::path::PathBuf;
use std::process::ExitCode;

use chrono::{DateTime, FixedOffset};
use clap::Parser;
use tracing::{error, info};
use tracing_subscriber::{fmt, EnvFilter};

use calendar_common::YearMonth;
use calendar_render::app::{self, Outcome, RunOptions};
use calendar_render::config::{load_config, AppConfig};

/// Calendar Renderer
#[derive(Parser, Debug)]
#[command(name = "calendar-render")]
#[command(about = "Render the month view PNG for an e-ink calendar display")]
#[command(version)]
struct Args {
    /// Configuration file (YAML)
    #[arg(short, long, default_value = "calendar.yaml", env = "CALENDAR_CONFIG")]
    config: PathBuf,

    /// Output image path, overrides output.path
    #[arg(short, long, env = "CALENDAR_OUTPUT")]
    output: Option<PathBuf>,

    /// Events JSON file, overrides inputs.events
    #[arg(long, env = "CALENDAR_EVENTS")]
    events: Option<PathBuf>,

    /// Hourly forecast JSON file, overrides inputs.forecast
    #[arg(long, env = "CALENDAR_FORECAST")]
    forecast: Option<PathBuf>,

    /// Month to render (YYYY-MM) instead of the current one
    #[arg(long)]
    month: Option<YearMonth>,

    /// Fixed current time (RFC 3339)
    #[arg(long, value_parser = parse_rfc3339)]
    now: Option<DateTime<FixedOffset>>,

    /// Status line shown in the header
    #[arg(long)]
    status: Option<String>,

    /// Battery label shown in the header, e.g. "87%"
    #[arg(long, env = "CALENDAR_BATTERY")]
    battery: Option<String>,

    /// Write the composed grid as JSON next to the output instead of a PNG
    #[arg(long)]
    dump_json: bool,

    /// Log level
    #[arg(long, default_value = "info", env = "RUST_LOG")]
    log_level: String,

    /// Log as JSON lines
    #[arg(long, env = "CALENDAR_LOG_JSON")]
    log_json: bool,
}

fn parse_rfc3339(s: &str) -> Result<DateTime<FixedOffset>, String> {
    DateTime::parse_from_rfc3339(s).map_err(|e| format!("expected an RFC 3339 timestamp: {}", e))
}

impl Args {
    fn run_options(&self) -> RunOptions {
        RunOptions {
            output: self.output.clone(),
            events: self.events.clone(),
            forecast: self.forecast.clone(),
            month: self.month,
            now: self.now,
            status: self.status.clone(),
            battery: self.battery.clone(),
            dump_json: self.dump_json,
            invocation: std::env::args().collect::<Vec<_>>().join(" "),
        }
    }
}

fn init_tracing(args: &Args) {
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(&args.log_level));

    let builder = fmt()
        .with_env_filter(filter)
        .with_target(true)
        .with_level(true)
        .with_writer(std::io::stderr);

    if args.log_json {
        builder.json().init();
    } else {
        builder.init();
    }
}

fn main() -> ExitCode {
    // Load .env file if present
    dotenvy::dotenv().ok();

    let args = Args::parse();
    init_tracing(&args);

    info!(config = %args.config.display(), "Starting calendar render");

    let config: AppConfig = match load_config(Some(&args.config)) {
        Ok(config) => config,
        Err(e) => {
            error!("Failed to load configuration: {:#}", e);
            return ExitCode::FAILURE;
        }
    };

    let options = args.run_options();
    match app::run(&config, &options) {
        Ok(Outcome::Image { path, stats }) => {
            info!(
                path = %path.display(),
                events_drawn = stats.events_drawn,
                events_hidden = stats.events_hidden,
                "Done"
            );
            ExitCode::SUCCESS
        }
        Ok(Outcome::Json { path }) => {
            info!(path = %path.display(), "Done");
            ExitCode::SUCCESS
        }
        Err(e) => {
            error!("Render failed: {:#}", e);
            if let Err(panel_error) = app::render_failure(&config, &options, &e) {
                error!("Failed to draw error panel: {:#}", panel_error);
            }
            ExitCode::FAILURE
        }
    }
}
