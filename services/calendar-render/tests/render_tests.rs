//! End-to-end runs of the renderer service against files on disk.

use std::fs;
use std::path::{Path, PathBuf};

use calendar_render::app::{render_failure, run, Outcome, RunOptions};
use calendar_render::config::AppConfig;
use test_utils::{date, diurnal_forecast, forecast_json, instant};

// ============================================================================
// Helper functions
// ============================================================================

const EVENTS_JSON: &str = r#"{
  "calendars": [
    {
      "name": "Work",
      "events": [
        {"summary": "Conference", "start": {"date": "2024-03-10"}, "end": {"date": "2024-03-13"}},
        {"summary": "Team sync", "start": {"dateTime": "2024-03-15T10:00:00+01:00"}, "end": {"dateTime": "2024-03-15T11:00:00+01:00"}}
      ]
    },
    {
      "name": "Home",
      "events": [
        {"summary": "Dentist", "location": "Main St", "start": {"date_time": "2024-03-18T08:15:00Z"}, "end": {"date_time": "2024-03-18T09:00:00Z"}}
      ]
    }
  ]
}"#;

struct Workspace {
    _dir: tempfile::TempDir,
    root: PathBuf,
}

impl Workspace {
    fn new() -> Self {
        let dir = tempfile::tempdir().unwrap();
        let root = dir.path().to_path_buf();
        Self { _dir: dir, root }
    }

    fn write(&self, name: &str, content: &str) -> PathBuf {
        let path = self.root.join(name);
        fs::write(&path, content).unwrap();
        path
    }

    fn path(&self, name: &str) -> PathBuf {
        self.root.join(name)
    }
}

fn options(ws: &Workspace) -> RunOptions {
    RunOptions {
        output: Some(ws.path("calendar.png")),
        events: Some(ws.write("events.json", EVENTS_JSON)),
        forecast: Some(ws.write(
            "forecast.json",
            &forecast_json(&diurnal_forecast(date(2024, 3, 15), 8, 14.0, 2.0)),
        )),
        now: Some(instant("2024-03-15T09:30:00+01:00")),
        invocation: "calendar-render --now 2024-03-15T09:30:00+01:00".to_string(),
        ..Default::default()
    }
}

fn png_size(path: &Path) -> (u32, u32) {
    let image = image::open(path).unwrap();
    (image.width(), image.height())
}

// ============================================================================
// Successful runs
// ============================================================================

#[test]
fn test_renders_png() {
    let ws = Workspace::new();
    let mut config = AppConfig::default();
    config.calendar.timezone = "Europe/Prague".to_string();

    let outcome = run(&config, &options(&ws)).unwrap();
    match outcome {
        Outcome::Image { path, stats } => {
            assert_eq!(path, ws.path("calendar.png"));
            assert_eq!(png_size(&path), (800, 480));
            // Conference x3, Team sync, Dentist
            assert_eq!(stats.events_drawn + stats.events_hidden, 5);
        }
        other => panic!("unexpected outcome {:?}", other),
    }
}

#[test]
fn test_display_size_is_honoured() {
    let ws = Workspace::new();
    let mut config = AppConfig::default();
    config.display.width = 1200;
    config.display.height = 825;

    run(&config, &options(&ws)).unwrap();
    assert_eq!(png_size(&ws.path("calendar.png")), (1200, 825));
}

#[test]
fn test_missing_forecast_still_renders() {
    let ws = Workspace::new();
    let mut opts = options(&ws);
    opts.forecast = Some(ws.path("no-such-forecast.json"));

    let outcome = run(&AppConfig::default(), &opts).unwrap();
    assert!(matches!(outcome, Outcome::Image { .. }));
    assert!(ws.path("calendar.png").exists());
}

#[test]
fn test_dump_json() {
    let ws = Workspace::new();
    let mut opts = options(&ws);
    opts.dump_json = true;
    opts.month = Some("2024-04".parse().unwrap());

    let outcome = run(&AppConfig::default(), &opts).unwrap();
    assert_eq!(outcome, Outcome::Json { path: ws.path("calendar.json") });
    assert!(!ws.path("calendar.png").exists());

    let json: serde_json::Value =
        serde_json::from_str(&fs::read_to_string(ws.path("calendar.json")).unwrap()).unwrap();
    assert_eq!(json["month"]["month"], 4);
    assert_eq!(json["weeks"][0]["days"][0]["date"], "2024-04-01");
}

// ============================================================================
// Failures
// ============================================================================

#[test]
fn test_invalid_events_fail_and_panel_is_drawn() {
    let ws = Workspace::new();
    let mut opts = options(&ws);
    opts.events = Some(ws.write(
        "events.json",
        r#"[{"summary": "Backwards", "start": {"date": "2024-03-12"}, "end": {"date": "2024-03-10"}}]"#,
    ));
    let config = AppConfig::default();

    let err = run(&config, &opts).unwrap_err();
    assert!(format!("{:#}", err).contains("Backwards"));
    assert!(!ws.path("calendar.png").exists());

    let path = render_failure(&config, &opts, &err).unwrap();
    assert_eq!(path, ws.path("calendar.png"));
    assert_eq!(png_size(&path), (800, 480));
}

#[test]
fn test_canvas_too_small_is_reported() {
    let ws = Workspace::new();
    let mut config = AppConfig::default();
    config.display.width = 100;
    config.display.height = 100;

    let err = run(&config, &options(&ws)).unwrap_err();
    assert!(format!("{:#}", err).contains("too small"));
}
