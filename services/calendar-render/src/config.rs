//! YAML configuration for the renderer service.
//!
//! Every section is optional; unset values fall back to defaults. String
//! values may reference environment variables as `${VAR}` or
//! `${VAR:-default}`.

use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use chrono_tz::Tz;
use serde::{Deserialize, Serialize};

use month_grid::compose::DEFAULT_MAX_EVENTS_PER_DAY;
use renderer::{Fonts, Renderer, ThemeConfig};

pub const DEFAULT_WIDTH: u32 = 800;
pub const DEFAULT_HEIGHT: u32 = 480;
pub const DEFAULT_TIMEZONE: &str = "UTC";
pub const DEFAULT_OUTPUT: &str = "calendar.png";

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct AppConfig {
    pub display: DisplayConfig,
    pub calendar: CalendarConfig,
    pub inputs: InputsConfig,
    pub output: OutputConfig,
    pub theme: ThemeConfig,
    pub fonts: FontsConfig,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct DisplayConfig {
    pub width: u32,
    pub height: u32,
}

impl Default for DisplayConfig {
    fn default() -> Self {
        Self {
            width: DEFAULT_WIDTH,
            height: DEFAULT_HEIGHT,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct CalendarConfig {
    pub max_events_per_day: usize,
    /// IANA name, e.g. "Europe/Prague".
    pub timezone: String,
}

impl Default for CalendarConfig {
    fn default() -> Self {
        Self {
            max_events_per_day: DEFAULT_MAX_EVENTS_PER_DAY,
            timezone: DEFAULT_TIMEZONE.to_string(),
        }
    }
}

/// Files written by the fetch collaborators.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct InputsConfig {
    pub events: Option<PathBuf>,
    pub forecast: Option<PathBuf>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct OutputConfig {
    pub path: PathBuf,
}

impl Default for OutputConfig {
    fn default() -> Self {
        Self {
            path: PathBuf::from(DEFAULT_OUTPUT),
        }
    }
}

/// TrueType files replacing the embedded faces. Both or neither.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct FontsConfig {
    pub regular: Option<PathBuf>,
    pub bold: Option<PathBuf>,
}

impl AppConfig {
    pub fn timezone(&self) -> Result<Tz> {
        let name = self.calendar.timezone.trim();
        name.parse::<Tz>()
            .map_err(|e| anyhow::anyhow!("Invalid timezone '{}': {}", name, e))
    }

    /// Build a renderer from the configured fonts and theme.
    pub fn renderer(&self) -> Result<Renderer> {
        let fonts = match (&self.fonts.regular, &self.fonts.bold) {
            (Some(regular), Some(bold)) => Fonts::from_files(regular, bold)?,
            (None, None) => Fonts::embedded()?,
            _ => anyhow::bail!("fonts.regular and fonts.bold must be set together"),
        };
        let theme = self.theme.resolve()?;
        Ok(Renderer::new(fonts, theme))
    }
}

// ============================================================================
// Loading Functions
// ============================================================================

/// Load the configuration file, or defaults when `path` is `None` or does
/// not exist.
pub fn load_config(path: Option<&Path>) -> Result<AppConfig> {
    let path = match path {
        Some(path) => path,
        None => return Ok(AppConfig::default()),
    };
    if !path.exists() {
        tracing::warn!(path = %path.display(), "Config file not found, using defaults");
        return Ok(AppConfig::default());
    }

    let content = fs::read_to_string(path)
        .with_context(|| format!("Failed to read config from {:?}", path))?;
    let config = parse_config(&content)
        .with_context(|| format!("Invalid config in {:?}", path))?;

    tracing::info!(path = %path.display(), "Loaded configuration");
    Ok(config)
}

/// Parse and validate configuration YAML.
pub fn parse_config(content: &str) -> Result<AppConfig> {
    let expanded = expand_env_vars(content)?;

    let yaml: serde_yaml::Value =
        serde_yaml::from_str(&expanded).with_context(|| "Failed to parse config YAML")?;

    // A file holding only comments is an empty document, not an empty mapping
    let config: AppConfig = if yaml.is_null() {
        AppConfig::default()
    } else {
        serde_yaml::from_value(yaml).with_context(|| "Failed to parse config YAML")?
    };

    validate_config(&config)?;
    Ok(config)
}

/// Replace every `${NAME}` and `${NAME:-fallback}` in the config text.
///
/// A `$` not followed by `{` is kept as is.
fn expand_env_vars(content: &str) -> Result<String> {
    let mut result = String::with_capacity(content.len());
    let mut chars = content.chars().peekable();

    while let Some(ch) = chars.next() {
        if ch == '$' && chars.peek() == Some(&'{') {
            chars.next();

            let mut reference = String::new();
            loop {
                match chars.next() {
                    Some('}') => break,
                    Some(c) => reference.push(c),
                    None => anyhow::bail!("Unclosed variable substitution: ${{{}", reference),
                }
            }

            result.push_str(&lookup_env(&reference)?);
        } else {
            result.push(ch);
        }
    }

    Ok(result)
}

/// Value for one `${...}` body. Unset or empty falls back when a
/// fallback is given, otherwise unset is an error.
fn lookup_env(reference: &str) -> Result<String> {
    let (name, fallback) = match reference.split_once(":-") {
        Some((name, fallback)) => (name.trim(), Some(fallback)),
        None => (reference.trim(), None),
    };
    match (std::env::var(name), fallback) {
        (Ok(value), Some(fallback)) if value.is_empty() => Ok(fallback.to_string()),
        (Ok(value), _) => Ok(value),
        (Err(_), Some(fallback)) => Ok(fallback.to_string()),
        (Err(_), None) => anyhow::bail!("Environment variable {} is not set", name),
    }
}

// ============================================================================
// Validation
// ============================================================================

fn validate_config(config: &AppConfig) -> Result<()> {
    anyhow::ensure!(
        config.display.width > 0 && config.display.height > 0,
        "Display size must be non-zero, got {}x{}",
        config.display.width,
        config.display.height
    );
    anyhow::ensure!(
        config.calendar.max_events_per_day > 0,
        "max_events_per_day must be at least 1"
    );
    anyhow::ensure!(
        !config.output.path.as_os_str().is_empty(),
        "Output path cannot be empty"
    );
    anyhow::ensure!(
        config.fonts.regular.is_some() == config.fonts.bold.is_some(),
        "fonts.regular and fonts.bold must be set together"
    );

    config.timezone()?;
    config.theme.resolve()?;

    Ok(())
}
