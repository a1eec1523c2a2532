//! Error types for calendar input and date handling.

use thiserror::Error;

/// Result type alias using CalendarError.
pub type CalendarResult<T> = Result<T, CalendarError>;

/// Primary error type for calendar data.
#[derive(Debug, Error)]
pub enum CalendarError {
    // === Input Errors ===
    #[error("Invalid event '{summary}': {message}")]
    InvalidEvent { summary: String, message: String },

    #[error("Invalid forecast data: {0}")]
    InvalidForecast(String),

    #[error("Invalid parameter value for '{param}': {message}")]
    InvalidParameter { param: String, message: String },

    #[error("Failed to read data: {0}")]
    DataReadError(String),

    // === Date Errors ===
    #[error("Invalid month: {year}-{month:02}")]
    InvalidMonth { year: i32, month: u32 },

    #[error("Date arithmetic overflow: {0}")]
    DateOverflow(String),

    // === Composition Errors ===
    #[error("Invalid grid: {0}")]
    InvalidGrid(String),
}

impl CalendarError {
    /// Create an InvalidEvent error.
    pub fn invalid_event(summary: impl Into<String>, message: impl Into<String>) -> Self {
        Self::InvalidEvent {
            summary: summary.into(),
            message: message.into(),
        }
    }

    /// Create an InvalidParameter error.
    pub fn invalid_parameter(param: impl Into<String>, message: impl Into<String>) -> Self {
        Self::InvalidParameter {
            param: param.into(),
            message: message.into(),
        }
    }

    /// Name of the pipeline stage an error belongs to, for failure reports.
    pub fn stage(&self) -> &'static str {
        match self {
            CalendarError::InvalidEvent { .. } | CalendarError::DataReadError(_) => "events",
            CalendarError::InvalidForecast(_) => "forecast",
            CalendarError::InvalidParameter { .. } => "configuration",
            CalendarError::InvalidMonth { .. } | CalendarError::DateOverflow(_) => "date-grid",
            CalendarError::InvalidGrid(_) => "compose",
        }
    }
}

impl From<serde_json::Error> for CalendarError {
    fn from(err: serde_json::Error) -> Self {
        CalendarError::DataReadError(format!("JSON error: {}", err))
    }
}

impl From<std::io::Error> for CalendarError {
    fn from(err: std::io::Error) -> Self {
        CalendarError::DataReadError(err.to_string())
    }
}
