//! Month view driver for the e-ink calendar.
//!
//! Loads configuration and the already-fetched event and forecast files,
//! composes the month grid, and writes the PNG the display shows. Fatal
//! failures are drawn as an error panel at the same output path.

pub mod app;
pub mod config;
pub mod inputs;
