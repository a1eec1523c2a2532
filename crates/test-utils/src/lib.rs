//! Shared test utilities for the calendar workspace.
//!
//! This crate provides common testing infrastructure including:
//! - Event fixtures for well-known scenarios
//! - Hourly forecast generators
//! - Scratch output paths
//!
//! # Usage
//!
//! Add to your crate's `Cargo.toml`:
//!
//! ```toml
//! [dev-dependencies]
//! test-utils = { path = "../test-utils" }
//! ```
//!
//! Then import in your tests:
//!
//! ```ignore
//! use test_utils::{fixtures, hourly_forecast};
//! ```

pub mod fixtures;
pub mod generators;

// Re-export commonly used items at the crate root
pub use fixtures::*;
pub use generators::*;

use std::path::PathBuf;

/// A scratch directory and a file path inside it.
///
/// Keep the returned `TempDir` alive for as long as the path is used.
pub fn scratch_file(name: &str) -> (tempfile::TempDir, PathBuf) {
    let dir = tempfile::tempdir().unwrap_or_else(|e| panic!("failed to create temp dir: {}", e));
    let path = dir.path().join(name);
    (dir, path)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_scratch_file_is_inside_dir() {
        let (dir, path) = scratch_file("out.png");
        assert!(path.starts_with(dir.path()));
        assert!(!path.exists());
    }
}
