//! Error types for rendering.

use std::path::PathBuf;

use thiserror::Error;

/// Result type alias using RenderError.
pub type RenderResult<T> = Result<T, RenderError>;

/// Errors that can occur while drawing or writing an image.
#[derive(Error, Debug)]
pub enum RenderError {
    /// Width or height is zero.
    #[error("invalid canvas dimensions {width}x{height}")]
    InvalidDimensions { width: u32, height: u32 },

    /// The canvas cannot hold the requested layout.
    #[error("canvas {width}x{height} is too small for {what} (need at least {min_width}x{min_height})")]
    CanvasTooSmall {
        what: String,
        width: u32,
        height: u32,
        min_width: u32,
        min_height: u32,
    },

    /// The grid handed to the renderer is malformed.
    #[error("invalid grid: {0}")]
    InvalidGrid(String),

    /// Font data could not be parsed.
    #[error("failed to load font: {0}")]
    FontLoad(String),

    /// A colour string is not `#rrggbb`.
    #[error("invalid colour '{0}', expected #rrggbb")]
    InvalidColor(String),

    /// PNG encoding failed.
    #[error("PNG encoding failed: {0}")]
    Encode(String),

    /// Writing the image file failed.
    #[error("failed to write image to {path}: {source}")]
    Write {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

impl RenderError {
    /// Create a CanvasTooSmall error.
    pub fn too_small(
        what: impl Into<String>,
        (width, height): (u32, u32),
        (min_width, min_height): (u32, u32),
    ) -> Self {
        Self::CanvasTooSmall {
            what: what.into(),
            width,
            height,
            min_width,
            min_height,
        }
    }

    /// Name of the rendering stage an error belongs to, for failure reports.
    pub fn stage(&self) -> &'static str {
        match self {
            RenderError::InvalidDimensions { .. }
            | RenderError::CanvasTooSmall { .. }
            | RenderError::InvalidGrid(_) => "layout",
            RenderError::FontLoad(_) | RenderError::InvalidColor(_) => "resources",
            RenderError::Encode(_) => "encode",
            RenderError::Write { .. } => "write",
        }
    }
}
