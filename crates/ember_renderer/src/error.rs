//! Error types for scene construction, configuration and output.
//!
//! The estimator itself never fails; everything here is raised before
//! rendering starts or while writing the finished image.

use thiserror::Error;

/// Errors that can occur while setting up a render or saving its result.
#[derive(Error, Debug)]
pub enum RenderError {
    #[error("at least 4 samples per pixel are required, one per sub-pixel (got {0} per sub-pixel)")]
    InvalidSamples(u32),

    #[error("image dimensions must be non-zero (got {width}x{height})")]
    InvalidDimensions { width: u32, height: u32 },

    #[error("invalid sphere at index {index}: {reason}")]
    InvalidSphere { index: usize, reason: String },

    #[error("scene contains no spheres")]
    EmptyScene,

    #[error("failed to build worker pool: {0}")]
    ThreadPool(#[from] rayon::ThreadPoolBuildError),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("image encoding error: {0}")]
    Image(#[from] image::ImageError),

    #[error("unsupported output format '{0}' (expected .ppm or .png)")]
    UnsupportedFormat(String),
}

/// Result type for render setup and output operations.
pub type RenderResult<T> = Result<T, RenderError>;
