use std::path::PathBuf;

use clap::{Parser, ValueEnum};
use ember_renderer::RenderConfig;
use log::LevelFilter;

/// Log levels selectable on the command line
#[derive(Debug, Clone, Copy, ValueEnum)]
pub enum LogLevel {
    Error,
    Warn,
    Info,
    Debug,
    Trace,
}

impl From<LogLevel> for LevelFilter {
    fn from(level: LogLevel) -> Self {
        match level {
            LogLevel::Error => LevelFilter::Error,
            LogLevel::Warn => LevelFilter::Warn,
            LogLevel::Info => LevelFilter::Info,
            LogLevel::Debug => LevelFilter::Debug,
            LogLevel::Trace => LevelFilter::Trace,
        }
    }
}

/// Render the sphere box with unbiased path tracing
#[derive(Debug, Parser)]
#[command(name = "ember", version)]
pub struct Args {
    /// Total samples per pixel, split over 2x2 sub-pixels (rounded down to a multiple of 4)
    #[arg(default_value_t = 4)]
    pub samples: u32,

    /// Image width in pixels
    #[arg(long, default_value_t = 512)]
    pub width: u32,

    /// Image height in pixels
    #[arg(long, default_value_t = 384)]
    pub height: u32,

    /// Output file (.ppm or .png)
    #[arg(short, long, default_value = "image.ppm")]
    pub output: PathBuf,

    /// Base seed for the per-row random streams
    #[arg(long, default_value_t = 0)]
    pub seed: u64,

    /// Worker threads (0 = one per core)
    #[arg(short = 'j', long, default_value_t = 0)]
    pub threads: usize,

    /// Logging level; RUST_LOG overrides it per module
    #[arg(long, value_enum, default_value_t = LogLevel::Info)]
    pub log_level: LogLevel,
}

impl Args {
    /// Build the render configuration described by these arguments.
    pub fn render_config(&self) -> RenderConfig {
        RenderConfig::default()
            .with_resolution(self.width, self.height)
            .with_samples_per_pixel(self.samples)
            .with_seed(self.seed)
            .with_threads(self.threads)
    }
}
