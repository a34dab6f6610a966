//! Core path tracing renderer.
//!
//! Implements stratified Monte Carlo rendering with:
//! - 2x2 sub-pixels per pixel, each with tent-filtered jitter
//! - Parallel rows via rayon, one random stream per row
//! - Gamma correction (1/2.2) on output

use std::sync::atomic::{AtomicUsize, Ordering};
use std::time::Instant;

use crate::random::StreamSeed;
use crate::{Camera, Color, PathTracer, RenderError, RenderResult, Scene};
use ember_math::Interval;
use log::{debug, info};
use rand::RngCore;
use rayon::prelude::*;

/// Display gamma applied when quantizing.
pub const GAMMA: f64 = 2.2;

/// Render configuration.
#[derive(Debug, Clone)]
pub struct RenderConfig {
    pub width: u32,
    pub height: u32,
    /// Estimator samples per sub-pixel; a pixel gets four times this many
    pub samples_per_subpixel: u32,
    /// Base seed for the per-row random streams
    pub seed: u64,
    /// Worker threads; 0 uses rayon's global pool
    pub threads: usize,
    pub tracer: PathTracer,
}

impl Default for RenderConfig {
    fn default() -> Self {
        Self {
            width: 512,
            height: 384,
            samples_per_subpixel: 1,
            seed: 0,
            threads: 0,
            tracer: PathTracer::default(),
        }
    }
}

impl RenderConfig {
    /// Set image resolution.
    pub fn with_resolution(mut self, width: u32, height: u32) -> Self {
        self.width = width;
        self.height = height;
        self
    }

    /// Set the total samples per pixel, split evenly over the four
    /// sub-pixels (remainders are dropped).
    pub fn with_samples_per_pixel(mut self, samples: u32) -> Self {
        self.samples_per_subpixel = samples / 4;
        self
    }

    /// Set the base random seed.
    pub fn with_seed(mut self, seed: u64) -> Self {
        self.seed = seed;
        self
    }

    /// Set the worker thread count.
    pub fn with_threads(mut self, threads: usize) -> Self {
        self.threads = threads;
        self
    }

    /// Total estimator samples per pixel.
    pub fn samples_per_pixel(&self) -> u32 {
        self.samples_per_subpixel * 4
    }

    /// Reject configurations that cannot produce an image.
    pub fn validate(&self) -> RenderResult<()> {
        if self.width == 0 || self.height == 0 {
            return Err(RenderError::InvalidDimensions {
                width: self.width,
                height: self.height,
            });
        }
        if self.samples_per_subpixel == 0 {
            return Err(RenderError::InvalidSamples(self.samples_per_subpixel));
        }
        Ok(())
    }
}

/// Linear colours of a finished render, row-major from the top row down.
#[derive(Debug, Clone, PartialEq)]
pub struct ImageBuffer {
    pub width: u32,
    pub height: u32,
    pub pixels: Vec<Color>,
}

impl ImageBuffer {
    /// Create a new image buffer filled with black.
    pub fn new(width: u32, height: u32) -> Self {
        Self {
            width,
            height,
            pixels: vec![Color::ZERO; width as usize * height as usize],
        }
    }

    /// Get the pixel at (x, y), y counted from the top.
    pub fn get(&self, x: u32, y: u32) -> Color {
        self.pixels[self.index(x, y)]
    }

    /// Set the pixel at (x, y), y counted from the top.
    pub fn set(&mut self, x: u32, y: u32, color: Color) {
        let i = self.index(x, y);
        self.pixels[i] = color;
    }

    fn index(&self, x: u32, y: u32) -> usize {
        y as usize * self.width as usize + x as usize
    }

    /// Gamma-encoded 8-bit RGB triplets in pixel order.
    pub fn to_rgb8(&self) -> Vec<u8> {
        let mut bytes = Vec::with_capacity(self.pixels.len() * 3);
        for color in &self.pixels {
            bytes.extend_from_slice(&color_to_rgb8(*color));
        }
        bytes
    }
}

/// Clamp to [0, 1], gamma-encode and round to [0, 255].
#[inline]
pub fn to_display(linear: f64) -> u8 {
    (Interval::UNIT.clamp(linear).powf(1.0 / GAMMA) * 255.0 + 0.5) as u8
}

/// Convert a linear colour to gamma-encoded 8-bit RGB.
pub fn color_to_rgb8(color: Color) -> [u8; 3] {
    [to_display(color.x), to_display(color.y), to_display(color.z)]
}

/// Render a single pixel with 2x2 stratified sub-pixels.
///
/// `y` counts rows from the bottom of the image. Each sub-pixel mean is
/// clamped to [0, 1] before contributing a quarter of the pixel.
pub fn render_pixel(
    camera: &Camera,
    scene: &Scene,
    tracer: &PathTracer,
    x: u32,
    y: u32,
    samples_per_subpixel: u32,
    rng: &mut dyn RngCore,
) -> Color {
    let mut pixel_color = Color::ZERO;
    let weight = 1.0 / samples_per_subpixel as f64;

    for sy in 0..2 {
        for sx in 0..2 {
            let mut sub = Color::ZERO;
            for _ in 0..samples_per_subpixel {
                let ray = camera.sample_ray(x, y, sx, sy, rng);
                sub += tracer.radiance(scene, &ray, 0, rng, true) * weight;
            }
            pixel_color += sub.clamp(Color::ZERO, Color::ONE) * 0.25;
        }
    }

    pixel_color
}

/// Render the entire scene to an image buffer.
///
/// Rows are rendered in parallel. Row `r` (from the top) always draws from
/// the stream seeded by `(config.seed, r)`, so the result is identical for
/// any thread count.
pub fn render(scene: &Scene, config: &RenderConfig) -> RenderResult<ImageBuffer> {
    config.validate()?;

    let camera = Camera::new(config.width, config.height);
    let mut image = ImageBuffer::new(config.width, config.height);

    info!(
        "Rendering {}x{} at {} samples per pixel",
        config.width,
        config.height,
        config.samples_per_pixel()
    );
    let start = Instant::now();

    if config.threads > 0 {
        let pool = rayon::ThreadPoolBuilder::new()
            .num_threads(config.threads)
            .build()?;
        debug!("Using a dedicated pool of {} threads", config.threads);
        pool.install(|| render_rows(&camera, scene, config, &mut image.pixels));
    } else {
        debug!("Using the global pool ({} threads)", rayon::current_num_threads());
        render_rows(&camera, scene, config, &mut image.pixels);
    }

    info!("Rendered in {:.2?}", start.elapsed());
    Ok(image)
}

fn render_rows(camera: &Camera, scene: &Scene, config: &RenderConfig, pixels: &mut [Color]) {
    let height = config.height as usize;
    let rows_done = AtomicUsize::new(0);

    pixels
        .par_chunks_mut(config.width as usize)
        .enumerate()
        .for_each(|(row, line)| {
            let mut rng = StreamSeed::new(config.seed, row as u32).into_rng();
            let y = (height - 1 - row) as u32;

            for (x, pixel) in line.iter_mut().enumerate() {
                *pixel = render_pixel(
                    camera,
                    scene,
                    &config.tracer,
                    x as u32,
                    y,
                    config.samples_per_subpixel,
                    &mut rng,
                );
            }

            // Best-effort progress: log each time another tenth completes
            let done = rows_done.fetch_add(1, Ordering::Relaxed) + 1;
            if done * 10 / height != (done - 1) * 10 / height {
                info!("Progress: {:5.1}%", 100.0 * done as f64 / height as f64);
            }
        });
}

#[cfg(test)]
mod tests {
    use super::*;

    fn small_config() -> RenderConfig {
        RenderConfig::default().with_resolution(64, 48).with_seed(1234)
    }

    #[test]
    fn test_to_display() {
        assert_eq!(to_display(0.0), 0);
        assert_eq!(to_display(-3.0), 0);
        assert_eq!(to_display(1.0), 255);
        assert_eq!(to_display(25.0), 255);
        assert_eq!(to_display(f64::NAN), 0);

        // 0.5^(1/2.2) * 255 + 0.5 = 186.5...
        assert_eq!(to_display(0.5), 186);
    }

    #[test]
    fn test_image_buffer_indexing() {
        let mut image = ImageBuffer::new(4, 3);
        image.set(3, 2, Color::ONE);

        assert_eq!(image.get(3, 2), Color::ONE);
        assert_eq!(image.pixels[11], Color::ONE);
        assert_eq!(image.get(0, 0), Color::ZERO);
        assert_eq!(image.to_rgb8().len(), 4 * 3 * 3);
    }

    #[test]
    fn test_samples_split() {
        assert_eq!(RenderConfig::default().with_samples_per_pixel(40).samples_per_subpixel, 10);
        assert_eq!(RenderConfig::default().with_samples_per_pixel(7).samples_per_subpixel, 1);
        assert_eq!(RenderConfig::default().with_samples_per_pixel(3).samples_per_subpixel, 0);
    }

    #[test]
    fn test_validate() {
        assert!(small_config().validate().is_ok());

        let zero_width = small_config().with_resolution(0, 48);
        assert!(matches!(
            zero_width.validate(),
            Err(RenderError::InvalidDimensions { width: 0, height: 48 })
        ));

        let no_samples = small_config().with_samples_per_pixel(2);
        let err = no_samples.validate().unwrap_err();
        assert!(matches!(err, RenderError::InvalidSamples(0)));
        assert!(err.to_string().starts_with("at least 4 samples per pixel"), "{err}");
        assert!(render(&Scene::cornell_box(), &no_samples).is_err());
    }

    #[test]
    fn test_render_pixel_clamped() {
        let scene = Scene::cornell_box();
        let camera = Camera::new(64, 48);
        let tracer = PathTracer::default();
        let mut rng = StreamSeed::new(0, 0).into_rng();

        for (x, y) in [(0, 0), (32, 24), (32, 47), (63, 10)] {
            let c = render_pixel(&camera, &scene, &tracer, x, y, 2, &mut rng);
            assert!(c.is_finite());
            assert!(c.min_element() >= 0.0 && c.max_element() <= 1.0, "{c:?}");
        }
    }

    #[test]
    fn test_render_deterministic() {
        let scene = Scene::cornell_box();
        let config = small_config();

        let a = render(&scene, &config).unwrap();
        let b = render(&scene, &config).unwrap();
        assert_eq!(a.to_rgb8(), b.to_rgb8());

        // A different seed gives a different noise pattern
        let c = render(&scene, &config.clone().with_seed(99)).unwrap();
        assert_ne!(a.to_rgb8(), c.to_rgb8());
    }

    #[test]
    fn test_render_independent_of_thread_count() {
        let scene = Scene::cornell_box();
        let single = render(&scene, &small_config().with_threads(1)).unwrap();
        let several = render(&scene, &small_config().with_threads(3)).unwrap();

        assert_eq!(single, several);
    }

    #[test]
    fn test_render_bounds_and_center() {
        let scene = Scene::cornell_box();
        let image = render(&scene, &small_config()).unwrap();

        assert_eq!(image.pixels.len(), 64 * 48);
        for c in &image.pixels {
            assert!(c.is_finite());
            assert!(c.min_element() >= 0.0 && c.max_element() <= 1.0);
        }

        // The back wall around the centre is lit
        let mut center = Color::ZERO;
        for y in 20..28 {
            for x in 28..36 {
                center += image.get(x, y);
            }
        }
        assert!(center.max_element() / 64.0 > 0.05, "{center:?}");
    }
}
