//! Camera for primary ray generation.

use crate::random::gen_f64;
use ember_math::{Ray, Vec3};
use rand::RngCore;

/// Pinhole camera looking into the box.
///
/// Pixel coordinates passed to [`Camera::ray`] count rows from the bottom of
/// the image.
#[derive(Debug, Clone)]
pub struct Camera {
    pub image_width: u32,
    pub image_height: u32,

    origin: Vec3,
    direction: Vec3,

    // Image plane spans, set by initialize()
    cx: Vec3,
    cy: Vec3,
}

impl Camera {
    /// Half-height of the image plane at unit distance.
    pub const FOV_SCALE: f64 = 0.5135;

    /// Primary rays start this far along their direction, in front of the
    /// front wall.
    pub const NEAR_OFFSET: f64 = 140.0;

    /// Create the fixed box camera for the given resolution.
    pub fn new(image_width: u32, image_height: u32) -> Self {
        let mut camera = Self {
            image_width,
            image_height,
            origin: Vec3::new(50.0, 52.0, 295.6),
            direction: Vec3::new(0.0, -0.042612, -1.0).normalize(),
            cx: Vec3::ZERO,
            cy: Vec3::ZERO,
        };
        camera.initialize();
        camera
    }

    fn initialize(&mut self) {
        let aspect = self.image_width as f64 / self.image_height as f64;
        self.cx = Vec3::new(aspect * Self::FOV_SCALE, 0.0, 0.0);
        self.cy = self.cx.cross(self.direction).normalize() * Self::FOV_SCALE;
    }

    pub fn origin(&self) -> Vec3 {
        self.origin
    }

    pub fn direction(&self) -> Vec3 {
        self.direction
    }

    /// Primary ray through sub-pixel (sx, sy) of pixel (x, y) offset by a
    /// filter displacement (dx, dy) in [-1, 1].
    pub fn ray(&self, x: u32, y: u32, sx: u32, sy: u32, dx: f64, dy: f64) -> Ray {
        let fx = ((sx as f64 + 0.5 + dx) / 2.0 + x as f64) / self.image_width as f64 - 0.5;
        let fy = ((sy as f64 + 0.5 + dy) / 2.0 + y as f64) / self.image_height as f64 - 0.5;
        let d = self.cx * fx + self.cy * fy + self.direction;

        Ray::new(self.origin + d * Self::NEAR_OFFSET, d.normalize())
    }

    /// Jittered primary ray with a tent filter offset.
    pub fn sample_ray(&self, x: u32, y: u32, sx: u32, sy: u32, rng: &mut dyn RngCore) -> Ray {
        let dx = tent(gen_f64(rng));
        let dy = tent(gen_f64(rng));
        self.ray(x, y, sx, sy, dx, dy)
    }
}

/// Map a uniform sample in [0, 1) to a triangular distribution on [-1, 1).
#[inline]
pub fn tent(u: f64) -> f64 {
    let r = 2.0 * u;
    if r < 1.0 {
        r.sqrt() - 1.0
    } else {
        1.0 - (2.0 - r).sqrt()
    }
}
