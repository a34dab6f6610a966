//! Sphere primitive for ray tracing.

use crate::{Color, Material};
use ember_math::{Interval, Ray, Vec3};

/// Roots closer than this are rejected to avoid self-intersection acne.
pub const HIT_EPSILON: f64 = 1e-4;

/// A sphere primitive carrying its own surface description.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Sphere {
    pub center: Vec3,
    pub radius: f64,
    pub emission: Color,
    pub color: Color,
    pub material: Material,
}

impl Sphere {
    /// Create a new non-emissive sphere.
    pub const fn new(center: Vec3, radius: f64, color: Color, material: Material) -> Self {
        Self {
            center,
            radius,
            emission: Color::ZERO,
            color,
            material,
        }
    }

    /// Set the emitted radiance.
    pub fn with_emission(mut self, emission: Color) -> Self {
        self.emission = emission;
        self
    }

    /// True if any emission channel is positive.
    pub fn is_emissive(&self) -> bool {
        self.emission.max_element() > 0.0
    }

    /// Distance along `ray` to the nearest intersection, if any.
    ///
    /// Expects a unit-length direction. The near root is preferred; the far
    /// root is used when the origin is inside the sphere or the near root is
    /// within [`HIT_EPSILON`].
    pub fn intersect(&self, ray: &Ray) -> Option<f64> {
        let op = self.center - ray.origin;
        let b = op.dot(ray.direction);
        let discriminant = b * b - op.dot(op) + self.radius * self.radius;
        if discriminant < 0.0 {
            return None;
        }

        let sqrtd = discriminant.sqrt();
        let range = Interval::new(HIT_EPSILON, f64::INFINITY);

        [b - sqrtd, b + sqrtd].into_iter().find(|t| range.surrounds(*t))
    }

    /// Outward unit normal at a surface point.
    #[inline]
    pub fn normal_at(&self, p: Vec3) -> Vec3 {
        (p - self.center).normalize()
    }
}
