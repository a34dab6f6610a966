//! Double-precision math for Ember.
//!
//! The scene walls are spheres of radius 1e5, so everything here is `f64`.

// Re-export the glam double types for convenience
pub use glam::{dvec3, DVec3};

/// Point, direction, or RGB triple.
///
/// `normalize` is glam's pure `DVec3::normalize`: it returns a new unit
/// vector and leaves the operand unchanged. Normalizing a zero vector yields
/// NaN components, so callers must only normalize vectors known to be
/// non-zero.
pub type Vec3 = DVec3;

mod frame;
mod interval;
mod ray;

pub use frame::{max_component, reflect, OrthonormalBasis};
pub use interval::Interval;
pub use ray::Ray;
