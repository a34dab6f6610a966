//! Ember - CPU Path Tracing
//!
//! An unbiased Monte Carlo path tracer for a fixed scene of spheres:
//! diffuse, mirror and glass materials, next event estimation toward
//! spherical lights, and Russian roulette path termination.

mod camera;
mod error;
mod integrator;
mod material;
mod output;
pub mod random;
mod renderer;
mod scene;
mod sphere;

pub use camera::{tent, Camera};
pub use error::{RenderError, RenderResult};
pub use integrator::PathTracer;
pub use material::{
    normal_reflectance, refract, schlick, Color, Material, Refraction, AIR_IOR, GLASS_IOR,
};
pub use output::{save, write_ppm};
pub use renderer::{
    color_to_rgb8, render, render_pixel, to_display, ImageBuffer, RenderConfig, GAMMA,
};
pub use scene::{Hit, Scene};
pub use sphere::{Sphere, HIT_EPSILON};

/// Re-export the math types from ember_math
pub use ember_math::{Interval, Ray, Vec3};
