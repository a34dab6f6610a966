//! Recursive radiance estimator.
//!
//! Unbiased Monte Carlo path tracing with:
//! - Russian roulette termination reweighted by the survival probability
//! - Next event estimation toward every emissive sphere on diffuse bounces
//! - Fresnel-weighted splitting or sampling on glass

use std::f64::consts::{FRAC_1_PI, TAU};

use crate::material::refract;
use crate::random::gen_f64;
use crate::{Color, Material, Scene, Sphere};
use ember_math::{max_component, reflect, OrthonormalBasis, Ray, Vec3};
use rand::RngCore;

/// Path termination and branching parameters.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PathTracer {
    /// Russian roulette is played once depth exceeds this
    pub roulette_depth: u32,
    /// Hard cap; deeper paths return emission only
    pub max_depth: u32,
    /// Glass evaluates both branches up to and including this depth
    pub split_depth: u32,
}

impl Default for PathTracer {
    fn default() -> Self {
        Self {
            roulette_depth: 5,
            max_depth: 100,
            split_depth: 2,
        }
    }
}

/// Surface point being shaded.
struct SurfaceHit<'a> {
    sphere: &'a Sphere,
    point: Vec3,
    normal: Vec3,
    /// `normal` flipped to face against the incoming ray
    oriented: Vec3,
}

impl PathTracer {
    /// Same parameters with Russian roulette disabled; paths run to
    /// `max_depth` unless a surface has zero reflectance.
    pub fn without_roulette(self) -> Self {
        Self {
            roulette_depth: u32::MAX,
            ..self
        }
    }

    /// Estimate the radiance arriving along `ray`.
    ///
    /// `depth` is the number of bounces already taken (0 for camera rays).
    /// `include_emission` is false on the indirect bounce after a diffuse
    /// hit, whose light contribution was already counted by next event
    /// estimation.
    pub fn radiance(
        &self,
        scene: &Scene,
        ray: &Ray,
        depth: u32,
        rng: &mut dyn RngCore,
        include_emission: bool,
    ) -> Color {
        let Some(hit) = scene.intersect(ray) else {
            return Color::ZERO;
        };

        let sphere = scene.sphere(hit.index);
        let point = ray.at(hit.t);
        let normal = sphere.normal_at(point);
        let oriented = if normal.dot(ray.direction) < 0.0 {
            normal
        } else {
            -normal
        };
        let surface = SurfaceHit {
            sphere,
            point,
            normal,
            oriented,
        };

        let depth = depth + 1;
        let mut color = sphere.color;
        let p = max_component(color);
        if depth > self.roulette_depth || p == 0.0 {
            if gen_f64(rng) < p {
                color /= p;
            } else if include_emission {
                return sphere.emission;
            } else {
                return Color::ZERO;
            }
        }

        if depth > self.max_depth {
            return sphere.emission;
        }

        match sphere.material {
            Material::Diffuse => self.diffuse(scene, &surface, color, depth, rng, include_emission),
            Material::Specular => {
                let reflected = Ray::new(point, reflect(ray.direction, normal));
                sphere.emission + color * self.radiance(scene, &reflected, depth, rng, true)
            }
            Material::Refractive => self.refractive(scene, ray, &surface, color, depth, rng),
        }
    }

    fn diffuse(
        &self,
        scene: &Scene,
        surface: &SurfaceHit,
        color: Color,
        depth: u32,
        rng: &mut dyn RngCore,
        include_emission: bool,
    ) -> Color {
        // Cosine-weighted hemisphere sample around the oriented normal
        let frame = OrthonormalBasis::from_w(surface.oriented);
        let r1 = TAU * gen_f64(rng);
        let r2 = gen_f64(rng);
        let r2s = r2.sqrt();
        let direction = frame
            .local(r1.cos() * r2s, r1.sin() * r2s, (1.0 - r2).sqrt())
            .normalize();

        let direct = self.direct_lighting(scene, surface.point, surface.oriented, color, rng);

        let emission = if include_emission {
            surface.sphere.emission
        } else {
            Color::ZERO
        };

        let bounce = Ray::new(surface.point, direction);
        emission + direct + color * self.radiance(scene, &bounce, depth, rng, false)
    }

    /// Next event estimation: one shadow ray per emissive sphere.
    ///
    /// Each light is sampled uniformly over the cone it subtends from
    /// `point`. Lights that are occluded, below the horizon of `oriented`, or
    /// that contain `point` contribute nothing.
    pub fn direct_lighting(
        &self,
        scene: &Scene,
        point: Vec3,
        oriented: Vec3,
        color: Color,
        rng: &mut dyn RngCore,
    ) -> Color {
        let mut sum = Color::ZERO;

        for (index, light) in scene.lights() {
            let to_light = light.center - point;
            let dist2 = to_light.length_squared();
            let radius2 = light.radius * light.radius;
            if dist2 <= radius2 {
                continue;
            }

            let frame = OrthonormalBasis::from_w(to_light.normalize());
            let cos_a_max = (1.0 - radius2 / dist2).sqrt();

            let eps1 = gen_f64(rng);
            let eps2 = gen_f64(rng);
            let cos_a = 1.0 - eps1 + eps1 * cos_a_max;
            let sin_a = (1.0 - cos_a * cos_a).sqrt();
            let phi = TAU * eps2;
            let l = frame
                .local(phi.cos() * sin_a, phi.sin() * sin_a, cos_a)
                .normalize();

            let cos_theta = l.dot(oriented);
            if cos_theta <= 0.0 {
                continue;
            }

            let shadow = Ray::new(point, l);
            if scene.intersect(&shadow).is_some_and(|h| h.index == index) {
                let omega = TAU * (1.0 - cos_a_max);
                sum += color * light.emission * (cos_theta * omega * FRAC_1_PI);
            }
        }

        sum
    }

    fn refractive(
        &self,
        scene: &Scene,
        ray: &Ray,
        surface: &SurfaceHit,
        color: Color,
        depth: u32,
        rng: &mut dyn RngCore,
    ) -> Color {
        let emission = surface.sphere.emission;
        let reflected = Ray::new(surface.point, reflect(ray.direction, surface.normal));

        let Some(refraction) = refract(ray.direction, surface.normal, surface.oriented) else {
            // Total internal reflection
            return emission + color * self.radiance(scene, &reflected, depth, rng, true);
        };

        let transmitted = Ray::new(surface.point, refraction.direction);
        let re = refraction.reflectance;
        let tr = refraction.transmittance();

        let incoming = if depth <= self.split_depth {
            self.radiance(scene, &reflected, depth, rng, true) * re
                + self.radiance(scene, &transmitted, depth, rng, true) * tr
        } else {
            let p = 0.25 + 0.5 * re;
            if gen_f64(rng) < p {
                self.radiance(scene, &reflected, depth, rng, true) * (re / p)
            } else {
                self.radiance(scene, &transmitted, depth, rng, true) * (tr / (1.0 - p))
            }
        };

        emission + color * incoming
    }
}
