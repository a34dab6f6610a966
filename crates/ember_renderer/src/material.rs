//! Surface materials and dielectric helpers.

use ember_math::Vec3;

/// Color type alias (RGB reflectance, emission, or radiance)
pub type Color = Vec3;

/// Index of refraction outside every object.
pub const AIR_IOR: f64 = 1.0;

/// Index of refraction of the refractive material.
pub const GLASS_IOR: f64 = 1.5;

/// How a surface redirects incoming light.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Material {
    /// Lambertian reflector, sampled with next-event estimation.
    Diffuse,
    /// Perfect mirror.
    Specular,
    /// Glass: Fresnel-weighted mix of reflection and refraction.
    Refractive,
}

/// Outcome of refracting a unit direction at a dielectric boundary.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Refraction {
    /// Transmitted unit direction.
    pub direction: Vec3,
    /// Fresnel reflectance from Schlick's approximation.
    pub reflectance: f64,
}

impl Refraction {
    /// Fraction of light transmitted.
    pub fn transmittance(&self) -> f64 {
        1.0 - self.reflectance
    }
}

/// Reflectance at normal incidence between two media.
#[inline]
pub fn normal_reflectance(n1: f64, n2: f64) -> f64 {
    let a = n2 - n1;
    let b = n2 + n1;
    a * a / (b * b)
}

/// Schlick's approximation for reflectance.
#[inline]
pub fn schlick(r0: f64, cosine: f64) -> f64 {
    let c = 1.0 - cosine;
    r0 + (1.0 - r0) * c * c * c * c * c
}

/// Refract `d` through a glass surface with outward normal `n`.
///
/// `oriented` is `n` flipped to face against `d`. Returns `None` on total
/// internal reflection.
pub fn refract(d: Vec3, n: Vec3, oriented: Vec3) -> Option<Refraction> {
    let into = n.dot(oriented) > 0.0;
    let nnt = if into { AIR_IOR / GLASS_IOR } else { GLASS_IOR / AIR_IOR };
    let ddn = d.dot(oriented);
    let cos2t = 1.0 - nnt * nnt * (1.0 - ddn * ddn);

    if cos2t < 0.0 {
        return None;
    }

    let sign = if into { 1.0 } else { -1.0 };
    let direction = (d * nnt - n * (sign * (ddn * nnt + cos2t.sqrt()))).normalize();

    let cosine = if into { -ddn } else { direction.dot(n) };
    let reflectance = schlick(normal_reflectance(AIR_IOR, GLASS_IOR), cosine);

    Some(Refraction {
        direction,
        reflectance,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_normal_reflectance_glass() {
        assert!((normal_reflectance(AIR_IOR, GLASS_IOR) - 0.04).abs() < 1e-12);
    }

    #[test]
    fn test_schlick_limits() {
        let r0 = 0.04;
        assert!((schlick(r0, 1.0) - r0).abs() < 1e-12);
        assert!((schlick(r0, 0.0) - 1.0).abs() < 1e-12);
    }

    #[test]
    fn test_refract_head_on() {
        // Entering glass straight down: no bending, reflectance = R0
        let d = -Vec3::Y;
        let n = Vec3::Y;
        let r = refract(d, n, n).unwrap();

        assert!((r.direction - d).length() < 1e-12);
        assert!((r.reflectance - 0.04).abs() < 1e-12);
        assert!((r.transmittance() - 0.96).abs() < 1e-12);
    }

    #[test]
    fn test_refract_bends_toward_normal() {
        let d = Vec3::new(1.0, -1.0, 0.0).normalize();
        let n = Vec3::Y;
        let r = refract(d, n, n).unwrap();

        // sin(theta_t) = sin(45deg) / 1.5
        let sin_t = r.direction.x;
        assert!((sin_t - (0.5f64.sqrt() / 1.5)).abs() < 1e-12);
        assert!((r.direction.length() - 1.0).abs() < 1e-12);
        assert!(r.reflectance > 0.04 && r.reflectance < 1.0);
    }

    #[test]
    fn test_total_internal_reflection() {
        // Leaving glass at a grazing angle, past the ~41.8 degree critical angle
        let d = Vec3::new(0.9, 0.1, 0.0).normalize();
        let n = Vec3::Y;
        let oriented = -n;
        assert!(refract(d, n, oriented).is_none());
    }
}
