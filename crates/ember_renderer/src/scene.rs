//! The fixed, immutable set of spheres being rendered.

use crate::{Color, Material, RenderError, RenderResult, Sphere};
use ember_math::{Interval, Ray, Vec3};
use log::debug;

/// Nearest intersection found by [`Scene::intersect`].
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Hit {
    /// Distance along the ray
    pub t: f64,
    /// Index of the sphere that was hit
    pub index: usize,
}

/// An ordered collection of spheres, built once and shared read-only by
/// every rendering worker.
#[derive(Debug, Clone)]
pub struct Scene {
    spheres: Vec<Sphere>,
    lights: Vec<usize>,
}

impl Scene {
    /// Build a scene, rejecting malformed spheres.
    ///
    /// Radii must be finite and positive, colour channels must lie in
    /// [0, 1] and emission channels must be non-negative.
    pub fn new(spheres: Vec<Sphere>) -> RenderResult<Self> {
        if spheres.is_empty() {
            return Err(RenderError::EmptyScene);
        }

        for (index, sphere) in spheres.iter().enumerate() {
            validate_sphere(sphere).map_err(|reason| RenderError::InvalidSphere { index, reason })?;
        }

        Ok(Self::from_spheres(spheres))
    }

    fn from_spheres(spheres: Vec<Sphere>) -> Self {
        let lights: Vec<usize> = spheres
            .iter()
            .enumerate()
            .filter(|(_, s)| s.is_emissive())
            .map(|(i, _)| i)
            .collect();

        debug!("Scene built: {} spheres, {} lights", spheres.len(), lights.len());

        Self { spheres, lights }
    }

    /// The classic box: six huge spheres as walls, two mirror balls,
    /// one glass ball and a small bright light in the ceiling.
    pub fn cornell_box() -> Self {
        let grey = Color::splat(0.75);
        let white = Color::splat(0.999);

        Self::from_spheres(vec![
            // Left
            Sphere::new(Vec3::new(1e5 + 1.0, 40.8, 81.6), 1e5, Color::new(0.75, 0.25, 0.25), Material::Diffuse),
            // Right
            Sphere::new(Vec3::new(-1e5 + 99.0, 40.8, 81.6), 1e5, Color::new(0.25, 0.25, 0.75), Material::Diffuse),
            // Back
            Sphere::new(Vec3::new(50.0, 40.8, 1e5), 1e5, grey, Material::Diffuse),
            // Front (black, behind the camera)
            Sphere::new(Vec3::new(50.0, 40.8, -1e5 + 170.0), 1e5, Color::ZERO, Material::Diffuse),
            // Bottom
            Sphere::new(Vec3::new(50.0, 1e5, 81.6), 1e5, grey, Material::Diffuse),
            // Top
            Sphere::new(Vec3::new(50.0, -1e5 + 81.6, 81.6), 1e5, grey, Material::Diffuse),
            // Mirrors
            Sphere::new(Vec3::new(27.0, 16.5, 47.0), 16.5, white, Material::Specular),
            Sphere::new(Vec3::new(55.0, 11.0, 95.0), 11.0, white, Material::Specular),
            // Glass
            Sphere::new(Vec3::new(73.0, 16.5, 55.0), 20.0, white, Material::Refractive),
            // Light
            Sphere::new(Vec3::new(50.0, 81.6 - 16.5, 81.6), 1.5, Color::ZERO, Material::Diffuse)
                .with_emission(Color::splat(400.0)),
        ])
    }

    /// All spheres in scene order.
    pub fn spheres(&self) -> &[Sphere] {
        &self.spheres
    }

    /// Get the sphere at `index`.
    pub fn sphere(&self, index: usize) -> &Sphere {
        &self.spheres[index]
    }

    /// Emissive spheres with their scene indices.
    pub fn lights(&self) -> impl Iterator<Item = (usize, &Sphere)> + '_ {
        self.lights.iter().map(move |&i| (i, &self.spheres[i]))
    }

    /// Get the number of spheres.
    pub fn len(&self) -> usize {
        self.spheres.len()
    }

    /// Check if the scene is empty.
    pub fn is_empty(&self) -> bool {
        self.spheres.is_empty()
    }

    /// Nearest intersection over all spheres (linear scan).
    ///
    /// On an exact distance tie the lower index wins.
    pub fn intersect(&self, ray: &Ray) -> Option<Hit> {
        let mut nearest: Option<Hit> = None;

        for (index, sphere) in self.spheres.iter().enumerate() {
            if let Some(t) = sphere.intersect(ray) {
                if nearest.map_or(true, |hit| t < hit.t) {
                    nearest = Some(Hit { t, index });
                }
            }
        }

        nearest
    }
}

fn validate_sphere(sphere: &Sphere) -> Result<(), String> {
    if !(sphere.radius.is_finite() && sphere.radius > 0.0) {
        return Err(format!("radius must be positive, got {}", sphere.radius));
    }

    if !sphere.center.is_finite() {
        return Err(format!("center must be finite, got {:?}", sphere.center));
    }

    if !sphere.color.to_array().iter().all(|&c| Interval::UNIT.contains(c)) {
        return Err(format!("colour channels must lie in [0, 1], got {:?}", sphere.color));
    }

    if !sphere.emission.to_array().iter().all(|&e| e.is_finite() && e >= 0.0) {
        return Err(format!("emission must be non-negative, got {:?}", sphere.emission));
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_cornell_box_layout() {
        let scene = Scene::cornell_box();
        assert_eq!(scene.len(), 10);

        let lights: Vec<usize> = scene.lights().map(|(i, _)| i).collect();
        assert_eq!(lights, vec![9]);

        // The literal scene passes validation
        assert!(Scene::new(scene.spheres().to_vec()).is_ok());
    }

    #[test]
    fn test_nearest_hit() {
        let scene = Scene::new(vec![
            Sphere::new(Vec3::new(0.0, 0.0, -10.0), 1.0, Color::ONE, Material::Diffuse),
            Sphere::new(Vec3::new(0.0, 0.0, -4.0), 1.0, Color::ONE, Material::Diffuse),
            Sphere::new(Vec3::new(5.0, 0.0, -4.0), 1.0, Color::ONE, Material::Diffuse),
        ])
        .unwrap();

        let hit = scene.intersect(&Ray::new(Vec3::ZERO, -Vec3::Z)).unwrap();
        assert_eq!(hit.index, 1);
        assert!((hit.t - 3.0).abs() < 1e-9);

        assert_eq!(scene.intersect(&Ray::new(Vec3::ZERO, Vec3::Z)), None);
    }

    #[test]
    fn test_camera_sees_back_wall() {
        let scene = Scene::cornell_box();
        let ray = Ray::new(Vec3::new(50.0, 40.0, 160.0), -Vec3::Z);
        let hit = scene.intersect(&ray).unwrap();

        assert_eq!(hit.index, 2);
        // The wall curves away from the axis by a few micrometres
        assert!((hit.t - 160.0).abs() < 1e-3);
    }

    #[test]
    fn test_rejects_bad_radius() {
        let err = Scene::new(vec![
            Sphere::new(Vec3::ZERO, 1.0, Color::ONE, Material::Diffuse),
            Sphere::new(Vec3::ZERO, 0.0, Color::ONE, Material::Diffuse),
        ])
        .unwrap_err();

        assert!(matches!(err, RenderError::InvalidSphere { index: 1, .. }));
    }

    #[test]
    fn test_rejects_bad_color_and_emission() {
        let bright = Sphere::new(Vec3::ZERO, 1.0, Color::new(1.2, 0.0, 0.0), Material::Diffuse);
        assert!(matches!(
            Scene::new(vec![bright]),
            Err(RenderError::InvalidSphere { index: 0, .. })
        ));

        let negative = Sphere::new(Vec3::ZERO, 1.0, Color::ONE, Material::Diffuse)
            .with_emission(Color::new(1.0, -1.0, 1.0));
        assert!(matches!(
            Scene::new(vec![negative]),
            Err(RenderError::InvalidSphere { index: 0, .. })
        ));
    }

    #[test]
    fn test_rejects_empty() {
        assert!(matches!(Scene::new(Vec::new()), Err(RenderError::EmptyScene)));
    }
}
