//! Lighting types for the renderer.

use crate::colors;
use crate::prelude::Vec3;

/// A directional light that illuminates the scene uniformly from a direction.
///
/// Directional lights are ideal for simulating distant light sources like the sun,
/// where all rays are effectively parallel.
#[derive(Debug, Clone, Copy)]
pub struct DirectionalLight {
    /// The normalized direction the light is pointing (not where it comes from).
    pub direction: Vec3,
}

impl DirectionalLight {
    /// Create a new directional light pointing in the given direction.
    /// The direction will be normalized automatically.
    pub fn new(direction: Vec3) -> Self {
        DirectionalLight {
            direction: direction.normalize(),
        }
    }

    /// Calculate light intensity for flat shading.
    ///
    /// Returns intensity in [0.0, 1.0] based on how aligned the surface
    /// normal is with the inverse of the light ray.
    pub fn intensity(&self, normal: Vec3) -> f32 {
        (-normal.dot(self.direction)).clamp(0.0, 1.0)
    }

    /// Apply this light's flat-shading intensity to a face color.
    pub fn shade(&self, color: u32, normal: Vec3) -> u32 {
        colors::apply_intensity(color, self.intensity(normal))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn surface_facing_the_light_is_fully_lit() {
        // Light pointing toward -Z, normal facing +Z (toward the light)
        let light = DirectionalLight::new(Vec3::new(0.0, 0.0, -1.0));
        let normal = Vec3::new(0.0, 0.0, 1.0);
        assert!((light.intensity(normal) - 1.0).abs() < 0.001);
    }

    #[test]
    fn surface_facing_away_is_dark() {
        let light = DirectionalLight::new(Vec3::new(0.0, 0.0, -1.0));
        let normal = Vec3::new(0.0, 0.0, -1.0);
        assert!(light.intensity(normal) == 0.0);
    }

    #[test]
    fn angled_surface_is_partially_lit() {
        // Light pointing straight down (-Y), normal at 45 degrees
        let light = DirectionalLight::new(Vec3::new(0.0, -1.0, 0.0));
        let normal = Vec3::new(0.0, 1.0, 1.0).normalize();
        let intensity = light.intensity(normal);
        assert!((intensity - 0.707).abs() < 0.01);
    }

    #[test]
    fn shade_darkens_the_base_color() {
        let light = DirectionalLight::new(Vec3::new(0.0, 0.0, -1.0));
        // Normal at 60 degrees from the inverse ray: intensity 0.5
        let normal = Vec3::new(0.0, 3.0f32.sqrt(), 1.0).normalize();
        let shaded = light.shade(0xFF808080, normal);
        assert_eq!(shaded, 0xFF404040);
    }
}
