//! Analytic ocean surface built from a fixed set of Gerstner components.
//!
//! Physics only ever samples the vertical term. The horizontal Gerstner
//! displacement is applied to the rendered surface mesh, so the hull floats
//! on the analytic height while the visible crests still sharpen.

use bevy::math::{Vec2, Vec3};
use std::f32::consts::TAU;

use super::surface::SurfaceMesh;
use crate::error::WaveError;

/// Gravity constant for the deep-water dispersion relation (m/s²)
pub const GRAVITY: f32 = 9.8;

/// Offset used for the finite-difference surface normal (world units)
pub const NORMAL_EPSILON: f32 = 0.1;

/// A single Gerstner component. Immutable once built.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct WaveComponent {
    direction: Vec2,
    wavenumber: f32,
    angular_frequency: f32,
    amplitude: f32,
    steepness: f32,
}

impl WaveComponent {
    /// Build a component travelling along `direction`.
    ///
    /// The direction is normalized here. Degenerate values are rejected
    /// rather than clamped.
    pub fn new(
        direction: Vec2,
        wavelength: f32,
        amplitude: f32,
        steepness: f32,
    ) -> Result<Self, WaveError> {
        let length = direction.length();
        if !length.is_finite() || length <= f32::EPSILON {
            return Err(WaveError::ZeroDirection(direction.x, direction.y));
        }
        if !(wavelength > 0.0 && wavelength.is_finite()) {
            return Err(WaveError::NonPositiveWavelength(wavelength));
        }
        if !(0.0..=1.0).contains(&steepness) {
            return Err(WaveError::SteepnessOutOfRange(steepness));
        }
        if !(amplitude >= 0.0 && amplitude.is_finite()) {
            return Err(WaveError::NegativeAmplitude(amplitude));
        }

        let wavenumber = TAU / wavelength;
        Ok(Self {
            direction: direction / length,
            wavenumber,
            angular_frequency: (GRAVITY * wavenumber).sqrt(),
            amplitude,
            steepness,
        })
    }

    pub fn direction(&self) -> Vec2 {
        self.direction
    }

    pub fn wavenumber(&self) -> f32 {
        self.wavenumber
    }

    pub fn wavelength(&self) -> f32 {
        TAU / self.wavenumber
    }

    pub fn angular_frequency(&self) -> f32 {
        self.angular_frequency
    }

    pub fn amplitude(&self) -> f32 {
        self.amplitude
    }

    pub fn steepness(&self) -> f32 {
        self.steepness
    }

    /// Phase = k * (D · X) - ω * t
    #[inline]
    pub fn phase(&self, x: f32, z: f32, time: f32) -> f32 {
        self.wavenumber * (self.direction.x * x + self.direction.y * z)
            - self.angular_frequency * time
    }
}

/// The component set plus global scaling, evaluated at an explicit time.
#[derive(Debug, Clone, PartialEq)]
pub struct WaveSpectrum {
    components: Vec<WaveComponent>,
    distortion_scale: f32,
    sea_level: f32,
}

impl WaveSpectrum {
    pub fn components(&self) -> &[WaveComponent] {
        &self.components
    }

    pub fn distortion_scale(&self) -> f32 {
        self.distortion_scale
    }

    pub fn sea_level(&self) -> f32 {
        self.sea_level
    }

    /// Largest possible deviation from sea level.
    pub fn max_amplitude(&self) -> f32 {
        self.components.iter().map(|c| c.amplitude).sum::<f32>() * self.distortion_scale
    }

    pub fn height(&self, x: f32, z: f32, time: f32) -> f32 {
        let offset: f32 = self
            .components
            .iter()
            .map(|c| c.amplitude * c.phase(x, z, time).sin())
            .sum();
        self.sea_level + offset * self.distortion_scale
    }

    /// Full Gerstner displacement of the base point (x, sea level, z).
    pub fn displacement(&self, x: f32, z: f32, time: f32) -> Vec3 {
        let mut horizontal = Vec2::ZERO;
        let mut vertical = 0.0;

        for c in &self.components {
            let (sin_phase, cos_phase) = c.phase(x, z, time).sin_cos();
            horizontal += c.direction * (c.steepness * c.amplitude * cos_phase);
            vertical += c.amplitude * sin_phase;
        }

        Vec3::new(horizontal.x, vertical, horizontal.y) * self.distortion_scale
    }

    /// Symmetric finite-difference normal of the height function.
    pub fn normal(&self, x: f32, z: f32, time: f32) -> Vec3 {
        let e = NORMAL_EPSILON;
        let dh_dx = (self.height(x + e, z, time) - self.height(x - e, z, time)) / (2.0 * e);
        let dh_dz = (self.height(x, z + e, time) - self.height(x, z - e, time)) / (2.0 * e);
        Vec3::new(-dh_dx, 1.0, -dh_dz).normalize()
    }
}

/// The live ocean: spectrum, elapsed time and the optional render surface.
#[derive(Debug, Clone)]
pub struct WaveField {
    spectrum: WaveSpectrum,
    time: f32,
    surface: Option<SurfaceMesh>,
}

impl WaveField {
    pub fn new(components: Vec<WaveComponent>, distortion_scale: f32) -> Self {
        Self {
            spectrum: WaveSpectrum {
                components,
                distortion_scale,
                sea_level: 0.0,
            },
            time: 0.0,
            surface: None,
        }
    }

    /// A field with no components: height is sea level everywhere.
    pub fn flat() -> Self {
        Self::new(Vec::new(), 1.0)
    }

    pub fn with_sea_level(mut self, sea_level: f32) -> Self {
        self.spectrum.sea_level = sea_level;
        self
    }

    /// Attach a render surface; it is regenerated on every [`Self::update`].
    pub fn with_surface(mut self, mut surface: SurfaceMesh) -> Self {
        surface.regenerate(&self.spectrum, self.time);
        self.surface = Some(surface);
        self
    }

    pub fn spectrum(&self) -> &WaveSpectrum {
        &self.spectrum
    }

    pub fn components(&self) -> &[WaveComponent] {
        self.spectrum.components()
    }

    pub fn sea_level(&self) -> f32 {
        self.spectrum.sea_level
    }

    pub fn time(&self) -> f32 {
        self.time
    }

    pub fn max_amplitude(&self) -> f32 {
        self.spectrum.max_amplitude()
    }

    pub fn surface(&self) -> Option<&SurfaceMesh> {
        self.surface.as_ref()
    }

    /// Surface height at the current time.
    pub fn height_at(&self, x: f32, z: f32) -> f32 {
        self.spectrum.height(x, z, self.time)
    }

    /// Unit surface normal at the current time.
    pub fn normal_at(&self, x: f32, z: f32) -> Vec3 {
        self.spectrum.normal(x, z, self.time)
    }

    /// Mesh-space displacement at the current time.
    pub fn displacement_at(&self, x: f32, z: f32) -> Vec3 {
        self.spectrum.displacement(x, z, self.time)
    }

    /// Advance time and rebuild the render surface.
    ///
    /// Negative deltas are ignored so time stays monotonic.
    pub fn update(&mut self, dt: f32) {
        if dt > 0.0 {
            self.time += dt;
        }
        if let Some(surface) = self.surface.as_mut() {
            surface.regenerate(&self.spectrum, self.time);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ocean() -> WaveField {
        WaveField::new(
            vec![
                WaveComponent::new(Vec2::new(1.0, 0.3), 40.0, 0.6, 0.5).unwrap(),
                WaveComponent::new(Vec2::new(-0.7, 1.0), 21.0, 0.3, 0.4).unwrap(),
                WaveComponent::new(Vec2::new(0.5, -1.0), 9.0, 0.1, 0.3).unwrap(),
            ],
            1.5,
        )
    }

    #[test]
    fn test_component_normalizes_direction() {
        let c = WaveComponent::new(Vec2::new(3.0, 4.0), 10.0, 1.0, 0.5).unwrap();
        assert!((c.direction().length() - 1.0).abs() < 1e-6);
        assert!((c.direction().x - 0.6).abs() < 1e-6);
    }

    #[test]
    fn test_component_dispersion_relation() {
        let c = WaveComponent::new(Vec2::X, 20.0, 1.0, 0.5).unwrap();
        let expected = (GRAVITY * c.wavenumber()).sqrt();
        assert!((c.angular_frequency() - expected).abs() < 1e-6);
        assert!((c.wavelength() - 20.0).abs() < 1e-4);
    }

    #[test]
    fn test_degenerate_components_rejected() {
        assert_eq!(
            WaveComponent::new(Vec2::ZERO, 10.0, 1.0, 0.5),
            Err(WaveError::ZeroDirection(0.0, 0.0))
        );
        assert_eq!(
            WaveComponent::new(Vec2::X, 0.0, 1.0, 0.5),
            Err(WaveError::NonPositiveWavelength(0.0))
        );
        assert_eq!(
            WaveComponent::new(Vec2::X, -3.0, 1.0, 0.5),
            Err(WaveError::NonPositiveWavelength(-3.0))
        );
        assert_eq!(
            WaveComponent::new(Vec2::X, 10.0, 1.0, 1.5),
            Err(WaveError::SteepnessOutOfRange(1.5))
        );
        assert_eq!(
            WaveComponent::new(Vec2::X, 10.0, -1.0, 0.5),
            Err(WaveError::NegativeAmplitude(-1.0))
        );
    }

    #[test]
    fn test_height_bounded_by_amplitude_sum() {
        let mut field = ocean();
        let bound = field.max_amplitude() + 1e-4;

        for step in 0..50 {
            for i in -10..10 {
                for j in -10..10 {
                    let h = field.height_at(i as f32 * 7.3, j as f32 * 5.1);
                    assert!(h.abs() <= bound, "Height {h} exceeds bound {bound}");
                }
            }
            field.update(0.37 * step as f32);
        }
    }

    #[test]
    fn test_height_is_continuous() {
        let field = ocean();
        let h1 = field.height_at(12.0, -4.0);
        let h2 = field.height_at(12.0 + 1e-3, -4.0);
        assert!((h1 - h2).abs() < 1e-2, "Small moves should give small changes");
    }

    #[test]
    fn test_height_varies_with_time() {
        let mut field = ocean();
        let h1 = field.height_at(3.0, 3.0);
        field.update(1.0);
        let h2 = field.height_at(3.0, 3.0);
        assert!((h1 - h2).abs() > 1e-3, "Height should vary with time");
    }

    #[test]
    fn test_flat_field_normal_is_exactly_up() {
        let flat = WaveField::new(
            vec![WaveComponent::new(Vec2::X, 10.0, 0.0, 0.5).unwrap()],
            1.0,
        );
        assert_eq!(flat.normal_at(4.0, -2.0), Vec3::Y);
        assert_eq!(WaveField::flat().normal_at(0.0, 0.0), Vec3::Y);
    }

    #[test]
    fn test_normal_is_normalized_and_tilts_against_slope() {
        let field = ocean();
        let n = field.normal_at(5.0, 5.0);
        assert!((n.length() - 1.0).abs() < 1e-4, "Normal should be unit length");

        let e = NORMAL_EPSILON;
        let slope_x = field.height_at(5.0 + e, 5.0) - field.height_at(5.0 - e, 5.0);
        if slope_x.abs() > 1e-4 {
            assert_eq!(n.x.signum(), -slope_x.signum());
        }
    }

    #[test]
    fn test_time_is_monotonic() {
        let mut field = ocean();
        field.update(0.5);
        field.update(-1.0);
        assert_eq!(field.time(), 0.5);
    }

    #[test]
    fn test_displacement_vertical_matches_height() {
        let field = ocean().with_sea_level(2.0);
        let d = field.displacement_at(7.0, 1.0);
        assert!((d.y + 2.0 - field.height_at(7.0, 1.0)).abs() < 1e-5);
    }
}
