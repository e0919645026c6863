//! Serializable wave configuration and presets.

use bevy::math::Vec2;
use serde::{Deserialize, Serialize};

use super::surface::SurfaceMesh;
use super::wave::{WaveComponent, WaveField};
use crate::error::{ConfigError, WaveError};

/// Configuration for a single Gerstner component, before validation.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct WaveComponentConfig {
    /// Travel direction on the XZ plane (normalized on build)
    pub direction: [f32; 2],
    /// Wavelength in world units
    pub wavelength: f32,
    /// Vertical amplitude in world units
    pub amplitude: f32,
    /// Crest sharpness (Q), 0.0 = sine wave, 1.0 = sharpest crest
    pub steepness: f32,
}

impl WaveComponentConfig {
    pub const fn new(dir_x: f32, dir_z: f32, wavelength: f32, amplitude: f32, steepness: f32) -> Self {
        Self {
            direction: [dir_x, dir_z],
            wavelength,
            amplitude,
            steepness,
        }
    }

    pub fn build(&self) -> Result<WaveComponent, WaveError> {
        WaveComponent::new(
            Vec2::from_array(self.direction),
            self.wavelength,
            self.amplitude,
            self.steepness,
        )
    }
}

/// Preset wave configurations for different sea states.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
pub enum WavePreset {
    /// Completely still water (no waves)
    Still,
    /// Light swell
    Calm,
    /// Standard open sea
    #[default]
    Ocean,
    /// Large rolling waves
    Storm,
}

impl WavePreset {
    pub fn components(self) -> Vec<WaveComponentConfig> {
        match self {
            WavePreset::Still => Vec::new(),
            WavePreset::Calm => vec![
                WaveComponentConfig::new(1.0, 0.2, 48.0, 0.25, 0.2),
                WaveComponentConfig::new(-0.4, 1.0, 19.0, 0.08, 0.15),
            ],
            WavePreset::Ocean => vec![
                WaveComponentConfig::new(1.0, 0.3, 60.0, 0.6, 0.5),  // Primary swell
                WaveComponentConfig::new(-0.7, 1.0, 31.0, 0.35, 0.4), // Cross swell
                WaveComponentConfig::new(0.5, -1.0, 18.0, 0.2, 0.35), // Chop
                WaveComponentConfig::new(-1.0, -0.5, 9.0, 0.08, 0.3), // Ripples
            ],
            WavePreset::Storm => vec![
                WaveComponentConfig::new(1.0, 0.2, 90.0, 1.4, 0.7),
                WaveComponentConfig::new(-0.5, 1.0, 52.0, 0.8, 0.6),
                WaveComponentConfig::new(0.7, -0.7, 27.0, 0.45, 0.5),
                WaveComponentConfig::new(-1.0, -0.3, 13.0, 0.15, 0.4),
            ],
        }
    }
}

/// Render surface dimensions.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct SurfaceGridConfig {
    /// Edge length in world units
    pub size: f32,
    /// Cells per edge
    pub resolution: u32,
}

impl Default for SurfaceGridConfig {
    fn default() -> Self {
        Self {
            size: 1400.0,
            resolution: 200,
        }
    }
}

/// Complete wave field configuration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct WaveFieldConfig {
    /// Preset used when `components` is not given
    pub preset: WavePreset,
    /// Explicit components, overriding the preset
    pub components: Option<Vec<WaveComponentConfig>>,
    /// Global scale applied to every component's displacement
    pub distortion_scale: f32,
    /// Base water level (Y coordinate)
    pub sea_level: f32,
    /// Render surface, omitted for headless runs
    pub surface: Option<SurfaceGridConfig>,
}

impl Default for WaveFieldConfig {
    fn default() -> Self {
        Self {
            preset: WavePreset::default(),
            components: None,
            distortion_scale: 1.0,
            sea_level: 0.0,
            surface: Some(SurfaceGridConfig::default()),
        }
    }
}

impl WaveFieldConfig {
    pub fn from_preset(preset: WavePreset) -> Self {
        Self {
            preset,
            ..Default::default()
        }
    }

    /// Headless variant: same waves, no render surface.
    pub fn without_surface(mut self) -> Self {
        self.surface = None;
        self
    }

    pub fn component_configs(&self) -> Vec<WaveComponentConfig> {
        match &self.components {
            Some(components) => components.clone(),
            None => self.preset.components(),
        }
    }

    pub fn build(&self) -> Result<WaveField, ConfigError> {
        if !(self.distortion_scale >= 0.0 && self.distortion_scale.is_finite()) {
            return Err(ConfigError::invalid(
                "waves.distortion_scale",
                format!("must be non-negative, got {}", self.distortion_scale),
            ));
        }

        let components = self
            .component_configs()
            .iter()
            .map(WaveComponentConfig::build)
            .collect::<Result<Vec<_>, _>>()?;

        let mut field =
            WaveField::new(components, self.distortion_scale).with_sea_level(self.sea_level);
        if let Some(surface) = self.surface {
            if !(surface.size > 0.0) {
                return Err(ConfigError::invalid("waves.surface.size", "must be positive"));
            }
            field = field.with_surface(SurfaceMesh::new(surface.size, surface.resolution));
        }

        Ok(field)
    }
}
