//! Error types for construction-time validation and asset resolution.
//!
//! The frame loop itself never fails: everything that can go wrong is either
//! rejected while building the world or surfaced by an asset/content lookup.

use thiserror::Error;

/// Rejected wave component parameters.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum WaveError {
    #[error("wave direction must be a non-zero finite vector, got ({0}, {1})")]
    ZeroDirection(f32, f32),
    #[error("wavelength must be positive, got {0}")]
    NonPositiveWavelength(f32),
    #[error("steepness must lie in [0, 1], got {0}")]
    SteepnessOutOfRange(f32),
    #[error("amplitude must be non-negative, got {0}")]
    NegativeAmplitude(f32),
}

/// Invalid pool sizing.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum PoolError {
    #[error("pool max_size must be at least 1")]
    ZeroCapacity,
    #[error("pool initial_size {initial} exceeds max_size {max}")]
    InitialExceedsMax { initial: usize, max: usize },
}

/// Failure while loading or validating the simulation configuration.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read config: {0}")]
    Io(#[from] std::io::Error),
    #[error("failed to parse config: {0}")]
    Parse(#[from] ron::Error),
    #[error("invalid {field}: {reason}")]
    Invalid { field: &'static str, reason: String },
    #[error(transparent)]
    Wave(#[from] WaveError),
    #[error(transparent)]
    Pool(#[from] PoolError),
}

impl ConfigError {
    pub fn invalid(field: &'static str, reason: impl Into<String>) -> Self {
        Self::Invalid {
            field,
            reason: reason.into(),
        }
    }
}

/// Failure resolving an external asset or content entry.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum AssetError {
    #[error("asset not found: {0}")]
    NotFound(String),
    #[error("failed to load {path}: {reason}")]
    Load { path: String, reason: String },
    #[error("no usable asset among candidates: {}", tried.join(", "))]
    Exhausted { tried: Vec<String> },
}
