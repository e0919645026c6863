//! Ocean model shared by physics and rendering.
//!
//! ## Architecture
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────┐
//! │                  WaveFieldConfig (RON)                       │
//! │  - Preset or explicit components, distortion, sea level      │
//! └─────────────────────────┬───────────────────────────────────┘
//!                           │ build()
//!                           ▼
//!                 ┌───────────────────┐
//!                 │     WaveField     │
//!                 │ - height_at       │
//!                 │ - normal_at       │
//!                 │ - update(dt)      │
//!                 └─────────┬─────────┘
//!           ┌───────────────┴───────────────┐
//!           ▼                               ▼
//!   ┌───────────────┐               ┌───────────────┐
//!   │   Buoyancy    │               │  SurfaceMesh  │
//!   │ (buoyancy.rs) │               │ (surface.rs)  │
//!   │               │               │               │
//!   │ - Submersion  │               │ - Base grid   │
//!   │ - Lift / drag │               │ - Gerstner    │
//!   │ - Hull tilt   │               │   displacement│
//!   └───────────────┘               └───────────────┘
//! ```

pub mod buoyancy;
pub mod config;
mod surface;
mod wave;

pub use buoyancy::{
    apply_buoyancy, buoyancy_force, submersion_ratio, BuoyancyParams, HeightCorrection,
    SurfaceTilt,
};
pub use config::{SurfaceGridConfig, WaveComponentConfig, WaveFieldConfig, WavePreset};
pub use surface::SurfaceMesh;
pub use wave::{WaveComponent, WaveField, WaveSpectrum, GRAVITY, NORMAL_EPSILON};
