//! Simulation configuration, loaded from RON.

use log::info;
use ron::de::from_str;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;

use crate::constants::DEFAULT_WORLD_RADIUS;
use crate::error::{ConfigError, PoolError};
use crate::physics::PhysicsConfig;
use crate::props::{PropKind, PropTuning};
use crate::vessel::VesselTuning;
use crate::water::WaveFieldConfig;
use crate::GameFolderPaths;

/// Sizing and streaming radii for one prop pool.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PoolConfig {
    /// Entities built up front, all inactive
    pub initial_size: usize,
    /// Hard cap on constructed entities
    pub max_size: usize,
    /// Number of entities placed when the world starts
    pub spawn_count: usize,
    /// Entities farther than this from the ship are recycled
    pub active_radius: f32,
    /// Recycled entities reappear between these radii around the ship
    pub spawn_min_radius: f32,
    pub spawn_max_radius: f32,
}

impl PoolConfig {
    pub fn default_for(kind: PropKind) -> Self {
        match kind {
            PropKind::Island => Self {
                initial_size: 4,
                max_size: 8,
                spawn_count: 6,
                active_radius: 400.0,
                spawn_min_radius: 120.0,
                spawn_max_radius: 350.0,
            },
            PropKind::Chest => Self {
                initial_size: 6,
                max_size: 12,
                spawn_count: 8,
                active_radius: 250.0,
                spawn_min_radius: 40.0,
                spawn_max_radius: 200.0,
            },
            PropKind::Bottle => Self {
                initial_size: 6,
                max_size: 12,
                spawn_count: 8,
                active_radius: 200.0,
                spawn_min_radius: 30.0,
                spawn_max_radius: 160.0,
            },
        }
    }

    pub fn validate(&self, field: &'static str) -> Result<(), ConfigError> {
        if self.max_size == 0 {
            return Err(PoolError::ZeroCapacity.into());
        }
        if self.initial_size > self.max_size {
            return Err(PoolError::InitialExceedsMax {
                initial: self.initial_size,
                max: self.max_size,
            }
            .into());
        }
        if !(self.spawn_min_radius >= 0.0 && self.spawn_min_radius <= self.spawn_max_radius) {
            return Err(ConfigError::invalid(
                field,
                format!(
                    "spawn radii must satisfy 0 <= min <= max, got {}..{}",
                    self.spawn_min_radius, self.spawn_max_radius
                ),
            ));
        }
        if self.spawn_max_radius > self.active_radius {
            return Err(ConfigError::invalid(
                field,
                format!(
                    "spawn_max_radius {} lies outside active_radius {}",
                    self.spawn_max_radius, self.active_radius
                ),
            ));
        }
        Ok(())
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SimConfig {
    pub waves: WaveFieldConfig,
    pub physics: PhysicsConfig,
    pub vessel: VesselTuning,
    pub props: PropTuning,
    pub islands: PoolConfig,
    pub chests: PoolConfig,
    pub bottles: PoolConfig,
    /// The hull is pulled back once past this distance from the origin
    pub world_radius: f32,
    /// Fixed RNG seed for reproducible runs
    pub seed: Option<u64>,
}

impl Default for SimConfig {
    fn default() -> Self {
        Self {
            waves: WaveFieldConfig::default(),
            physics: PhysicsConfig::default(),
            vessel: VesselTuning::default(),
            props: PropTuning::default(),
            islands: PoolConfig::default_for(PropKind::Island),
            chests: PoolConfig::default_for(PropKind::Chest),
            bottles: PoolConfig::default_for(PropKind::Bottle),
            world_radius: DEFAULT_WORLD_RADIUS,
            seed: None,
        }
    }
}

impl SimConfig {
    pub fn pool(&self, kind: PropKind) -> &PoolConfig {
        match kind {
            PropKind::Island => &self.islands,
            PropKind::Chest => &self.chests,
            PropKind::Bottle => &self.bottles,
        }
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        self.physics.validate()?;
        for component in self.waves.component_configs() {
            component.build()?;
        }
        self.islands.validate("islands")?;
        self.chests.validate("chests")?;
        self.bottles.validate("bottles")?;

        if !(self.vessel.mass > 0.0) {
            return Err(ConfigError::invalid("vessel.mass", "must be positive"));
        }
        if self.vessel.half_extents.min_element() <= 0.0 {
            return Err(ConfigError::invalid(
                "vessel.half_extents",
                "every extent must be positive",
            ));
        }
        if !(self.world_radius > 0.0) {
            return Err(ConfigError::invalid("world_radius", "must be positive"));
        }
        Ok(())
    }
}

/// Load the simulation config at `path`, falling back to defaults when the
/// file does not exist. A file that exists but does not parse is an error.
pub fn load_sim_config(path: &Path) -> Result<SimConfig, ConfigError> {
    if !path.exists() {
        info!(
            "Simulation config not found: {}. Using defaults.",
            path.display()
        );
        return Ok(SimConfig::default());
    }

    let contents = fs::read_to_string(path)?;
    let config: SimConfig = from_str(&contents)?;
    config.validate()?;

    info!("Loaded simulation config from disk: {}", path.display());
    Ok(config)
}

/// [`load_sim_config`] on the default location inside the game folder.
pub fn load_default_sim_config(paths: &GameFolderPaths) -> Result<SimConfig, ConfigError> {
    load_sim_config(&paths.sim_config_path())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn test_default_config_is_valid() {
        assert!(SimConfig::default().validate().is_ok());
    }

    #[test]
    fn test_missing_file_gives_defaults() {
        let path = std::env::temp_dir().join("sailfolio-test-missing/none.ron");
        let config = load_sim_config(&path).unwrap();
        assert_eq!(config, SimConfig::default());
    }

    #[test]
    fn test_partial_file_fills_defaults() {
        let dir = std::env::temp_dir().join(format!("sailfolio-test-{}", std::process::id()));
        fs::create_dir_all(&dir).unwrap();
        let path = dir.join("partial.ron");
        let mut file = fs::File::create(&path).unwrap();
        file.write_all(b"(world_radius: 321.0, seed: Some(9))").unwrap();

        let config = load_sim_config(&path).unwrap();
        assert_eq!(config.world_radius, 321.0);
        assert_eq!(config.seed, Some(9));
        assert_eq!(config.islands, PoolConfig::default_for(PropKind::Island));

        fs::remove_dir_all(&dir).unwrap();
    }

    #[test]
    fn test_garbage_file_is_a_parse_error() {
        let dir = std::env::temp_dir().join(format!("sailfolio-garbage-{}", std::process::id()));
        fs::create_dir_all(&dir).unwrap();
        let path = dir.join("broken.ron");
        fs::write(&path, "(world_radius: [").unwrap();

        assert!(matches!(load_sim_config(&path), Err(ConfigError::Parse(_))));

        fs::remove_dir_all(&dir).unwrap();
    }

    #[test]
    fn test_invalid_pool_rejected() {
        let mut config = SimConfig::default();
        config.chests.initial_size = 50;
        assert!(matches!(
            config.validate(),
            Err(ConfigError::Pool(PoolError::InitialExceedsMax { .. }))
        ));

        let mut config = SimConfig::default();
        config.bottles.spawn_max_radius = config.bottles.active_radius + 1.0;
        assert!(matches!(config.validate(), Err(ConfigError::Invalid { field: "bottles", .. })));
    }

    #[test]
    fn test_invalid_wave_rejected() {
        let mut config = SimConfig::default();
        config.waves.components = Some(vec![crate::water::WaveComponentConfig::new(
            1.0, 0.0, -5.0, 0.3, 0.2,
        )]);
        assert!(matches!(config.validate(), Err(ConfigError::Wave(_))));
    }
}
