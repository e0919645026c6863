use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct StaminaTuning {
    /// Stamina lost per second of boosting
    pub drain_per_second: f32,
    /// Stamina recovered per second when not boosting
    pub regen_per_second: f32,
    /// Boost is refused at or below this level
    pub min_boost: f32,
}

impl Default for StaminaTuning {
    fn default() -> Self {
        Self {
            drain_per_second: 0.2,
            regen_per_second: 0.1,
            min_boost: 0.1,
        }
    }
}

/// Boost reserve, always within [0, 1].
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Stamina(f32);

impl Default for Stamina {
    fn default() -> Self {
        Self::full()
    }
}

impl Stamina {
    pub fn full() -> Self {
        Self(1.0)
    }

    pub fn new(value: f32) -> Self {
        if value.is_nan() {
            return Self(0.0);
        }
        Self(value.clamp(0.0, 1.0))
    }

    pub fn value(&self) -> f32 {
        self.0
    }

    pub fn can_boost(&self, tuning: &StaminaTuning) -> bool {
        self.0 > tuning.min_boost
    }

    /// Drain while boosting, regenerate otherwise.
    pub fn tick(&mut self, boosting: bool, dt: f32, tuning: &StaminaTuning) {
        let dt = dt.max(0.0);
        let delta = if boosting {
            -tuning.drain_per_second * dt
        } else {
            tuning.regen_per_second * dt
        };
        self.0 = (self.0 + delta).clamp(0.0, 1.0);
    }
}
