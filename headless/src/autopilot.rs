//! Scripted steering for unattended runs.
//!
//! The autopilot only ever talks to the world through `InputState`, the same
//! way a player does, so a soak run exercises the real control path.

use bevy::math::{Vec2, Vec3};
use bevy_ecs::resource::Resource;
use log::{debug, info};
use ron::de::from_str;
use serde::{Deserialize, Serialize};
use shared::input::{InputState, ShipAction};
use shared::vessel::ShipTelemetry;
use shared::ConfigError;
use std::f32::consts::{PI, TAU};
use std::fs;
use std::path::Path;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AutopilotConfig {
    /// Points on the XZ plane visited in order, looping
    pub waypoints: Vec<Vec2>,
    /// A waypoint counts as reached within this horizontal distance
    pub arrival_radius: f32,
    /// Heading error (radians) tolerated before steering
    pub heading_tolerance: f32,
    /// Boost while stamina is above this and the heading is on target
    pub boost_above: f32,
    /// Press interact whenever something is in range
    pub interact: bool,
}

impl Default for AutopilotConfig {
    fn default() -> Self {
        Self {
            waypoints: vec![
                Vec2::new(0.0, -250.0),
                Vec2::new(250.0, 0.0),
                Vec2::new(0.0, 250.0),
                Vec2::new(-250.0, 0.0),
            ],
            arrival_radius: 25.0,
            heading_tolerance: 0.1,
            boost_above: 0.6,
            interact: true,
        }
    }
}

impl AutopilotConfig {
    /// Read a route from RON. A missing file gives the default square.
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        if !path.exists() {
            info!("Route not found: {}. Using the default loop.", path.display());
            return Ok(Self::default());
        }
        let config: AutopilotConfig = from_str(&fs::read_to_string(path)?)?;
        if config.waypoints.is_empty() {
            return Err(ConfigError::invalid("waypoints", "route needs at least one waypoint"));
        }
        Ok(config)
    }
}

/// Wrap an angle into (-PI, PI].
fn wrap_angle(angle: f32) -> f32 {
    let wrapped = (angle + PI).rem_euclid(TAU) - PI;
    if wrapped <= -PI {
        wrapped + TAU
    } else {
        wrapped
    }
}

/// Yaw that points the bow from `from` toward `to`.
fn bearing(from: Vec3, to: Vec2) -> f32 {
    let delta = to - Vec2::new(from.x, from.z);
    (-delta.x).atan2(-delta.y)
}

#[derive(Resource, Debug, Clone)]
pub struct Autopilot {
    config: AutopilotConfig,
    next: usize,
    laps: u32,
}

impl Autopilot {
    pub fn new(config: AutopilotConfig) -> Self {
        Self {
            config,
            next: 0,
            laps: 0,
        }
    }

    pub fn target(&self) -> Option<Vec2> {
        self.config.waypoints.get(self.next).copied()
    }

    pub fn laps(&self) -> u32 {
        self.laps
    }

    /// Pick the controls for this frame and write them into `input`.
    pub fn drive(&mut self, telemetry: &ShipTelemetry, can_interact: bool, input: &mut InputState) {
        self.advance_waypoint(telemetry.position);

        let Some(target) = self.target() else {
            for action in ShipAction::ALL {
                input.release(action);
            }
            return;
        };

        let error = wrap_angle(bearing(telemetry.position, target) - telemetry.yaw);
        let tolerance = self.config.heading_tolerance;
        let on_course = error.abs() <= tolerance;

        input.set(ShipAction::Forward, true);
        input.set(ShipAction::Backward, false);
        input.set(ShipAction::Left, error > tolerance);
        input.set(ShipAction::Right, error < -tolerance);
        input.set(
            ShipAction::Boost,
            on_course && telemetry.stamina > self.config.boost_above,
        );
        // Released every other frame so each press is a fresh edge
        let interact = self.config.interact && can_interact && !input.is_held(ShipAction::Interact);
        input.set(ShipAction::Interact, interact);
    }

    fn advance_waypoint(&mut self, position: Vec3) {
        let Some(target) = self.target() else {
            return;
        };
        if Vec2::new(position.x, position.z).distance(target) > self.config.arrival_radius {
            return;
        }
        debug!("Reached waypoint {} at {target}", self.next);
        self.next += 1;
        if self.next >= self.config.waypoints.len() {
            self.next = 0;
            self.laps += 1;
            info!("Autopilot finished lap {}", self.laps);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn telemetry(position: Vec3, yaw: f32) -> ShipTelemetry {
        ShipTelemetry {
            position,
            yaw,
            speed: 0.0,
            speed_ratio: 0.0,
            stamina: 1.0,
            boosting: false,
        }
    }

    fn single(target: Vec2) -> Autopilot {
        Autopilot::new(AutopilotConfig {
            waypoints: vec![target],
            ..Default::default()
        })
    }

    #[test]
    fn test_wrap_angle() {
        assert!((wrap_angle(3.0 * PI / 2.0) + PI / 2.0).abs() < 1e-5);
        assert!((wrap_angle(-3.0 * PI / 2.0) - PI / 2.0).abs() < 1e-5);
        assert!((wrap_angle(0.25) - 0.25).abs() < 1e-6);
    }

    #[test]
    fn test_heads_straight_when_on_course() {
        let mut pilot = single(Vec2::new(0.0, -100.0));
        let mut input = InputState::default();
        pilot.drive(&telemetry(Vec3::ZERO, 0.0), false, &mut input);

        assert!(input.is_held(ShipAction::Forward));
        assert!(!input.is_held(ShipAction::Left));
        assert!(!input.is_held(ShipAction::Right));
        assert!(input.is_held(ShipAction::Boost), "Full stamina and on course");
    }

    #[test]
    fn test_turns_toward_target() {
        // Target on the -X side; with -Z forward that is a left turn
        let mut pilot = single(Vec2::new(-100.0, 0.0));
        let mut input = InputState::default();
        pilot.drive(&telemetry(Vec3::ZERO, 0.0), false, &mut input);
        assert!(input.is_held(ShipAction::Left));
        assert!(!input.is_held(ShipAction::Boost), "No boost while turning");

        let mut pilot = single(Vec2::new(100.0, 0.0));
        let mut input = InputState::default();
        pilot.drive(&telemetry(Vec3::ZERO, 0.0), false, &mut input);
        assert!(input.is_held(ShipAction::Right));
    }

    #[test]
    fn test_loops_through_waypoints() {
        let mut pilot = Autopilot::new(AutopilotConfig {
            waypoints: vec![Vec2::new(0.0, -50.0), Vec2::new(50.0, 0.0)],
            ..Default::default()
        });
        let mut input = InputState::default();

        pilot.drive(&telemetry(Vec3::new(0.0, 0.0, -45.0), 0.0), false, &mut input);
        assert_eq!(pilot.target(), Some(Vec2::new(50.0, 0.0)));

        pilot.drive(&telemetry(Vec3::new(48.0, 0.0, 0.0), 0.0), false, &mut input);
        assert_eq!(pilot.target(), Some(Vec2::new(0.0, -50.0)));
        assert_eq!(pilot.laps(), 1);
    }

    #[test]
    fn test_interact_produces_fresh_edges() {
        let mut pilot = single(Vec2::new(0.0, -100.0));
        let mut input = InputState::default();

        pilot.drive(&telemetry(Vec3::ZERO, 0.0), true, &mut input);
        assert!(input.just_pressed(ShipAction::Interact));
        input.end_frame();

        pilot.drive(&telemetry(Vec3::ZERO, 0.0), true, &mut input);
        assert!(!input.is_held(ShipAction::Interact));
        input.end_frame();

        pilot.drive(&telemetry(Vec3::ZERO, 0.0), true, &mut input);
        assert!(input.just_pressed(ShipAction::Interact));
    }

    #[test]
    fn test_route_parses_from_ron() {
        let config: AutopilotConfig =
            from_str("(waypoints: [(10.0, -20.0)], interact: false)").unwrap();
        assert_eq!(config.waypoints, vec![Vec2::new(10.0, -20.0)]);
        assert!(!config.interact);
        assert_eq!(config.arrival_radius, AutopilotConfig::default().arrival_radius);
    }
}
