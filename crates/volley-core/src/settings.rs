use std::{f64::consts::PI, path::Path};

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};

use crate::ArenaGeometry;

/// Height bands and selection thresholds of the strike catalog.
#[derive(Clone, Debug, Serialize, Deserialize)]
#[serde(default)]
pub struct CatalogSettings {
    /// Highest contact that can be chipped by driving into the ball.
    pub chip_max: f64,
    /// Highest contact reachable by a quick flip into the ball.
    pub flip_hit_max: f64,
    /// Highest contact reachable by a full jump; above it only aerials apply.
    pub jump_hit_max: f64,
    /// Boost that must be in the tank before an aerial is considered.
    pub aerial_min_boost: f64,
    /// Approach angles below this (radians) count as straight on.
    pub straight_on_angle: f64,
    /// Approach angles below this still allow a chip on low balls.
    pub chip_angle: f64,
    /// Approach angles above this prefer a side hit near goal.
    pub side_hit_angle: f64,
    /// Contacts closer than this to a goal center count as near goal.
    pub near_goal_radius: f64,
    /// Pre-strike time of a flip hit, in seconds.
    pub flip_hit_duration: f64,
    /// Fraction of the contact height a jump hit must actually reach; the nose
    /// tilts up during the jump.
    pub jump_hit_height_factor: f64,
    /// Jump time assumed when the table cannot reach the height.
    pub unreachable_jump_time: f64,
    /// Extra pre-strike time of a diagonal hit.
    pub diagonal_extra_time: f64,
    /// Aerials whose hang time exceeds this can no longer dodge into the ball.
    pub air_dodge_ceiling: f64,
    /// Time reserved after an aerial for the correction dodge, in seconds.
    pub aerial_correction_window: f64,
    /// Boost burnt per second of flight while climbing to an aerial contact.
    pub aerial_boost_per_second: f64,
    /// Speed gained from a dodge into the ball.
    pub dodge_speed_boost: f64,
    /// Distance between the car's launch point and the contact when nothing
    /// has to be carried through the air.
    pub contact_offset: f64,
    /// Ground speed the car keeps while executing a strike.
    pub launch_carry_speed: f64,
    /// Slack (seconds) tolerated when deciding vertical accessibility.
    pub vertical_slack: f64,
}

impl Default for CatalogSettings {
    fn default() -> Self {
        Self {
            chip_max: 2.0,
            flip_hit_max: 3.2,
            jump_hit_max: 4.8,
            aerial_min_boost: 20.0,
            straight_on_angle: PI / 16.0,
            chip_angle: PI / 8.0,
            side_hit_angle: PI / 4.0,
            near_goal_radius: 30.0,
            flip_hit_duration: 0.1,
            jump_hit_height_factor: 0.7,
            unreachable_jump_time: 0.8,
            diagonal_extra_time: 0.04,
            air_dodge_ceiling: 1.4,
            aerial_correction_window: 0.25,
            aerial_boost_per_second: 20.0,
            dodge_speed_boost: 10.0,
            contact_offset: 2.8,
            launch_carry_speed: 10.0,
            vertical_slack: 0.1,
        }
    }
}

/// Jump and aerial ballistics used to answer "how long to reach this height".
#[derive(Clone, Debug, Serialize, Deserialize)]
#[serde(default)]
pub struct VerticalReachSettings {
    /// Gravity in units/s².
    pub gravity: f64,
    /// Vertical velocity gained on jump.
    pub jump_velocity: f64,
    /// Extra upward acceleration while the jump button is held.
    pub jump_hold_accel: f64,
    /// How long holding jump keeps adding acceleration, in seconds.
    pub jump_hold_time: f64,
    /// Boost acceleration in the air.
    pub aerial_boost_accel: f64,
    /// Share of the boost acceleration pointed upward during a climb.
    pub aerial_climb_factor: f64,
    /// Height of the car's origin at rest.
    pub base_height: f64,
}

impl Default for VerticalReachSettings {
    fn default() -> Self {
        Self {
            gravity: 13.0,
            jump_velocity: 5.83,
            jump_hold_accel: 29.17,
            jump_hold_time: 0.2,
            aerial_boost_accel: 19.0,
            aerial_climb_factor: 0.9,
            base_height: crate::CAR_BASE_HEIGHT,
        }
    }
}

/// Thresholds of the launch readiness checklist.
#[derive(Clone, Debug, Serialize, Deserialize)]
#[serde(default)]
pub struct ReadinessSettings {
    /// Maximum nose-to-contact deviation for a launch, in radians.
    pub alignment_tolerance: f64,
    /// Minimum vertical component of the roof vector.
    pub upright_threshold: f64,
    /// Contacts further away than this (seconds) are not launchable yet.
    pub close_enough_seconds: f64,
    /// Delay between issuing an input and the game applying it, in seconds.
    pub input_lag: f64,
    /// An aerial ignites when its countdown drops below this, in seconds.
    pub aerial_ignition_window: f64,
    /// Below this flat speed a car cannot skid.
    pub skid_min_speed: f64,
    /// Travel-vs-nose deviation (radians) that counts as skidding.
    pub skid_tolerance: f64,
}

impl Default for ReadinessSettings {
    fn default() -> Self {
        Self {
            alignment_tolerance: PI / 30.0,
            upright_threshold: 0.85,
            close_enough_seconds: 4.0,
            input_lag: 0.025,
            aerial_ignition_window: 0.1,
            skid_min_speed: 5.0,
            skid_tolerance: 0.35,
        }
    }
}

/// Turning model of the router.
#[derive(Clone, Debug, Serialize, Deserialize)]
#[serde(default)]
pub struct RouterSettings {
    /// Lateral acceleration the tires can hold, in units/s².
    pub max_lateral_accel: f64,
    /// Speed assumed when the car is slower than this.
    pub min_turn_speed: f64,
    /// Smallest turning circle radius.
    pub min_turn_radius: f64,
    /// Arcs sweeping more than this make a route unusable, in radians.
    pub max_arc_sweep: f64,
}

impl Default for RouterSettings {
    fn default() -> Self {
        Self {
            max_lateral_accel: 25.0,
            min_turn_speed: 10.0,
            min_turn_radius: 3.0,
            max_arc_sweep: PI / 2.0,
        }
    }
}

/// Ground acceleration model.
#[derive(Clone, Debug, Serialize, Deserialize)]
#[serde(default)]
pub struct ReachabilitySettings {
    /// How far ahead to simulate, in seconds.
    pub horizon: f64,
    /// Integration step, in seconds.
    pub step: f64,
    /// Throttle acceleration from standstill.
    pub throttle_accel: f64,
    /// Speed at which throttle stops adding acceleration.
    pub throttle_max_speed: f64,
    /// Extra acceleration while boosting.
    pub boost_accel: f64,
    /// Absolute speed cap.
    pub max_speed: f64,
    /// Boost consumed per second of boosting.
    pub boost_per_second: f64,
}

impl Default for ReachabilitySettings {
    fn default() -> Self {
        Self {
            horizon: 6.0,
            step: 1.0 / 60.0,
            throttle_accel: 32.0,
            throttle_max_speed: 28.0,
            boost_accel: 19.8,
            max_speed: 46.0,
            boost_per_second: 33.3,
        }
    }
}

/// Tolerances of the ball path disruption monitor.
#[derive(Clone, Debug, Serialize, Deserialize)]
#[serde(default)]
pub struct MonitorSettings {
    /// Maximum drift of the predicted contact position.
    pub position_tolerance: f64,
    /// Maximum drift of the predicted contact velocity.
    pub velocity_tolerance: f64,
}

impl Default for MonitorSettings {
    fn default() -> Self {
        Self {
            position_tolerance: 2.0,
            velocity_tolerance: 15.0,
        }
    }
}

/// Behaviour of a single strike attempt.
#[derive(Clone, Debug, Serialize, Deserialize)]
#[serde(default)]
pub struct AttemptSettings {
    /// Consecutive frames without a plan before the attempt gives up.
    pub search_patience: u32,
    /// Once the car is this close to the ball, the attempt winds down.
    pub finish_distance: f64,
    /// Extra time granted after reaching the ball, in seconds.
    pub finish_delay: f64,
    /// The strike may only launch within this distance of the waypoint.
    pub launch_radius: f64,
    /// Give up when the tactical ball advantage drops below this.
    pub min_ball_advantage: f64,
    /// Give up when the enemy reaches the ball this much earlier than our
    /// contact, in seconds.
    pub enemy_contact_margin: f64,
    /// Time after the contact before a launched strike counts as finished.
    pub post_contact_grace: f64,
}

impl Default for AttemptSettings {
    fn default() -> Self {
        Self {
            search_patience: 30,
            finish_distance: 4.5,
            finish_delay: 0.2,
            launch_radius: 3.0,
            min_ball_advantage: -1.0,
            enemy_contact_margin: 0.3,
            post_contact_grace: 0.3,
        }
    }
}

/// Constants of the reference ball predictor.
#[derive(Clone, Debug, Serialize, Deserialize)]
#[serde(default)]
pub struct BallPhysicsSettings {
    /// Gravity in units/s².
    pub gravity: f64,
    /// Fraction of velocity lost to air drag per second.
    pub drag: f64,
    /// Share of the normal velocity kept on a bounce.
    pub restitution: f64,
    /// Share of the tangential velocity kept on a bounce.
    pub bounce_friction: f64,
    /// Integration step, in seconds.
    pub step: f64,
}

impl Default for BallPhysicsSettings {
    fn default() -> Self {
        Self {
            gravity: 13.0,
            drag: 0.03,
            restitution: 0.6,
            bounce_friction: 0.7,
            step: 1.0 / 60.0,
        }
    }
}

/// Every tunable of the planner.
#[derive(Clone, Debug, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct PlannerSettings {
    pub arena: ArenaGeometry,
    pub catalog: CatalogSettings,
    pub vertical: VerticalReachSettings,
    pub readiness: ReadinessSettings,
    pub router: RouterSettings,
    pub reachability: ReachabilitySettings,
    pub monitor: MonitorSettings,
    pub attempt: AttemptSettings,
    pub ball: BallPhysicsSettings,
}

impl PlannerSettings {
    /// Read settings from a JSON file. Missing fields keep their defaults.
    pub fn load(path: &Path) -> Result<Self> {
        let text = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read settings file {}", path.display()))?;
        let settings = serde_json::from_str(&text)
            .with_context(|| format!("Failed to parse settings file {}", path.display()))?;
        log::info!("Loaded planner settings from {}", path.display());
        Ok(settings)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn thresholds_are_ordered() {
        let c = CatalogSettings::default();
        assert!(c.chip_max < c.flip_hit_max);
        assert!(c.flip_hit_max < c.jump_hit_max);
    }

    #[test]
    fn partial_json_keeps_defaults() {
        let settings: PlannerSettings =
            serde_json::from_str(r#"{ "catalog": { "chip_max": 1.5 }, "monitor": {} }"#).unwrap();
        assert_eq!(settings.catalog.chip_max, 1.5);
        assert_eq!(settings.catalog.flip_hit_max, 3.2);
        assert_eq!(settings.monitor.position_tolerance, 2.0);
    }
}
