use serde::{Deserialize, Serialize};

use crate::{math::flatten, Angle, TimedPosition, Vector2, Vector3};

/// Largest upward roof component of a car driving on a wall.
const WALL_ROOF_Z: f64 = 0.7;

/// Which side a car plays for.
#[derive(Serialize, Deserialize, Clone, Copy, Debug, PartialEq, Eq, Hash, Default)]
#[serde(rename_all = "snake_case")]
pub enum Team {
    #[default]
    Blue,
    Orange,
}

impl Team {
    /// Sign of the `y` coordinate of this team's own goal.
    pub fn own_goal_sign(&self) -> f64 {
        match self {
            Team::Blue => -1.0,
            Team::Orange => 1.0,
        }
    }
}

/// A snapshot of our car from a single frame.
#[derive(Serialize, Deserialize, Clone, Debug)]
pub struct CarData {
    /// Game time of the frame this snapshot was taken from, in seconds
    pub time: f64,
    /// Position of the car's origin
    pub position: Vector3,
    /// Velocity in arena units per second
    pub velocity: Vector3,
    /// Unit vector out of the car's nose
    pub nose: Vector3,
    /// Unit vector out of the car's roof
    pub roof: Vector3,
    /// Stored boost, 0 to 100
    pub boost: f64,
    /// Whether any wheel touches a surface
    pub has_wheel_contact: bool,
    pub team: Team,
}

impl CarData {
    /// A car resting on its wheels at `position`, nose pointing along `heading`.
    pub fn grounded(time: f64, position: Vector2, heading: Angle, speed: f64, boost: f64) -> Self {
        let dir = heading.to_vector();
        Self {
            time,
            position: Vector3::new(position.x, position.y, crate::CAR_BASE_HEIGHT),
            velocity: Vector3::new(dir.x * speed, dir.y * speed, 0.0),
            nose: Vector3::new(dir.x, dir.y, 0.0),
            roof: Vector3::z(),
            boost,
            has_wheel_contact: true,
            team: Team::Blue,
        }
    }

    pub fn flat_position(&self) -> Vector2 {
        flatten(&self.position)
    }

    /// Unit vector of the flattened nose. Falls back to the flattened velocity
    /// when the nose points straight up or down.
    pub fn heading(&self) -> Option<Vector2> {
        flatten(&self.nose)
            .try_normalize(1e-9)
            .or_else(|| flatten(&self.velocity).try_normalize(1e-9))
    }

    pub fn flat_speed(&self) -> f64 {
        flatten(&self.velocity).norm()
    }

    /// Speed along the nose; negative while reversing.
    pub fn forward_speed(&self) -> f64 {
        self.heading()
            .map(|h| flatten(&self.velocity).dot(&h))
            .unwrap_or(0.0)
    }

    /// Whether the car is driving on a wall or curve rather than the floor.
    pub fn is_on_wall(&self) -> bool {
        self.has_wheel_contact && self.roof.z < WALL_ROOF_Z
    }

    /// A car is skidding when it moves with some speed and its travel direction
    /// strays from the nose (or tail, when reversing) by more than `tolerance`
    /// radians.
    pub fn is_skidding(&self, min_speed: f64, tolerance: f64) -> bool {
        let flat_velocity = flatten(&self.velocity);
        if flat_velocity.norm() < min_speed {
            return false;
        }
        let Some(heading) = self.heading() else {
            return false;
        };
        let correction = Angle::correction(&heading, &flat_velocity).abs();
        correction > tolerance && (std::f64::consts::PI - correction) > tolerance
    }
}

/// The ball state from a single frame.
#[derive(Serialize, Deserialize, Clone, Debug)]
pub struct BallData {
    /// Game time of the frame, in seconds
    pub time: f64,
    pub position: Vector3,
    pub velocity: Vector3,
}

/// The most recent contact between any car and the ball.
#[derive(Serialize, Deserialize, Clone, Debug, PartialEq)]
pub struct BallTouch {
    pub time: f64,
    pub position: Vector3,
    pub player_index: usize,
}

/// Tactical facts the owning layer supplies each frame.
#[derive(Serialize, Deserialize, Clone, Debug, Default)]
pub struct TacticalSituation {
    /// How many seconds earlier we can reach the ball than the quickest
    /// opponent. Negative when an opponent gets there first.
    pub ball_advantage: f64,
    /// Where and when the quickest opponent is expected to touch the ball.
    pub expected_enemy_contact: Option<TimedPosition>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn wall_needs_wheels_and_a_tilted_roof() {
        let mut car = CarData::grounded(0.0, Vector2::zeros(), Angle::default(), 0.0, 50.0);
        assert!(!car.is_on_wall());
        car.roof = Vector3::new(-1.0, 0.0, 0.0);
        assert!(car.is_on_wall());
        car.has_wheel_contact = false;
        assert!(!car.is_on_wall());
    }

    #[test]
    fn grounded_car_is_not_skidding() {
        let car = CarData::grounded(0.0, Vector2::zeros(), Angle::from_degrees(30.0), 20.0, 50.0);
        assert!(!car.is_skidding(5.0, 0.3));
        assert!((car.forward_speed() - 20.0).abs() < 1e-9);
    }

    #[test]
    fn sideways_motion_is_skidding() {
        let mut car = CarData::grounded(0.0, Vector2::zeros(), Angle::default(), 0.0, 50.0);
        car.velocity = Vector3::new(0.0, 15.0, 0.0);
        assert!(car.is_skidding(5.0, 0.3));
    }

    #[test]
    fn reversing_is_not_skidding() {
        let mut car = CarData::grounded(0.0, Vector2::zeros(), Angle::default(), 0.0, 50.0);
        car.velocity = Vector3::new(-15.0, 0.0, 0.0);
        assert!(!car.is_skidding(5.0, 0.3));
        assert!(car.forward_speed() < 0.0);
    }
}
