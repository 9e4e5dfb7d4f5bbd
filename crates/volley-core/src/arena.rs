use serde::{Deserialize, Serialize};

use crate::{math::flatten, Team, Vector3};

/// Radius of the ball, in arena units.
pub const BALL_RADIUS: f64 = 1.8555;

/// Height of the car's origin above the floor when resting on its wheels.
pub const CAR_BASE_HEIGHT: f64 = 0.34;

/// A goal mouth.
#[derive(Serialize, Deserialize, Clone, Copy, Debug, PartialEq)]
pub struct Goal {
    /// Center of the goal mouth on the goal line
    pub center: Vector3,
    /// Half of the distance between the posts
    pub half_width: f64,
}

/// The arena geometry. All distances are in arena units (1 unit = 50 game
/// units); `z` points up and the blue goal sits at negative `y`.
#[derive(Serialize, Deserialize, Clone, Debug)]
#[serde(default)]
pub struct ArenaGeometry {
    /// Distance from the center to each side wall (x axis)
    pub side_wall: f64,
    /// Distance from the center to each back wall (y axis)
    pub back_wall: f64,
    /// Height of the ceiling
    pub ceiling: f64,
    /// Half of the goal mouth width
    pub goal_half_width: f64,
    /// Height of the goal mouth center
    pub goal_center_height: f64,
}

impl ArenaGeometry {
    /// The goal defended by `team`.
    pub fn own_goal(&self, team: Team) -> Goal {
        self.goal_at(team.own_goal_sign())
    }

    /// The goal `team` attacks.
    pub fn enemy_goal(&self, team: Team) -> Goal {
        self.goal_at(-team.own_goal_sign())
    }

    /// The goal whose center is closest to `point`.
    pub fn nearest_goal(&self, point: &Vector3) -> Goal {
        let sign = if point.y >= 0.0 { 1.0 } else { -1.0 };
        self.goal_at(sign)
    }

    /// Signed distance from the nearest wall; negative values are outside the
    /// playable area.
    pub fn distance_from_wall(&self, point: &Vector3) -> f64 {
        let flat = flatten(point);
        let to_side = self.side_wall - flat.x.abs();
        let to_back = self.back_wall - flat.y.abs();
        to_side.min(to_back)
    }

    fn goal_at(&self, sign: f64) -> Goal {
        Goal {
            center: Vector3::new(0.0, sign * self.back_wall, self.goal_center_height),
            half_width: self.goal_half_width,
        }
    }
}

impl Default for ArenaGeometry {
    fn default() -> Self {
        Self {
            side_wall: 74.0,
            back_wall: 100.0,
            ceiling: 40.0,
            goal_half_width: 17.8,
            goal_center_height: 3.2,
        }
    }
}
