use serde::Serialize;
use volley_core::{TimedPosition, TrajectorySample, Vector2, Vector3};

use crate::{routing::Route, strike::StrikeProfile};

/// Where and when the car must be, and which way it must face, to begin the
/// strike maneuver.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct ApproachWaypoint {
    pub position: Vector2,
    /// Unit vector the car should face on arrival.
    pub facing: Vector2,
    /// Game time of arrival, in seconds.
    pub arrival_time: f64,
}

/// Identifies the ball path sample a plan was built on.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct TrajectoryFingerprint {
    pub contact_time: f64,
    pub position: Vector3,
    pub velocity: Vector3,
}

impl From<&TrajectorySample> for TrajectoryFingerprint {
    fn from(sample: &TrajectorySample) -> Self {
        Self {
            contact_time: sample.time,
            position: sample.position,
            velocity: sample.velocity,
        }
    }
}

/// A committed decision: which contact to pursue, with what technique, via
/// which waypoint and route. Replaced wholesale on replan, never edited.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct InterceptPlan {
    pub contact: TimedPosition,
    pub profile: StrikeProfile,
    pub waypoint: ApproachWaypoint,
    pub route: Route,
    /// Desired outgoing ball direction.
    pub kick_direction: Vector3,
    pub fingerprint: TrajectoryFingerprint,
}
