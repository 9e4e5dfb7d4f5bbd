use serde::Serialize;
use volley_core::{Angle, Vector2};

/// Which way an arc turns when driven forward.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum TurnDirection {
    Left,
    Right,
}

impl TurnDirection {
    /// +1 for counter-clockwise, -1 for clockwise.
    pub fn sign(&self) -> f64 {
        match self {
            TurnDirection::Left => 1.0,
            TurnDirection::Right => -1.0,
        }
    }

    pub fn is_clockwise(&self) -> bool {
        matches!(self, TurnDirection::Right)
    }
}

/// One drivable piece of a route.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum RoutePart {
    Straight {
        start: Vector2,
        end: Vector2,
        length: f64,
        duration: f64,
    },
    Arc {
        start: Vector2,
        end: Vector2,
        center: Vector2,
        radius: f64,
        direction: TurnDirection,
        /// Angle swept around the center, in [0, 2pi).
        sweep: f64,
        length: f64,
        duration: f64,
    },
}

impl RoutePart {
    pub fn start(&self) -> Vector2 {
        match self {
            RoutePart::Straight { start, .. } | RoutePart::Arc { start, .. } => *start,
        }
    }

    pub fn end(&self) -> Vector2 {
        match self {
            RoutePart::Straight { end, .. } | RoutePart::Arc { end, .. } => *end,
        }
    }

    pub fn length(&self) -> f64 {
        match self {
            RoutePart::Straight { length, .. } | RoutePart::Arc { length, .. } => *length,
        }
    }

    pub fn duration(&self) -> f64 {
        match self {
            RoutePart::Straight { duration, .. } | RoutePart::Arc { duration, .. } => *duration,
        }
    }

    /// Swept angle of an arc, zero for straights.
    pub fn sweep(&self) -> f64 {
        match self {
            RoutePart::Straight { .. } => 0.0,
            RoutePart::Arc { sweep, .. } => *sweep,
        }
    }

    /// Points along the part, at most `spacing` apart, for drawing.
    pub fn points(&self, spacing: f64) -> Vec<Vector2> {
        match self {
            RoutePart::Straight { start, end, .. } => vec![*start, *end],
            RoutePart::Arc {
                start,
                center,
                direction,
                sweep,
                length,
                ..
            } => {
                let steps = ((length / spacing.max(1e-3)).ceil() as usize).max(1);
                let radial = start - center;
                (0..=steps)
                    .map(|i| {
                        let angle = direction.sign() * sweep * i as f64 / steps as f64;
                        center + Angle::from_radians(angle).rotate_vector(&radial)
                    })
                    .collect()
            }
        }
    }
}

/// A drivable path from the car to an approach waypoint, built from straights
/// and constant-radius arcs. Never mutated once built; replanning builds a
/// new one.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Route {
    parts: Vec<RoutePart>,
}

impl Route {
    pub fn new(parts: Vec<RoutePart>) -> Self {
        Self { parts }
    }

    pub fn parts(&self) -> &[RoutePart] {
        &self.parts
    }

    /// Total traversal time.
    pub fn duration(&self) -> f64 {
        self.parts.iter().map(RoutePart::duration).sum()
    }

    pub fn length(&self) -> f64 {
        self.parts.iter().map(RoutePart::length).sum()
    }

    /// Largest sweep of any arc on the route.
    pub fn max_sweep(&self) -> f64 {
        self.parts.iter().map(RoutePart::sweep).fold(0.0, f64::max)
    }

    /// A route that turns further than `max_arc_sweep` on any arc is an
    /// excessive detour and must not be followed.
    pub fn is_usable(&self, max_arc_sweep: f64) -> bool {
        self.max_sweep() <= max_arc_sweep
    }

    /// The first point the car should drive toward.
    pub fn steer_target(&self) -> Option<Vector2> {
        self.parts.first().map(RoutePart::end)
    }
}
