use std::collections::HashMap;

use serde::{Deserialize, Serialize};

use crate::Vector3;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DebugColor {
    #[default]
    Red,
    Green,
    Orange,
    Purple,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", content = "data")]
pub enum DebugShape {
    Cross {
        center: Vector3,
        color: DebugColor,
    },
    Line {
        start: Vector3,
        end: Vector3,
        color: DebugColor,
    },
    /// An open polyline, used for route arcs.
    Polyline {
        points: Vec<Vector3>,
        color: DebugColor,
    },
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", content = "data")]
pub enum DebugValue {
    Shape(DebugShape),
    Number(f64),
    String(String),
}

/// A map of debug records for one frame.
///
/// # Key format
///
/// Keys are `snake_case` and only contain alphanumerical characters. The `.`
/// character separates the parts of a key, e.g. `plan.waypoint` or
/// `route.part_0`.
pub type DebugMap = HashMap<String, DebugValue>;
