use volley_core::{math::lift, DebugColor, DebugMap, DebugShape, DebugValue, Vector3};

use crate::{
    intercept::{InterceptPlan, TrajectoryFingerprint},
    routing::{Route, RoutePart},
};

/// Spacing of the points used to draw route arcs.
const ARC_POINT_SPACING: f64 = 1.0;

/// Receives immutable snapshots of planning decisions. Every hook defaults to
/// doing nothing, so observers only implement what they care about.
pub trait PlanObserver {
    fn on_plan(&mut self, _plan: &InterceptPlan) {}

    fn on_route(&mut self, _route: &Route) {}

    fn on_disruption(&mut self, _fingerprint: &TrajectoryFingerprint) {}

    fn on_phase(&mut self, _phase: &str) {}
}

/// Observer that ignores everything.
#[derive(Debug, Default, Clone, Copy)]
pub struct NoopObserver;

impl PlanObserver for NoopObserver {}

/// Turns planning snapshots into debug shapes, one map per frame.
#[derive(Debug, Default, Clone)]
pub struct ShapeRecorder {
    records: DebugMap,
}

impl ShapeRecorder {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn records(&self) -> &DebugMap {
        &self.records
    }

    /// Hand over this frame's records and start a fresh map.
    pub fn take(&mut self) -> DebugMap {
        std::mem::take(&mut self.records)
    }

    fn record(&mut self, key: impl Into<String>, value: DebugValue) {
        self.records.insert(key.into(), value);
    }

    fn shape(&mut self, key: impl Into<String>, shape: DebugShape) {
        self.record(key, DebugValue::Shape(shape));
    }
}

impl PlanObserver for ShapeRecorder {
    fn on_plan(&mut self, plan: &InterceptPlan) {
        self.shape(
            "plan.contact",
            DebugShape::Cross {
                center: plan.contact.position,
                color: DebugColor::Orange,
            },
        );
        self.shape(
            "plan.waypoint",
            DebugShape::Cross {
                center: lift(&plan.waypoint.position, 0.0),
                color: DebugColor::Green,
            },
        );
        self.shape(
            "plan.kick",
            DebugShape::Line {
                start: plan.contact.position,
                end: plan.contact.position + plan.kick_direction * 10.0,
                color: DebugColor::Purple,
            },
        );
        self.record("plan.contact_time", DebugValue::Number(plan.contact.time));
        self.record("plan.technique", DebugValue::String(plan.profile.technique.to_string()));
    }

    fn on_route(&mut self, route: &Route) {
        self.records.retain(|key, _| !key.starts_with("route."));
        for (i, part) in route.parts().iter().enumerate() {
            let key = format!("route.part_{i}");
            let shape = match part {
                RoutePart::Straight { start, end, .. } => DebugShape::Line {
                    start: lift(start, 0.0),
                    end: lift(end, 0.0),
                    color: DebugColor::Green,
                },
                RoutePart::Arc { .. } => DebugShape::Polyline {
                    points: part
                        .points(ARC_POINT_SPACING)
                        .iter()
                        .map(|p| lift(p, 0.0))
                        .collect::<Vec<Vector3>>(),
                    color: DebugColor::Green,
                },
            };
            self.shape(key, shape);
        }
        self.record("route.duration", DebugValue::Number(route.duration()));
    }

    fn on_disruption(&mut self, fingerprint: &TrajectoryFingerprint) {
        self.shape(
            "plan.disrupted",
            DebugShape::Cross {
                center: fingerprint.position,
                color: DebugColor::Red,
            },
        );
    }

    fn on_phase(&mut self, phase: &str) {
        self.record("attempt.phase", DebugValue::String(phase.to_owned()));
    }
}
