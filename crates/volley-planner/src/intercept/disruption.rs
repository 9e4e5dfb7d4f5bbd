use volley_core::{BallPath, MonitorSettings};

use super::plan::{InterceptPlan, TrajectoryFingerprint};

/// Watches whether the ball path a plan was built on still holds.
///
/// Only ever reports; discarding and replanning is the caller's job.
#[derive(Debug, Clone, Default)]
pub struct DisruptionMonitor {
    settings: MonitorSettings,
    committed: Option<TrajectoryFingerprint>,
}

impl DisruptionMonitor {
    pub fn new(settings: MonitorSettings) -> Self {
        Self {
            settings,
            committed: None,
        }
    }

    /// Remember the fingerprint of a freshly committed plan, replacing any
    /// previous one.
    pub fn commit(&mut self, plan: &InterceptPlan) {
        self.committed = Some(plan.fingerprint);
    }

    pub fn clear(&mut self) {
        self.committed = None;
    }

    /// Whether the current prediction no longer agrees with the committed
    /// contact. False when nothing is committed or the contact time has left
    /// the current horizon.
    pub fn is_disrupted(&self, current: &BallPath) -> bool {
        let Some(fingerprint) = &self.committed else {
            return false;
        };
        let Some(now) = current.state_at(fingerprint.contact_time) else {
            return false;
        };
        let drift = (now.position - fingerprint.position).norm();
        let velocity_drift = (now.velocity - fingerprint.velocity).norm();
        let disrupted = drift > self.settings.position_tolerance
            || velocity_drift > self.settings.velocity_tolerance;
        if disrupted {
            log::debug!(
                "Ball path disrupted at {:.2}s: position off by {drift:.2}, velocity off by {velocity_drift:.2}",
                fingerprint.contact_time
            );
        }
        disrupted
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{intercept::ApproachWaypoint, routing::Route, strike::StrikeProfile};
    use volley_core::{TrajectorySample, Vector2, Vector3};

    fn path(offset: Vector3, end: f64) -> BallPath {
        let mut samples = Vec::new();
        let mut t = 0.0;
        while t <= end + 1e-9 {
            samples.push(TrajectorySample::new(
                Vector3::new(10.0 * t, 0.0, 1.0) + offset,
                Vector3::new(10.0, 0.0, 0.0),
                t,
            ));
            t += 0.1;
        }
        BallPath::new(samples)
    }

    fn plan_on(path: &BallPath, index: usize) -> InterceptPlan {
        let sample = &path.samples()[index];
        InterceptPlan {
            contact: sample.timed_position(),
            profile: StrikeProfile::chip(2.8),
            waypoint: ApproachWaypoint {
                position: Vector2::zeros(),
                facing: Vector2::x(),
                arrival_time: sample.time,
            },
            route: Route::new(Vec::new()),
            kick_direction: Vector3::x(),
            fingerprint: TrajectoryFingerprint::from(sample),
        }
    }

    #[test]
    fn fresh_commit_is_not_disrupted() {
        let original = path(Vector3::zeros(), 2.0);
        let mut monitor = DisruptionMonitor::default();
        assert!(!monitor.is_disrupted(&original));
        monitor.commit(&plan_on(&original, 10));
        assert!(!monitor.is_disrupted(&original));
        assert!(!monitor.is_disrupted(&path(Vector3::new(0.0, 1.0, 0.0), 2.0)));
    }

    #[test]
    fn moved_contact_is_disrupted() {
        let original = path(Vector3::zeros(), 2.0);
        let mut monitor = DisruptionMonitor::default();
        monitor.commit(&plan_on(&original, 10));
        assert!(monitor.is_disrupted(&path(Vector3::new(0.0, 2.5, 0.0), 2.0)));
        monitor.clear();
        assert!(!monitor.is_disrupted(&path(Vector3::new(0.0, 2.5, 0.0), 2.0)));
    }

    #[test]
    fn changed_velocity_is_disrupted() {
        let original = path(Vector3::zeros(), 2.0);
        let mut monitor = DisruptionMonitor::default();
        monitor.commit(&plan_on(&original, 10));
        let kicked = BallPath::new(
            original
                .samples()
                .iter()
                .map(|s| TrajectorySample::new(s.position, Vector3::new(10.0, 20.0, 0.0), s.time))
                .collect(),
        );
        assert!(monitor.is_disrupted(&kicked));
    }

    #[test]
    fn contact_beyond_horizon_is_not_disrupted() {
        let original = path(Vector3::zeros(), 2.0);
        let mut monitor = DisruptionMonitor::default();
        monitor.commit(&plan_on(&original, 15));
        assert!(!monitor.is_disrupted(&path(Vector3::new(0.0, 5.0, 0.0), 1.0)));
    }
}
