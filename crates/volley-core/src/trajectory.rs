use serde::{Deserialize, Serialize};

use crate::{math::lerp, Vector3};

/// A point in space at a moment in game time.
#[derive(Serialize, Deserialize, Clone, Copy, Debug, PartialEq)]
pub struct TimedPosition {
    pub position: Vector3,
    /// Game time in seconds
    pub time: f64,
}

impl TimedPosition {
    pub fn new(position: Vector3, time: f64) -> Self {
        Self { position, time }
    }
}

/// One predicted ball state.
#[derive(Serialize, Deserialize, Clone, Copy, Debug, PartialEq)]
pub struct TrajectorySample {
    pub position: Vector3,
    pub velocity: Vector3,
    /// Game time in seconds
    pub time: f64,
    /// Normal of the surface the ball bounced off on the step leading to this
    /// sample, if it bounced.
    pub bounce: Option<Vector3>,
}

impl TrajectorySample {
    pub fn new(position: Vector3, velocity: Vector3, time: f64) -> Self {
        Self {
            position,
            velocity,
            time,
            bounce: None,
        }
    }

    pub fn with_bounce(mut self, normal: Vector3) -> Self {
        self.bounce = Some(normal);
        self
    }

    pub fn timed_position(&self) -> TimedPosition {
        TimedPosition::new(self.position, self.time)
    }
}

/// A finite predicted future of the ball, ordered by strictly increasing time.
///
/// Paths are produced fresh every frame and only ever borrowed by the planner.
#[derive(Serialize, Deserialize, Clone, Debug, Default)]
pub struct BallPath {
    samples: Vec<TrajectorySample>,
}

impl BallPath {
    /// Build a path, dropping any sample that does not advance time.
    pub fn new(samples: Vec<TrajectorySample>) -> Self {
        let mut ordered: Vec<TrajectorySample> = Vec::with_capacity(samples.len());
        for sample in samples {
            if let Some(last) = ordered.last() {
                if sample.time <= last.time {
                    log::warn!(
                        "Dropping ball path sample at {:.3}s, not after {:.3}s",
                        sample.time,
                        last.time
                    );
                    continue;
                }
            }
            ordered.push(sample);
        }
        Self { samples: ordered }
    }

    pub fn samples(&self) -> &[TrajectorySample] {
        &self.samples
    }

    pub fn is_empty(&self) -> bool {
        self.samples.is_empty()
    }

    pub fn len(&self) -> usize {
        self.samples.len()
    }

    pub fn start_time(&self) -> Option<f64> {
        self.samples.first().map(|s| s.time)
    }

    pub fn end_time(&self) -> Option<f64> {
        self.samples.last().map(|s| s.time)
    }

    /// The ball state at `time`, linearly interpolated between the neighbouring
    /// samples. `None` outside the predicted horizon.
    pub fn state_at(&self, time: f64) -> Option<TrajectorySample> {
        let first = self.samples.first()?;
        let last = self.samples.last()?;
        if time < first.time || time > last.time {
            return None;
        }
        let idx = self.samples.partition_point(|s| s.time < time);
        let after = self.samples[idx];
        if idx == 0 || after.time == time {
            return Some(after);
        }
        let before = self.samples[idx - 1];
        let t = (time - before.time) / (after.time - before.time);
        Some(TrajectorySample {
            position: before.position.lerp(&after.position, t),
            velocity: before.velocity.lerp(&after.velocity, t),
            time: lerp(before.time, after.time, t),
            bounce: None,
        })
    }

    /// The first sample strictly after `time` that carries a bounce marker.
    pub fn first_bounce_after(&self, time: f64) -> Option<&TrajectorySample> {
        self.samples
            .iter()
            .find(|s| s.time > time && s.bounce.is_some())
    }

    /// Samples strictly after `time`, in order.
    pub fn samples_after(&self, time: f64) -> &[TrajectorySample] {
        let idx = self.samples.partition_point(|s| s.time <= time);
        &self.samples[idx..]
    }
}
