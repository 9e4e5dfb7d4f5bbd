use volley_core::{math::lerp, CarData, ReachabilitySettings};

/// One slice of a distance plot: after `time` seconds of full acceleration the
/// car has covered `distance` and moves at `speed`.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct DistanceTimeSpeed {
    pub time: f64,
    pub distance: f64,
    pub speed: f64,
}

/// Maximum ground distance reachable as a function of elapsed time.
///
/// Slices are ordered by time and their distances never decrease, so the plot
/// can be inverted to answer "when is this distance first reachable".
#[derive(Clone, Debug, PartialEq)]
pub struct DistancePlot {
    slices: Vec<DistanceTimeSpeed>,
}

impl DistancePlot {
    /// Build a plot from slices starting at time 0. Slices that would break
    /// monotonicity are dropped.
    pub fn new(slices: Vec<DistanceTimeSpeed>) -> Self {
        let mut clean: Vec<DistanceTimeSpeed> = Vec::with_capacity(slices.len());
        for slice in slices {
            if let Some(last) = clean.last() {
                if slice.time <= last.time || slice.distance < last.distance {
                    continue;
                }
            }
            clean.push(slice);
        }
        Self { slices: clean }
    }

    /// A car that instantly holds `speed` for the whole horizon.
    pub fn constant_speed(speed: f64, horizon: f64) -> Self {
        Self::new(vec![
            DistanceTimeSpeed {
                time: 0.0,
                distance: 0.0,
                speed,
            },
            DistanceTimeSpeed {
                time: horizon,
                distance: speed * horizon,
                speed,
            },
        ])
    }

    pub fn slices(&self) -> &[DistanceTimeSpeed] {
        &self.slices
    }

    /// Earliest elapsed time at which `distance` is reachable, or `None` when
    /// the plot never gets that far.
    pub fn time_to_reach(&self, distance: f64) -> Option<f64> {
        self.motion_after_distance(distance).map(|m| m.time)
    }

    /// Interpolated motion after `distance` has been covered.
    pub fn motion_after_distance(&self, distance: f64) -> Option<DistanceTimeSpeed> {
        let first = self.slices.first()?;
        if distance <= first.distance {
            return Some(*first);
        }
        let idx = self.slices.partition_point(|s| s.distance < distance);
        let after = *self.slices.get(idx)?;
        let before = self.slices[idx - 1];
        let span = after.distance - before.distance;
        if span <= 0.0 {
            return Some(after);
        }
        let t = (distance - before.distance) / span;
        Some(DistanceTimeSpeed {
            time: lerp(before.time, after.time, t),
            distance,
            speed: lerp(before.speed, after.speed, t),
        })
    }

    /// Interpolated motion after `time` seconds.
    pub fn motion_after_time(&self, time: f64) -> Option<DistanceTimeSpeed> {
        let first = self.slices.first()?;
        if time <= first.time {
            return Some(*first);
        }
        let idx = self.slices.partition_point(|s| s.time < time);
        let after = *self.slices.get(idx)?;
        let before = self.slices[idx - 1];
        let t = (time - before.time) / (after.time - before.time);
        Some(DistanceTimeSpeed {
            time,
            distance: lerp(before.distance, after.distance, t),
            speed: lerp(before.speed, after.speed, t),
        })
    }
}

/// Produces the distance plot of a car.
pub trait ReachabilityModel {
    /// Simulate full acceleration from the car's current state for `horizon`
    /// seconds, spending at most `boost_budget` boost.
    fn simulate(&self, car: &CarData, horizon: f64, boost_budget: f64) -> DistancePlot;
}

/// Straight-line full-throttle model: throttle acceleration fades linearly
/// to zero at the throttle cap, boost adds a constant push while the budget
/// lasts, and speed never exceeds the absolute cap.
#[derive(Clone, Debug, Default)]
pub struct AccelerationModel {
    settings: ReachabilitySettings,
}

impl AccelerationModel {
    pub fn new(settings: ReachabilitySettings) -> Self {
        Self { settings }
    }

    fn throttle_accel(&self, speed: f64) -> f64 {
        let s = &self.settings;
        if speed >= s.throttle_max_speed {
            return 0.0;
        }
        s.throttle_accel * (1.0 - speed / s.throttle_max_speed)
    }
}

impl ReachabilityModel for AccelerationModel {
    fn simulate(&self, car: &CarData, horizon: f64, boost_budget: f64) -> DistancePlot {
        let s = &self.settings;
        let step = s.step.max(1e-3);
        let mut speed = car.forward_speed().clamp(0.0, s.max_speed);
        let mut boost = boost_budget.max(0.0);
        let mut time = 0.0;
        let mut distance = 0.0;
        let mut slices = vec![DistanceTimeSpeed {
            time,
            distance,
            speed,
        }];

        while time < horizon {
            let mut accel = self.throttle_accel(speed);
            if boost > 0.0 && speed < s.max_speed {
                accel += s.boost_accel;
                boost -= s.boost_per_second * step;
            }
            let next_speed = (speed + accel * step).min(s.max_speed);
            distance += 0.5 * (speed + next_speed) * step;
            speed = next_speed;
            time += step;
            slices.push(DistanceTimeSpeed {
                time,
                distance,
                speed,
            });
        }

        DistancePlot::new(slices)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;
    use volley_core::{Angle, Vector2};

    #[test]
    fn constant_speed_inverts_exactly() {
        let plot = DistancePlot::constant_speed(10.0, 6.0);
        assert_relative_eq!(plot.time_to_reach(10.0).unwrap(), 1.0, epsilon = 1e-12);
        assert_relative_eq!(plot.time_to_reach(0.0).unwrap(), 0.0);
        assert!(plot.time_to_reach(61.0).is_none());
    }

    #[test]
    fn motion_after_time_interpolates() {
        let plot = DistancePlot::constant_speed(10.0, 6.0);
        let m = plot.motion_after_time(2.5).unwrap();
        assert_relative_eq!(m.distance, 25.0, epsilon = 1e-9);
        assert!(plot.motion_after_time(7.0).is_none());
    }

    #[test]
    fn acceleration_from_rest_ramps_up() {
        let model = AccelerationModel::default();
        let car = CarData::grounded(0.0, Vector2::zeros(), Angle::default(), 0.0, 0.0);
        let plot = model.simulate(&car, 3.0, 0.0);
        let early = plot.motion_after_time(0.5).unwrap();
        let late = plot.motion_after_time(2.5).unwrap();
        assert!(late.speed > early.speed);
        assert!(late.speed <= 28.0 + 1e-9);
        // Ramp-up makes the first 10 units slower than at cruise speed.
        let first = plot.time_to_reach(10.0).unwrap();
        let second = plot.time_to_reach(20.0).unwrap() - first;
        assert!(first > second);
    }

    #[test]
    fn boost_extends_reach() {
        let model = AccelerationModel::default();
        let car = CarData::grounded(0.0, Vector2::zeros(), Angle::default(), 10.0, 100.0);
        let without = model.simulate(&car, 3.0, 0.0);
        let with = model.simulate(&car, 3.0, 100.0);
        let d_without = without.motion_after_time(3.0).unwrap().distance;
        let d_with = with.motion_after_time(3.0).unwrap().distance;
        assert!(d_with > d_without);
        assert!(with.slices().iter().all(|s| s.speed <= 46.0 + 1e-9));
    }

    #[test]
    fn drops_non_monotonic_slices() {
        let plot = DistancePlot::new(vec![
            DistanceTimeSpeed { time: 0.0, distance: 0.0, speed: 1.0 },
            DistanceTimeSpeed { time: 1.0, distance: 5.0, speed: 1.0 },
            DistanceTimeSpeed { time: 2.0, distance: 4.0, speed: 1.0 },
        ]);
        assert_eq!(plot.slices().len(), 2);
    }
}
