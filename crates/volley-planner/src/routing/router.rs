use volley_core::{
    math::{left_of, sweep_radians, try_unit},
    Angle, CarData, RouterSettings, Vector2,
};

use super::route::{Route, RoutePart, TurnDirection};
use crate::{error::RouteError, intercept::ApproachWaypoint, reachability::DistancePlot};

const MIN_PART_LENGTH: f64 = 1e-6;

/// Arc, straight, arc geometry before timing is attached.
#[derive(Debug, Clone, Copy)]
struct CscPath {
    first: TurnDirection,
    second: TurnDirection,
    c1: Vector2,
    c2: Vector2,
    t1: Vector2,
    t2: Vector2,
    sweep1: f64,
    sweep2: f64,
}

impl CscPath {
    fn length(&self, radius: f64) -> f64 {
        radius * (self.sweep1 + self.sweep2) + (self.t2 - self.t1).norm()
    }
}

/// Builds curvature-constrained routes: one turning arc, a straight, and a
/// second arc (the four Dubins CSC families). The car never rotates in place.
#[derive(Clone, Debug, Default)]
pub struct Router {
    settings: RouterSettings,
}

impl Router {
    pub fn new(settings: RouterSettings) -> Self {
        Self { settings }
    }

    pub fn settings(&self) -> &RouterSettings {
        &self.settings
    }

    /// Turning circle radius at `speed`, limited by the lateral grip.
    pub fn turn_radius(&self, speed: f64) -> f64 {
        let s = &self.settings;
        let v = speed.abs().max(s.min_turn_speed);
        (v * v / s.max_lateral_accel).max(s.min_turn_radius)
    }

    /// Route from the car's flat position and heading to the waypoint.
    pub fn route(&self, car: &CarData, waypoint: &ApproachWaypoint, plot: &DistancePlot) -> Result<Route, RouteError> {
        let heading = car.heading().ok_or(RouteError::InvalidGeometry)?;
        self.route_between(
            car.flat_position(),
            heading,
            car.flat_speed(),
            waypoint.position,
            waypoint.facing,
            plot,
        )
    }

    /// Shortest CSC route between two oriented floor points, timed against
    /// `plot`.
    pub fn route_between(
        &self,
        start: Vector2,
        heading: Vector2,
        speed: f64,
        end: Vector2,
        facing: Vector2,
        plot: &DistancePlot,
    ) -> Result<Route, RouteError> {
        let heading = try_unit(&heading).ok_or(RouteError::InvalidGeometry)?;
        let facing = try_unit(&facing).ok_or(RouteError::InvalidGeometry)?;
        if (end - start).norm() < MIN_PART_LENGTH {
            return Err(RouteError::InvalidGeometry);
        }

        let radius = self.turn_radius(speed);
        let best = [
            (TurnDirection::Left, TurnDirection::Left),
            (TurnDirection::Right, TurnDirection::Right),
            (TurnDirection::Left, TurnDirection::Right),
            (TurnDirection::Right, TurnDirection::Left),
        ]
        .into_iter()
        .filter_map(|(first, second)| csc(start, heading, end, facing, radius, first, second))
        .min_by(|a, b| a.length(radius).total_cmp(&b.length(radius)))
        .ok_or(RouteError::NoTangent)?;

        let length = best.length(radius);
        plot.time_to_reach(length)
            .ok_or(RouteError::BeyondHorizon { length })?;

        Ok(timed_route(start, end, radius, &best, plot))
    }
}

/// Geometry of one CSC family, or `None` when its tangent does not exist.
fn csc(
    start: Vector2,
    heading: Vector2,
    end: Vector2,
    facing: Vector2,
    radius: f64,
    first: TurnDirection,
    second: TurnDirection,
) -> Option<CscPath> {
    let c1 = start + left_of(&heading) * (radius * first.sign());
    let c2 = end + left_of(&facing) * (radius * second.sign());
    let between = c2 - c1;
    let d = between.norm();

    let (t1, t2) = if first == second {
        match try_unit(&between) {
            Some(u) => {
                // Tangent point where travel around the circle runs along u.
                let n = -left_of(&u) * first.sign();
                (c1 + n * radius, c2 + n * radius)
            }
            // Same circle: the whole route is one arc.
            None => (end, end),
        }
    } else {
        if d < 2.0 * radius {
            return None;
        }
        let straight = (d * d - 4.0 * radius * radius).sqrt();
        let tilt = Angle::from_radians(first.sign() * (2.0 * radius).atan2(straight));
        let u = tilt.rotate_vector(&(between / d));
        let n = -left_of(&u) * first.sign();
        (c1 + n * radius, c2 - n * radius)
    };

    Some(CscPath {
        first,
        second,
        c1,
        c2,
        t1,
        t2,
        sweep1: sweep_radians(&c1, &start, &t1, first.is_clockwise()),
        sweep2: sweep_radians(&c2, &t2, &end, second.is_clockwise()),
    })
}

/// Attach per-part durations. Each part takes the plot time between the
/// cumulative distance at its start and at its end.
fn timed_route(start: Vector2, end: Vector2, radius: f64, path: &CscPath, plot: &DistancePlot) -> Route {
    let mut travelled = 0.0;
    let mut clock = 0.0;
    let mut advance = |length: f64| {
        travelled += length;
        let at = plot.time_to_reach(travelled).unwrap_or(clock);
        let duration = (at - clock).max(0.0);
        clock = at;
        duration
    };

    let mut parts = Vec::with_capacity(3);
    let arc1 = radius * path.sweep1;
    if arc1 > MIN_PART_LENGTH {
        parts.push(RoutePart::Arc {
            start,
            end: path.t1,
            center: path.c1,
            radius,
            direction: path.first,
            sweep: path.sweep1,
            length: arc1,
            duration: advance(arc1),
        });
    }
    let straight = (path.t2 - path.t1).norm();
    if straight > MIN_PART_LENGTH {
        parts.push(RoutePart::Straight {
            start: path.t1,
            end: path.t2,
            length: straight,
            duration: advance(straight),
        });
    }
    let arc2 = radius * path.sweep2;
    if arc2 > MIN_PART_LENGTH {
        parts.push(RoutePart::Arc {
            start: path.t2,
            end,
            center: path.c2,
            radius,
            direction: path.second,
            sweep: path.sweep2,
            length: arc2,
            duration: advance(arc2),
        });
    }
    Route::new(parts)
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;
    use std::f64::consts::PI;

    fn plot() -> DistancePlot {
        DistancePlot::constant_speed(10.0, 20.0)
    }

    fn east() -> Vector2 {
        Vector2::new(1.0, 0.0)
    }

    #[test]
    fn aligned_waypoint_is_a_straight() {
        let router = Router::default();
        let route = router
            .route_between(Vector2::zeros(), east(), 0.0, Vector2::new(20.0, 0.0), east(), &plot())
            .unwrap();
        assert_eq!(route.parts().len(), 1);
        assert!(matches!(route.parts()[0], RoutePart::Straight { .. }));
        assert_relative_eq!(route.length(), 20.0, epsilon = 1e-6);
        assert_relative_eq!(route.duration(), 2.0, epsilon = 1e-6);
        assert!(route.is_usable(PI / 2.0));
    }

    #[test]
    fn target_behind_is_unusable() {
        let router = Router::default();
        for facing in [east(), -east()] {
            let route = router
                .route_between(Vector2::zeros(), east(), 0.0, Vector2::new(-20.0, 0.0), facing, &plot())
                .unwrap();
            assert!(route.max_sweep() > PI / 2.0);
            assert!(!route.is_usable(PI / 2.0));
        }
    }

    #[test]
    fn quarter_turn_picks_one_arc() {
        let router = Router::default();
        let r = router.turn_radius(0.0);
        // Exactly one left quarter circle from the origin heading east.
        let end = Vector2::new(r, r);
        let route = router
            .route_between(Vector2::zeros(), east(), 0.0, end, Vector2::new(0.0, 1.0), &plot())
            .unwrap();
        assert_relative_eq!(route.length(), r * PI / 2.0, epsilon = 1e-6);
        assert_relative_eq!(route.max_sweep(), PI / 2.0, epsilon = 1e-6);
        assert!(route.is_usable(PI / 2.0 + 1e-6));
    }

    #[test]
    fn radius_follows_speed() {
        let router = Router::default();
        assert_relative_eq!(router.turn_radius(0.0), 4.0);
        assert_relative_eq!(router.turn_radius(20.0), 16.0);
        let tight = Router::new(RouterSettings {
            max_lateral_accel: 1000.0,
            ..Default::default()
        });
        assert_relative_eq!(tight.turn_radius(0.0), 3.0);
    }

    #[test]
    fn duration_comes_from_the_plot() {
        let router = Router::default();
        let accelerating = DistancePlot::new(
            (0..=60)
                .map(|i| {
                    let t = i as f64 * 0.1;
                    crate::reachability::DistanceTimeSpeed {
                        time: t,
                        distance: 5.0 * t * t,
                        speed: 10.0 * t,
                    }
                })
                .collect(),
        );
        let route = router
            .route_between(Vector2::zeros(), east(), 0.0, Vector2::new(20.0, 0.0), east(), &accelerating)
            .unwrap();
        // 5 t^2 = 20 at t = 2, while 20 / average speed would differ.
        assert_relative_eq!(route.duration(), 2.0, epsilon = 1e-6);
    }

    #[test]
    fn degenerate_input_is_rejected() {
        let router = Router::default();
        let p = plot();
        assert_eq!(
            router.route_between(Vector2::zeros(), Vector2::zeros(), 0.0, Vector2::new(5.0, 0.0), east(), &p),
            Err(RouteError::InvalidGeometry)
        );
        assert_eq!(
            router.route_between(Vector2::zeros(), east(), 0.0, Vector2::zeros(), east(), &p),
            Err(RouteError::InvalidGeometry)
        );
        let short = DistancePlot::constant_speed(1.0, 1.0);
        assert!(matches!(
            router.route_between(Vector2::zeros(), east(), 0.0, Vector2::new(20.0, 0.0), east(), &short),
            Err(RouteError::BeyondHorizon { .. })
        ));
    }
}
