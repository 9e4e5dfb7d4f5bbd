use volley_core::{
    math::{flatten, lift, try_unit},
    Angle, ArenaGeometry, BallPath, CarData, TimedPosition,
};

use super::plan::{ApproachWaypoint, InterceptPlan, TrajectoryFingerprint};
use crate::{
    kick_strategy::KickStrategy,
    reachability::DistancePlot,
    routing::Router,
    strike::{BallisticTable, StrikeCatalog, StrikeProfile, StrikeTechnique, VerticalReach},
};

/// How far past a wall a waypoint may sit before it is unreachable.
const MAX_WAYPOINT_OUTSIDE_WALL: f64 = 1.0;

/// Finds the earliest contact on a predicted ball path that the car can
/// reach in time with a feasible technique.
///
/// The search is greedy: it stops at the first acceptable sample and never
/// weighs it against later ones.
pub struct InterceptSearch<'a, V = BallisticTable> {
    catalog: &'a StrikeCatalog<V>,
    router: &'a Router,
    arena: &'a ArenaGeometry,
}

impl<'a, V: VerticalReach> InterceptSearch<'a, V> {
    pub fn new(catalog: &'a StrikeCatalog<V>, router: &'a Router, arena: &'a ArenaGeometry) -> Self {
        Self {
            catalog,
            router,
            arena,
        }
    }

    /// The standard feasibility predicate: the technique can get up to the
    /// contact in time and the kick strategy is worth pursuing there.
    pub fn feasibility(&self, strategy: KickStrategy) -> impl Fn(&CarData, &TimedPosition, &StrikeProfile) -> bool + '_ {
        move |car: &CarData, contact: &TimedPosition, profile: &StrikeProfile| {
            self.catalog.vertically_accessible(car, contact, profile)
                && strategy.looks_viable(car, &contact.position, self.arena)
        }
    }

    /// Scan `path` after `car.time` and return the plan for the first sample
    /// that passes `predicate`, has a usable route, and leaves time for the
    /// route plus the pre-strike maneuver. Waypoints beyond the walls are
    /// skipped, and a car driving on a wall gets no plan.
    ///
    /// Deterministic: the same inputs always yield the same plan.
    pub fn compute_intercept<P>(
        &self,
        car: &CarData,
        path: &BallPath,
        plot: &DistancePlot,
        strategy: &KickStrategy,
        predicate: P,
    ) -> Option<InterceptPlan>
    where
        P: Fn(&CarData, &TimedPosition, &StrikeProfile) -> bool,
    {
        let max_sweep = self.router.settings().max_arc_sweep;

        if car.is_on_wall() {
            log::debug!("Car is on a wall, not planning");
            return None;
        }

        for sample in path.samples_after(car.time) {
            let contact = sample.timed_position();
            let kick_direction = strategy.kick_direction(car, &contact.position, self.arena);
            let flat_kick = flatten(&kick_direction);

            let Some(approach) = try_unit(&(flatten(&contact.position) - car.flat_position())) else {
                log::trace!("{:.2}s: contact on top of the car", contact.time);
                continue;
            };
            let approach_angle = Angle::correction(&approach, &flat_kick).abs();

            let Some(profile) = self.catalog.profile_for(&contact.position, approach_angle, car.boost) else {
                log::trace!("{:.2}s: no technique reaches {:.1}", contact.time, contact.position.z);
                continue;
            };
            if !predicate(car, &contact, &profile) {
                log::trace!("{:.2}s: {} rejected by predicate", contact.time, profile.technique);
                continue;
            }

            let facing = match profile.technique {
                StrikeTechnique::SideHit => approach,
                StrikeTechnique::DiagonalHit => try_unit(&(approach + flat_kick)).unwrap_or(approach),
                _ => flat_kick,
            };
            let waypoint = ApproachWaypoint {
                position: flatten(&contact.position) - facing * profile.approach_backoff,
                facing,
                arrival_time: contact.time - profile.pre_strike_duration,
            };
            let wall_distance = self.arena.distance_from_wall(&lift(&waypoint.position, 0.0));
            if wall_distance < -MAX_WAYPOINT_OUTSIDE_WALL {
                log::trace!("{:.2}s: waypoint {:.1} beyond the wall", contact.time, -wall_distance);
                continue;
            }

            let route = match self.router.route(car, &waypoint, plot) {
                Ok(route) => route,
                Err(err) => {
                    log::trace!("{:.2}s: {err}", contact.time);
                    continue;
                }
            };
            if !route.is_usable(max_sweep) {
                log::trace!(
                    "{:.2}s: route sweeps {:.0} degrees",
                    contact.time,
                    route.max_sweep().to_degrees()
                );
                continue;
            }
            let remaining = contact.time - car.time;
            let needed = route.duration() + profile.pre_strike_duration;
            if needed > remaining {
                log::trace!("{:.2}s: needs {needed:.2}s, has {remaining:.2}s", contact.time);
                continue;
            }

            log::debug!(
                "Intercept at {:.2}s with {} ({:.2}s slack)",
                contact.time,
                profile.technique,
                remaining - needed
            );
            return Some(InterceptPlan {
                contact,
                profile,
                waypoint,
                route,
                kick_direction,
                fingerprint: TrajectoryFingerprint::from(sample),
            });
        }
        None
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;
    use volley_core::{TrajectorySample, Vector2, Vector3};

    fn east_kick() -> KickStrategy {
        KickStrategy::Fixed(Vector2::new(1.0, 0.0))
    }

    fn resting_car(boost: f64) -> CarData {
        CarData::grounded(0.0, Vector2::zeros(), Angle::default(), 0.0, boost)
    }

    fn hovering_ball(position: Vector3, times: &[f64]) -> BallPath {
        BallPath::new(
            times
                .iter()
                .map(|&t| TrajectorySample::new(position, Vector3::zeros(), t))
                .collect(),
        )
    }

    struct Fixture {
        catalog: StrikeCatalog,
        router: Router,
        arena: ArenaGeometry,
        plot: DistancePlot,
    }

    impl Fixture {
        fn new() -> Self {
            Self {
                catalog: StrikeCatalog::default(),
                router: Router::default(),
                arena: ArenaGeometry::default(),
                plot: DistancePlot::constant_speed(10.0, 6.0),
            }
        }

        fn search(&self) -> InterceptSearch<'_> {
            InterceptSearch::new(&self.catalog, &self.router, &self.arena)
        }
    }

    /// A flip hit contact whose waypoint sits exactly 10 units ahead of a car
    /// at the origin.
    fn flip_hit_contact(fx: &Fixture) -> Vector3 {
        let backoff = fx.catalog.flip_hit().approach_backoff;
        Vector3::new(10.0 + backoff, 0.0, 3.0)
    }

    #[test]
    fn accepts_when_route_and_strike_fit() {
        let fx = Fixture::new();
        let car = resting_car(0.0);
        let path = hovering_ball(flip_hit_contact(&fx), &[1.2]);
        let plan = fx
            .search()
            .compute_intercept(&car, &path, &fx.plot, &east_kick(), |_, _, _| true)
            .unwrap();
        assert_eq!(plan.profile.technique, StrikeTechnique::FlipHit);
        assert_relative_eq!(plan.route.duration(), 1.0, epsilon = 1e-6);
        assert_relative_eq!(plan.waypoint.position.x, 10.0, epsilon = 1e-9);
        assert_relative_eq!(plan.waypoint.arrival_time, 1.1, epsilon = 1e-9);
        assert_eq!(plan.fingerprint.contact_time, 1.2);
        assert!(plan.route.duration() + plan.profile.pre_strike_duration <= plan.contact.time - car.time);
    }

    #[test]
    fn rejects_when_strike_does_not_fit() {
        let fx = Fixture::new();
        let car = resting_car(0.0);
        // 1.0s of driving plus 0.1s of flip cannot make a 1.0s contact.
        let path = hovering_ball(flip_hit_contact(&fx), &[1.0]);
        assert!(fx
            .search()
            .compute_intercept(&car, &path, &fx.plot, &east_kick(), |_, _, _| true)
            .is_none());
    }

    #[test]
    fn earliest_feasible_sample_wins() {
        let fx = Fixture::new();
        let car = resting_car(0.0);
        let path = hovering_ball(flip_hit_contact(&fx), &[0.5, 1.0, 1.2, 1.5, 2.0]);
        let plan = fx
            .search()
            .compute_intercept(&car, &path, &fx.plot, &east_kick(), |_, _, _| true)
            .unwrap();
        assert_eq!(plan.contact.time, 1.2);
    }

    #[test]
    fn search_is_idempotent() {
        let fx = Fixture::new();
        let car = resting_car(0.0);
        let path = hovering_ball(flip_hit_contact(&fx), &[0.5, 1.2, 1.5]);
        let search = fx.search();
        let first = search.compute_intercept(&car, &path, &fx.plot, &east_kick(), search.feasibility(east_kick()));
        let second = search.compute_intercept(&car, &path, &fx.plot, &east_kick(), search.feasibility(east_kick()));
        assert!(first.is_some());
        assert_eq!(first, second);
    }

    #[test]
    fn high_ball_without_boost_finds_nothing() {
        let fx = Fixture::new();
        let car = resting_car(10.0);
        let path = hovering_ball(Vector3::new(30.0, 0.0, 5.0), &[1.0, 2.0, 3.0, 4.0]);
        assert!(fx
            .search()
            .compute_intercept(&car, &path, &fx.plot, &east_kick(), |_, _, _| true)
            .is_none());
    }

    #[test]
    fn ignores_samples_in_the_past() {
        let fx = Fixture::new();
        let mut car = resting_car(0.0);
        car.time = 5.0;
        let path = hovering_ball(flip_hit_contact(&fx), &[1.2, 2.0, 5.0]);
        assert!(fx
            .search()
            .compute_intercept(&car, &path, &fx.plot, &east_kick(), |_, _, _| true)
            .is_none());
    }

    #[test]
    fn skips_waypoints_beyond_the_wall() {
        // The waypoint sits at x = 10; shrink the field around it.
        let mut fx = Fixture::new();
        let car = resting_car(0.0);
        let path = hovering_ball(flip_hit_contact(&fx), &[1.2]);

        fx.arena.side_wall = 9.5;
        assert!(fx
            .search()
            .compute_intercept(&car, &path, &fx.plot, &east_kick(), |_, _, _| true)
            .is_some());

        fx.arena.side_wall = 8.5;
        assert!(fx
            .search()
            .compute_intercept(&car, &path, &fx.plot, &east_kick(), |_, _, _| true)
            .is_none());
    }

    #[test]
    fn no_plan_from_a_wall() {
        let fx = Fixture::new();
        let mut car = resting_car(0.0);
        let path = hovering_ball(flip_hit_contact(&fx), &[1.2, 1.5, 2.0]);
        car.roof = Vector3::new(0.0, 1.0, 0.0);
        assert!(fx
            .search()
            .compute_intercept(&car, &path, &fx.plot, &east_kick(), |_, _, _| true)
            .is_none());
    }

    #[test]
    fn predicate_can_veto() {
        let fx = Fixture::new();
        let car = resting_car(0.0);
        let path = hovering_ball(flip_hit_contact(&fx), &[1.2, 1.5]);
        let plan = fx
            .search()
            .compute_intercept(&car, &path, &fx.plot, &east_kick(), |_, contact, _| contact.time > 1.3)
            .unwrap();
        assert_eq!(plan.contact.time, 1.5);
    }
}
