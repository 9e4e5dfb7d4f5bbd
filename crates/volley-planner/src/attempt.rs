use serde::Serialize;
use volley_core::{
    math::flatten, BallData, BallPath, BallTouch, CarData, TacticalSituation, TimedPosition, Vector2,
};

use crate::{
    error::PlanError,
    intercept::{DisruptionMonitor, InterceptPlan},
    kick_strategy::KickStrategy,
    observer::PlanObserver,
    reachability::DistancePlot,
    routing::Route,
    strike::{BallisticTable, StrikeTechnique, VerticalReach},
    StrikePlanner,
};

/// Everything a strike attempt needs to know about the current frame.
pub struct AttemptCtx<'a, V = BallisticTable> {
    pub planner: &'a StrikePlanner<V>,
    pub car: &'a CarData,
    pub ball: &'a BallData,
    /// This frame's ball prediction.
    pub path: &'a BallPath,
    /// This frame's reachability of the car.
    pub plot: &'a DistancePlot,
    pub latest_touch: Option<&'a BallTouch>,
    pub situation: &'a TacticalSituation,
}

/// What the car should do this frame.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum Directive {
    /// Drive toward `target`, the end of the route's first part.
    Steer {
        target: Vector2,
        arrival_time: f64,
        route: Route,
    },
    /// Execute the strike maneuver.
    Launch {
        technique: StrikeTechnique,
        contact: TimedPosition,
    },
    /// No plan: shadow the ball loosely.
    TrackBall { target: Vector2 },
}

/// How an attempt ended.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AttemptResult {
    Success,
    Failure(PlanError),
}

#[derive(Debug)]
pub enum AttemptProgress {
    Continue(Directive),
    Done(AttemptResult),
}

impl AttemptProgress {
    pub fn success() -> AttemptProgress {
        AttemptProgress::Done(AttemptResult::Success)
    }

    pub fn failure(error: PlanError) -> AttemptProgress {
        AttemptProgress::Done(AttemptResult::Failure(error))
    }
}

#[derive(Debug, Clone)]
enum AttemptPhase {
    Searching,
    Approaching { plan: InterceptPlan },
    Launching { plan: InterceptPlan },
    Done,
    Aborted(PlanError),
}

impl AttemptPhase {
    fn name(&self) -> &'static str {
        match self {
            AttemptPhase::Searching => "searching",
            AttemptPhase::Approaching { .. } => "approaching",
            AttemptPhase::Launching { .. } => "launching",
            AttemptPhase::Done => "done",
            AttemptPhase::Aborted(_) => "aborted",
        }
    }
}

/// One attempt to strike the ball, from the first search to the contact.
///
/// Owns every bit of per-attempt state; nothing lives in globals. Call
/// [`StrikeAttempt::update`] once per frame.
#[derive(Debug, Clone)]
pub struct StrikeAttempt {
    phase: AttemptPhase,
    strategy: KickStrategy,
    monitor: DisruptionMonitor,
    /// The ball touch current when the attempt started.
    original_touch: Option<BallTouch>,
    done_moment: Option<f64>,
    misses: u32,
}

impl StrikeAttempt {
    pub fn new(monitor: DisruptionMonitor, strategy: KickStrategy, original_touch: Option<BallTouch>) -> Self {
        Self {
            phase: AttemptPhase::Searching,
            strategy,
            monitor,
            original_touch,
            done_moment: None,
            misses: 0,
        }
    }

    pub fn phase_name(&self) -> &'static str {
        self.phase.name()
    }

    /// The committed plan, if any.
    pub fn plan(&self) -> Option<&InterceptPlan> {
        match &self.phase {
            AttemptPhase::Approaching { plan } | AttemptPhase::Launching { plan } => Some(plan),
            _ => None,
        }
    }

    pub fn update<V: VerticalReach>(
        &mut self,
        ctx: &AttemptCtx<'_, V>,
        observer: &mut dyn PlanObserver,
    ) -> AttemptProgress {
        match &self.phase {
            AttemptPhase::Done => return AttemptProgress::success(),
            AttemptPhase::Aborted(err) => return AttemptProgress::failure(*err),
            _ => {}
        }

        // Once launched, the next touch is most likely our own strike.
        let launched = matches!(self.phase, AttemptPhase::Launching { .. });
        if !launched && ctx.latest_touch != self.original_touch.as_ref() {
            log::debug!("Ball was touched, abandoning strike");
            return self.abort(PlanError::PlanDisrupted, observer);
        }
        if self.conceded(ctx) {
            return self.abort(PlanError::ContactConceded, observer);
        }

        let settings = ctx.planner.attempt_settings();
        let now = ctx.car.time;
        if (ctx.car.position - ctx.ball.position).norm() < settings.finish_distance && self.done_moment.is_none() {
            self.done_moment = Some(now + settings.finish_delay);
        }
        if self.done_moment.is_some_and(|moment| now > moment) {
            self.set_phase(AttemptPhase::Done, observer);
            return AttemptProgress::success();
        }

        match std::mem::replace(&mut self.phase, AttemptPhase::Searching) {
            AttemptPhase::Approaching { plan } => self.approach(plan, ctx, observer),
            AttemptPhase::Launching { plan } => self.launch(plan, ctx, observer),
            _ => self.search(ctx, observer),
        }
    }

    fn conceded<V: VerticalReach>(&self, ctx: &AttemptCtx<'_, V>) -> bool {
        let settings = ctx.planner.attempt_settings();
        if ctx.situation.ball_advantage < settings.min_ball_advantage {
            log::debug!("Ball advantage {:.2} too low", ctx.situation.ball_advantage);
            return true;
        }
        match (&ctx.situation.expected_enemy_contact, self.plan()) {
            (Some(enemy), Some(plan)) => {
                let beaten_by = plan.contact.time - enemy.time;
                if beaten_by > settings.enemy_contact_margin {
                    log::debug!("Enemy reaches the ball {beaten_by:.2}s before us");
                    return true;
                }
                false
            }
            _ => false,
        }
    }

    fn search<V: VerticalReach>(&mut self, ctx: &AttemptCtx<'_, V>, observer: &mut dyn PlanObserver) -> AttemptProgress {
        let search = ctx.planner.search();
        let plan = search.compute_intercept(
            ctx.car,
            ctx.path,
            ctx.plot,
            &self.strategy,
            search.feasibility(self.strategy),
        );

        let Some(plan) = plan else {
            self.misses += 1;
            let patience = ctx.planner.attempt_settings().search_patience;
            if self.misses >= patience {
                log::debug!("No intercept in {} frames", self.misses);
                return self.abort(PlanError::NoPlanFound, observer);
            }
            self.set_phase(AttemptPhase::Searching, observer);
            return AttemptProgress::Continue(Directive::TrackBall {
                target: flatten(&ctx.ball.position),
            });
        };

        self.misses = 0;
        self.monitor.commit(&plan);
        observer.on_plan(&plan);
        observer.on_route(&plan.route);
        let directive = steer(&plan);
        self.set_phase(AttemptPhase::Approaching { plan }, observer);
        AttemptProgress::Continue(directive)
    }

    fn approach<V: VerticalReach>(
        &mut self,
        plan: InterceptPlan,
        ctx: &AttemptCtx<'_, V>,
        observer: &mut dyn PlanObserver,
    ) -> AttemptProgress {
        let planner = ctx.planner;
        let settings = planner.attempt_settings();
        let car = ctx.car;

        if self.monitor.is_disrupted(ctx.path) {
            observer.on_disruption(&plan.fingerprint);
            return self.replan(ctx, observer);
        }
        if car.time >= plan.contact.time {
            log::debug!("Missed the contact at {:.2}s", plan.contact.time);
            return self.replan(ctx, observer);
        }

        let remaining = plan.contact.time - car.time;
        let to_waypoint = (car.flat_position() - plan.waypoint.position).norm();
        if to_waypoint <= settings.launch_radius {
            let checklist = planner.readiness().checklist_for(&plan.profile, car, &plan.contact);
            if checklist.ready() {
                log::debug!("Launching {} for contact at {:.2}s", plan.profile.technique, plan.contact.time);
                let directive = launch(&plan);
                self.set_phase(AttemptPhase::Launching { plan }, observer);
                return AttemptProgress::Continue(directive);
            }
            if plan.profile.pre_strike_duration > remaining {
                log::debug!("Too late to launch, unmet: {:?}", checklist.unmet());
                return self.replan(ctx, observer);
            }
            log::trace!("Waiting at waypoint, unmet: {:?}", checklist.unmet());
            // Nothing left to drive.
            let plan = InterceptPlan {
                route: Route::new(Vec::new()),
                ..plan
            };
            let directive = Directive::Steer {
                target: flatten(&plan.contact.position),
                arrival_time: plan.waypoint.arrival_time,
                route: plan.route.clone(),
            };
            self.phase = AttemptPhase::Approaching { plan };
            return AttemptProgress::Continue(directive);
        }

        // Rebuild the route every frame; the committed one is never edited.
        let max_sweep = planner.router().settings().max_arc_sweep;
        let route = match planner.router().route(car, &plan.waypoint, ctx.plot) {
            Ok(route)
                if route.is_usable(max_sweep) && route.duration() + plan.profile.pre_strike_duration <= remaining =>
            {
                route
            }
            Ok(_) => {
                log::debug!("Committed waypoint no longer reachable in time");
                return self.replan(ctx, observer);
            }
            Err(err) => {
                log::debug!("Cannot route to committed waypoint: {err}");
                return self.replan(ctx, observer);
            }
        };
        observer.on_route(&route);
        let plan = InterceptPlan { route, ..plan };
        let directive = steer(&plan);
        self.phase = AttemptPhase::Approaching { plan };
        AttemptProgress::Continue(directive)
    }

    fn launch<V: VerticalReach>(&mut self, plan: InterceptPlan, ctx: &AttemptCtx<'_, V>, observer: &mut dyn PlanObserver) -> AttemptProgress {
        let grace = ctx.planner.attempt_settings().post_contact_grace;
        if ctx.car.time > plan.contact.time + grace {
            self.set_phase(AttemptPhase::Done, observer);
            return AttemptProgress::success();
        }
        let directive = launch(&plan);
        self.phase = AttemptPhase::Launching { plan };
        AttemptProgress::Continue(directive)
    }

    /// Drop the committed plan and search again this frame.
    fn replan<V: VerticalReach>(&mut self, ctx: &AttemptCtx<'_, V>, observer: &mut dyn PlanObserver) -> AttemptProgress {
        self.monitor.clear();
        self.search(ctx, observer)
    }

    fn abort(&mut self, error: PlanError, observer: &mut dyn PlanObserver) -> AttemptProgress {
        self.monitor.clear();
        self.set_phase(AttemptPhase::Aborted(error), observer);
        AttemptProgress::failure(error)
    }

    fn set_phase(&mut self, phase: AttemptPhase, observer: &mut dyn PlanObserver) {
        if phase.name() != self.phase.name() {
            log::debug!("Strike attempt {} -> {}", self.phase.name(), phase.name());
            observer.on_phase(phase.name());
        }
        self.phase = phase;
    }
}

fn steer(plan: &InterceptPlan) -> Directive {
    Directive::Steer {
        target: plan.route.steer_target().unwrap_or(plan.waypoint.position),
        arrival_time: plan.waypoint.arrival_time,
        route: plan.route.clone(),
    }
}

fn launch(plan: &InterceptPlan) -> Directive {
    Directive::Launch {
        technique: plan.profile.technique,
        contact: plan.contact,
    }
}
