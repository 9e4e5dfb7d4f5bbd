use std::{
    fs::File,
    io::{BufWriter, Write},
    path::Path,
};

use anyhow::{Context, Result};
use rand::{rngs::StdRng, Rng, SeedableRng};
use serde::{Deserialize, Serialize};
use volley_core::{
    math::{flatten, try_unit},
    Angle, BallData, BallTouch, CarData, DebugMap, PlannerSettings, TacticalSituation, Team, Vector2, Vector3,
    BALL_RADIUS,
};
use volley_planner::{
    AccelerationModel, AttemptCtx, AttemptProgress, AttemptResult, Directive, DistancePlot, KickStrategy, PlanObserver,
    ReachabilityModel, ShapeRecorder, SimpleBallPredictor, StrikeAttempt, StrikePlanner, TrajectorySource,
};

/// Initial state of the simulated car.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct CarStart {
    pub position: Vector2,
    pub heading_degrees: f64,
    pub speed: f64,
    pub boost: f64,
    pub team: Team,
}

impl Default for CarStart {
    fn default() -> Self {
        Self {
            position: Vector2::new(0.0, -60.0),
            heading_degrees: 90.0,
            speed: 0.0,
            boost: 33.0,
            team: Team::Blue,
        }
    }
}

/// A scripted run, loaded from JSON.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct Scenario {
    pub car: CarStart,
    pub ball: BallData,
    pub strategy: KickStrategy,
    pub situation: TacticalSituation,
    /// Touches by other players, applied at their time.
    pub touches: Vec<BallTouch>,
    /// Frame length, in seconds.
    pub dt: f64,
    /// Prediction and reachability horizon, in seconds.
    pub horizon: f64,
}

impl Default for Scenario {
    fn default() -> Self {
        Self {
            car: CarStart::default(),
            ball: BallData {
                time: 0.0,
                position: Vector3::new(0.0, 0.0, BALL_RADIUS),
                velocity: Vector3::zeros(),
            },
            strategy: KickStrategy::default(),
            situation: TacticalSituation::default(),
            touches: Vec::new(),
            dt: 1.0 / 60.0,
            horizon: 6.0,
        }
    }
}

impl Scenario {
    pub fn load(path: &Path) -> Result<Self> {
        let text = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read scenario file {}", path.display()))?;
        serde_json::from_str(&text).with_context(|| format!("Failed to parse scenario file {}", path.display()))
    }
}

/// Knobs of a single run.
#[derive(Debug, Clone)]
pub struct RunOptions {
    pub frames: u32,
    /// Magnitude of the random kick applied to the ball a third of the way in.
    pub jitter: f64,
    pub seed: Option<u64>,
}

/// One line of the recording file.
#[derive(Serialize)]
struct FrameRecord<'a> {
    frame: u32,
    time: f64,
    car: &'a CarData,
    ball: &'a BallData,
    directive: Option<&'a Directive>,
    debug: DebugMap,
}

/// Phase changes are forwarded to the shape recorder and logged.
struct LoggingRecorder {
    shapes: ShapeRecorder,
}

impl PlanObserver for LoggingRecorder {
    fn on_plan(&mut self, plan: &volley_planner::InterceptPlan) {
        log::info!(
            "Plan: {} at {:.2}s, contact ({:.1}, {:.1}, {:.1})",
            plan.profile.technique,
            plan.contact.time,
            plan.contact.position.x,
            plan.contact.position.y,
            plan.contact.position.z
        );
        self.shapes.on_plan(plan);
    }

    fn on_route(&mut self, route: &volley_planner::Route) {
        self.shapes.on_route(route);
    }

    fn on_disruption(&mut self, fingerprint: &volley_planner::TrajectoryFingerprint) {
        log::info!("Ball path changed under the plan for {:.2}s", fingerprint.contact_time);
        self.shapes.on_disruption(fingerprint);
    }

    fn on_phase(&mut self, phase: &str) {
        log::info!("Phase: {phase}");
        self.shapes.on_phase(phase);
    }
}

/// Drive the planner frame by frame until the attempt finishes or the frame
/// budget runs out.
pub fn run(
    scenario: &Scenario,
    settings: &PlannerSettings,
    options: &RunOptions,
    record: Option<&Path>,
) -> Result<Option<AttemptResult>> {
    let planner = StrikePlanner::from_settings(settings);
    let predictor = SimpleBallPredictor::new(settings.ball.clone(), settings.arena.clone());
    let model = AccelerationModel::new(settings.reachability.clone());
    let mut rng = match options.seed {
        Some(seed) => StdRng::seed_from_u64(seed),
        None => StdRng::from_entropy(),
    };

    let mut writer = match record {
        Some(path) => Some(BufWriter::new(
            File::create(path).with_context(|| format!("Failed to create recording {}", path.display()))?,
        )),
        None => None,
    };

    let start = &scenario.car;
    let mut car = CarData::grounded(
        scenario.ball.time,
        start.position,
        Angle::from_degrees(start.heading_degrees),
        start.speed,
        start.boost,
    );
    car.team = start.team;
    let mut ball = scenario.ball.clone();

    let initial_touch = latest_touch(&scenario.touches, ball.time).cloned();
    let mut attempt = StrikeAttempt::new(planner.monitor(), scenario.strategy, initial_touch);
    let mut observer = LoggingRecorder {
        shapes: ShapeRecorder::new(),
    };
    let jitter_frame = options.frames / 3;

    for frame in 0..options.frames {
        let path = predictor.predict(&ball, scenario.horizon);
        let plot = model.simulate(&car, scenario.horizon, car.boost);
        let ctx = AttemptCtx {
            planner: &planner,
            car: &car,
            ball: &ball,
            path: &path,
            plot: &plot,
            latest_touch: latest_touch(&scenario.touches, car.time),
            situation: &scenario.situation,
        };

        let progress = attempt.update(&ctx, &mut observer);
        let directive = match &progress {
            AttemptProgress::Continue(directive) => Some(directive),
            AttemptProgress::Done(_) => None,
        };

        if let Some(writer) = writer.as_mut() {
            let line = FrameRecord {
                frame,
                time: car.time,
                car: &car,
                ball: &ball,
                directive,
                debug: observer.shapes.take(),
            };
            serde_json::to_writer(&mut *writer, &line).context("Failed to write frame record")?;
            writer.write_all(b"\n").context("Failed to write frame record")?;
        }

        let directive = match progress {
            AttemptProgress::Continue(directive) => directive,
            AttemptProgress::Done(result) => {
                log::info!("Attempt finished after {frame} frames: {result:?}");
                flush(writer)?;
                return Ok(Some(result));
            }
        };

        drive(&mut car, &directive, &planner, &plot, scenario.dt);
        ball = path
            .state_at(ball.time + scenario.dt)
            .map(|s| BallData {
                time: s.time,
                position: s.position,
                velocity: s.velocity,
            })
            .unwrap_or(BallData {
                time: ball.time + scenario.dt,
                ..ball
            });

        if options.jitter > 0.0 && frame == jitter_frame {
            let kick = Vector3::new(
                rng.gen_range(-1.0..1.0),
                rng.gen_range(-1.0..1.0),
                rng.gen_range(0.0..1.0),
            ) * options.jitter;
            log::info!("Jitter: kicking the ball by ({:.1}, {:.1}, {:.1})", kick.x, kick.y, kick.z);
            ball.velocity += kick;
        }
    }

    log::warn!("Attempt still running after {} frames", options.frames);
    flush(writer)?;
    Ok(None)
}

fn flush(writer: Option<BufWriter<File>>) -> Result<()> {
    if let Some(mut writer) = writer {
        writer.flush().context("Failed to flush recording")?;
    }
    Ok(())
}

fn latest_touch(touches: &[BallTouch], now: f64) -> Option<&BallTouch> {
    touches
        .iter()
        .filter(|t| t.time <= now)
        .max_by(|a, b| a.time.total_cmp(&b.time))
}

/// Crude car kinematics: turn toward the target as fast as the router's turn
/// radius allows and follow the distance plot's speed.
fn drive(car: &mut CarData, directive: &Directive, planner: &StrikePlanner, plot: &DistancePlot, dt: f64) {
    let target = match directive {
        Directive::Steer { target, .. } | Directive::TrackBall { target } => *target,
        Directive::Launch { contact, .. } => flatten(&contact.position),
    };
    let heading = car.heading().unwrap_or_else(Vector2::x);
    let speed = car.flat_speed();

    let desired = try_unit(&(target - car.flat_position())).unwrap_or(heading);
    let max_turn = speed.max(1.0) / planner.router().turn_radius(speed) * dt;
    let correction = Angle::correction(&heading, &desired).radians().clamp(-max_turn, max_turn);
    let heading = Angle::from_radians(correction).rotate_vector(&heading);

    let speed = plot.motion_after_time(dt).map(|m| m.speed).unwrap_or(speed);
    let velocity = heading * speed;

    car.position += Vector3::new(velocity.x, velocity.y, 0.0) * dt;
    car.velocity = Vector3::new(velocity.x, velocity.y, 0.0);
    car.nose = Vector3::new(heading.x, heading.y, 0.0);
    car.time += dt;
}
