use volley_core::{ArenaGeometry, BallData, BallPath, BallPhysicsSettings, TrajectorySample, Vector3, BALL_RADIUS};

/// Normal speeds below this are absorbed instead of bouncing, so a rolling
/// ball does not jitter on the floor.
const MIN_BOUNCE_SPEED: f64 = 1.0;

/// Produces the predicted future of the ball.
pub trait TrajectorySource {
    /// Predict `horizon` seconds ahead of `ball.time`. The first sample is the
    /// current state.
    fn predict(&self, ball: &BallData, horizon: f64) -> BallPath;
}

/// Fixed-step ballistic predictor: gravity, linear air drag and bounces off
/// the floor, the ceiling and the four walls. Goals are treated as walls.
#[derive(Clone, Debug, Default)]
pub struct SimpleBallPredictor {
    settings: BallPhysicsSettings,
    arena: ArenaGeometry,
}

impl SimpleBallPredictor {
    pub fn new(settings: BallPhysicsSettings, arena: ArenaGeometry) -> Self {
        Self { settings, arena }
    }

    /// Advance one step. Returns the new state and the normal of the surface
    /// it bounced off, if any.
    fn step(&self, position: Vector3, velocity: Vector3, dt: f64) -> (Vector3, Vector3, Option<Vector3>) {
        let s = &self.settings;
        let mut velocity = velocity - Vector3::z() * (s.gravity * dt);
        velocity *= (1.0 - s.drag * dt).max(0.0);
        let mut position = position + velocity * dt;

        let limits = [
            (Vector3::z(), BALL_RADIUS),
            (-Vector3::z(), self.arena.ceiling - BALL_RADIUS),
            (Vector3::x(), -self.arena.side_wall + BALL_RADIUS),
            (-Vector3::x(), self.arena.side_wall - BALL_RADIUS),
            (Vector3::y(), -self.arena.back_wall + BALL_RADIUS),
            (-Vector3::y(), self.arena.back_wall - BALL_RADIUS),
        ];

        let mut bounce = None;
        for (normal, limit) in limits {
            // Signed depth past the surface, along the inward normal.
            let depth = limit * normal.sum() - position.dot(&normal);
            if depth <= 0.0 {
                continue;
            }
            position += normal * depth;
            let normal_speed = velocity.dot(&normal);
            if normal_speed >= 0.0 {
                continue;
            }
            let tangential = velocity - normal * normal_speed;
            if -normal_speed < MIN_BOUNCE_SPEED {
                velocity = tangential;
            } else {
                velocity = tangential * s.bounce_friction - normal * (normal_speed * s.restitution);
                bounce = Some(normal);
            }
        }
        (position, velocity, bounce)
    }
}

impl TrajectorySource for SimpleBallPredictor {
    fn predict(&self, ball: &BallData, horizon: f64) -> BallPath {
        let dt = self.settings.step.max(1e-3);
        let steps = (horizon / dt).ceil().max(0.0) as usize;
        let mut samples = Vec::with_capacity(steps + 1);
        samples.push(TrajectorySample::new(ball.position, ball.velocity, ball.time));

        let mut position = ball.position;
        let mut velocity = ball.velocity;
        for i in 1..=steps {
            let (p, v, bounce) = self.step(position, velocity, dt);
            position = p;
            velocity = v;
            let sample = TrajectorySample::new(position, velocity, ball.time + i as f64 * dt);
            samples.push(match bounce {
                Some(normal) => sample.with_bounce(normal),
                None => sample,
            });
        }
        BallPath::new(samples)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    fn ball(position: Vector3, velocity: Vector3) -> BallData {
        BallData {
            time: 10.0,
            position,
            velocity,
        }
    }

    #[test]
    fn path_starts_now_and_covers_the_horizon() {
        let predictor = SimpleBallPredictor::default();
        let path = predictor.predict(&ball(Vector3::new(0.0, 0.0, 10.0), Vector3::zeros()), 2.0);
        assert_relative_eq!(path.start_time().unwrap(), 10.0);
        assert!(path.end_time().unwrap() >= 12.0 - 1e-9);
    }

    #[test]
    fn dropped_ball_bounces_off_the_floor() {
        let predictor = SimpleBallPredictor::default();
        let path = predictor.predict(&ball(Vector3::new(0.0, 0.0, 10.0), Vector3::zeros()), 3.0);
        let bounce = path.first_bounce_after(10.0).unwrap();
        assert_eq!(bounce.bounce, Some(Vector3::z()));
        assert!(bounce.velocity.z > 0.0);
        assert!(path.samples().iter().all(|s| s.position.z >= BALL_RADIUS - 1e-9));
    }

    #[test]
    fn rolling_ball_stays_on_the_floor() {
        let predictor = SimpleBallPredictor::default();
        let path = predictor.predict(
            &ball(Vector3::new(0.0, 0.0, BALL_RADIUS), Vector3::new(10.0, 0.0, 0.0)),
            1.0,
        );
        assert!(path.first_bounce_after(10.0).is_none());
        let last = path.samples().last().unwrap();
        assert_relative_eq!(last.position.z, BALL_RADIUS, epsilon = 1e-9);
        assert!(last.position.x > 9.0);
    }

    #[test]
    fn wall_reflects_the_ball() {
        let predictor = SimpleBallPredictor::default();
        let path = predictor.predict(
            &ball(Vector3::new(60.0, 0.0, BALL_RADIUS), Vector3::new(30.0, 0.0, 0.0)),
            2.0,
        );
        let bounce = path.first_bounce_after(10.0).unwrap();
        assert_eq!(bounce.bounce, Some(-Vector3::x()));
        assert!(path.samples().last().unwrap().velocity.x < 0.0);
    }
}
