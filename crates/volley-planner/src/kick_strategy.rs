use serde::{Deserialize, Serialize};
use volley_core::{
    math::{flatten, lift, try_unit},
    Angle, ArenaGeometry, CarData, Vector2, Vector3, BALL_RADIUS,
};

/// Largest turn between the car's approach and the kick direction for which
/// aiming at the enemy goal is still worth trying.
const MAX_GOAL_CORRECTION: f64 = 3.0 * std::f64::consts::FRAC_PI_4;

/// Where the ball should go after contact.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
#[serde(tag = "type", content = "direction", rename_all = "snake_case")]
pub enum KickStrategy {
    /// Aim between the enemy posts.
    #[default]
    TowardEnemyGoal,
    /// Clear the ball directly away from our own goal.
    AwayFromOwnGoal,
    /// Always kick along a fixed floor direction.
    Fixed(Vector2),
}

impl KickStrategy {
    /// Desired outgoing ball direction for a contact at `contact`, flat and of
    /// unit length.
    pub fn kick_direction(&self, car: &CarData, contact: &Vector3, arena: &ArenaGeometry) -> Vector3 {
        let flat_contact = flatten(contact);
        let wanted = match self {
            KickStrategy::TowardEnemyGoal => {
                let goal = arena.enemy_goal(car.team);
                let reach = (goal.half_width - BALL_RADIUS).max(0.0);
                let aim = Vector2::new(flat_contact.x.clamp(-reach, reach), goal.center.y);
                aim - flat_contact
            }
            KickStrategy::AwayFromOwnGoal => flat_contact - flatten(&arena.own_goal(car.team).center),
            KickStrategy::Fixed(direction) => *direction,
        };
        // Degenerate aims fall back to continuing the car's approach.
        let direction = try_unit(&wanted)
            .or_else(|| try_unit(&(flat_contact - car.flat_position())))
            .unwrap_or_else(Vector2::x);
        lift(&direction, 0.0)
    }

    /// Whether the strategy is worth pursuing for this contact at all.
    pub fn looks_viable(&self, car: &CarData, contact: &Vector3, arena: &ArenaGeometry) -> bool {
        match self {
            KickStrategy::TowardEnemyGoal => {
                let approach = flatten(contact) - car.flat_position();
                let kick = flatten(&self.kick_direction(car, contact, arena));
                Angle::correction(&approach, &kick).abs() < MAX_GOAL_CORRECTION
            }
            KickStrategy::AwayFromOwnGoal | KickStrategy::Fixed(_) => true,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn aims_inside_the_posts() {
        let arena = ArenaGeometry::default();
        let car = CarData::grounded(0.0, Vector2::new(0.0, -20.0), Angle::PI_2, 0.0, 0.0);
        let wide = Vector3::new(60.0, 50.0, 1.0);
        let dir = KickStrategy::TowardEnemyGoal.kick_direction(&car, &wide, &arena);
        assert_relative_eq!(dir.norm(), 1.0, epsilon = 1e-9);
        assert_eq!(dir.z, 0.0);
        // Toward the far post, not straight up the wall.
        assert!(dir.x < 0.0);
        assert!(dir.y > 0.0);
    }

    #[test]
    fn clears_away_from_own_goal() {
        let arena = ArenaGeometry::default();
        let car = CarData::grounded(0.0, Vector2::new(0.0, -90.0), Angle::PI_2, 0.0, 0.0);
        let contact = Vector3::new(0.0, -80.0, 1.0);
        let dir = KickStrategy::AwayFromOwnGoal.kick_direction(&car, &contact, &arena);
        assert_relative_eq!(dir.y, 1.0, epsilon = 1e-9);
    }

    #[test]
    fn shooting_backwards_is_not_viable() {
        let arena = ArenaGeometry::default();
        // Car north of the ball, facing our own goal.
        let car = CarData::grounded(0.0, Vector2::new(0.0, 20.0), -Angle::PI_2, 0.0, 0.0);
        let contact = Vector3::new(0.0, 0.0, 1.0);
        assert!(!KickStrategy::TowardEnemyGoal.looks_viable(&car, &contact, &arena));
        assert!(KickStrategy::AwayFromOwnGoal.looks_viable(&car, &contact, &arena));

        let behind = CarData::grounded(0.0, Vector2::new(0.0, -20.0), Angle::PI_2, 0.0, 0.0);
        assert!(KickStrategy::TowardEnemyGoal.looks_viable(&behind, &contact, &arena));
    }

    #[test]
    fn fixed_direction_is_normalized() {
        let arena = ArenaGeometry::default();
        let car = CarData::grounded(0.0, Vector2::zeros(), Angle::default(), 0.0, 0.0);
        let strategy = KickStrategy::Fixed(Vector2::new(3.0, 4.0));
        let dir = strategy.kick_direction(&car, &Vector3::new(10.0, 0.0, 1.0), &arena);
        assert_relative_eq!(dir.x, 0.6, epsilon = 1e-9);
        assert_relative_eq!(dir.y, 0.8, epsilon = 1e-9);
    }
}
