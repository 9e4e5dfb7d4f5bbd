use serde::Serialize;

/// The physical maneuver used to reach a contact.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum StrikeTechnique {
    /// Drive straight into a low ball.
    Chip,
    /// Short hop and front flip into a ball at bumper-to-roof height.
    FlipHit,
    /// Full held jump, then flip, for balls up to the jump apex.
    JumpHit,
    /// Jump and side dodge into a ball passing beside the car.
    SideHit,
    /// Jump and diagonal dodge for angled approaches.
    DiagonalHit,
    /// Boosted flight to a ball above jump height.
    Aerial,
}

impl StrikeTechnique {
    /// Techniques that strike along the car's nose.
    pub fn is_straight_on(&self) -> bool {
        !matches!(self, StrikeTechnique::SideHit | StrikeTechnique::DiagonalHit)
    }

    /// Relative risk of botching the strike. Chip is the cheapest.
    pub(crate) fn base_risk(&self) -> f64 {
        match self {
            StrikeTechnique::Chip => 0.0,
            StrikeTechnique::FlipHit => 0.1,
            StrikeTechnique::JumpHit => 0.15,
            StrikeTechnique::DiagonalHit => 0.2,
            StrikeTechnique::SideHit => 0.3,
            StrikeTechnique::Aerial => 0.5,
        }
    }
}

impl std::fmt::Display for StrikeTechnique {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let name = match self {
            StrikeTechnique::Chip => "chip",
            StrikeTechnique::FlipHit => "flip hit",
            StrikeTechnique::JumpHit => "jump hit",
            StrikeTechnique::SideHit => "side hit",
            StrikeTechnique::DiagonalHit => "diagonal hit",
            StrikeTechnique::Aerial => "aerial",
        };
        f.write_str(name)
    }
}

/// Timing and cost of executing a technique for one particular contact.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct StrikeProfile {
    pub technique: StrikeTechnique,
    /// Seconds between launching the maneuver and touching the ball.
    pub pre_strike_duration: f64,
    /// How far short of the contact (on the floor) the car must be when it
    /// launches.
    pub approach_backoff: f64,
    /// Speed gained by dodging into the ball.
    pub dodge_speed_boost: f64,
    /// Time reserved after launch for the in-air correction dodge. Zero when
    /// the dodge is disabled.
    pub correction_budget: f64,
    pub risk_cost: f64,
}

impl StrikeProfile {
    /// Driving into the ball without leaving the ground.
    pub fn chip(approach_backoff: f64) -> Self {
        Self {
            technique: StrikeTechnique::Chip,
            pre_strike_duration: 0.0,
            approach_backoff,
            dodge_speed_boost: 0.0,
            correction_budget: 0.0,
            risk_cost: StrikeTechnique::Chip.base_risk(),
        }
    }
}
