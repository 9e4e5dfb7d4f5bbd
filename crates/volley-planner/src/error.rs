use thiserror::Error;

/// Why a strike attempt ended without success.
#[derive(Error, Debug, Clone, Copy, PartialEq, Eq)]
pub enum PlanError {
    #[error("no feasible contact found on the ball path")]
    NoPlanFound,
    #[error("the ball was touched or its path changed under the committed plan")]
    PlanDisrupted,
    #[error("the requested geometry cannot be routed")]
    InvalidGeometry,
    #[error("an opponent reaches the ball first")]
    ContactConceded,
}

/// Why the router could not produce a route.
#[derive(Error, Debug, Clone, Copy, PartialEq)]
pub enum RouteError {
    #[error("start or target heading has no direction")]
    InvalidGeometry,
    #[error("no tangent connects the turning circles")]
    NoTangent,
    #[error("route length {length:.1} is not reachable within the distance plot")]
    BeyondHorizon { length: f64 },
}

impl From<RouteError> for PlanError {
    fn from(_: RouteError) -> Self {
        PlanError::InvalidGeometry
    }
}
