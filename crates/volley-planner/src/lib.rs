//! Interception and strike planning.
//!
//! Each frame the owning layer hands a [`StrikeAttempt`] the car state, the
//! predicted ball path and the car's [`DistancePlot`]. The attempt searches
//! for the earliest reachable contact, follows the committed plan while the
//! ball path holds, and launches the strike once the readiness checklist
//! passes.

mod attempt;
mod error;
mod intercept;
mod kick_strategy;
mod observer;
mod planner;
mod prediction;
mod reachability;
mod routing;
mod strike;

pub use attempt::{AttemptCtx, AttemptProgress, AttemptResult, Directive, StrikeAttempt};
pub use error::{PlanError, RouteError};
pub use intercept::{ApproachWaypoint, DisruptionMonitor, InterceptPlan, InterceptSearch, TrajectoryFingerprint};
pub use kick_strategy::KickStrategy;
pub use observer::{NoopObserver, PlanObserver, ShapeRecorder};
pub use planner::StrikePlanner;
pub use prediction::{SimpleBallPredictor, TrajectorySource};
pub use reachability::{AccelerationModel, DistancePlot, DistanceTimeSpeed, ReachabilityModel};
pub use routing::{Route, RoutePart, Router, TurnDirection};
pub use strike::{
    BallisticTable, ReadinessChecklist, ReadinessEvaluator, StrikeCatalog, StrikeProfile, StrikeTechnique,
    VerticalReach,
};
