mod disruption;
mod plan;
mod search;

pub use disruption::DisruptionMonitor;
pub use plan::{ApproachWaypoint, InterceptPlan, TrajectoryFingerprint};
pub use search::InterceptSearch;
