mod catalog;
mod profile;
mod readiness;
mod vertical;

pub use catalog::StrikeCatalog;
pub use profile::{StrikeProfile, StrikeTechnique};
pub use readiness::{ReadinessChecklist, ReadinessEvaluator};
pub use vertical::{BallisticTable, VerticalReach};
