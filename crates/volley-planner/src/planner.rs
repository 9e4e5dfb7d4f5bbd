use volley_core::{
    ArenaGeometry, AttemptSettings, MonitorSettings, PlannerSettings, ReadinessSettings,
};

use crate::{
    intercept::{DisruptionMonitor, InterceptSearch},
    routing::Router,
    strike::{BallisticTable, ReadinessEvaluator, StrikeCatalog, VerticalReach},
};

/// The planning components of one car, built once from settings and shared
/// by every strike attempt.
#[derive(Clone, Debug)]
pub struct StrikePlanner<V = BallisticTable> {
    catalog: StrikeCatalog<V>,
    router: Router,
    arena: ArenaGeometry,
    readiness: ReadinessSettings,
    monitor: MonitorSettings,
    attempt: AttemptSettings,
}

impl StrikePlanner<BallisticTable> {
    pub fn from_settings(settings: &PlannerSettings) -> Self {
        Self::with_vertical(settings, BallisticTable::new(settings.vertical.clone()))
    }
}

impl Default for StrikePlanner<BallisticTable> {
    fn default() -> Self {
        Self::from_settings(&PlannerSettings::default())
    }
}

impl<V: VerticalReach> StrikePlanner<V> {
    /// Build a planner around a custom vertical reach table.
    pub fn with_vertical(settings: &PlannerSettings, vertical: V) -> Self {
        Self {
            catalog: StrikeCatalog::new(settings.catalog.clone(), settings.arena.clone(), vertical),
            router: Router::new(settings.router.clone()),
            arena: settings.arena.clone(),
            readiness: settings.readiness.clone(),
            monitor: settings.monitor.clone(),
            attempt: settings.attempt.clone(),
        }
    }

    pub fn catalog(&self) -> &StrikeCatalog<V> {
        &self.catalog
    }

    pub fn router(&self) -> &Router {
        &self.router
    }

    pub fn arena(&self) -> &ArenaGeometry {
        &self.arena
    }

    pub fn attempt_settings(&self) -> &AttemptSettings {
        &self.attempt
    }

    pub fn search(&self) -> InterceptSearch<'_, V> {
        InterceptSearch::new(&self.catalog, &self.router, &self.arena)
    }

    pub fn readiness(&self) -> ReadinessEvaluator<'_, V> {
        ReadinessEvaluator::new(self.readiness.clone(), &self.catalog)
    }

    /// A fresh monitor with nothing committed.
    pub fn monitor(&self) -> DisruptionMonitor {
        DisruptionMonitor::new(self.monitor.clone())
    }
}
