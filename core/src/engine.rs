//! The allocation engine — one snapshot in, one report out.
//!
//! PIPELINE (fixed, documented, never reordered):
//!   1. Index the snapshot
//!   2. Select and order eligible tasks
//!   3. Distribute hours (strategy-dependent)
//!   4. Build the report
//!
//! RULES:
//!   - A run never mutates the snapshot; all working state is run-local
//!     and discarded when run() returns.
//!   - Strategies live behind the Allocator trait and are picked by
//!     config. The engine does not know their arithmetic.
//!   - An empty eligible set is a valid run: the report comes back with
//!     no rows and the caller decides how to surface that.

use crate::{
    allocator::Allocator,
    capacity::CapacityModel,
    cascade::CascadeAllocator,
    config::{PlanConfig, Strategy},
    eligibility::eligible_tasks,
    error::PlanResult,
    proportional::ProportionalAllocator,
    report::{build_report, PlanReport},
    snapshot::{PlanSnapshot, SnapshotIndex},
};

pub struct PlanEngine {
    config: PlanConfig,
}

impl PlanEngine {
    /// Build an engine for one configuration. Validation happens here so
    /// a constructed engine can always run.
    pub fn new(config: PlanConfig) -> PlanResult<Self> {
        config.validate()?;
        Ok(Self { config })
    }

    pub fn config(&self) -> &PlanConfig {
        &self.config
    }

    /// One full allocation run over a snapshot.
    pub fn run(&self, snapshot: &PlanSnapshot) -> PlanResult<PlanReport> {
        let index = SnapshotIndex::build(snapshot);
        let model = CapacityModel::from_config(&self.config);

        let tasks = eligible_tasks(snapshot, &index, self.config.priority_allow_list.as_deref());
        log::info!(
            "run: {} of {} task(s) eligible, strategy={}",
            tasks.len(),
            snapshot.tasks.len(),
            self.config.strategy.name()
        );
        if tasks.is_empty() {
            log::info!("run: nothing to allocate, report will be empty");
        }

        let allocator = allocator_for(self.config.strategy);
        let entries = allocator.allocate(&tasks, &index, &model, &self.config.seasonal_mode)?;
        log::debug!(
            "run: {} allocation entr(ies) from {}",
            entries.len(),
            allocator.name()
        );

        Ok(build_report(
            &entries,
            &index,
            &model,
            self.config.strategy,
            &self.config.seasonal_mode,
        ))
    }
}

fn allocator_for(strategy: Strategy) -> Box<dyn Allocator> {
    match strategy {
        Strategy::Proportional => Box::new(ProportionalAllocator),
        Strategy::Cascading => Box::new(CascadeAllocator::new()),
    }
}
