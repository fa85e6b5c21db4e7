//! The strategy seam — the contract both distribution strategies fulfil.
//!
//! RULE: An allocator may mutate only working state it creates itself for
//! the run. Same ordered task list, same entries out, every time.

use crate::capacity::CapacityModel;
use crate::eligibility::EligibleTask;
use crate::error::PlanResult;
use crate::snapshot::SnapshotIndex;
use crate::types::{PositionId, TaskId};
use crate::units::SeasonalMode;

/// Hours assigned to one (position, task) pair by a strategy.
#[derive(Debug, Clone)]
pub struct AllocationEntry {
    pub position_id: PositionId,
    pub task_id: TaskId,
    pub hours: f64,
    /// Fraction of the task's monthly hours this position received.
    pub share_ratio: f64,
    /// Active performers of this task in this position.
    pub performer_count: u32,
    /// The task's hours went to more than one position.
    pub shared: bool,
    /// Some of these hours were forced beyond regular capacity.
    pub overtime: bool,
}

pub trait Allocator {
    fn name(&self) -> &'static str;

    fn allocate(
        &self,
        tasks: &[EligibleTask<'_>],
        index: &SnapshotIndex<'_>,
        model: &CapacityModel,
        mode: &SeasonalMode,
    ) -> PlanResult<Vec<AllocationEntry>>;
}
