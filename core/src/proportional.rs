//! Proportional allocation — split by performer headcount, no capacity cap.
//!
//! Overload never shows up as overtime here: a position can be driven
//! arbitrarily past its capacity, and the report surfaces that as a
//! headcount gap instead.

use crate::allocator::{AllocationEntry, Allocator};
use crate::capacity::CapacityModel;
use crate::eligibility::EligibleTask;
use crate::error::PlanResult;
use crate::snapshot::SnapshotIndex;
use crate::types::PositionId;
use crate::units::SeasonalMode;
use std::collections::BTreeMap;

pub struct ProportionalAllocator;

impl Allocator for ProportionalAllocator {
    fn name(&self) -> &'static str {
        "proportional"
    }

    fn allocate(
        &self,
        tasks: &[EligibleTask<'_>],
        _index: &SnapshotIndex<'_>,
        _model: &CapacityModel,
        mode: &SeasonalMode,
    ) -> PlanResult<Vec<AllocationEntry>> {
        let mut entries = Vec::new();

        for et in tasks {
            let hours = et.monthly_hours(mode);
            if hours <= 0.0 {
                log::debug!("task={} '{}': zero monthly hours, skipped", et.task.id, et.task.name);
                continue;
            }

            // BTreeMap keeps position iteration order stable across runs.
            let mut counts: BTreeMap<PositionId, u32> = BTreeMap::new();
            for p in et.performers {
                *counts.entry(p.position_id).or_insert(0) += 1;
            }
            let total_performers: u32 = counts.values().sum();
            if total_performers == 0 {
                continue;
            }

            let shared = counts.len() > 1;
            for (&position_id, &count) in &counts {
                let share_ratio = f64::from(count) / f64::from(total_performers);
                entries.push(AllocationEntry {
                    position_id,
                    task_id: et.task.id,
                    hours: hours * share_ratio,
                    share_ratio,
                    performer_count: count,
                    shared,
                    overtime: false,
                });
            }
            log::debug!(
                "task={} '{}': {:.2}h across {} position(s), {} performer(s)",
                et.task.id,
                et.task.name,
                hours,
                counts.len(),
                total_performers
            );
        }

        Ok(entries)
    }
}
