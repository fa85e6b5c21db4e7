//! Cascading allocation — priority tiers over a shared, depleting pool.
//!
//! RULES (behavior-preserving, do not "improve"):
//!   - Tiers drain in weight order 5 → 1, tasks in the eligibility order.
//!     Earlier tasks claim capacity first; that is the point.
//!   - A residue ≤ 1e-3 hours counts as fully allocated.
//!   - A larger residue is forced onto the highest-weight tier present,
//!     split evenly per distinct position, flagged as overtime. Spare room
//!     in lower tiers is deliberately ignored at that point.

use crate::allocator::{AllocationEntry, Allocator};
use crate::capacity::{CapacityLedger, CapacityModel};
use crate::eligibility::EligibleTask;
use crate::error::PlanResult;
use crate::snapshot::SnapshotIndex;
use crate::types::PositionId;
use crate::units::SeasonalMode;
use std::collections::BTreeMap;

/// Hours below this are treated as fully allocated.
pub const RESIDUE_TOLERANCE: f64 = 1e-3;

/// How unallocatable residue lands on the top tier. Even split is the
/// only shipped policy; splitting by remaining capacity instead would be
/// a new variant here, not an edit to the arithmetic below.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum OverflowPolicy {
    #[default]
    EvenSplit,
}

#[derive(Default)]
pub struct CascadeAllocator {
    policy: OverflowPolicy,
}

impl CascadeAllocator {
    pub fn new() -> Self {
        Self::default()
    }
}

impl Allocator for CascadeAllocator {
    fn name(&self) -> &'static str {
        "cascading"
    }

    fn allocate(
        &self,
        tasks: &[EligibleTask<'_>],
        index: &SnapshotIndex<'_>,
        model: &CapacityModel,
        mode: &SeasonalMode,
    ) -> PlanResult<Vec<AllocationEntry>> {
        // Fresh counters per run; discarded with this call.
        let mut ledger = CapacityLedger::new(index, model);
        let mut entries = Vec::new();

        for et in tasks {
            let hours = et.monthly_hours(mode);
            if hours <= 0.0 {
                log::debug!("task={} '{}': zero monthly hours, skipped", et.task.id, et.task.name);
                continue;
            }

            // Fixed-size buckets over the closed weight domain. Index 0
            // exists but is never drained: weight-0 rows do not tier.
            let mut tiers: [Vec<PositionId>; 6] = Default::default();
            let mut counts: BTreeMap<PositionId, u32> = BTreeMap::new();
            for p in et.performers {
                *counts.entry(p.position_id).or_insert(0) += 1;
                let idx = p.weight.index();
                if idx >= 1 && !tiers[idx].contains(&p.position_id) {
                    tiers[idx].push(p.position_id);
                }
            }
            // Ascending position id within a tier keeps draws deterministic.
            for tier in tiers.iter_mut() {
                tier.sort_unstable();
            }

            let mut remaining = hours;
            let mut regular: BTreeMap<PositionId, f64> = BTreeMap::new();

            'tiers: for weight in (1..=5usize).rev() {
                for &position_id in &tiers[weight] {
                    if remaining <= RESIDUE_TOLERANCE {
                        break 'tiers;
                    }
                    let available = ledger.remaining(position_id).max(0.0);
                    if available <= 0.0 {
                        // Exhausted for this task, still in play for overflow.
                        continue;
                    }
                    let take = remaining.min(available);
                    if take > RESIDUE_TOLERANCE {
                        ledger.draw(position_id, take);
                        *regular.entry(position_id).or_insert(0.0) += take;
                        remaining -= take;
                    }
                }
            }

            let mut forced: BTreeMap<PositionId, f64> = BTreeMap::new();
            if remaining > RESIDUE_TOLERANCE {
                match self.policy {
                    OverflowPolicy::EvenSplit => {
                        if let Some(top) =
                            (1..=5usize).rev().map(|w| &tiers[w]).find(|t| !t.is_empty())
                        {
                            let per_position = remaining / top.len() as f64;
                            for &position_id in top {
                                forced.insert(position_id, per_position);
                                ledger.force_draw(position_id, per_position);
                            }
                            log::debug!(
                                "task={} '{}': forced {:.2}h onto {} top-tier position(s) as overtime",
                                et.task.id,
                                et.task.name,
                                remaining,
                                top.len()
                            );
                        } else {
                            log::warn!(
                                "task={} '{}': no weighted performers, {:.2}h left unallocated",
                                et.task.id,
                                et.task.name,
                                remaining
                            );
                        }
                    }
                }
            }

            // Merge per (position, task): a position can receive both a
            // regular and a forced portion of the same task.
            let mut contributions = regular;
            for (position_id, hours_forced) in &forced {
                *contributions.entry(*position_id).or_insert(0.0) += hours_forced;
            }
            let shared = contributions.len() > 1;
            for (&position_id, &position_hours) in &contributions {
                entries.push(AllocationEntry {
                    position_id,
                    task_id: et.task.id,
                    hours: position_hours,
                    share_ratio: position_hours / hours,
                    performer_count: counts.get(&position_id).copied().unwrap_or(0),
                    shared,
                    overtime: forced.contains_key(&position_id),
                });
            }
            log::debug!(
                "task={} '{}': {:.2}h cascaded across {} position(s)",
                et.task.id,
                et.task.name,
                hours,
                contributions.len()
            );
        }

        Ok(entries)
    }
}
