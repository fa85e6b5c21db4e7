//! Report building — aggregate raw allocation entries into the staffing view.
//!
//! RULES:
//!   - Positions that received no hours are omitted, not shown as zero rows.
//!   - Rows sort by gap ascending so the worst shortfall reads first.
//!   - Every division is guarded. A report never carries NaN or infinity.

use crate::allocator::AllocationEntry;
use crate::capacity::CapacityModel;
use crate::config::Strategy;
use crate::snapshot::SnapshotIndex;
use crate::types::{PositionId, TaskId};
use crate::units::SeasonalMode;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum StaffingStatus {
    Sufficient,
    Insufficient,
}

/// One task's contribution to a position row.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TaskDetail {
    pub task_id: TaskId,
    pub task: String,
    pub hours: f64,
    /// Fraction of the task's monthly hours that landed here.
    pub share_ratio: f64,
    pub performer_count: u32,
    pub shared: bool,
    pub overtime: bool,
    /// People this slice alone would require at the position's net rate.
    pub required_headcount: f64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PositionReportRow {
    pub position_id: PositionId,
    pub position: String,
    pub department: Option<String>,
    pub current_headcount: u32,
    pub required_headcount: f64,
    /// current − required. Negative means understaffed.
    pub gap: f64,
    pub status: StaffingStatus,
    pub total_hours: f64,
    /// Hours beyond what the current staff covers at the net rate.
    pub overtime_hours: f64,
    /// total_hours as a percentage of current staff capacity.
    pub utilization_pct: f64,
    pub tasks: Vec<TaskDetail>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PlanSummary {
    pub position_count: usize,
    pub total_current_headcount: u32,
    pub total_required_headcount: f64,
    pub total_gap: f64,
    pub total_hours: f64,
    pub total_overtime_hours: f64,
}

/// The full result of one allocation run.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PlanReport {
    pub strategy: Strategy,
    pub seasonal_mode: SeasonalMode,
    pub rows: Vec<PositionReportRow>,
    pub summary: PlanSummary,
}

pub fn build_report(
    entries: &[AllocationEntry],
    index: &SnapshotIndex<'_>,
    model: &CapacityModel,
    strategy: Strategy,
    mode: &SeasonalMode,
) -> PlanReport {
    let mut by_position: BTreeMap<PositionId, Vec<&AllocationEntry>> = BTreeMap::new();
    for entry in entries {
        by_position.entry(entry.position_id).or_default().push(entry);
    }

    let mut rows = Vec::with_capacity(by_position.len());
    for (&position_id, position_entries) in &by_position {
        let Some(&position) = index.position_by_id.get(&position_id) else {
            log::warn!("report: entry references unknown position {position_id}, dropping");
            continue;
        };
        let net = model.net_per_person(position);
        let current = index.headcount(position_id);
        let staff_capacity = net * f64::from(current);

        let total_hours: f64 = position_entries.iter().map(|e| e.hours).sum();
        let required_headcount = if net > 0.0 { total_hours / net } else { 0.0 };
        let gap = f64::from(current) - required_headcount;
        let status = if gap >= 0.0 {
            StaffingStatus::Sufficient
        } else {
            StaffingStatus::Insufficient
        };
        let overtime_hours = (total_hours - staff_capacity).max(0.0);
        let utilization_pct = if staff_capacity > 0.0 {
            total_hours / staff_capacity * 100.0
        } else {
            0.0
        };

        let tasks = position_entries
            .iter()
            .map(|e| TaskDetail {
                task_id: e.task_id,
                task: index
                    .task_by_id
                    .get(&e.task_id)
                    .map(|t| t.name.clone())
                    .unwrap_or_default(),
                hours: e.hours,
                share_ratio: e.share_ratio,
                performer_count: e.performer_count,
                shared: e.shared,
                overtime: e.overtime,
                required_headcount: if net > 0.0 { e.hours / net } else { 0.0 },
            })
            .collect();

        rows.push(PositionReportRow {
            position_id,
            position: position.name.clone(),
            department: position.department.clone(),
            current_headcount: current,
            required_headcount,
            gap,
            status,
            total_hours,
            overtime_hours,
            utilization_pct,
            tasks,
        });
    }

    // Stable sort over the id-ordered rows: equal gaps keep id order.
    rows.sort_by(|a, b| a.gap.total_cmp(&b.gap));

    let summary = PlanSummary {
        position_count: rows.len(),
        total_current_headcount: rows.iter().map(|r| r.current_headcount).sum(),
        total_required_headcount: rows.iter().map(|r| r.required_headcount).sum(),
        total_gap: rows.iter().map(|r| r.gap).sum(),
        total_hours: rows.iter().map(|r| r.total_hours).sum(),
        total_overtime_hours: rows.iter().map(|r| r.overtime_hours).sum(),
    };

    PlanReport {
        strategy,
        seasonal_mode: *mode,
        rows,
        summary,
    }
}
