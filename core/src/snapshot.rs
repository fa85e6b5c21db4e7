//! Input snapshot — the read-only record sets one allocation run consumes.
//!
//! RULES:
//!   - The engine never mutates a snapshot. Allocation works on its own
//!     local state and produces a fresh report.
//!   - All lookups go through SnapshotIndex, built once per run. No ad-hoc
//!     scans inside the allocators.

use crate::types::{EmployeeId, Month, PositionId, TaskId};
use crate::units::{Period, TimeUnit, FLAT_CURVE};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

// ── Records ────────────────────────────────────────────────────────

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Position {
    pub id: PositionId,
    pub name: String,
    pub department: Option<String>,
    pub parent_id: Option<PositionId>,
    /// Capacity overrides; None falls back to the run config.
    pub working_hours_override: Option<f64>,
    pub efficiency_override: Option<f64>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EmployeeStatus {
    Active,
    Inactive,
    OnLeave,
}

impl EmployeeStatus {
    pub fn from_name(name: &str) -> Self {
        match name {
            "inactive" => EmployeeStatus::Inactive,
            "on_leave" => EmployeeStatus::OnLeave,
            _ => EmployeeStatus::Active,
        }
    }

    pub fn name(self) -> &'static str {
        match self {
            EmployeeStatus::Active => "active",
            EmployeeStatus::Inactive => "inactive",
            EmployeeStatus::OnLeave => "on_leave",
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Employee {
    pub id: EmployeeId,
    pub staff_no: String,
    pub name: String,
    pub position_id: Option<PositionId>,
    pub status: EmployeeStatus,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Task {
    pub id: TaskId,
    pub name: String,
    /// The task's own priority, 1..=5. Distinct from assignment weights.
    pub priority: u8,
    /// Nominal attachment set; informational. The first entry is the
    /// primary attachment and drives catalog ordering.
    pub attached_positions: Vec<PositionId>,
}

/// Per-assignment priority weight, the closed domain {0..=5}.
/// 0 means not performing; anything outside the domain maps to 0.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AssignmentWeight {
    Unweighted = 0,
    Optional = 1,
    Low = 2,
    Normal = 3,
    High = 4,
    Critical = 5,
}

impl AssignmentWeight {
    pub fn from_raw(raw: i64) -> Self {
        match raw {
            1 => AssignmentWeight::Optional,
            2 => AssignmentWeight::Low,
            3 => AssignmentWeight::Normal,
            4 => AssignmentWeight::High,
            5 => AssignmentWeight::Critical,
            _ => AssignmentWeight::Unweighted,
        }
    }

    /// Bucket index for tier grouping, 0..=5.
    pub fn index(self) -> usize {
        self as usize
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Assignment {
    pub task_id: TaskId,
    pub employee_id: EmployeeId,
    pub performs: bool,
    /// Raw weight as recorded. Normalized to AssignmentWeight at index
    /// build time so out-of-domain values are handled in one place.
    pub weight: i64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct WorkloadRecord {
    pub task_id: TaskId,
    pub volume: f64,
    /// Informational volume unit label ("items", "documents", ...).
    pub unit: String,
    pub period: Period,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StandardTimeRecord {
    pub task_id: TaskId,
    pub duration: f64,
    pub unit: TimeUnit,
    /// Where the duration came from ("time_study", "estimate", ...).
    pub source: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SeasonalMultiplier {
    pub task_id: TaskId,
    pub month: Month,
    pub multiplier: f64,
}

// ── Snapshot ───────────────────────────────────────────────────────

/// Everything one allocation run reads, loaded in one piece.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct PlanSnapshot {
    pub positions: Vec<Position>,
    pub employees: Vec<Employee>,
    pub tasks: Vec<Task>,
    pub assignments: Vec<Assignment>,
    pub workloads: Vec<WorkloadRecord>,
    pub standard_times: Vec<StandardTimeRecord>,
    pub seasonal: Vec<SeasonalMultiplier>,
}

/// One performer row after filtering: active employee, performs = true,
/// attached to a position.
#[derive(Debug, Clone, Copy)]
pub struct Performer {
    pub employee_id: EmployeeId,
    pub position_id: PositionId,
    pub weight: AssignmentWeight,
}

/// Read-only lookup maps over a snapshot, built once per run.
pub struct SnapshotIndex<'a> {
    pub position_by_id: HashMap<PositionId, &'a Position>,
    pub task_by_id: HashMap<TaskId, &'a Task>,
    /// Active employees per position. Positions with no active employees
    /// are absent; callers treat absence as zero.
    pub headcount: HashMap<PositionId, u32>,
    pub workload_by_task: HashMap<TaskId, &'a WorkloadRecord>,
    pub standard_time_by_task: HashMap<TaskId, &'a StandardTimeRecord>,
    /// Eligible performer rows per task. Employees that are not active,
    /// not performing, or unattached to a position never appear here.
    pub performers_by_task: HashMap<TaskId, Vec<Performer>>,
    curve_by_task: HashMap<TaskId, [f64; 12]>,
}

impl<'a> SnapshotIndex<'a> {
    pub fn build(snapshot: &'a PlanSnapshot) -> Self {
        let position_by_id: HashMap<_, _> =
            snapshot.positions.iter().map(|p| (p.id, p)).collect();
        let task_by_id: HashMap<_, _> = snapshot.tasks.iter().map(|t| (t.id, t)).collect();

        let mut headcount: HashMap<PositionId, u32> = HashMap::new();
        let mut employee_position: HashMap<EmployeeId, PositionId> = HashMap::new();
        let mut employee_active: HashMap<EmployeeId, bool> = HashMap::new();
        for e in &snapshot.employees {
            employee_active.insert(e.id, e.status == EmployeeStatus::Active);
            if let Some(pos) = e.position_id {
                employee_position.insert(e.id, pos);
                if e.status == EmployeeStatus::Active {
                    *headcount.entry(pos).or_insert(0) += 1;
                }
            }
        }

        // Last record wins when a task carries duplicates, matching how
        // re-saving a measurement replaces the previous one.
        let mut workload_by_task = HashMap::new();
        for w in &snapshot.workloads {
            workload_by_task.insert(w.task_id, w);
        }
        let mut standard_time_by_task = HashMap::new();
        for s in &snapshot.standard_times {
            standard_time_by_task.insert(s.task_id, s);
        }

        let mut performers_by_task: HashMap<TaskId, Vec<Performer>> = HashMap::new();
        for a in &snapshot.assignments {
            if !a.performs {
                continue;
            }
            if !employee_active.get(&a.employee_id).copied().unwrap_or(false) {
                continue;
            }
            let Some(&position_id) = employee_position.get(&a.employee_id) else {
                log::warn!(
                    "assignment task={} employee={}: performer has no position, skipping",
                    a.task_id,
                    a.employee_id
                );
                continue;
            };
            if !(0..=5).contains(&a.weight) {
                log::warn!(
                    "assignment task={} employee={}: weight {} outside 0..=5, treating as 0",
                    a.task_id,
                    a.employee_id,
                    a.weight
                );
            }
            performers_by_task.entry(a.task_id).or_default().push(Performer {
                employee_id: a.employee_id,
                position_id,
                weight: AssignmentWeight::from_raw(a.weight),
            });
        }

        let mut curve_by_task: HashMap<TaskId, [f64; 12]> = HashMap::new();
        for s in &snapshot.seasonal {
            if !(1..=12).contains(&s.month) {
                log::warn!(
                    "seasonal task={} month={} outside 1..=12, ignoring row",
                    s.task_id,
                    s.month
                );
                continue;
            }
            let curve = curve_by_task.entry(s.task_id).or_insert(FLAT_CURVE);
            curve[(s.month - 1) as usize] = s.multiplier;
        }

        Self {
            position_by_id,
            task_by_id,
            headcount,
            workload_by_task,
            standard_time_by_task,
            performers_by_task,
            curve_by_task,
        }
    }

    /// Active headcount for a position; zero when unknown.
    pub fn headcount(&self, position_id: PositionId) -> u32 {
        self.headcount.get(&position_id).copied().unwrap_or(0)
    }

    /// The task's 12-month curve; flat 1.0 when no seasonal rows exist.
    pub fn curve(&self, task_id: TaskId) -> [f64; 12] {
        self.curve_by_task.get(&task_id).copied().unwrap_or(FLAT_CURVE)
    }

    /// Performer rows for a task; empty slice when none qualify.
    pub fn performers(&self, task_id: TaskId) -> &[Performer] {
        self.performers_by_task
            .get(&task_id)
            .map(Vec::as_slice)
            .unwrap_or(&[])
    }
}
