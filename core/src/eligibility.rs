//! Eligibility & ordering — which tasks get planned, and in what order.
//!
//! RULE: The order produced here is load-bearing. The cascading allocator
//! consumes shared capacity in exactly this sequence, so any change to the
//! ordering silently changes every cascading result.

use crate::snapshot::{
    Performer, PlanSnapshot, SnapshotIndex, StandardTimeRecord, Task, WorkloadRecord,
};
use crate::units::{monthly_hours, SeasonalMode};

/// A task that passed eligibility, with its joined measurement records.
pub struct EligibleTask<'a> {
    pub task: &'a Task,
    pub workload: &'a WorkloadRecord,
    pub standard_time: &'a StandardTimeRecord,
    pub curve: [f64; 12],
    pub performers: &'a [Performer],
    /// Priority after clamping into 1..=5.
    pub priority: u8,
}

impl EligibleTask<'_> {
    /// Seasonally adjusted monthly person-hours for this task. Both
    /// strategies must price a task through this one call.
    pub fn monthly_hours(&self, mode: &SeasonalMode) -> f64 {
        monthly_hours(
            self.workload.volume,
            self.workload.period,
            self.standard_time.duration,
            self.standard_time.unit,
            &self.curve,
            mode,
        )
    }
}

/// Out-of-domain task priorities fall back to the schema default.
fn effective_priority(task: &Task) -> u8 {
    if (1..=5).contains(&task.priority) {
        task.priority
    } else {
        3
    }
}

/// Select eligible tasks and establish the deterministic processing order.
///
/// Eligible means: a workload record, a standard-time record, and at least
/// one active performer. A non-empty allow-list additionally restricts on
/// the task's own priority.
///
/// Ordering is two-phase: first the natural catalog order (primary
/// attached position name, then task name, ascending), then a stable sort
/// on priority descending. The priority pass compares priority only;
/// stability preserves the catalog order within each priority band.
pub fn eligible_tasks<'a>(
    snapshot: &'a PlanSnapshot,
    index: &'a SnapshotIndex<'a>,
    allow_list: Option<&[u8]>,
) -> Vec<EligibleTask<'a>> {
    let mut selected: Vec<EligibleTask<'a>> = Vec::new();

    for task in &snapshot.tasks {
        let Some(&workload) = index.workload_by_task.get(&task.id) else {
            log::debug!("task={} '{}' skipped: no workload record", task.id, task.name);
            continue;
        };
        let Some(&standard_time) = index.standard_time_by_task.get(&task.id) else {
            log::debug!("task={} '{}' skipped: no standard time", task.id, task.name);
            continue;
        };
        let performers = index.performers(task.id);
        if performers.is_empty() {
            log::debug!("task={} '{}' skipped: no active performers", task.id, task.name);
            continue;
        }
        let priority = effective_priority(task);
        if let Some(list) = allow_list {
            if !list.is_empty() && !list.contains(&priority) {
                log::debug!(
                    "task={} '{}' skipped: priority {} not in allow-list",
                    task.id,
                    task.name,
                    priority
                );
                continue;
            }
        }
        selected.push(EligibleTask {
            task,
            workload,
            standard_time,
            curve: index.curve(task.id),
            performers,
            priority,
        });
    }

    // Phase 1: catalog order. Tasks without an attachment sort first.
    selected.sort_by(|a, b| {
        primary_position_name(a.task, index)
            .cmp(primary_position_name(b.task, index))
            .then_with(|| a.task.name.cmp(&b.task.name))
    });

    // Phase 2: priority descending, stable.
    selected.sort_by(|a, b| b.priority.cmp(&a.priority));

    selected
}

fn primary_position_name<'a>(task: &Task, index: &SnapshotIndex<'a>) -> &'a str {
    task.attached_positions
        .first()
        .and_then(|id| index.position_by_id.get(id))
        .map(|p| p.name.as_str())
        .unwrap_or("")
}
