use staffplan_core::{
    eligible_tasks, Allocator, Assignment, CapacityModel, Employee, EmployeeStatus, Period,
    PlanConfig, PlanSnapshot, Position, ProportionalAllocator, SeasonalMode, SnapshotIndex,
    StandardTimeRecord, Task, TimeUnit, WorkloadRecord,
};

// ── Helpers ──────────────────────────────────────────────────────────────────

fn position(id: i64, name: &str) -> Position {
    Position {
        id,
        name: name.into(),
        department: None,
        parent_id: None,
        working_hours_override: None,
        efficiency_override: None,
    }
}

fn employee(id: i64, position_id: i64) -> Employee {
    Employee {
        id,
        staff_no: format!("E{id:04}"),
        name: format!("Employee {id}"),
        position_id: Some(position_id),
        status: EmployeeStatus::Active,
    }
}

/// A single 100-hour monthly task (200 items × 30 min) plus staffing:
/// `headcounts[i]` active performers on position i + 1.
fn snapshot_with_performers(headcounts: &[usize]) -> PlanSnapshot {
    let mut snapshot = PlanSnapshot::default();
    let mut next_employee = 1;
    for (i, &count) in headcounts.iter().enumerate() {
        let position_id = i as i64 + 1;
        snapshot
            .positions
            .push(position(position_id, &format!("Desk {position_id}")));
        for _ in 0..count {
            snapshot.employees.push(employee(next_employee, position_id));
            snapshot.assignments.push(Assignment {
                task_id: 1,
                employee_id: next_employee,
                performs: true,
                weight: 3,
            });
            next_employee += 1;
        }
    }
    snapshot.tasks.push(Task {
        id: 1,
        name: "Document Intake".into(),
        priority: 3,
        attached_positions: vec![1],
    });
    snapshot.workloads.push(WorkloadRecord {
        task_id: 1,
        volume: 200.0,
        unit: "items".into(),
        period: Period::Monthly,
    });
    snapshot.standard_times.push(StandardTimeRecord {
        task_id: 1,
        duration: 30.0,
        unit: TimeUnit::Minutes,
        source: None,
    });
    snapshot
}

fn allocate(snapshot: &PlanSnapshot) -> Vec<staffplan_core::AllocationEntry> {
    let index = SnapshotIndex::build(snapshot);
    let model = CapacityModel::from_config(&PlanConfig::default_test());
    let tasks = eligible_tasks(snapshot, &index, None);
    ProportionalAllocator
        .allocate(&tasks, &index, &model, &SeasonalMode::Annual)
        .unwrap()
}

fn close(a: f64, b: f64) -> bool {
    (a - b).abs() < 1e-9
}

// ── Tests ────────────────────────────────────────────────────────────────────

/// Two positions performing one 100-hour task with 2 performers each split
/// it 50/50: 50 hours and share 0.5 apiece, flagged as shared work.
#[test]
fn equal_headcounts_split_evenly() {
    let entries = allocate(&snapshot_with_performers(&[2, 2]));

    assert_eq!(entries.len(), 2, "Expected one entry per position");
    for entry in &entries {
        assert!(
            close(entry.hours, 50.0),
            "Position {}: expected 50 hours, got {}",
            entry.position_id,
            entry.hours
        );
        assert!(
            close(entry.share_ratio, 0.5),
            "Position {}: expected share 0.5, got {}",
            entry.position_id,
            entry.share_ratio
        );
        assert_eq!(entry.performer_count, 2);
        assert!(entry.shared, "A two-position task must be marked shared");
        assert!(!entry.overtime, "Proportional entries never carry overtime");
    }
}

/// Uneven headcounts split by ratio: 1 vs 3 performers gives 25 and 75 hours.
#[test]
fn uneven_headcounts_split_by_ratio() {
    let entries = allocate(&snapshot_with_performers(&[1, 3]));

    assert_eq!(entries.len(), 2);
    assert!(
        close(entries[0].hours, 25.0),
        "Position 1: expected 25 hours, got {}",
        entries[0].hours
    );
    assert!(
        close(entries[1].hours, 75.0),
        "Position 2: expected 75 hours, got {}",
        entries[1].hours
    );
}

/// A task performed by one position alone lands there in full, with
/// share 1.0 and no shared flag.
#[test]
fn single_position_takes_the_whole_task() {
    let entries = allocate(&snapshot_with_performers(&[3]));

    assert_eq!(entries.len(), 1);
    let entry = &entries[0];
    assert!(close(entry.hours, 100.0), "Expected 100 hours, got {}", entry.hours);
    assert!(close(entry.share_ratio, 1.0));
    assert_eq!(entry.performer_count, 3);
    assert!(!entry.shared, "A single-position task is not shared");
}

/// The split counts heads, not weights. Turning one performer up to
/// weight 5 and the other down to 1 must not move a single hour.
#[test]
fn assignment_weights_do_not_skew_the_split() {
    let mut snapshot = snapshot_with_performers(&[1, 1]);
    snapshot.assignments[0].weight = 5;
    snapshot.assignments[1].weight = 1;

    let entries = allocate(&snapshot);
    assert_eq!(entries.len(), 2);
    for entry in &entries {
        assert!(
            close(entry.hours, 50.0),
            "Position {}: weights must not skew the split, got {} hours",
            entry.position_id,
            entry.hours
        );
    }
}

/// Proportional distribution ignores capacity entirely: a pool of 1 net
/// hour per person still receives the full 100 task hours.
#[test]
fn capacity_never_caps_a_proportional_split() {
    let snapshot = snapshot_with_performers(&[1]);
    let index = SnapshotIndex::build(&snapshot);
    let model = CapacityModel {
        working_hours_per_month: 1.0,
        efficiency_factor: 1.0,
    };
    let tasks = eligible_tasks(&snapshot, &index, None);

    let entries = ProportionalAllocator
        .allocate(&tasks, &index, &model, &SeasonalMode::Annual)
        .unwrap();

    assert_eq!(entries.len(), 1);
    assert!(
        close(entries[0].hours, 100.0),
        "Expected the full 100 hours despite the tiny pool, got {}",
        entries[0].hours
    );
    assert!(!entries[0].overtime);
}

/// Every task's hours are conserved across its entries, one task at a time.
#[test]
fn split_conserves_task_hours() {
    let mut snapshot = snapshot_with_performers(&[2, 3, 4]);
    // A second task with a different spread: performed by positions 1 and 3.
    snapshot.tasks.push(Task {
        id: 2,
        name: "Ledger Review".into(),
        priority: 4,
        attached_positions: vec![3],
    });
    snapshot.assignments.push(Assignment {
        task_id: 2,
        employee_id: 1,
        performs: true,
        weight: 2,
    });
    snapshot.assignments.push(Assignment {
        task_id: 2,
        employee_id: 6,
        performs: true,
        weight: 4,
    });
    snapshot.workloads.push(WorkloadRecord {
        task_id: 2,
        volume: 33.0,
        unit: "reviews".into(),
        period: Period::Weekly,
    });
    snapshot.standard_times.push(StandardTimeRecord {
        task_id: 2,
        duration: 45.0,
        unit: TimeUnit::Minutes,
        source: None,
    });

    let index = SnapshotIndex::build(&snapshot);
    let model = CapacityModel::from_config(&PlanConfig::default_test());
    let tasks = eligible_tasks(&snapshot, &index, None);
    let entries = ProportionalAllocator
        .allocate(&tasks, &index, &model, &SeasonalMode::Annual)
        .unwrap();

    for et in &tasks {
        let expected = et.monthly_hours(&SeasonalMode::Annual);
        let allocated: f64 = entries
            .iter()
            .filter(|e| e.task_id == et.task.id)
            .map(|e| e.hours)
            .sum();
        assert!(
            (allocated - expected).abs() < 1e-6,
            "Task {}: allocated {allocated} of {expected} hours",
            et.task.id
        );
        let shares: f64 = entries
            .iter()
            .filter(|e| e.task_id == et.task.id)
            .map(|e| e.share_ratio)
            .sum();
        assert!(
            (shares - 1.0).abs() < 1e-9,
            "Task {}: shares sum to {shares}, not 1",
            et.task.id
        );
    }
}

/// The seasonal mode scales the split without changing the ratios:
/// July on the summer-lull curve prices the task at 60 hours, 30 each.
#[test]
fn seasonal_mode_scales_both_shares() {
    let mut snapshot = snapshot_with_performers(&[2, 2]);
    let curve = staffplan_core::seasonal_template("summer_lull").unwrap().multipliers;
    for (month, multiplier) in curve.iter().enumerate() {
        snapshot.seasonal.push(staffplan_core::SeasonalMultiplier {
            task_id: 1,
            month: month as u32 + 1,
            multiplier: *multiplier,
        });
    }

    let index = SnapshotIndex::build(&snapshot);
    let model = CapacityModel::from_config(&PlanConfig::default_test());
    let tasks = eligible_tasks(&snapshot, &index, None);
    let entries = ProportionalAllocator
        .allocate(&tasks, &index, &model, &SeasonalMode::Specific { month: 7 })
        .unwrap();

    assert_eq!(entries.len(), 2);
    for entry in &entries {
        assert!(
            close(entry.hours, 30.0),
            "Position {}: expected 30 July hours, got {}",
            entry.position_id,
            entry.hours
        );
        assert!(close(entry.share_ratio, 0.5));
    }
}
