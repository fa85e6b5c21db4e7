//! Deterministic demo scenario generation.
//!
//! RULES:
//!   - Nothing here calls a platform RNG. All randomness flows through
//!     ScenarioRng streams derived from the one master seed.
//!   - Stream slots are append-only. Reordering changes every stream.
//!   - Entity ids are plain sequential integers, the same ids a
//!     hand-entered workbook would carry.

use crate::config::SEASONAL_TEMPLATES;
use crate::snapshot::{
    Assignment, Employee, EmployeeStatus, PlanSnapshot, Position, SeasonalMultiplier,
    StandardTimeRecord, Task, WorkloadRecord,
};
use crate::types::PositionId;
use crate::units::{Period, TimeUnit};
use rand::{RngCore, SeedableRng};
use rand_pcg::Pcg64Mcg;
use std::collections::HashMap;

// ── Streams ────────────────────────────────────────────────────────

/// Stable stream slot assignments.
/// NEVER reorder or remove entries — only append.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[repr(u64)]
pub enum StreamSlot {
    Positions = 0,
    Employees = 1,
    Tasks = 2,
    Assignments = 3,
    Workloads = 4,
    StandardTimes = 5,
    Seasonal = 6,
    // Add new streams here — append only.
}

/// A deterministic RNG for one generation stream, derived from
/// (master_seed XOR slot). Adding a stream never disturbs the others.
pub struct ScenarioRng {
    inner: Pcg64Mcg,
}

impl ScenarioRng {
    pub fn new(master_seed: u64, slot: StreamSlot) -> Self {
        let derived_seed = master_seed ^ (slot as u64).wrapping_mul(0x9e37_79b9_7f4a_7c15);
        Self {
            inner: Pcg64Mcg::seed_from_u64(derived_seed),
        }
    }

    /// Roll a float in [0.0, 1.0).
    pub fn next_f64(&mut self) -> f64 {
        let bits = self.inner.next_u64();
        (bits >> 11) as f64 * (1.0 / (1u64 << 53) as f64)
    }

    /// Roll a u64 in [0, n).
    pub fn next_u64_below(&mut self, n: u64) -> u64 {
        assert!(n > 0, "n must be > 0");
        self.inner.next_u64() % n
    }

    /// Bernoulli trial: returns true with probability p.
    pub fn chance(&mut self, p: f64) -> bool {
        self.next_f64() < p
    }

    fn pick(&mut self, items: &[&'static str]) -> &'static str {
        items[self.next_u64_below(items.len() as u64) as usize]
    }
}

// ── Curated lists ──────────────────────────────────────────────────

const DEPARTMENTS: &[&str] = &[
    "Finance", "Sales", "Human Resources", "Operations",
    "Customer Service", "Procurement", "IT",
];

const POSITION_TITLES: &[&str] = &[
    "Specialist", "Senior Specialist", "Analyst", "Coordinator",
    "Clerk", "Team Lead", "Supervisor",
];

const TASK_NAMES: &[&str] = &[
    "Invoice Processing", "Expense Audit", "Payroll Run", "Account Reconciliation",
    "Monthly Close Reporting", "Budget Consolidation", "Order Entry", "Quote Preparation",
    "Customer Onboarding", "Complaint Resolution", "Contract Review", "Lead Qualification",
    "Supplier Evaluation", "Purchase Order Entry", "Inventory Reconciliation",
    "Returns Handling", "Shift Scheduling", "Recruitment Screening",
    "Training Coordination", "Performance Review Support", "Data Entry Verification",
    "Report Distribution", "Quality Inspection", "Ticket Triage",
    "System Access Review", "Document Archiving", "Campaign Tracking",
    "Meeting Minutes", "Travel Booking", "Facility Requests",
];

const VOLUME_UNITS: &[&str] = &["items", "documents", "reports", "orders", "requests", "calls"];

const FIRST_NAMES: &[&str] = &[
    "James", "Mary", "Robert", "Patricia", "Michael", "Jennifer", "David", "Linda",
    "William", "Elizabeth", "Richard", "Susan", "Thomas", "Jessica", "Daniel", "Sarah",
    "Matthew", "Karen", "Anthony", "Lisa", "Mark", "Nancy", "Steven", "Sandra",
    "Andrew", "Ashley", "Joshua", "Emily", "Kenneth", "Michelle", "Kevin", "Carol",
    "Brian", "Amanda", "George", "Melissa", "Edward", "Deborah", "Ronald", "Stephanie",
    "Timothy", "Rebecca", "Jason", "Laura", "Jeffrey", "Helen", "Ryan", "Amy",
];

const LAST_NAMES: &[&str] = &[
    "Smith", "Johnson", "Williams", "Brown", "Jones", "Garcia", "Miller", "Davis",
    "Rodriguez", "Martinez", "Wilson", "Anderson", "Taylor", "Thomas", "Moore", "Jackson",
    "Martin", "Lee", "Thompson", "White", "Harris", "Clark", "Lewis", "Robinson",
    "Walker", "Young", "Allen", "King", "Wright", "Scott", "Hill", "Green",
    "Adams", "Baker", "Nelson", "Carter", "Mitchell", "Turner", "Phillips", "Campbell",
    "Parker", "Evans", "Edwards", "Collins", "Stewart", "Morris", "Murphy", "Cook",
];

// ── Builder ────────────────────────────────────────────────────────

/// Builds a complete, internally consistent demo workbook snapshot.
pub struct ScenarioBuilder {
    master_seed: u64,
    position_count: usize,
}

impl ScenarioBuilder {
    pub fn new(master_seed: u64) -> Self {
        Self {
            master_seed,
            position_count: 6,
        }
    }

    pub fn position_count(mut self, count: usize) -> Self {
        self.position_count = count.max(1);
        self
    }

    pub fn build(&self) -> PlanSnapshot {
        let positions = self.build_positions();
        let employees = self.build_employees(&positions);
        let tasks = self.build_tasks(&positions);
        let assignments = self.build_assignments(&tasks, &employees);
        let workloads = self.build_workloads(&tasks);
        let standard_times = self.build_standard_times(&tasks);
        let seasonal = self.build_seasonal(&tasks);

        log::info!(
            "scenario seed={}: {} positions, {} employees, {} tasks, {} assignments",
            self.master_seed,
            positions.len(),
            employees.len(),
            tasks.len(),
            assignments.len()
        );

        PlanSnapshot {
            positions,
            employees,
            tasks,
            assignments,
            workloads,
            standard_times,
            seasonal,
        }
    }

    fn build_positions(&self) -> Vec<Position> {
        let mut rng = ScenarioRng::new(self.master_seed, StreamSlot::Positions);
        let mut positions = Vec::with_capacity(self.position_count);
        for i in 0..self.position_count {
            let id = (i + 1) as PositionId;
            let department = rng.pick(DEPARTMENTS);
            let title = rng.pick(POSITION_TITLES);
            // Parents only point backwards so the org chart stays acyclic.
            let parent_id = if i > 0 && rng.chance(0.4) {
                Some((rng.next_u64_below(i as u64) + 1) as PositionId)
            } else {
                None
            };
            let working_hours_override = if rng.chance(0.1) {
                Some(140.0 + rng.next_u64_below(5) as f64 * 10.0)
            } else {
                None
            };
            let efficiency_override = if rng.chance(0.1) {
                Some(0.70 + rng.next_u64_below(4) as f64 * 0.05)
            } else {
                None
            };
            positions.push(Position {
                id,
                name: format!("{department} {title}"),
                department: Some(department.to_string()),
                parent_id,
                working_hours_override,
                efficiency_override,
            });
        }
        positions
    }

    fn build_employees(&self, positions: &[Position]) -> Vec<Employee> {
        let mut rng = ScenarioRng::new(self.master_seed, StreamSlot::Employees);
        let mut employees = Vec::new();
        let mut next_id = 1i64;
        for position in positions {
            let count = 1 + rng.next_u64_below(4);
            for _ in 0..count {
                let status = if rng.chance(0.9) {
                    EmployeeStatus::Active
                } else if rng.chance(0.5) {
                    EmployeeStatus::Inactive
                } else {
                    EmployeeStatus::OnLeave
                };
                employees.push(Employee {
                    id: next_id,
                    staff_no: format!("E{next_id:04}"),
                    name: format!("{} {}", rng.pick(FIRST_NAMES), rng.pick(LAST_NAMES)),
                    position_id: Some(position.id),
                    status,
                });
                next_id += 1;
            }
        }
        employees
    }

    fn build_tasks(&self, positions: &[Position]) -> Vec<Task> {
        let mut rng = ScenarioRng::new(self.master_seed, StreamSlot::Tasks);
        let mut tasks = Vec::new();
        let mut next_id = 1i64;
        for position in positions {
            let count = 1 + rng.next_u64_below(3);
            for _ in 0..count {
                let mut attached_positions = vec![position.id];
                // Occasionally attach a second position so shared tasks
                // and cross-position cascades show up in demos.
                if positions.len() > 1 && rng.chance(0.25) {
                    let other = positions
                        [rng.next_u64_below(positions.len() as u64) as usize]
                        .id;
                    if other != position.id {
                        attached_positions.push(other);
                    }
                }
                tasks.push(Task {
                    id: next_id,
                    name: rng.pick(TASK_NAMES).to_string(),
                    priority: (1 + rng.next_u64_below(5)) as u8,
                    attached_positions,
                });
                next_id += 1;
            }
        }
        tasks
    }

    fn build_assignments(&self, tasks: &[Task], employees: &[Employee]) -> Vec<Assignment> {
        let mut rng = ScenarioRng::new(self.master_seed, StreamSlot::Assignments);
        let mut by_position: HashMap<PositionId, Vec<&Employee>> = HashMap::new();
        for employee in employees {
            if let Some(position_id) = employee.position_id {
                by_position.entry(position_id).or_default().push(employee);
            }
        }

        let mut assignments = Vec::new();
        for task in tasks {
            let mut performer_count = 0;
            for (rank, &position_id) in task.attached_positions.iter().enumerate() {
                let Some(staff) = by_position.get(&position_id) else {
                    continue;
                };
                // Staff of the primary attachment mostly perform the
                // task; secondary attachments chip in less often.
                let perform_p = if rank == 0 { 0.8 } else { 0.4 };
                for employee in staff {
                    if rng.chance(perform_p) {
                        let weight = if rng.chance(0.5) {
                            3
                        } else {
                            1 + rng.next_u64_below(5) as i64
                        };
                        assignments.push(Assignment {
                            task_id: task.id,
                            employee_id: employee.id,
                            performs: true,
                            weight,
                        });
                        performer_count += 1;
                    } else if rng.chance(0.1) {
                        // A recorded non-performer row, as saved screens do.
                        assignments.push(Assignment {
                            task_id: task.id,
                            employee_id: employee.id,
                            performs: false,
                            weight: 0,
                        });
                    }
                }
            }
            // A task with staff but no performers would silently drop
            // out of every plan; pin the first primary employee on it.
            if performer_count == 0 {
                if let Some(first) = task
                    .attached_positions
                    .first()
                    .and_then(|position_id| by_position.get(position_id))
                    .and_then(|staff| staff.first())
                {
                    assignments.push(Assignment {
                        task_id: task.id,
                        employee_id: first.id,
                        performs: true,
                        weight: 3,
                    });
                }
            }
        }
        assignments
    }

    fn build_workloads(&self, tasks: &[Task]) -> Vec<WorkloadRecord> {
        let mut rng = ScenarioRng::new(self.master_seed, StreamSlot::Workloads);
        let mut workloads = Vec::new();
        for task in tasks {
            if !rng.chance(0.9) {
                continue;
            }
            let (period, volume) = match rng.next_u64_below(10) {
                0..=2 => (Period::Daily, 5 + rng.next_u64_below(46)),
                3..=5 => (Period::Weekly, 10 + rng.next_u64_below(91)),
                6..=8 => (Period::Monthly, 50 + rng.next_u64_below(451)),
                _ => (Period::Yearly, 100 + rng.next_u64_below(901)),
            };
            workloads.push(WorkloadRecord {
                task_id: task.id,
                volume: volume as f64,
                unit: rng.pick(VOLUME_UNITS).to_string(),
                period,
            });
        }
        workloads
    }

    fn build_standard_times(&self, tasks: &[Task]) -> Vec<StandardTimeRecord> {
        let mut rng = ScenarioRng::new(self.master_seed, StreamSlot::StandardTimes);
        let mut standard_times = Vec::new();
        for task in tasks {
            if !rng.chance(0.9) {
                continue;
            }
            let (unit, duration) = match rng.next_u64_below(10) {
                0..=1 => (TimeUnit::Seconds, 30 + rng.next_u64_below(600)),
                2..=8 => (TimeUnit::Minutes, 2 + rng.next_u64_below(59)),
                _ => (TimeUnit::Hours, 1 + rng.next_u64_below(8)),
            };
            let source = if rng.chance(0.3) { "time_study" } else { "estimate" };
            standard_times.push(StandardTimeRecord {
                task_id: task.id,
                duration: duration as f64,
                unit,
                source: Some(source.to_string()),
            });
        }
        standard_times
    }

    fn build_seasonal(&self, tasks: &[Task]) -> Vec<SeasonalMultiplier> {
        let mut rng = ScenarioRng::new(self.master_seed, StreamSlot::Seasonal);
        let mut seasonal = Vec::new();
        for task in tasks {
            if !rng.chance(0.35) {
                continue;
            }
            // Index 0 is the flat template; emitting it would be noise.
            let template = &SEASONAL_TEMPLATES
                [1 + rng.next_u64_below((SEASONAL_TEMPLATES.len() - 1) as u64) as usize];
            for (month0, &multiplier) in template.multipliers.iter().enumerate() {
                seasonal.push(SeasonalMultiplier {
                    task_id: task.id,
                    month: month0 as u32 + 1,
                    multiplier,
                });
            }
        }
        seasonal
    }
}
