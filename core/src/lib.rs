//! staffplan-core — the staffing requirements engine.
//!
//! A workbook (positions, employees, tasks, the assignment matrix,
//! workloads, standard times, seasonal curves) goes in; a per-position
//! staffing report (required headcount, gap, overtime, utilization)
//! comes out. Two distribution strategies: proportional headcount
//! splitting and capacity-bounded priority cascading.

pub mod allocator;
pub mod capacity;
pub mod cascade;
pub mod config;
pub mod eligibility;
pub mod engine;
pub mod error;
pub mod proportional;
pub mod report;
pub mod scenario;
pub mod snapshot;
pub mod store;
pub mod timestudy;
pub mod types;
pub mod units;

pub use allocator::{AllocationEntry, Allocator};
pub use capacity::{task_requirement, CapacityLedger, CapacityModel, TaskRequirement};
pub use cascade::{CascadeAllocator, OverflowPolicy, RESIDUE_TOLERANCE};
pub use config::{seasonal_template, PlanConfig, SeasonalTemplate, Strategy, SEASONAL_TEMPLATES};
pub use eligibility::{eligible_tasks, EligibleTask};
pub use engine::PlanEngine;
pub use error::{PlanError, PlanResult};
pub use proportional::ProportionalAllocator;
pub use report::{
    build_report, PlanReport, PlanSummary, PositionReportRow, StaffingStatus, TaskDetail,
};
pub use scenario::{ScenarioBuilder, ScenarioRng, StreamSlot};
pub use snapshot::{
    Assignment, AssignmentWeight, Employee, EmployeeStatus, Performer, PlanSnapshot, Position,
    SeasonalMultiplier, SnapshotIndex, StandardTimeRecord, Task, WorkloadRecord,
};
pub use store::WorkbookStore;
pub use timestudy::{ObservationStats, TimeStudyResult};
pub use types::{EmployeeId, Month, PositionId, TaskId};
pub use units::{monthly_hours, seasonal_factor, Period, SeasonalMode, TimeUnit, FLAT_CURVE};
