//! Capacity model — how many person-hours a position can absorb per month.
//!
//! The ledger is the only mutable state in a cascading run. It is created
//! fresh for each run and discarded with it; nothing here outlives an
//! allocation call.

use crate::config::PlanConfig;
use crate::snapshot::{Position, SnapshotIndex};
use crate::types::PositionId;
use crate::units::{Period, TimeUnit};
use serde::Serialize;
use std::collections::HashMap;

/// Global capacity parameters with per-position override resolution.
#[derive(Debug, Clone, Copy)]
pub struct CapacityModel {
    pub working_hours_per_month: f64,
    pub efficiency_factor: f64,
}

impl CapacityModel {
    pub fn from_config(config: &PlanConfig) -> Self {
        Self {
            working_hours_per_month: config.working_hours_per_month,
            efficiency_factor: config.efficiency_factor,
        }
    }

    pub fn working_hours(&self, position: &Position) -> f64 {
        position
            .working_hours_override
            .unwrap_or(self.working_hours_per_month)
    }

    pub fn efficiency(&self, position: &Position) -> f64 {
        position
            .efficiency_override
            .unwrap_or(self.efficiency_factor)
    }

    /// Net productive hours one person in this position delivers per month.
    pub fn net_per_person(&self, position: &Position) -> f64 {
        self.working_hours(position) * self.efficiency(position)
    }

    /// Monthly pool for the whole position. An unstaffed position is
    /// priced as if it had one person so its capacity is never zero.
    pub fn pool_for(&self, position: &Position, headcount: u32) -> f64 {
        self.net_per_person(position) * headcount.max(1) as f64
    }
}

/// Mutable remaining-capacity counters for one cascading run.
///
/// Regular draws never take a position below zero; forced overtime draws
/// may, and a negative balance is exactly what the report reads as
/// overtime pressure.
pub struct CapacityLedger {
    remaining: HashMap<PositionId, f64>,
}

impl CapacityLedger {
    /// Seed every position with its full monthly pool.
    pub fn new(index: &SnapshotIndex<'_>, model: &CapacityModel) -> Self {
        let remaining = index
            .position_by_id
            .values()
            .map(|p| (p.id, model.pool_for(p, index.headcount(p.id))))
            .collect();
        Self { remaining }
    }

    pub fn remaining(&self, position_id: PositionId) -> f64 {
        self.remaining.get(&position_id).copied().unwrap_or(0.0)
    }

    /// Take up to `requested` hours from the position's pool. Returns the
    /// granted amount: min(requested, remaining clamped at 0).
    pub fn draw(&mut self, position_id: PositionId, requested: f64) -> f64 {
        let Some(balance) = self.remaining.get_mut(&position_id) else {
            return 0.0;
        };
        let available = balance.max(0.0);
        let granted = requested.min(available);
        if granted > 0.0 {
            *balance -= granted;
        }
        granted
    }

    /// Take hours unconditionally. The balance may go negative.
    pub fn force_draw(&mut self, position_id: PositionId, hours: f64) {
        if let Some(balance) = self.remaining.get_mut(&position_id) {
            *balance -= hours;
        }
    }
}

// ── Single-task quick calculation ──────────────────────────────────

/// Intermediate breakdown for one workload + standard time pair, the
/// preview shown before a measurement is saved.
#[derive(Debug, Clone, Serialize)]
pub struct TaskRequirement {
    pub monthly_volume: f64,
    pub minutes_per_unit: f64,
    pub total_minutes: f64,
    pub total_hours: f64,
    pub required_headcount: f64,
}

pub fn task_requirement(
    volume: f64,
    period: Period,
    duration: f64,
    time_unit: TimeUnit,
    model: &CapacityModel,
) -> TaskRequirement {
    let monthly_volume = volume * period.monthly_multiplier();
    let minutes_per_unit = duration * time_unit.minutes_multiplier();
    let total_minutes = monthly_volume * minutes_per_unit;
    let capacity_minutes =
        model.working_hours_per_month * 60.0 * model.efficiency_factor;
    let required_headcount = if capacity_minutes > 0.0 {
        total_minutes / capacity_minutes
    } else {
        0.0
    };
    TaskRequirement {
        monthly_volume,
        minutes_per_unit,
        total_minutes,
        total_hours: total_minutes / 60.0,
        required_headcount,
    }
}
