//! Unit normalization — heterogeneous workload inputs to monthly person-hours.
//!
//! RULE: Both allocation strategies must price a task through the same
//! `monthly_hours` call. Strategy results are only comparable because the
//! normalization step is shared and pure.

use crate::error::{PlanError, PlanResult};
use crate::types::Month;
use serde::{Deserialize, Serialize};

/// How often a workload volume recurs.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Period {
    Daily,
    Weekly,
    Monthly,
    Yearly,
}

impl Period {
    /// Multiplier that converts one period-volume into a monthly volume.
    /// 22 working days per month, 4.33 weeks per month.
    pub fn monthly_multiplier(self) -> f64 {
        match self {
            Period::Daily => 22.0,
            Period::Weekly => 4.33,
            Period::Monthly => 1.0,
            Period::Yearly => 1.0 / 12.0,
        }
    }

    pub fn from_name(name: &str) -> Option<Self> {
        match name {
            "daily" => Some(Period::Daily),
            "weekly" => Some(Period::Weekly),
            "monthly" => Some(Period::Monthly),
            "yearly" => Some(Period::Yearly),
            _ => None,
        }
    }

    pub fn name(self) -> &'static str {
        match self {
            Period::Daily => "daily",
            Period::Weekly => "weekly",
            Period::Monthly => "monthly",
            Period::Yearly => "yearly",
        }
    }
}

/// Unit a standard duration is recorded in.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TimeUnit {
    Seconds,
    Minutes,
    Hours,
}

impl TimeUnit {
    /// Multiplier that converts one duration into minutes.
    pub fn minutes_multiplier(self) -> f64 {
        match self {
            TimeUnit::Seconds => 1.0 / 60.0,
            TimeUnit::Minutes => 1.0,
            TimeUnit::Hours => 60.0,
        }
    }

    pub fn from_name(name: &str) -> Option<Self> {
        match name {
            "seconds" => Some(TimeUnit::Seconds),
            "minutes" => Some(TimeUnit::Minutes),
            "hours" => Some(TimeUnit::Hours),
            _ => None,
        }
    }

    pub fn name(self) -> &'static str {
        match self {
            TimeUnit::Seconds => "seconds",
            TimeUnit::Minutes => "minutes",
            TimeUnit::Hours => "hours",
        }
    }
}

/// Which slice of the seasonal curve a run prices tasks at.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum SeasonalMode {
    /// One concrete month, 1..=12.
    Specific { month: Month },
    /// Mean of the 3 largest multipliers, for busy-season planning.
    Peak,
    /// Mean of the 3 smallest multipliers, for quiet-season planning.
    Low,
    /// Mean of all 12 multipliers. The default.
    Annual,
}

impl SeasonalMode {
    /// Build a mode from the external `mode` + `selected month` pair.
    /// `specific` requires a month; the other modes ignore it.
    pub fn from_parts(mode: &str, month: Option<Month>) -> PlanResult<Self> {
        match mode {
            "specific" => {
                let month = month.unwrap_or(0);
                if !(1..=12).contains(&month) {
                    return Err(PlanError::MonthOutOfRange { month });
                }
                Ok(SeasonalMode::Specific { month })
            }
            "peak" => Ok(SeasonalMode::Peak),
            "low" => Ok(SeasonalMode::Low),
            "annual" | "" => Ok(SeasonalMode::Annual),
            other => Err(PlanError::Other(anyhow::anyhow!(
                "unknown seasonal mode '{other}'"
            ))),
        }
    }

    pub fn name(&self) -> &'static str {
        match self {
            SeasonalMode::Specific { .. } => "specific",
            SeasonalMode::Peak => "peak",
            SeasonalMode::Low => "low",
            SeasonalMode::Annual => "annual",
        }
    }
}

impl Default for SeasonalMode {
    fn default() -> Self {
        SeasonalMode::Annual
    }
}

/// Resolve the seasonal factor for a 12-month multiplier curve.
/// Index 0 is January. An out-of-range month is clamped rather than
/// panicking; config validation rejects it before a run starts.
pub fn seasonal_factor(curve: &[f64; 12], mode: &SeasonalMode) -> f64 {
    match mode {
        SeasonalMode::Specific { month } => {
            let idx = ((*month).clamp(1, 12) - 1) as usize;
            curve[idx]
        }
        SeasonalMode::Peak => {
            let mut sorted = *curve;
            sorted.sort_by(|a, b| b.total_cmp(a));
            sorted.iter().take(3).sum::<f64>() / 3.0
        }
        SeasonalMode::Low => {
            let mut sorted = *curve;
            sorted.sort_by(|a, b| a.total_cmp(b));
            sorted.iter().take(3).sum::<f64>() / 3.0
        }
        SeasonalMode::Annual => curve.iter().sum::<f64>() / 12.0,
    }
}

/// Normalize one task's workload to seasonally adjusted monthly person-hours.
///
/// `base_hours = (volume × period_mult × duration × time_mult) / 60`,
/// then scaled by the seasonal factor. Non-positive volume or duration
/// yields 0 hours.
pub fn monthly_hours(
    volume: f64,
    period: Period,
    duration: f64,
    time_unit: TimeUnit,
    curve: &[f64; 12],
    mode: &SeasonalMode,
) -> f64 {
    if volume <= 0.0 || duration <= 0.0 {
        return 0.0;
    }
    let monthly_volume = volume * period.monthly_multiplier();
    let minutes_per_unit = duration * time_unit.minutes_multiplier();
    let base_hours = monthly_volume * minutes_per_unit / 60.0;
    base_hours * seasonal_factor(curve, mode)
}

/// A curve with no seasonal rows: every month at 1.0.
pub const FLAT_CURVE: [f64; 12] = [1.0; 12];
