//! Run configuration — capacity defaults, filters, strategy selection.
//!
//! Loaded from a JSON file by the runner or built directly by callers.
//! In tests, use PlanConfig::default_test().

use crate::error::{PlanError, PlanResult};
use crate::types::Month;
use crate::units::SeasonalMode;
use serde::{Deserialize, Serialize};

/// Which distribution strategy a run uses.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Strategy {
    Proportional,
    Cascading,
}

impl Strategy {
    pub fn from_name(name: &str) -> PlanResult<Self> {
        match name {
            "proportional" => Ok(Strategy::Proportional),
            "cascading" => Ok(Strategy::Cascading),
            other => Err(PlanError::UnknownStrategy {
                name: other.to_string(),
            }),
        }
    }

    pub fn name(self) -> &'static str {
        match self {
            Strategy::Proportional => "proportional",
            Strategy::Cascading => "cascading",
        }
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct PlanConfig {
    /// Gross working hours per person per month.
    pub working_hours_per_month: f64,
    /// Net fraction of working hours actually productive, (0, 1].
    pub efficiency_factor: f64,
    /// If set, only tasks whose own priority is in this list are planned.
    pub priority_allow_list: Option<Vec<u8>>,
    pub seasonal_mode: SeasonalMode,
    pub strategy: Strategy,
}

/// External file shape: mode and month arrive as separate fields.
#[derive(Debug, Clone, Deserialize)]
struct PlanConfigFile {
    working_hours_per_month: f64,
    efficiency_factor: f64,
    #[serde(default)]
    priority_allow_list: Option<Vec<u8>>,
    seasonal_mode: String,
    #[serde(default)]
    selected_month: Option<Month>,
    strategy: String,
}

impl PlanConfig {
    /// Load from a JSON file. In tests, use PlanConfig::default_test().
    pub fn load(path: &str) -> anyhow::Result<Self> {
        let content = std::fs::read_to_string(path)
            .map_err(|e| anyhow::anyhow!("Cannot read {path}: {e}"))?;
        let file: PlanConfigFile = serde_json::from_str(&content)?;
        let config = Self {
            working_hours_per_month: file.working_hours_per_month,
            efficiency_factor: file.efficiency_factor,
            priority_allow_list: file.priority_allow_list,
            seasonal_mode: SeasonalMode::from_parts(&file.seasonal_mode, file.selected_month)?,
            strategy: Strategy::from_name(&file.strategy)?,
        };
        config.validate()?;
        Ok(config)
    }

    /// Reject parameter values the report formulas cannot work with.
    pub fn validate(&self) -> PlanResult<()> {
        if self.working_hours_per_month <= 0.0 {
            return Err(PlanError::NonPositiveWorkingHours {
                value: self.working_hours_per_month,
            });
        }
        if self.efficiency_factor <= 0.0 || self.efficiency_factor > 1.0 {
            return Err(PlanError::EfficiencyOutOfRange {
                value: self.efficiency_factor,
            });
        }
        if let SeasonalMode::Specific { month } = self.seasonal_mode {
            if !(1..=12).contains(&month) {
                return Err(PlanError::MonthOutOfRange { month });
            }
        }
        Ok(())
    }

    /// Config with hardcoded defaults for use in unit tests.
    pub fn default_test() -> Self {
        Self {
            working_hours_per_month: 160.0,
            efficiency_factor: 0.85,
            priority_allow_list: None,
            seasonal_mode: SeasonalMode::Annual,
            strategy: Strategy::Proportional,
        }
    }
}

// ── Seasonal template library ──────────────────────────────────────

/// A named 12-month multiplier curve callers can seed tasks from.
#[derive(Debug, Clone, Copy, Serialize)]
pub struct SeasonalTemplate {
    pub id: &'static str,
    pub label: &'static str,
    pub multipliers: [f64; 12],
}

/// The bundled templates, in catalog order.
pub const SEASONAL_TEMPLATES: &[SeasonalTemplate] = &[
    SeasonalTemplate {
        id: "flat",
        label: "Flat",
        multipliers: [1.0; 12],
    },
    SeasonalTemplate {
        id: "finance_year_end",
        label: "Finance / Year-End",
        multipliers: [1.3, 0.9, 1.2, 1.3, 1.0, 0.85, 0.7, 0.7, 1.0, 1.1, 1.15, 1.3],
    },
    SeasonalTemplate {
        id: "sales_campaign",
        label: "Sales / Campaign Seasons",
        multipliers: [0.8, 0.9, 1.0, 1.0, 1.1, 1.2, 0.8, 0.7, 1.1, 1.2, 1.4, 1.5],
    },
    SeasonalTemplate {
        id: "hr_hiring",
        label: "HR / Hiring Season",
        multipliers: [1.2, 1.1, 1.0, 0.9, 0.9, 0.8, 0.7, 0.7, 1.3, 1.2, 1.0, 0.9],
    },
    SeasonalTemplate {
        id: "summer_lull",
        label: "Summer Lull",
        multipliers: [1.0, 1.0, 1.0, 1.0, 1.0, 0.8, 0.6, 0.6, 1.0, 1.1, 1.1, 1.0],
    },
];

/// Look up a template by id.
pub fn seasonal_template(id: &str) -> Option<&'static SeasonalTemplate> {
    SEASONAL_TEMPLATES.iter().find(|t| t.id == id)
}
