use thiserror::Error;

#[derive(Error, Debug)]
pub enum PlanError {
    #[error("Database error: {0}")]
    Database(#[from] rusqlite::Error),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("Month out of range: {month} (expected 1..=12)")]
    MonthOutOfRange { month: u32 },

    #[error("Efficiency factor out of range: {value} (expected (0, 1])")]
    EfficiencyOutOfRange { value: f64 },

    #[error("Working hours must be positive, got {value}")]
    NonPositiveWorkingHours { value: f64 },

    #[error("Unknown strategy '{name}'")]
    UnknownStrategy { name: String },

    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

pub type PlanResult<T> = Result<T, PlanError>;
