//! Time study — derive a standard time from repeated observations.
//!
//! RULES:
//!   - Non-finite and non-positive observations are dropped before any math.
//!   - Outlier filtering only engages with 4+ clean observations; below
//!     that the quartiles are too coarse to trust.
//!   - All durations are minutes, matching StandardTimeRecord.

use serde::Serialize;

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct ObservationStats {
    pub count:   usize,
    pub mean:    f64,
    /// Sample standard deviation (n − 1); 0.0 for a single observation.
    pub std_dev: f64,
    pub min:     f64,
    pub max:     f64,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct TimeStudyResult {
    /// Statistics over the observations that survived cleaning and,
    /// when requested, outlier filtering.
    pub stats:              ObservationStats,
    pub discarded_outliers: usize,
    /// Mean of the surviving observations, in minutes. The value a
    /// StandardTimeRecord would carry.
    pub suggested_minutes:  f64,
}

/// Evaluate a set of observed durations. Returns None when no valid
/// observations remain after cleaning.
pub fn evaluate(observations: &[f64], filter_outliers: bool) -> Option<TimeStudyResult> {
    let mut clean: Vec<f64> = observations
        .iter()
        .copied()
        .filter(|v| v.is_finite() && *v > 0.0)
        .collect();
    if clean.is_empty() {
        return None;
    }
    clean.sort_unstable_by(f64::total_cmp);

    let mut discarded_outliers = 0;
    if filter_outliers && clean.len() >= 4 {
        let kept = iqr_filter(&clean);
        discarded_outliers = clean.len() - kept.len();
        clean = kept;
    }

    let stats = stats_of(&clean);
    Some(TimeStudyResult {
        stats,
        discarded_outliers,
        suggested_minutes: stats.mean,
    })
}

/// Keep values within [q1 − 1.5·IQR, q3 + 1.5·IQR]. Input must be sorted.
/// The quartiles themselves always survive, so the result is never empty.
fn iqr_filter(sorted: &[f64]) -> Vec<f64> {
    let q1 = sorted[(sorted.len() as f64 * 0.25) as usize];
    let q3 = sorted[(sorted.len() as f64 * 0.75) as usize];
    let iqr = q3 - q1;
    let low = q1 - 1.5 * iqr;
    let high = q3 + 1.5 * iqr;
    sorted
        .iter()
        .copied()
        .filter(|v| (low..=high).contains(v))
        .collect()
}

fn stats_of(values: &[f64]) -> ObservationStats {
    let count = values.len();
    let mean = values.iter().sum::<f64>() / count as f64;
    let std_dev = if count > 1 {
        let variance =
            values.iter().map(|v| (v - mean).powi(2)).sum::<f64>() / (count - 1) as f64;
        variance.sqrt()
    } else {
        0.0
    };
    ObservationStats {
        count,
        mean,
        std_dev,
        min: values[0],
        max: values[count - 1],
    }
}
