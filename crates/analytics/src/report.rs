use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// Descriptive statistics over one non-empty dataset.
///
/// Variance and standard deviation are population statistics (divided by `count`).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AggregateStatistics {
    pub count: usize,
    pub mean: Decimal,
    pub median: Decimal,
    pub variance: Decimal,
    pub stdev: Decimal,
    pub min: i64,
    pub max: i64,
}

/// Overhead expressed as a percentage of the observed interval and of the target.
///
/// Each metric is `None` when its divisor was zero.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct OverheadRatios {
    pub pct_of_observed_mean: Option<Decimal>,
    pub pct_of_observed_median: Option<Decimal>,
    pub pct_of_target_mean: Option<Decimal>,
    pub pct_of_target_median: Option<Decimal>,
}

/// Totals of the `EARLY` and `LATE` count regions.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EarlyLateSummary {
    pub total_early: i64,
    pub total_late: i64,
    /// `total_early / total_late`.
    pub ratio: Decimal,
}
