use crate::error::FailureReason;
use analytics::{
    AggregateStatistics, AnalyticsError, EarlyLateSummary, LinearFit, OverheadRatios, fit_linear,
};
use core_types::{DataSet, GranularityValue};
use rust_decimal::Decimal;
use serde::Serialize;
use std::collections::BTreeMap;
use uuid::Uuid;

/// The reduced result for one granularity.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct GranularityResult {
    pub granularity: GranularityValue,
    /// Complete regions of the interval label that contributed samples.
    pub regions: usize,
    /// Samples extracted before outlier filtering.
    pub samples_before_filter: usize,
    /// Outlier passes actually applied (0 when constant data was preserved).
    pub filter_passes_applied: u32,
    /// Observed intervals after trimming and filtering.
    pub raw: DataSet,
    /// `raw - granularity`, element-wise.
    pub overhead: DataSet,
    pub raw_stats: AggregateStatistics,
    pub overhead_stats: AggregateStatistics,
    pub ratios: OverheadRatios,
    pub processing: Option<ProcessingOverhead>,
    pub early_late: Option<EarlyLateSummary>,
}

/// Cycles spent inside the hook machinery, from the processing-overhead regions.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ProcessingOverhead {
    pub data: DataSet,
    pub stats: AggregateStatistics,
    /// Processing overhead relative to the observed interval and to the target.
    pub ratios: OverheadRatios,
}

/// Results keyed by granularity, in ascending order.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(transparent)]
pub struct ResultBundle(BTreeMap<GranularityValue, GranularityResult>);

impl ResultBundle {
    pub fn insert(&mut self, result: GranularityResult) {
        self.0.insert(result.granularity, result);
    }

    pub fn get(&self, granularity: GranularityValue) -> Option<&GranularityResult> {
        self.0.get(&granularity)
    }

    pub fn contains(&self, granularity: GranularityValue) -> bool {
        self.0.contains_key(&granularity)
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn granularities(&self) -> impl Iterator<Item = GranularityValue> + '_ {
        self.0.keys().copied()
    }

    pub fn iter(&self) -> impl Iterator<Item = &GranularityResult> {
        self.0.values()
    }
}

/// One granularity that produced no result.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SweepFailure {
    pub granularity: GranularityValue,
    pub reason: FailureReason,
}

/// A statistic that can be tracked across granularities.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TrendMetric {
    RawMean,
    RawMedian,
    OverheadMean,
    OverheadMedian,
    ProcessingMean,
    ProcessingMedian,
}

impl TrendMetric {
    fn value(&self, result: &GranularityResult) -> Option<Decimal> {
        match self {
            TrendMetric::RawMean => Some(result.raw_stats.mean),
            TrendMetric::RawMedian => Some(result.raw_stats.median),
            TrendMetric::OverheadMean => Some(result.overhead_stats.mean),
            TrendMetric::OverheadMedian => Some(result.overhead_stats.median),
            TrendMetric::ProcessingMean => result.processing.as_ref().map(|p| p.stats.mean),
            TrendMetric::ProcessingMedian => result.processing.as_ref().map(|p| p.stats.median),
        }
    }
}

/// Everything a sweep produced: the (possibly partial) bundle and what failed.
#[derive(Debug, Clone, Serialize)]
pub struct SweepOutcome {
    pub job_id: Uuid,
    pub bundle: ResultBundle,
    pub failures: Vec<SweepFailure>,
}

impl SweepOutcome {
    /// True when every configured granularity produced a result.
    pub fn is_complete(&self) -> bool {
        self.failures.is_empty()
    }

    /// True when no granularity produced a result.
    pub fn all_failed(&self) -> bool {
        self.bundle.is_empty()
    }

    /// Fits `metric` against granularity over every successful entry.
    pub fn trend(&self, metric: TrendMetric) -> Result<LinearFit, AnalyticsError> {
        let points: Vec<(Decimal, Decimal)> = self
            .bundle
            .iter()
            .filter_map(|r| metric.value(r).map(|y| (r.granularity.as_decimal(), y)))
            .collect();
        fit_linear(&points)
    }
}
