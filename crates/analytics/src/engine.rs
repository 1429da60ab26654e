use crate::error::AnalyticsError;
use crate::report::{AggregateStatistics, EarlyLateSummary, OverheadRatios};
use core_types::{DataSet, GranularityValue};
use itertools::{Itertools, MinMaxResult};
use rust_decimal::prelude::*;
use rust_decimal::Decimal;

/// A stateless calculator for descriptive statistics and overhead metrics.
#[derive(Debug, Default, Clone, Copy)]
pub struct AggregationEngine {}

impl AggregationEngine {
    pub fn new() -> Self {
        Self::default()
    }

    /// Computes count, mean, median, variance, stdev, min and max of `data`.
    ///
    /// # Returns
    ///
    /// `AnalyticsError::EmptyDataset` if `data` has no samples.
    pub fn summarize(&self, data: &DataSet) -> Result<AggregateStatistics, AnalyticsError> {
        let (min, max) = match data.iter().minmax() {
            MinMaxResult::NoElements => return Err(AnalyticsError::EmptyDataset),
            MinMaxResult::OneElement(&v) => (v, v),
            MinMaxResult::MinMax(&lo, &hi) => (lo, hi),
        };

        let values = data.to_decimals();
        let (mean, variance) = moments(&values)?;
        let stdev = variance
            .sqrt()
            .ok_or_else(|| AnalyticsError::Calculation("square root of variance".to_string()))?;

        Ok(AggregateStatistics {
            count: values.len(),
            mean,
            median: median(data)?,
            variance,
            stdev,
            min,
            max,
        })
    }

    /// Element-wise `x - granularity`. Samples faster than the target go negative.
    pub fn overhead(&self, data: &DataSet, granularity: GranularityValue) -> DataSet {
        let target = i64::try_from(granularity.cycles()).unwrap_or(i64::MAX);
        data.iter().map(|&v| v.saturating_sub(target)).collect()
    }

    /// `100 * numerator / denominator`, failing on a zero denominator.
    pub fn percent_of(
        &self,
        numerator: Decimal,
        denominator: Decimal,
        metric: &str,
    ) -> Result<Decimal, AnalyticsError> {
        if denominator.is_zero() {
            return Err(AnalyticsError::DivisionByZero(metric.to_string()));
        }
        numerator
            .checked_mul(Decimal::ONE_HUNDRED)
            .and_then(|scaled| scaled.checked_div(denominator))
            .ok_or_else(|| AnalyticsError::Calculation(format!("overflow in '{}'", metric)))
    }

    /// Relates overhead statistics to the observed interval and to the target granularity.
    ///
    /// A metric whose divisor is zero is left as `None`; the others are still computed.
    pub fn overhead_ratios(
        &self,
        observed: &AggregateStatistics,
        overhead: &AggregateStatistics,
        granularity: GranularityValue,
    ) -> OverheadRatios {
        let target = granularity.as_decimal();

        OverheadRatios {
            pct_of_observed_mean: self.metric(overhead.mean, observed.mean, "pct_of_observed_mean"),
            pct_of_observed_median: self.metric(
                overhead.median,
                observed.median,
                "pct_of_observed_median",
            ),
            pct_of_target_mean: self.metric(overhead.mean, target, "pct_of_target_mean"),
            pct_of_target_median: self.metric(overhead.median, target, "pct_of_target_median"),
        }
    }

    /// Totals the early and late call counts and their ratio.
    pub fn early_late(
        &self,
        early: &DataSet,
        late: &DataSet,
    ) -> Result<EarlyLateSummary, AnalyticsError> {
        let total_early = checked_total(early)?;
        let total_late = checked_total(late)?;
        if total_late == 0 {
            return Err(AnalyticsError::DivisionByZero("early_late_ratio".to_string()));
        }

        Ok(EarlyLateSummary {
            total_early,
            total_late,
            ratio: Decimal::from(total_early) / Decimal::from(total_late),
        })
    }

    fn metric(&self, numerator: Decimal, denominator: Decimal, name: &str) -> Option<Decimal> {
        match self.percent_of(numerator, denominator, name) {
            Ok(value) => Some(value),
            Err(e) => {
                tracing::warn!(error = %e, "Overhead ratio unavailable");
                None
            }
        }
    }
}

/// Population mean and variance.
pub(crate) fn moments(values: &[Decimal]) -> Result<(Decimal, Decimal), AnalyticsError> {
    if values.is_empty() {
        return Err(AnalyticsError::EmptyDataset);
    }
    let count = Decimal::from(values.len());
    let overflow = || AnalyticsError::Calculation("decimal overflow in moments".to_string());

    let sum = values
        .iter()
        .try_fold(Decimal::ZERO, |acc, v| acc.checked_add(*v))
        .ok_or_else(overflow)?;
    let mean = sum / count;

    let squares = values
        .iter()
        .try_fold(Decimal::ZERO, |acc, v| {
            let d = *v - mean;
            d.checked_mul(d).and_then(|sq| acc.checked_add(sq))
        })
        .ok_or_else(overflow)?;

    Ok((mean, squares / count))
}

fn median(data: &DataSet) -> Result<Decimal, AnalyticsError> {
    let sorted: Vec<i64> = data.iter().copied().sorted_unstable().collect();
    let mid = sorted.len() / 2;
    match sorted.len() {
        0 => Err(AnalyticsError::EmptyDataset),
        n if n % 2 == 1 => Ok(Decimal::from(sorted[mid])),
        _ => Ok((Decimal::from(sorted[mid - 1]) + Decimal::from(sorted[mid])) / Decimal::TWO),
    }
}

fn checked_total(data: &DataSet) -> Result<i64, AnalyticsError> {
    data.iter()
        .try_fold(0i64, |acc, &v| acc.checked_add(v))
        .ok_or_else(|| AnalyticsError::Calculation("count total overflowed".to_string()))
}
