//! Outlier removal by distance from the mean.
//!
//! One pass keeps exactly the samples with `|x - mean| < k * stdev`, where mean and
//! (population) stdev are computed over that pass's input. Passes are chained by
//! re-running the same filter on the survivors, so every pass sees fresh moments.
//!
//! Data with zero variance has no sample strictly inside `0 * k`, and is filtered to
//! nothing. Callers that want to keep constant data must check for it first.

use crate::engine::moments;
use crate::error::AnalyticsError;
use core_types::DataSet;
use rust_decimal::prelude::*;
use rust_decimal::Decimal;

/// A mean +/- `multiplier` * stdev filter.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct OutlierFilter {
    multiplier: Decimal,
}

impl OutlierFilter {
    pub fn new(multiplier: Decimal) -> Self {
        Self { multiplier }
    }

    pub fn multiplier(&self) -> Decimal {
        self.multiplier
    }

    /// A single filtering pass. Empty input yields empty output.
    ///
    /// # Returns
    ///
    /// `AnalyticsError::Calculation` if the pass's moments overflow; the data is not
    /// returned unfiltered in that case.
    pub fn filter(&self, data: &DataSet) -> Result<DataSet, AnalyticsError> {
        if data.is_empty() {
            return Ok(DataSet::default());
        }

        let values = data.to_decimals();
        let (mean, variance) = moments(&values)?;
        let stdev = variance
            .sqrt()
            .ok_or_else(|| AnalyticsError::Calculation("square root of variance".to_string()))?;
        let threshold = self
            .multiplier
            .checked_mul(stdev)
            .ok_or_else(|| AnalyticsError::Calculation("outlier threshold overflowed".to_string()))?;

        let kept: DataSet = data
            .iter()
            .zip(values.iter())
            .filter(|(_, x)| (**x - mean).abs() < threshold)
            .map(|(&raw, _)| raw)
            .collect();

        tracing::debug!(
            %mean,
            %stdev,
            %threshold,
            before = data.len(),
            after = kept.len(),
            "Outlier pass"
        );
        Ok(kept)
    }

    /// `passes` chained applications of [`OutlierFilter::filter`]. Stops at the first failing pass.
    pub fn filter_passes(&self, data: &DataSet, passes: u32) -> Result<DataSet, AnalyticsError> {
        let mut current = data.clone();
        for _ in 0..passes {
            current = self.filter(&current)?;
        }
        Ok(current)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::engine::AggregationEngine;
    use rust_decimal_macros::dec;

    fn noisy() -> DataSet {
        DataSet::from(vec![100, 102, 98, 101, 99, 100, 150, 100, 103, 97, 300])
    }

    #[test]
    fn empty_input_is_empty_output() {
        assert!(OutlierFilter::new(dec!(2)).filter(&DataSet::default()).unwrap().is_empty());
    }

    #[test]
    fn removes_far_sample_using_same_pass_moments() {
        let data = DataSet::from(vec![1, 1, 1, 1, 100]);
        let stats = AggregationEngine::new().summarize(&data).unwrap();
        // mean 20.8, stdev 39.6: |100 - 20.8| = 79.2 is not below 1 * 39.6
        assert_eq!(stats.mean, dec!(20.8));
        assert!((stats.stdev - dec!(39.6)).abs() < dec!(0.000001));

        let filtered = OutlierFilter::new(dec!(1)).filter(&data).unwrap();
        assert_eq!(filtered.values(), &[1, 1, 1, 1]);
    }

    #[test]
    fn zero_variance_filters_to_empty() {
        let data = DataSet::from(vec![7, 7, 7]);
        assert!(OutlierFilter::new(dec!(5)).filter(&data).unwrap().is_empty());
    }

    #[test]
    fn second_pass_recomputes_moments() {
        let filter = OutlierFilter::new(dec!(2));
        let one = filter.filter(&noisy()).unwrap();
        assert_eq!(one.values(), &[100, 102, 98, 101, 99, 100, 150, 100, 103, 97]);

        let two = filter.filter_passes(&noisy(), 2).unwrap();
        assert_eq!(two.values(), &[100, 102, 98, 101, 99, 100, 100, 103, 97]);
        assert!(two.iter().all(|v| one.values().contains(v)));
    }

    #[test]
    fn fixed_point_is_idempotent() {
        let filter = OutlierFilter::new(dec!(2));
        let settled = filter.filter_passes(&noisy(), 2).unwrap();
        assert_eq!(filter.filter(&settled).unwrap(), settled);
    }

    #[test]
    fn two_passes_subset_of_one_pass() {
        let filter = OutlierFilter::new(dec!(1));
        let data = DataSet::from(vec![1, 1, 1, 1, 100]);
        let one = filter.filter_passes(&data, 1).unwrap();
        let two = filter.filter_passes(&data, 2).unwrap();
        assert_eq!(one.values(), &[1, 1, 1, 1]);
        assert!(two.is_empty());
    }

    #[test]
    fn zero_passes_is_identity() {
        assert_eq!(OutlierFilter::new(dec!(2)).filter_passes(&noisy(), 0).unwrap(), noisy());
    }

    #[test]
    fn overflowing_moments_are_an_error() {
        let data = DataSet::from(vec![i64::MAX, i64::MAX, 0]);
        let err = OutlierFilter::new(dec!(2)).filter(&data).unwrap_err();
        assert!(matches!(err, AnalyticsError::Calculation(_)));
    }
}
