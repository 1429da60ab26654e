//! # Granularity Sweep
//!
//! Reduces the raw log of every granularity in a sweep to a `GranularityResult`:
//! regions are extracted, parsed into a dataset, outlier-filtered and summarized
//! together with the derived overhead. Granularities are independent and are reduced
//! in parallel. A failure in one is recorded in the outcome and never aborts the others.

use analytics::{AggregationEngine, AnalyticsError, OutlierFilter};
use core_types::{DataSet, GranularityValue, LabeledRegion, Marker};
use extractor::{RegionExtractor, SequenceBuilder, build_counts};
use rayon::prelude::*;
use uuid::Uuid;

pub mod bundle;
pub mod error;
pub mod generator;
pub mod settings;
pub mod source;

pub use bundle::{
    GranularityResult, ProcessingOverhead, ResultBundle, SweepFailure, SweepOutcome, TrendMetric,
};
pub use error::{FailureReason, SourceError, SweepError};
pub use generator::generate_granularities;
pub use settings::SweepSettings;
pub use source::LogSource;

/// Drives the reduction pipeline over every configured granularity.
pub struct SweepRunner {
    settings: SweepSettings,
    benchmark: Option<RegionExtractor>,
    intervals: RegionExtractor,
    processing: Option<RegionExtractor>,
    early_late: Option<(RegionExtractor, RegionExtractor)>,
    builder: SequenceBuilder,
    filter: OutlierFilter,
    engine: AggregationEngine,
}

impl SweepRunner {
    pub fn new(settings: SweepSettings) -> Result<Self, SweepError> {
        let benchmark = settings
            .benchmark
            .as_deref()
            .map(RegionExtractor::new)
            .transpose()?;
        let intervals = RegionExtractor::new(&settings.label)?;
        let processing = settings
            .processing_label
            .as_deref()
            .map(RegionExtractor::new)
            .transpose()?;
        let early_late = if settings.early_late {
            Some((
                RegionExtractor::new(Marker::Early.label())?,
                RegionExtractor::new(Marker::Late.label())?,
            ))
        } else {
            None
        };

        let builder = SequenceBuilder::new(settings.trim)
            .with_column(settings.column)
            .with_ceiling(settings.ceiling);
        let filter = OutlierFilter::new(settings.filter_multiplier);

        Ok(Self {
            settings,
            benchmark,
            intervals,
            processing,
            early_late,
            builder,
            filter,
            engine: AggregationEngine::new(),
        })
    }

    pub fn settings(&self) -> &SweepSettings {
        &self.settings
    }

    /// Reduces every granularity and returns the results keyed in ascending order,
    /// together with the granularities that failed.
    pub fn run<S: LogSource + ?Sized>(&self, source: &S) -> SweepOutcome {
        let job_id = Uuid::new_v4();
        let span = tracing::info_span!("sweep", %job_id);
        let _guard = span.enter();

        tracing::info!(
            granularities = self.settings.granularities.len(),
            label = %self.intervals.label(),
            threads = rayon::current_num_threads(),
            "Starting granularity sweep"
        );

        let results: Vec<(GranularityValue, Result<GranularityResult, FailureReason>)> = self
            .settings
            .granularities
            .par_iter()
            .map(|&granularity| {
                let _guard = tracing::info_span!("granularity", %job_id, %granularity).entered();
                (granularity, self.process(source, granularity))
            })
            .collect();

        let mut bundle = ResultBundle::default();
        let mut failures = Vec::new();
        for (granularity, result) in results {
            match result {
                Ok(result) => bundle.insert(result),
                Err(reason) => {
                    tracing::warn!(%granularity, %reason, "Granularity failed");
                    failures.push(SweepFailure {
                        granularity,
                        reason,
                    });
                }
            }
        }

        tracing::info!(
            succeeded = bundle.len(),
            failed = failures.len(),
            "Granularity sweep complete"
        );

        SweepOutcome {
            job_id,
            bundle,
            failures,
        }
    }

    fn process<S: LogSource + ?Sized>(
        &self,
        source: &S,
        granularity: GranularityValue,
    ) -> Result<GranularityResult, FailureReason> {
        let log = source.load(granularity)?;
        let scope = self.scope(log.as_str())?;

        let regions = self.regions(&self.intervals, &scope)?;
        let extracted = self.builder.build(&regions);
        let samples_before_filter = extracted.len();

        let (raw, filter_passes_applied) = self.apply_filter(extracted)?;
        let raw_stats = self.summarize(&raw, self.intervals.label())?;

        let overhead = self.engine.overhead(&raw, granularity);
        let overhead_stats = self.summarize(&overhead, "overhead")?;
        let ratios = self
            .engine
            .overhead_ratios(&raw_stats, &overhead_stats, granularity);

        let processing = self.processing_overhead(&scope, &raw_stats, granularity);
        let early_late = self.early_late(&scope);

        tracing::debug!(
            regions = regions.len(),
            samples_before_filter,
            samples = raw.len(),
            mean = %raw_stats.mean,
            median = %raw_stats.median,
            "Granularity reduced"
        );

        Ok(GranularityResult {
            granularity,
            regions: regions.len(),
            samples_before_filter,
            filter_passes_applied,
            raw,
            overhead,
            raw_stats,
            overhead_stats,
            ratios,
            processing,
            early_late,
        })
    }

    /// The text that inner regions are searched in: the joined benchmark bodies, or
    /// the whole log when no benchmark label is configured.
    fn scope(&self, text: &str) -> Result<String, FailureReason> {
        match &self.benchmark {
            Some(benchmark) => {
                let regions = self.regions(benchmark, text)?;
                Ok(regions.into_iter().map(|r| r.body).collect())
            }
            None => Ok(text.to_string()),
        }
    }

    fn regions(
        &self,
        extractor: &RegionExtractor,
        text: &str,
    ) -> Result<Vec<LabeledRegion>, FailureReason> {
        let regions = extractor.extract(text);
        if regions.is_empty() {
            return Err(FailureReason::MalformedRegion {
                label: extractor.label().to_string(),
            });
        }
        Ok(regions)
    }

    fn apply_filter(&self, data: DataSet) -> Result<(DataSet, u32), FailureReason> {
        let passes = self.settings.filter_passes;
        if passes == 0 {
            return Ok((data, 0));
        }
        if self.settings.preserve_constant_data && is_constant(&data) {
            tracing::debug!(samples = data.len(), "Constant dataset, skipping outlier filter");
            return Ok((data, 0));
        }
        let filtered = self
            .filter
            .filter_passes(&data, passes)
            .map_err(FailureReason::Analytics)?;
        Ok((filtered, passes))
    }

    fn summarize(
        &self,
        data: &DataSet,
        label: &str,
    ) -> Result<analytics::AggregateStatistics, FailureReason> {
        self.engine.summarize(data).map_err(|e| match e {
            AnalyticsError::EmptyDataset => FailureReason::EmptyDataset {
                label: label.to_string(),
            },
            other => FailureReason::Analytics(other),
        })
    }

    fn processing_overhead(
        &self,
        scope: &str,
        raw_stats: &analytics::AggregateStatistics,
        granularity: GranularityValue,
    ) -> Option<ProcessingOverhead> {
        let extractor = self.processing.as_ref()?;
        let regions = extractor.extract(scope);
        // Same trim, column and ceiling as the intervals.
        let data = self.builder.build(&regions);

        match self.engine.summarize(&data) {
            Ok(stats) => {
                let ratios = self.engine.overhead_ratios(raw_stats, &stats, granularity);
                Some(ProcessingOverhead {
                    data,
                    stats,
                    ratios,
                })
            }
            Err(e) => {
                tracing::warn!(
                    label = %extractor.label(),
                    error = %e,
                    "Processing overhead unavailable"
                );
                None
            }
        }
    }

    fn early_late(&self, scope: &str) -> Option<analytics::EarlyLateSummary> {
        let (early, late) = self.early_late.as_ref()?;
        let early = build_counts(&early.extract(scope));
        let late = build_counts(&late.extract(scope));

        self.engine
            .early_late(&early, &late)
            .map_err(|e| tracing::warn!(error = %e, "Early/late summary unavailable"))
            .ok()
    }
}

fn is_constant(data: &DataSet) -> bool {
    let mut values = data.iter();
    match values.next() {
        Some(first) => values.all(|v| v == first),
        None => false,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn constant_detection() {
        assert!(is_constant(&DataSet::from(vec![4, 4, 4])));
        assert!(is_constant(&DataSet::from(vec![4])));
        assert!(!is_constant(&DataSet::from(vec![4, 5])));
        assert!(!is_constant(&DataSet::default()));
    }

    #[test]
    fn empty_label_is_rejected() {
        let settings = SweepSettings::new("  ", [GranularityValue(200)]);
        assert!(matches!(
            SweepRunner::new(settings),
            Err(SweepError::Extract(extractor::ExtractError::EmptyLabel))
        ));
    }
}
