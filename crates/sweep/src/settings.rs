use crate::error::SweepError;
use crate::generator::generate_granularities;
use configuration::SweepConfig;
use core_types::GranularityValue;
use rust_decimal::Decimal;

/// Everything the runner needs to reduce one sweep, detached from file configuration.
#[derive(Debug, Clone, PartialEq)]
pub struct SweepSettings {
    pub granularities: Vec<GranularityValue>,
    pub benchmark: Option<String>,
    pub label: String,
    pub trim: usize,
    pub column: usize,
    pub ceiling: Option<i64>,
    pub filter_passes: u32,
    pub filter_multiplier: Decimal,
    pub preserve_constant_data: bool,
    pub processing_label: Option<String>,
    pub early_late: bool,
}

impl SweepSettings {
    /// Settings with no trimming, no filtering and no secondary datasets.
    pub fn new(label: impl Into<String>, granularities: impl IntoIterator<Item = GranularityValue>) -> Self {
        let mut granularities: Vec<_> = granularities.into_iter().collect();
        granularities.sort_unstable();
        granularities.dedup();

        Self {
            granularities,
            benchmark: None,
            label: label.into(),
            trim: 0,
            column: 0,
            ceiling: None,
            filter_passes: 0,
            filter_multiplier: Decimal::from(2),
            preserve_constant_data: true,
            processing_label: None,
            early_late: false,
        }
    }

    pub fn from_config(config: &SweepConfig) -> Result<Self, SweepError> {
        config.validate()?;
        let granularities = generate_granularities(&config.sweep.granularities)?;

        Ok(Self {
            granularities,
            benchmark: config.extraction.benchmark.clone(),
            label: config.extraction.label.clone(),
            trim: config.extraction.trim,
            column: config.extraction.column,
            ceiling: config.extraction.ceiling,
            filter_passes: config.filter.passes,
            filter_multiplier: config.filter.multiplier,
            preserve_constant_data: config.filter.preserve_constant_data,
            processing_label: config.analysis.processing_label.clone(),
            early_late: config.analysis.early_late,
        })
    }

    pub fn with_benchmark(mut self, benchmark: impl Into<String>) -> Self {
        self.benchmark = Some(benchmark.into());
        self
    }

    pub fn with_trim(mut self, trim: usize) -> Self {
        self.trim = trim;
        self
    }

    pub fn with_column(mut self, column: usize) -> Self {
        self.column = column;
        self
    }

    pub fn with_ceiling(mut self, ceiling: i64) -> Self {
        self.ceiling = Some(ceiling);
        self
    }

    pub fn with_filter(mut self, passes: u32, multiplier: Decimal) -> Self {
        self.filter_passes = passes;
        self.filter_multiplier = multiplier;
        self
    }

    pub fn with_preserve_constant_data(mut self, preserve: bool) -> Self {
        self.preserve_constant_data = preserve;
        self
    }

    pub fn with_processing_label(mut self, label: impl Into<String>) -> Self {
        self.processing_label = Some(label.into());
        self
    }

    pub fn with_early_late(mut self, enabled: bool) -> Self {
        self.early_late = enabled;
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    #[test]
    fn from_config_expands_range_and_copies_sections() {
        let config = configuration::parse_config(
            r#"
            [sweep]
            granularities = { start = 200, end = 600, step = 200 }

            [extraction]
            benchmark = "fiberbench4"
            trim = 2

            [filter]
            passes = 1
            multiplier = 3
            "#,
        )
        .unwrap();

        let settings = SweepSettings::from_config(&config).unwrap();
        assert_eq!(
            settings.granularities,
            vec![GranularityValue(200), GranularityValue(400), GranularityValue(600)]
        );
        assert_eq!(settings.benchmark.as_deref(), Some("fiberbench4"));
        assert_eq!(settings.label, "print");
        assert_eq!(settings.trim, 2);
        assert_eq!(settings.filter_passes, 1);
        assert_eq!(settings.filter_multiplier, dec!(3));
    }

    #[test]
    fn new_sorts_granularities() {
        let settings = SweepSettings::new(
            "print",
            [GranularityValue(1000), GranularityValue(200), GranularityValue(1000)],
        );
        assert_eq!(settings.granularities, vec![GranularityValue(200), GranularityValue(1000)]);
    }
}
