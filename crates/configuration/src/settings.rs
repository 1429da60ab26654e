use crate::error::ConfigError;
use crate::granularity::GranularityRange;
use rust_decimal::Decimal;
use serde::Deserialize;
use std::path::PathBuf;

/// The root configuration structure for a granularity sweep.
#[derive(Debug, Clone, Deserialize)]
pub struct SweepConfig {
    pub sweep: SweepSection,
    #[serde(default)]
    pub extraction: Extraction,
    #[serde(default)]
    pub filter: Filter,
    #[serde(default)]
    pub analysis: Analysis,
    #[serde(default)]
    pub input: Input,
    #[serde(default)]
    pub logging: Logging,
    #[serde(default)]
    pub output: Output,
}

/// Which granularities the sweep covers.
#[derive(Debug, Clone, Deserialize)]
pub struct SweepSection {
    pub granularities: GranularityRange,
}

/// How regions are located and turned into samples.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct Extraction {
    /// Outer benchmark region (e.g. `fiberbench10`). When set, inner regions are
    /// only searched inside this benchmark's output.
    pub benchmark: Option<String>,
    /// The region holding the observed intervals.
    pub label: String,
    /// Samples dropped from the front and the back of every region.
    pub trim: usize,
    /// Whitespace-delimited column holding the sample on each line.
    pub column: usize,
    /// Samples at or above this value are discarded as counter glitches.
    pub ceiling: Option<i64>,
}

/// Outlier removal applied to the interval dataset.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct Filter {
    /// Number of mean +/- k*stdev passes (0, 1 or 2).
    pub passes: u32,
    /// The `k` in mean +/- k*stdev.
    pub multiplier: Decimal,
    /// Skip filtering for zero-variance data instead of filtering it to nothing.
    pub preserve_constant_data: bool,
}

/// Optional secondary datasets.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct Analysis {
    /// Region holding the processing overhead of each hook call (usually `overhead`).
    pub processing_label: Option<String>,
    /// Summarize the `EARLY`/`LATE` count regions.
    pub early_late: bool,
}

/// Where the driver binary finds one raw log per granularity:
/// `<data_dir>/<granularity>/<file_name>`.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct Input {
    pub data_dir: PathBuf,
    pub file_name: String,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct Logging {
    /// Default filter directive when `RUST_LOG` is unset.
    pub level: String,
    /// If set, logs are also written to a daily rolling file in this directory.
    pub directory: Option<PathBuf>,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct Output {
    /// If set, the whole sweep outcome is written here as JSON.
    pub json_path: Option<PathBuf>,
}

// --- Default Implementations ---
// These mirror the defaults the capture scripts were run with.

impl Default for Extraction {
    fn default() -> Self {
        Self {
            benchmark: None,
            label: "print".to_string(),
            trim: 0,
            column: 0,
            ceiling: None,
        }
    }
}

impl Default for Filter {
    fn default() -> Self {
        Self {
            passes: 0,
            multiplier: Decimal::from(2),
            preserve_constant_data: true,
        }
    }
}

impl Default for Analysis {
    fn default() -> Self {
        Self {
            processing_label: None,
            early_late: false,
        }
    }
}

impl Default for Input {
    fn default() -> Self {
        Self {
            data_dir: PathBuf::from("data"),
            file_name: "fiberbench10-raw".to_string(),
        }
    }
}

impl Default for Logging {
    fn default() -> Self {
        Self {
            level: "info".to_string(),
            directory: None,
        }
    }
}

impl SweepConfig {
    /// Checks the invariants serde cannot express.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.extraction.label.trim().is_empty() {
            return Err(ConfigError::ValidationError(
                "extraction.label must not be empty".to_string(),
            ));
        }
        if let Some(benchmark) = &self.extraction.benchmark {
            if benchmark.trim().is_empty() {
                return Err(ConfigError::ValidationError(
                    "extraction.benchmark must not be empty when set".to_string(),
                ));
            }
        }
        if self.filter.passes > 2 {
            return Err(ConfigError::ValidationError(format!(
                "filter.passes must be 0, 1 or 2, got {}",
                self.filter.passes
            )));
        }
        if self.filter.multiplier <= Decimal::ZERO {
            return Err(ConfigError::ValidationError(format!(
                "filter.multiplier must be positive, got {}",
                self.filter.multiplier
            )));
        }
        self.sweep.granularities.validate()?;
        Ok(())
    }
}
