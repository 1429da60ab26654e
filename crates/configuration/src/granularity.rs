use crate::error::ConfigError;
use serde::Deserialize;

/// Represents the set of granularities (in cycles) to be swept.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(untagged)]
pub enum GranularityRange {
    /// An explicit list, e.g. `[200, 400, 600, 800, 1000]`.
    Discrete(Vec<u64>),
    /// `start`, `start + step`, ... up to and including `end`.
    Linear { start: u64, end: u64, step: u64 },
    /// `start`, `start * factor`, ... up to and including `end`.
    Geometric { start: u64, end: u64, factor: u64 },
}

impl GranularityRange {
    pub(crate) fn validate(&self) -> Result<(), ConfigError> {
        match self {
            GranularityRange::Discrete(values) => {
                if values.is_empty() {
                    return Err(ConfigError::ValidationError(
                        "sweep.granularities must list at least one value".to_string(),
                    ));
                }
            }
            GranularityRange::Linear { start, end, step } => {
                if *step == 0 {
                    return Err(ConfigError::ValidationError(
                        "Step for sweep.granularities must be positive.".to_string(),
                    ));
                }
                if start > end {
                    return Err(ConfigError::ValidationError(format!(
                        "sweep.granularities start {} is past end {}",
                        start, end
                    )));
                }
            }
            GranularityRange::Geometric { start, end, factor } => {
                if *factor < 2 || *start == 0 {
                    return Err(ConfigError::ValidationError(
                        "Geometric sweep.granularities needs start > 0 and factor >= 2.".to_string(),
                    ));
                }
                if start > end {
                    return Err(ConfigError::ValidationError(format!(
                        "sweep.granularities start {} is past end {}",
                        start, end
                    )));
                }
            }
        }
        Ok(())
    }
}
