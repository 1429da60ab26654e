use analytics::AnalyticsError;
use extractor::ExtractError;
use serde::Serialize;
use thiserror::Error;

/// Errors that prevent a sweep from being set up at all.
#[derive(Error, Debug)]
pub enum SweepError {
    #[error("Configuration error: {0}")]
    Config(#[from] configuration::error::ConfigError),

    #[error("Invalid region label: {0}")]
    Extract(#[from] ExtractError),

    #[error("Granularity generation failed: {0}")]
    ParameterGeneration(String),
}

/// A raw log could not be obtained for one granularity.
#[derive(Error, Debug, Clone, PartialEq, Eq, Serialize)]
pub enum SourceError {
    #[error("No raw log for granularity {0}")]
    NotFound(u64),

    #[error("Failed to read '{path}': {reason}")]
    Unreadable { path: String, reason: String },
}

/// Why one granularity of a sweep produced no result. Siblings are unaffected.
#[derive(Error, Debug, Clone, PartialEq, Eq, Serialize)]
pub enum FailureReason {
    #[error("Source unavailable: {0}")]
    SourceUnavailable(#[from] SourceError),

    #[error("No complete '{label}' region found")]
    MalformedRegion { label: String },

    #[error("Dataset '{label}' is empty")]
    EmptyDataset { label: String },

    #[error("Analytics error: {0}")]
    Analytics(AnalyticsError),
}
