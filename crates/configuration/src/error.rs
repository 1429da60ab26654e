use thiserror::Error;

/// Errors raised while reading `hookstat.toml` and its environment overrides.
#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("Failed to load sweep configuration: {0}")]
    LoadError(#[from] config::ConfigError),

    /// The file parsed, but a value is out of range (e.g. `filter.passes = 3`).
    #[error("Invalid sweep configuration: {0}")]
    ValidationError(String),
}
