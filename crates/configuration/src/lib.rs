use crate::error::ConfigError;
use std::path::Path;

// Declare the modules that make up this crate.
pub mod error;
pub mod granularity;
pub mod settings;

// Re-export the core types to provide a clean public API.
pub use granularity::GranularityRange;
pub use settings::{Analysis, Extraction, Filter, Input, Logging, Output, SweepConfig, SweepSection};

/// Prefix of environment variables that override file values, e.g.
/// `HOOKSTAT_FILTER__PASSES=2`.
pub const ENV_PREFIX: &str = "HOOKSTAT";

/// Loads the sweep configuration from a TOML file (usually `hookstat.toml`).
///
/// Environment variables prefixed with `HOOKSTAT_` take precedence over the file.
/// The result is validated before it is returned.
pub fn load_config(path: impl AsRef<Path>) -> Result<SweepConfig, ConfigError> {
    let builder = config::Config::builder()
        .add_source(config::File::from(path.as_ref()))
        .add_source(
            config::Environment::with_prefix(ENV_PREFIX)
                .prefix_separator("_")
                .separator("__")
                .try_parsing(true),
        )
        .build()?;

    finish(builder)
}

/// Parses a configuration held in memory. No environment overrides are applied.
pub fn parse_config(toml: &str) -> Result<SweepConfig, ConfigError> {
    let builder = config::Config::builder()
        .add_source(config::File::from_str(toml, config::FileFormat::Toml))
        .build()?;

    finish(builder)
}

fn finish(builder: config::Config) -> Result<SweepConfig, ConfigError> {
    // Attempt to deserialize the entire configuration into our `SweepConfig` struct
    let config = builder.try_deserialize::<SweepConfig>()?;
    config.validate()?;

    tracing::debug!(?config, "Loaded sweep configuration");
    Ok(config)
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    #[test]
    fn minimal_config_uses_defaults() {
        let config = parse_config(
            r#"
            [sweep]
            granularities = [200, 400, 1000]
            "#,
        )
        .unwrap();

        assert_eq!(
            config.sweep.granularities,
            GranularityRange::Discrete(vec![200, 400, 1000])
        );
        assert_eq!(config.extraction.label, "print");
        assert_eq!(config.extraction.trim, 0);
        assert_eq!(config.filter.passes, 0);
        assert_eq!(config.filter.multiplier, dec!(2));
        assert!(config.filter.preserve_constant_data);
        assert!(config.output.json_path.is_none());
    }

    #[test]
    fn full_config_round_trips_every_section() {
        let config = parse_config(
            r#"
            [sweep]
            granularities = { start = 1000, end = 16000, factor = 2 }

            [extraction]
            benchmark = "fiberbench10"
            label = "print"
            trim = 2
            ceiling = 30000

            [filter]
            passes = 2
            multiplier = 3

            [analysis]
            processing_label = "overhead"
            early_late = true

            [input]
            data_dir = "dataFPYield"
            file_name = "fiberbench10-raw"
            "#,
        )
        .unwrap();

        assert_eq!(
            config.sweep.granularities,
            GranularityRange::Geometric { start: 1000, end: 16000, factor: 2 }
        );
        assert_eq!(config.extraction.benchmark.as_deref(), Some("fiberbench10"));
        assert_eq!(config.extraction.ceiling, Some(30000));
        assert_eq!(config.filter.multiplier, dec!(3));
        assert_eq!(config.analysis.processing_label.as_deref(), Some("overhead"));
        assert!(config.analysis.early_late);
        assert_eq!(config.input.data_dir, std::path::PathBuf::from("dataFPYield"));
    }

    #[test]
    fn linear_range_is_recognised() {
        let config = parse_config(
            r#"
            [sweep]
            granularities = { start = 200, end = 1000, step = 200 }
            "#,
        )
        .unwrap();
        assert_eq!(
            config.sweep.granularities,
            GranularityRange::Linear { start: 200, end: 1000, step: 200 }
        );
    }

    #[test]
    fn rejects_three_filter_passes() {
        let err = parse_config(
            r#"
            [sweep]
            granularities = [200]

            [filter]
            passes = 3
            "#,
        )
        .unwrap_err();
        assert!(matches!(err, ConfigError::ValidationError(_)));
    }

    #[test]
    fn rejects_non_positive_multiplier() {
        let err = parse_config(
            r#"
            [sweep]
            granularities = [200]

            [filter]
            multiplier = 0
            "#,
        )
        .unwrap_err();
        assert!(matches!(err, ConfigError::ValidationError(_)));
    }

    #[test]
    fn rejects_zero_step() {
        let err = parse_config(
            r#"
            [sweep]
            granularities = { start = 200, end = 1000, step = 0 }
            "#,
        )
        .unwrap_err();
        assert!(matches!(err, ConfigError::ValidationError(_)));
    }

    #[test]
    fn environment_overrides_file_values() {
        let path = std::env::temp_dir().join(format!("hookstat-env-{}.toml", std::process::id()));
        std::fs::write(&path, "[sweep]\ngranularities = [200]\n\n[filter]\npasses = 0\n").unwrap();

        // SAFETY: no other test in this crate reads or writes HOOKSTAT_* variables.
        unsafe { std::env::set_var("HOOKSTAT_FILTER__PASSES", "2") };
        let config = load_config(&path);
        unsafe { std::env::remove_var("HOOKSTAT_FILTER__PASSES") };
        std::fs::remove_file(&path).unwrap();

        let config = config.unwrap();
        assert_eq!(config.filter.passes, 2);
        assert_eq!(config.sweep.granularities, GranularityRange::Discrete(vec![200]));
    }

    #[test]
    fn missing_sweep_section_is_a_load_error() {
        let err = parse_config("[filter]\npasses = 1\n").unwrap_err();
        assert!(matches!(err, ConfigError::LoadError(_)));
    }
}
