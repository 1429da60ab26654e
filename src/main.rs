use anyhow::{Context, Result};
use comfy_table::presets::UTF8_FULL;
use comfy_table::{Cell, CellAlignment, ContentArrangement, Table};
use configuration::{Logging, SweepConfig, load_config};
use core_types::{GranularityValue, RawLog};
use rust_decimal::Decimal;
use std::path::PathBuf;
use sweep::{LogSource, SourceError, SweepOutcome, SweepRunner, SweepSettings, TrendMetric};
use tracing_appender::non_blocking::WorkerGuard;
use tracing_subscriber::{EnvFilter, FmtSubscriber};

/// Configuration file read from the working directory unless `HOOKSTAT_CONFIG` points elsewhere.
const DEFAULT_CONFIG: &str = "hookstat.toml";

/// The main entry point for the hookstat sweep reducer.
fn main() -> Result<()> {
    let config_path =
        std::env::var("HOOKSTAT_CONFIG").unwrap_or_else(|_| DEFAULT_CONFIG.to_string());
    let config = load_config(&config_path)
        .with_context(|| format!("failed to load configuration from '{}'", config_path))?;

    // Keep the guard alive so buffered file output is flushed on exit.
    let _log_guard = init_tracing(&config.logging)?;

    let settings = SweepSettings::from_config(&config)?;
    let runner = SweepRunner::new(settings)?;
    let source = DirectorySource::from_config(&config);

    let outcome = runner.run(&source);

    print_summary(&outcome);
    print_failures(&outcome);
    print_trend(&outcome);

    if let Some(path) = &config.output.json_path {
        let json = serde_json::to_string_pretty(&outcome)?;
        std::fs::write(path, json)
            .with_context(|| format!("failed to write results to '{}'", path.display()))?;
        println!("Results written to {}", path.display());
    }

    if outcome.all_failed() {
        anyhow::bail!("no granularity produced a result");
    }
    Ok(())
}

// ==============================================================================
// Logging
// ==============================================================================

/// Installs the global subscriber. `RUST_LOG` overrides the configured level.
fn init_tracing(logging: &Logging) -> Result<Option<WorkerGuard>> {
    let filter = EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new(&logging.level))
        .context("invalid log level")?;

    match &logging.directory {
        Some(directory) => {
            let appender = tracing_appender::rolling::daily(directory, "hookstat.log");
            let (writer, guard) = tracing_appender::non_blocking(appender);
            let subscriber = FmtSubscriber::builder()
                .with_env_filter(filter)
                .with_writer(writer)
                .with_ansi(false)
                .finish();
            tracing::subscriber::set_global_default(subscriber)?;
            Ok(Some(guard))
        }
        None => {
            let subscriber = FmtSubscriber::builder().with_env_filter(filter).finish();
            tracing::subscriber::set_global_default(subscriber)?;
            Ok(None)
        }
    }
}

// ==============================================================================
// Log Source
// ==============================================================================

/// Reads `<data_dir>/<granularity>/<file_name>` for each granularity.
struct DirectorySource {
    data_dir: PathBuf,
    file_name: String,
}

impl DirectorySource {
    fn from_config(config: &SweepConfig) -> Self {
        Self {
            data_dir: config.input.data_dir.clone(),
            file_name: config.input.file_name.clone(),
        }
    }

    fn path_for(&self, granularity: GranularityValue) -> PathBuf {
        self.data_dir
            .join(granularity.to_string())
            .join(&self.file_name)
    }
}

impl LogSource for DirectorySource {
    fn load(&self, granularity: GranularityValue) -> Result<RawLog, SourceError> {
        let path = self.path_for(granularity);
        match std::fs::read_to_string(&path) {
            Ok(text) => Ok(RawLog::from(text)),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                Err(SourceError::NotFound(granularity.cycles()))
            }
            Err(e) => Err(SourceError::Unreadable {
                path: path.display().to_string(),
                reason: e.to_string(),
            }),
        }
    }
}

// ==============================================================================
// Reporting
// ==============================================================================

fn print_summary(outcome: &SweepOutcome) {
    let mut table = Table::new();
    table
        .load_preset(UTF8_FULL)
        .set_content_arrangement(ContentArrangement::Dynamic)
        .set_header(vec![
            "Granularity",
            "Samples",
            "Mean",
            "Median",
            "Stdev",
            "Min",
            "Max",
            "Overhead Mean",
            "Overhead Median",
            "% of Target (mean)",
            "% of Observed (mean)",
        ]);

    for result in outcome.bundle.iter() {
        let raw = &result.raw_stats;
        let overhead = &result.overhead_stats;
        table.add_row(vec![
            Cell::new(result.granularity).set_alignment(CellAlignment::Right),
            Cell::new(format!("{}/{}", raw.count, result.samples_before_filter))
                .set_alignment(CellAlignment::Right),
            Cell::new(round(raw.mean)).set_alignment(CellAlignment::Right),
            Cell::new(round(raw.median)).set_alignment(CellAlignment::Right),
            Cell::new(round(raw.stdev)).set_alignment(CellAlignment::Right),
            Cell::new(raw.min).set_alignment(CellAlignment::Right),
            Cell::new(raw.max).set_alignment(CellAlignment::Right),
            Cell::new(round(overhead.mean)).set_alignment(CellAlignment::Right),
            Cell::new(round(overhead.median)).set_alignment(CellAlignment::Right),
            Cell::new(optional(result.ratios.pct_of_target_mean)).set_alignment(CellAlignment::Right),
            Cell::new(optional(result.ratios.pct_of_observed_mean))
                .set_alignment(CellAlignment::Right),
        ]);
    }

    println!("Sweep {}", outcome.job_id);
    println!("{table}");

    for result in outcome.bundle.iter() {
        if let Some(processing) = &result.processing {
            println!(
                "  {:>8}: processing overhead mean {} median {} ({}% of observed mean)",
                result.granularity,
                round(processing.stats.mean),
                round(processing.stats.median),
                optional(processing.ratios.pct_of_observed_mean),
            );
        }
        if let Some(early_late) = &result.early_late {
            println!(
                "  {:>8}: early {} late {} ratio {}",
                result.granularity,
                early_late.total_early,
                early_late.total_late,
                round(early_late.ratio),
            );
        }
    }
}

fn print_failures(outcome: &SweepOutcome) {
    if outcome.is_complete() {
        return;
    }
    println!("{} granularities failed:", outcome.failures.len());
    for failure in &outcome.failures {
        println!("  {:>8}: {}", failure.granularity, failure.reason);
    }
}

fn print_trend(outcome: &SweepOutcome) {
    for (name, metric) in [
        ("median interval", TrendMetric::RawMedian),
        ("median overhead", TrendMetric::OverheadMedian),
    ] {
        match outcome.trend(metric) {
            Ok(fit) => println!(
                "Trend of {}: {} * granularity + {}",
                name,
                fit.slope.round_dp(6),
                round(fit.intercept)
            ),
            Err(e) => tracing::debug!(error = %e, metric = name, "No trend available"),
        }
    }
}

fn round(value: Decimal) -> Decimal {
    value.round_dp(3)
}

fn optional(value: Option<Decimal>) -> String {
    value.map_or_else(|| "n/a".to_string(), |v| round(v).to_string())
}
