//! # Sample Analytics
//!
//! Statistics over the interval datasets pulled out of benchmark captures.
//!
//! ## Architectural Principles
//!
//! - **Pure Logic:** This crate has no knowledge of files or logs. It depends only on
//!   `core-types`.
//! - **Stateless Calculation:** `AggregationEngine` and `OutlierFilter` hold no state
//!   between calls, so they can be shared freely across the sweep's worker threads.
//! - **Explicit Failure:** Empty datasets and zero divisors are reported as
//!   `AnalyticsError`s instead of producing NaN-like values.
//!
//! ## Public API
//!
//! - `AggregationEngine`: descriptive statistics, overhead datasets and ratios.
//! - `OutlierFilter`: mean +/- k*stdev filtering, single or multi-pass.
//! - `fit_linear`: least-squares trend of a metric across granularities.
//! - `AggregateStatistics`, `OverheadRatios`, `EarlyLateSummary`, `LinearFit`: results.

// Declare the modules that constitute this crate.
pub mod engine;
pub mod error;
pub mod outliers;
pub mod report;
pub mod trend;

// Re-export the key components to create a clean, public-facing API.
pub use engine::AggregationEngine;
pub use error::AnalyticsError;
pub use outliers::OutlierFilter;
pub use report::{AggregateStatistics, EarlyLateSummary, OverheadRatios};
pub use trend::{LinearFit, fit_linear};
