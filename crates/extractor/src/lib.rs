//! # Log Region Extraction
//!
//! Turns raw console captures into numeric samples.
//!
//! - `RegionExtractor` finds every `<LABEL>START ... <LABEL>END` region of one label.
//!   Nested regions are found by running a second extractor over an outer region's body.
//! - `SequenceBuilder` parses region bodies line by line into a `DataSet`, skipping noise
//!   and trimming unreliable samples at region boundaries.
//!
//! Malformed input is never an error here: unmatched markers and unparsable lines are
//! expected noise in captured data and are dropped.

pub mod error;
pub mod region;
pub mod sequence;

pub use error::ExtractError;
pub use region::{RegionExtractor, extract, extract_nested};
pub use sequence::{SequenceBuilder, build, build_counts};
