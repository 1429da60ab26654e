use crate::error::SourceError;
use core_types::{GranularityValue, RawLog};
use std::collections::{BTreeMap, HashMap};

/// Supplies the raw log captured for one granularity.
///
/// Implementations must be shareable across threads; the sweep loads logs for
/// several granularities concurrently.
pub trait LogSource: Send + Sync {
    fn load(&self, granularity: GranularityValue) -> Result<RawLog, SourceError>;
}

impl LogSource for BTreeMap<GranularityValue, RawLog> {
    fn load(&self, granularity: GranularityValue) -> Result<RawLog, SourceError> {
        self.get(&granularity)
            .cloned()
            .ok_or(SourceError::NotFound(granularity.cycles()))
    }
}

impl LogSource for HashMap<GranularityValue, RawLog> {
    fn load(&self, granularity: GranularityValue) -> Result<RawLog, SourceError> {
        self.get(&granularity)
            .cloned()
            .ok_or(SourceError::NotFound(granularity.cycles()))
    }
}
