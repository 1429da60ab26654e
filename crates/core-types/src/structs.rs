use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::sync::Arc;

/// The captured console output of one benchmark run.
///
/// The text is immutable and reference counted, so a log can be handed to
/// several worker threads of a sweep without copying.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RawLog(Arc<str>);

impl RawLog {
    pub fn new(text: impl Into<Arc<str>>) -> Self {
        Self(text.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl From<String> for RawLog {
    fn from(text: String) -> Self {
        Self::new(text)
    }
}

impl From<&str> for RawLog {
    fn from(text: &str) -> Self {
        Self::new(text)
    }
}

/// One occurrence of a `<LABEL>START ... <LABEL>END` region.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct LabeledRegion {
    /// The upper-cased label the region was matched with.
    pub label: String,
    /// Everything strictly between the two markers.
    pub body: String,
}

/// The configured target sampling interval of a run, in clock cycles.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize,
)]
#[serde(transparent)]
pub struct GranularityValue(pub u64);

impl GranularityValue {
    pub fn cycles(&self) -> u64 {
        self.0
    }

    pub fn as_decimal(&self) -> Decimal {
        Decimal::from(self.0)
    }
}

impl From<u64> for GranularityValue {
    fn from(cycles: u64) -> Self {
        Self(cycles)
    }
}

impl fmt::Display for GranularityValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// An ordered sequence of samples in capture order.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct DataSet(Vec<i64>);

impl DataSet {
    pub fn new(values: Vec<i64>) -> Self {
        Self(values)
    }

    pub fn values(&self) -> &[i64] {
        &self.0
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &i64> {
        self.0.iter()
    }

    pub fn into_inner(self) -> Vec<i64> {
        self.0
    }

    /// Lossless conversion of every sample for decimal arithmetic.
    pub fn to_decimals(&self) -> Vec<Decimal> {
        self.0.iter().map(|&v| Decimal::from(v)).collect()
    }
}

impl From<Vec<i64>> for DataSet {
    fn from(values: Vec<i64>) -> Self {
        Self(values)
    }
}

impl FromIterator<i64> for DataSet {
    fn from_iter<I: IntoIterator<Item = i64>>(iter: I) -> Self {
        Self(iter.into_iter().collect())
    }
}

impl Extend<i64> for DataSet {
    fn extend<I: IntoIterator<Item = i64>>(&mut self, iter: I) {
        self.0.extend(iter)
    }
}

impl<'a> IntoIterator for &'a DataSet {
    type Item = &'a i64;
    type IntoIter = std::slice::Iter<'a, i64>;

    fn into_iter(self) -> Self::IntoIter {
        self.0.iter()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    #[test]
    fn raw_log_clones_share_text() {
        let log = RawLog::from("PRINTSTART\n1\nPRINTEND");
        let copy = log.clone();
        assert_eq!(log.as_str(), copy.as_str());
    }

    #[test]
    fn granularities_order_numerically() {
        let mut grans = vec![GranularityValue(16000), GranularityValue(200), GranularityValue(1000)];
        grans.sort();
        assert_eq!(grans, vec![GranularityValue(200), GranularityValue(1000), GranularityValue(16000)]);
        assert_eq!(GranularityValue(400).as_decimal(), dec!(400));
    }

    #[test]
    fn dataset_preserves_order() {
        let mut data: DataSet = vec![3, 1, 2].into_iter().collect();
        data.extend([5, 4]);
        assert_eq!(data.values(), &[3, 1, 2, 5, 4]);
        assert_eq!(data.to_decimals()[3], dec!(5));
    }
}
