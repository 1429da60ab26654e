use core_types::{DataSet, LabeledRegion};

/// Converts region bodies into a single `DataSet`.
///
/// Each body is parsed on its own: one sample per line, taken from the
/// whitespace-delimited token at `column` and stored as its absolute value. Lines
/// that do not yield an integer are skipped. `trim` samples are then dropped from
/// both ends of that body's samples before all bodies are concatenated in order.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SequenceBuilder {
    trim: usize,
    column: usize,
    ceiling: Option<i64>,
}

impl SequenceBuilder {
    pub fn new(trim: usize) -> Self {
        Self {
            trim,
            ..Self::default()
        }
    }

    /// Reads samples from the given column of multi-column lines.
    pub fn with_column(mut self, column: usize) -> Self {
        self.column = column;
        self
    }

    /// Discards samples at or above `ceiling` after trimming.
    pub fn with_ceiling(mut self, ceiling: Option<i64>) -> Self {
        self.ceiling = ceiling;
        self
    }

    pub fn build(&self, regions: &[LabeledRegion]) -> DataSet {
        let mut data = DataSet::default();
        for region in regions {
            let samples = self.parse_body(&region.body);
            data.extend(trim_samples(samples, self.trim));
        }

        match self.ceiling {
            Some(ceiling) => {
                let before = data.len();
                let capped: DataSet = data.into_inner().into_iter().filter(|&v| v < ceiling).collect();
                if capped.len() < before {
                    tracing::debug!(
                        ceiling,
                        discarded = before - capped.len(),
                        "Discarded samples above ceiling"
                    );
                }
                capped
            }
            None => data,
        }
    }

    fn parse_body(&self, body: &str) -> Vec<i64> {
        body.lines()
            .filter_map(|line| parse_token(line, self.column))
            .filter_map(i64::checked_abs)
            .collect()
    }
}

/// Builds a dataset from `regions`, dropping `trim` samples from both ends of each region.
pub fn build(regions: &[LabeledRegion], trim: usize) -> DataSet {
    SequenceBuilder::new(trim).build(regions)
}

/// Signed, untrimmed integers from count regions such as `EARLY`/`LATE`.
pub fn build_counts(regions: &[LabeledRegion]) -> DataSet {
    regions
        .iter()
        .flat_map(|region| region.body.lines())
        .filter_map(|line| parse_token(line, 0))
        .collect()
}

fn parse_token(line: &str, column: usize) -> Option<i64> {
    line.split_whitespace().nth(column)?.parse::<i64>().ok()
}

fn trim_samples(samples: Vec<i64>, trim: usize) -> Vec<i64> {
    if samples.len() < trim * 2 {
        return Vec::new();
    }
    samples[trim..samples.len() - trim].to_vec()
}
