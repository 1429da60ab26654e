use crate::error::CoreError;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// The fixed vocabulary of inner region markers emitted by the benchmark's `print_data()`.
///
/// Benchmark-name regions (e.g. `FIBERBENCH10START`) are free-form and are not listed here.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Marker {
    /// Observed intervals between two hook calls.
    Print,
    /// Processing overhead spent inside the hook machinery.
    Overhead,
    /// Count of calls that fired before their target.
    Early,
    /// Count of calls that fired on time or late.
    Late,
}

impl Marker {
    /// The label as it appears in the log, e.g. `PRINT` for `PRINTSTART`/`PRINTEND`.
    pub fn label(&self) -> &'static str {
        match self {
            Marker::Print => "PRINT",
            Marker::Overhead => "OVERHEAD",
            Marker::Early => "EARLY",
            Marker::Late => "LATE",
        }
    }
}

impl fmt::Display for Marker {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

impl FromStr for Marker {
    type Err = CoreError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_uppercase().as_str() {
            "PRINT" => Ok(Marker::Print),
            "OVERHEAD" => Ok(Marker::Overhead),
            "EARLY" => Ok(Marker::Early),
            "LATE" => Ok(Marker::Late),
            other => Err(CoreError::InvalidInput(
                "marker".to_string(),
                other.to_string(),
            )),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_marker_case_insensitively() {
        assert_eq!("print".parse::<Marker>().unwrap(), Marker::Print);
        assert_eq!(" Late ".parse::<Marker>().unwrap(), Marker::Late);
        assert!("yield".parse::<Marker>().is_err());
    }

    #[test]
    fn label_matches_display() {
        assert_eq!(Marker::Overhead.to_string(), "OVERHEAD");
        assert_eq!(Marker::Early.label(), "EARLY");
    }
}
