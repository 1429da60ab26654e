use crate::error::ExtractError;
use core_types::LabeledRegion;
use regex::Regex;

/// Finds every region of one label inside a block of text.
///
/// The label is upper-cased, so `fiberbench10` matches `FIBERBENCH10START` /
/// `FIBERBENCH10END`. Each `START` pairs with the nearest following `END`. A `START`
/// that is followed by another `START` before any `END` has no partner and is dropped,
/// as is any stray `END`.
#[derive(Debug, Clone)]
pub struct RegionExtractor {
    label: String,
    markers: Regex,
}

impl RegionExtractor {
    pub fn new(label: &str) -> Result<Self, ExtractError> {
        let label = label.trim().to_uppercase();
        if label.is_empty() {
            return Err(ExtractError::EmptyLabel);
        }

        let pattern = format!("{}(START|END)", regex::escape(&label));
        let markers = Regex::new(&pattern).map_err(|e| ExtractError::Pattern {
            label: label.clone(),
            reason: e.to_string(),
        })?;

        Ok(Self { label, markers })
    }

    pub fn label(&self) -> &str {
        &self.label
    }

    /// Returns the bodies of all complete regions in document order.
    pub fn extract(&self, text: &str) -> Vec<LabeledRegion> {
        let mut regions = Vec::new();
        let mut open: Option<usize> = None;
        let mut dropped = 0usize;

        for captures in self.markers.captures_iter(text) {
            let (Some(whole), Some(kind)) = (captures.get(0), captures.get(1)) else {
                continue;
            };
            match kind.as_str() {
                "START" => {
                    if open.replace(whole.end()).is_some() {
                        dropped += 1;
                    }
                }
                _ => {
                    if let Some(body_start) = open.take() {
                        regions.push(LabeledRegion {
                            label: self.label.clone(),
                            body: text[body_start..whole.start()].to_string(),
                        });
                    }
                }
            }
        }
        if open.is_some() {
            dropped += 1;
        }

        if dropped > 0 {
            tracing::debug!(
                label = %self.label,
                dropped,
                "Dropped region markers without a matching END"
            );
        }
        regions
    }

    /// Concatenates the bodies of all regions, in order.
    pub fn extract_joined(&self, text: &str) -> String {
        self.extract(text)
            .into_iter()
            .map(|region| region.body)
            .collect()
    }
}

/// One-shot extraction of `label` regions from `text`.
pub fn extract(text: &str, label: &str) -> Result<Vec<LabeledRegion>, ExtractError> {
    Ok(RegionExtractor::new(label)?.extract(text))
}

/// Extracts `inner` regions from the joined bodies of all `outer` regions.
pub fn extract_nested(
    text: &str,
    outer: &str,
    inner: &str,
) -> Result<Vec<LabeledRegion>, ExtractError> {
    let scope = RegionExtractor::new(outer)?.extract_joined(text);
    Ok(RegionExtractor::new(inner)?.extract(&scope))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn bodies(regions: &[LabeledRegion]) -> Vec<&str> {
        regions.iter().map(|r| r.body.as_str()).collect()
    }

    #[test]
    fn extracts_multiline_body() {
        let regions = extract("noise\nPRINTSTART\n10\nfoo\n20\nPRINTEND\ntail", "print").unwrap();
        assert_eq!(regions.len(), 1);
        assert_eq!(regions[0].label, "PRINT");
        assert_eq!(regions[0].body, "\n10\nfoo\n20\n");
    }

    #[test]
    fn pairs_each_start_with_nearest_end() {
        let text = "PRINTSTART\n1\nPRINTEND\nx\nPRINTSTART\n2\nPRINTEND\nPRINTEND";
        let regions = extract(text, "PRINT").unwrap();
        assert_eq!(bodies(&regions), vec!["\n1\n", "\n2\n"]);
    }

    #[test]
    fn zero_matches_is_empty_not_error() {
        assert!(extract("nothing here", "print").unwrap().is_empty());
    }

    #[test]
    fn unmatched_trailing_start_is_dropped() {
        let regions = extract("PRINTSTART\n1\nPRINTEND\nPRINTSTART\n2\n", "print").unwrap();
        assert_eq!(bodies(&regions), vec!["\n1\n"]);
    }

    #[test]
    fn start_without_end_before_next_start_is_dropped() {
        let regions = extract("PRINTSTART a PRINTSTART b PRINTEND", "print").unwrap();
        assert_eq!(bodies(&regions), vec![" b "]);
    }

    #[test]
    fn other_labels_do_not_interfere() {
        let text = "OVERHEADSTART\n5\nOVERHEADEND\nPRINTSTART\n7\nPRINTEND";
        assert_eq!(bodies(&extract(text, "overhead").unwrap()), vec!["\n5\n"]);
        assert_eq!(bodies(&extract(text, "print").unwrap()), vec!["\n7\n"]);
    }

    #[test]
    fn nested_extraction_scopes_to_outer_region() {
        let text = "\
PRINTSTART\n999\nPRINTEND\n\
FIBERBENCH3START\nPRINTSTART\n1\nPRINTEND\nFIBERBENCH3END\n\
FIBERBENCH3START\nPRINTSTART\n2\nPRINTEND\nFIBERBENCH3END\n";
        let regions = extract_nested(text, "fiberbench3", "print").unwrap();
        assert_eq!(bodies(&regions), vec!["\n1\n", "\n2\n"]);
    }

    #[test]
    fn label_metacharacters_are_literal() {
        let regions = extract("A.BSTART 1 A.BEND AXBSTART 2 AXBEND", "a.b").unwrap();
        assert_eq!(bodies(&regions), vec![" 1 "]);
    }

    #[test]
    fn empty_label_is_rejected() {
        assert_eq!(RegionExtractor::new("  ").unwrap_err(), ExtractError::EmptyLabel);
    }
}
