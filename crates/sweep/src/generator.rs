use crate::error::SweepError;
use configuration::GranularityRange;
use core_types::GranularityValue;

/// Expands a configured range into the sorted, de-duplicated list of granularities.
pub fn generate_granularities(
    range: &GranularityRange,
) -> Result<Vec<GranularityValue>, SweepError> {
    let mut values: Vec<u64> = match range {
        GranularityRange::Discrete(values) => values.clone(),
        GranularityRange::Linear { start, end, step } => {
            if *step == 0 {
                return Err(SweepError::ParameterGeneration(
                    "Step for granularities must be positive.".to_string(),
                ));
            }
            (*start..=*end).step_by(*step as usize).collect()
        }
        GranularityRange::Geometric { start, end, factor } => {
            if *start == 0 || *factor < 2 {
                return Err(SweepError::ParameterGeneration(
                    "Geometric granularities need start > 0 and factor >= 2.".to_string(),
                ));
            }
            let mut vals = Vec::new();
            let mut current = Some(*start);
            while let Some(value) = current.filter(|v| v <= end) {
                vals.push(value);
                current = value.checked_mul(*factor);
            }
            vals
        }
    };

    values.sort_unstable();
    values.dedup();
    if values.is_empty() {
        return Err(SweepError::ParameterGeneration(
            "The granularity range is empty.".to_string(),
        ));
    }
    Ok(values.into_iter().map(GranularityValue).collect())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn cycles(values: Vec<GranularityValue>) -> Vec<u64> {
        values.into_iter().map(|g| g.cycles()).collect()
    }

    #[test]
    fn discrete_values_are_sorted_and_deduplicated() {
        let range = GranularityRange::Discrete(vec![1000, 200, 400, 200]);
        assert_eq!(cycles(generate_granularities(&range).unwrap()), vec![200, 400, 1000]);
    }

    #[test]
    fn linear_range_includes_end() {
        let range = GranularityRange::Linear { start: 200, end: 1000, step: 200 };
        assert_eq!(
            cycles(generate_granularities(&range).unwrap()),
            vec![200, 400, 600, 800, 1000]
        );
    }

    #[test]
    fn geometric_range_doubles() {
        let range = GranularityRange::Geometric { start: 1000, end: 16000, factor: 2 };
        assert_eq!(
            cycles(generate_granularities(&range).unwrap()),
            vec![1000, 2000, 4000, 8000, 16000]
        );
    }

    #[test]
    fn zero_step_is_rejected() {
        let range = GranularityRange::Linear { start: 200, end: 1000, step: 0 };
        assert!(matches!(
            generate_granularities(&range),
            Err(SweepError::ParameterGeneration(_))
        ));
    }

    #[test]
    fn empty_list_is_rejected() {
        assert!(generate_granularities(&GranularityRange::Discrete(vec![])).is_err());
    }
}
