use crate::error::AnalyticsError;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// A least-squares line `y = slope * x + intercept`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LinearFit {
    pub slope: Decimal,
    pub intercept: Decimal,
    pub points: usize,
}

impl LinearFit {
    pub fn predict(&self, x: Decimal) -> Decimal {
        self.slope * x + self.intercept
    }
}

/// Fits a straight line through `(x, y)` points, e.g. median interval vs. granularity.
pub fn fit_linear(points: &[(Decimal, Decimal)]) -> Result<LinearFit, AnalyticsError> {
    if points.len() < 2 {
        return Err(AnalyticsError::NotEnoughData(format!(
            "a linear fit needs at least 2 points, got {}",
            points.len()
        )));
    }

    let n = Decimal::from(points.len());
    let mean_x = points.iter().map(|(x, _)| *x).sum::<Decimal>() / n;
    let mean_y = points.iter().map(|(_, y)| *y).sum::<Decimal>() / n;

    let (sxy, sxx) = points.iter().fold((Decimal::ZERO, Decimal::ZERO), |(sxy, sxx), (x, y)| {
        let dx = *x - mean_x;
        (sxy + dx * (*y - mean_y), sxx + dx * dx)
    });

    if sxx.is_zero() {
        return Err(AnalyticsError::DivisionByZero("linear_fit_slope".to_string()));
    }

    let slope = sxy / sxx;
    Ok(LinearFit {
        slope,
        intercept: mean_y - slope * mean_x,
        points: points.len(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    #[test]
    fn recovers_exact_line() {
        let points: Vec<_> = [200, 400, 600, 800, 1000]
            .into_iter()
            .map(|g| (Decimal::from(g), Decimal::from(2 * g + 50)))
            .collect();
        let fit = fit_linear(&points).unwrap();
        assert_eq!(fit.slope, dec!(2));
        assert_eq!(fit.intercept, dec!(50));
        assert_eq!(fit.points, 5);
        assert_eq!(fit.predict(dec!(1200)), dec!(2450));
    }

    #[test]
    fn single_point_is_not_enough() {
        let err = fit_linear(&[(dec!(200), dec!(1))]).unwrap_err();
        assert!(matches!(err, AnalyticsError::NotEnoughData(_)));
    }

    #[test]
    fn vertical_points_fail() {
        let err = fit_linear(&[(dec!(200), dec!(1)), (dec!(200), dec!(5))]).unwrap_err();
        assert_eq!(err, AnalyticsError::DivisionByZero("linear_fit_slope".to_string()));
    }
}
