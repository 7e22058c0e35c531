use crate::error::Result;
use crate::math::matrix::Matrix;

/// Smallest magnitude allowed inside `ln`.
const CLAMP: f64 = 1e-6;

pub struct BceLoss;

impl BceLoss {
    /// Binary cross-entropy averaged over every entry:
    /// `-mean(y·ln(clamp(p)) + (1-y)·ln(clamp(1-p)))`.
    pub fn cost(predicted: &Matrix, expected: &Matrix) -> Result<f64> {
        let positive = expected.hadamard(&predicted.map(safe_ln))?;
        let negative = expected
            .map(|y| 1.0 - y)
            .hadamard(&predicted.map(|p| safe_ln(1.0 - p)))?;
        Ok(-positive.add(&negative)?.mean())
    }
}

/// `ln(x)`, with `|x| < 1e-6` replaced by `1e-6`.
fn safe_ln(x: f64) -> f64 {
    if x.abs() < CLAMP {
        CLAMP.ln()
    } else {
        x.ln()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn uniform_half_prediction_costs_ln_two() {
        let predicted = Matrix::from_rows(vec![vec![0.5, 0.5], vec![0.5, 0.5]]).unwrap();
        let expected = Matrix::from_rows(vec![vec![1.0, 0.0], vec![0.0, 1.0]]).unwrap();
        let cost = BceLoss::cost(&predicted, &expected).unwrap();
        assert!((cost - 2f64.ln()).abs() < 1e-12);
    }

    #[test]
    fn saturated_wrong_prediction_is_clamped() {
        let predicted = Matrix::from_rows(vec![vec![0.0, 1.0]]).unwrap();
        let expected = Matrix::from_rows(vec![vec![1.0, 0.0]]).unwrap();
        let cost = BceLoss::cost(&predicted, &expected).unwrap();
        assert!(cost.is_finite());
        assert!((cost + CLAMP.ln()).abs() < 1e-9);
    }

    #[test]
    fn perfect_prediction_costs_nothing() {
        let m = Matrix::from_rows(vec![vec![1.0, 0.0]]).unwrap();
        assert_eq!(BceLoss::cost(&m, &m).unwrap(), 0.0);
    }
}
