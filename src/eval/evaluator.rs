use crate::error::{Error, Result};
use crate::eval::metrics::Metrics;
use crate::loss::bce::BceLoss;
use crate::math::matrix::Matrix;
use crate::network::forward::predict;
use crate::network::weights::WeightSet;

/// Scores `weights` on `inputs` against one-hot `targets`.
///
/// Ties in the argmax resolve to the lowest column index, for predictions and
/// targets alike.
pub fn evaluate(weights: &WeightSet, inputs: &Matrix, targets: &Matrix) -> Result<Metrics> {
    let predicted = predict(inputs, weights)?;
    if predicted.shape() != targets.shape() {
        return Err(Error::dimensions("evaluate", predicted.shape(), targets.shape()));
    }

    let cost = BceLoss::cost(&predicted, targets)?;
    let correct = count_correct(&predicted, targets);

    Ok(Metrics { correct, cost })
}

fn count_correct(predicted: &Matrix, targets: &Matrix) -> usize {
    predicted
        .row_argmax()
        .into_iter()
        .zip(targets.row_argmax())
        .filter(|(p, t)| p == t)
        .count()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::network::topology::Topology;

    fn zero_network() -> WeightSet {
        let topology = Topology::new(2, vec![2], 2);
        WeightSet::from_matrices(&topology, vec![Matrix::zeros(3, 2), Matrix::zeros(3, 2)]).unwrap()
    }

    #[test]
    fn zero_weights_predict_one_half_everywhere() {
        let inputs = Matrix::from_rows(vec![vec![0.0, 0.0], vec![1.0, 1.0]]).unwrap();
        let targets = Matrix::from_rows(vec![vec![1.0, 0.0], vec![0.0, 1.0]]).unwrap();

        let metrics = evaluate(&zero_network(), &inputs, &targets).unwrap();

        assert!((metrics.cost - 0.5f64.ln().abs()).abs() < 1e-12);
        assert!((metrics.cost - 0.6931).abs() < 1e-4);
        // both rows tie at [0.5, 0.5] and resolve to index 0
        assert_eq!(metrics.correct, 1);
    }

    #[test]
    fn evaluation_is_bit_for_bit_repeatable() {
        let weights = zero_network().layers().iter().map(|w| w.map(|_| 0.3)).collect();
        let weights = WeightSet::from_matrices(&Topology::new(2, vec![2], 2), weights).unwrap();
        let inputs = Matrix::from_rows(vec![vec![0.2, 0.9], vec![1.0, 0.1]]).unwrap();
        let targets = Matrix::from_rows(vec![vec![1.0, 0.0], vec![0.0, 1.0]]).unwrap();

        let a = evaluate(&weights, &inputs, &targets).unwrap();
        let b = evaluate(&weights, &inputs, &targets).unwrap();
        assert_eq!(a.correct, b.correct);
        assert_eq!(a.cost.to_bits(), b.cost.to_bits());
    }

    #[test]
    fn nan_weights_produce_a_detectably_non_finite_cost() {
        let topology = Topology::new(2, vec![], 2);
        let weights =
            WeightSet::from_matrices(&topology, vec![Matrix::zeros(3, 2).map(|_| f64::NAN)])
                .unwrap();
        let inputs = Matrix::from_rows(vec![vec![1.0, 2.0]]).unwrap();
        let targets = Matrix::from_rows(vec![vec![1.0, 0.0]]).unwrap();

        let metrics = evaluate(&weights, &inputs, &targets).unwrap();
        assert!(!metrics.is_finite());
        assert!(!weights.is_finite());
    }

    #[test]
    fn target_width_must_match_output_layer() {
        let inputs = Matrix::zeros(1, 2);
        let targets = Matrix::zeros(1, 3);
        assert!(evaluate(&zero_network(), &inputs, &targets).is_err());
    }
}
