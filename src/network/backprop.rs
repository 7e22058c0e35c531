use crate::activation::sigmoid::sigmoid_derivative_matrix;
use crate::error::{Error, Result};
use crate::math::matrix::Matrix;
use crate::network::forward::ForwardPass;
use crate::network::weights::WeightSet;

/// Error terms (deltas) of every layer transition, input side first.
///
/// Output layer: `δ = (a_L - target) ⊙ σ'(z_L)`.
/// Hidden layer `i`: `δ_i = (δ_{i+1} · W_{i+1}ᵀ without its bias row) ⊙ σ'(z_i)`.
///
/// Each delta has one row per example in the batch.
pub fn backpropagate(
    pass: &ForwardPass,
    weights: &WeightSet,
    targets: &Matrix,
) -> Result<Vec<Matrix>> {
    let layers = weights.len();
    if layers == 0 || pass.pre_activations.len() != layers {
        return Err(Error::dimensions(
            "backpropagate",
            (pass.pre_activations.len(), 0),
            (layers, 0),
        ));
    }

    let mut errors = Vec::with_capacity(layers);
    let mut delta = pass
        .output()
        .sub(targets)?
        .hadamard(&sigmoid_derivative_matrix(&pass.pre_activations[layers - 1]))?;

    for i in (0..layers - 1).rev() {
        // The bias row has no upstream neuron to send error to.
        let upstream = weights.layers()[i + 1].without_first_row().transpose();
        let next = delta
            .matmul(&upstream)?
            .hadamard(&sigmoid_derivative_matrix(&pass.pre_activations[i]))?;
        errors.push(delta);
        delta = next;
    }
    errors.push(delta);
    errors.reverse();

    Ok(errors)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::network::forward::forward;
    use crate::network::topology::Topology;
    use rand::{rngs::StdRng, SeedableRng};

    #[test]
    fn one_delta_per_layer_with_batch_rows() {
        let topology = Topology::new(3, vec![5, 4], 2);
        let weights = WeightSet::random(&topology, &mut StdRng::seed_from_u64(9));
        let input = Matrix::from_rows(vec![vec![0.1, 0.2, 0.3]; 7]).unwrap();
        let targets = Matrix::from_rows(vec![vec![1.0, 0.0]; 7]).unwrap();

        let pass = forward(&input, &weights).unwrap();
        let errors = backpropagate(&pass, &weights, &targets).unwrap();

        let shapes: Vec<_> = errors.iter().map(Matrix::shape).collect();
        assert_eq!(shapes, vec![(7, 5), (7, 4), (7, 2)]);
    }

    #[test]
    fn perfect_prediction_gives_zero_output_delta() {
        let topology = Topology::new(1, vec![], 1);
        let weights = WeightSet::from_matrices(&topology, vec![Matrix::zeros(2, 1)]).unwrap();
        let input = Matrix::from_rows(vec![vec![3.0]]).unwrap();
        let targets = Matrix::from_rows(vec![vec![0.5]]).unwrap();

        let pass = forward(&input, &weights).unwrap();
        let errors = backpropagate(&pass, &weights, &targets).unwrap();
        assert_eq!(errors[0].get(0, 0), 0.0);
    }

    #[test]
    fn target_width_mismatch_is_rejected() {
        let topology = Topology::new(2, vec![2], 2);
        let weights = WeightSet::random(&topology, &mut StdRng::seed_from_u64(2));
        let pass = forward(&Matrix::zeros(3, 2), &weights).unwrap();
        assert!(backpropagate(&pass, &weights, &Matrix::zeros(3, 3)).is_err());
    }
}
