use crate::activation::sigmoid::sigmoid_matrix;
use crate::error::Result;
use crate::math::matrix::Matrix;
use crate::network::weights::WeightSet;

/// Everything a backward pass needs from a forward pass.
///
/// `activations[0]` is the raw input; `activations[i + 1] = σ(pre_activations[i])`.
#[derive(Debug, Clone)]
pub struct ForwardPass {
    pub activations: Vec<Matrix>,
    pub pre_activations: Vec<Matrix>,
}

impl ForwardPass {
    /// Activation of the output layer.
    pub fn output(&self) -> &Matrix {
        // activations always holds at least the input
        &self.activations[self.activations.len() - 1]
    }
}

/// Runs `input` (one example per row) through every layer, keeping each
/// layer's pre-activation `z = [1 | a] · W` and activation `σ(z)`.
pub fn forward(input: &Matrix, weights: &WeightSet) -> Result<ForwardPass> {
    let mut activations = Vec::with_capacity(weights.len() + 1);
    let mut pre_activations = Vec::with_capacity(weights.len());

    let mut activation = input.clone();
    for weight in weights.layers() {
        let z = activation.with_bias_column().matmul(weight)?;
        activations.push(activation);
        activation = sigmoid_matrix(&z);
        pre_activations.push(z);
    }
    activations.push(activation);

    Ok(ForwardPass {
        activations,
        pre_activations,
    })
}

/// Output-layer activation only, without keeping intermediate layers.
pub fn predict(input: &Matrix, weights: &WeightSet) -> Result<Matrix> {
    weights.layers().iter().try_fold(input.clone(), |acc, weight| -> Result<Matrix> {
        Ok(sigmoid_matrix(&acc.with_bias_column().matmul(weight)?))
    })
}
