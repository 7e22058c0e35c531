use crate::error::{Error, Result};
use crate::math::matrix::Matrix;
use crate::network::weights::WeightSet;

/// Plain gradient descent with a fixed learning rate.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Sgd {
    pub learning_rate: f64,
}

impl Sgd {
    pub fn new(learning_rate: f64) -> Sgd {
        Sgd { learning_rate }
    }

    /// Batch-averaged gradient of every layer: `G_i = [1 | a_i]ᵀ · δ_i / m`.
    pub fn gradients(activations: &[Matrix], errors: &[Matrix]) -> Result<Vec<Matrix>> {
        if activations.len() < errors.len() {
            return Err(Error::dimensions(
                "gradients",
                (activations.len(), 0),
                (errors.len(), 0),
            ));
        }
        errors
            .iter()
            .zip(activations)
            .map(|(delta, activation)| -> Result<Matrix> {
                let m = delta.rows().max(1) as f64;
                Ok(activation
                    .with_bias_column()
                    .transpose()
                    .matmul(delta)?
                    .scale(1.0 / m))
            })
            .collect()
    }

    /// Returns the descended weights `W_i - learning_rate * G_i`; `weights` is left untouched.
    pub fn step(
        &self,
        weights: &WeightSet,
        activations: &[Matrix],
        errors: &[Matrix],
    ) -> Result<WeightSet> {
        let gradients = Sgd::gradients(activations, errors)?;
        if gradients.len() != weights.len() {
            return Err(Error::dimensions(
                "sgd step",
                (weights.len(), 0),
                (gradients.len(), 0),
            ));
        }
        let layers = weights
            .layers()
            .iter()
            .zip(&gradients)
            .map(|(w, g)| w.sub(&g.scale(self.learning_rate)))
            .collect::<Result<Vec<_>>>()?;
        Ok(WeightSet::from_updated(layers))
    }
}
