use rand::Rng;

use crate::error::Result;
use crate::math::matrix::Matrix;
use crate::network::forward::{forward, predict, ForwardPass};
use crate::network::topology::Topology;
use crate::network::weights::WeightSet;
use crate::optim::sgd::Sgd;

/// A sigmoid classifier: topology, weights and the optimizer that trains them.
///
/// Cloning is a deep copy; [`Network::snapshot`] is the name used when the copy
/// is handed to a concurrent evaluator.
#[derive(Debug, Clone)]
pub struct Network {
    topology: Topology,
    weights: WeightSet,
    optimizer: Sgd,
}

impl Network {
    /// Builds a network with freshly initialized weights.
    pub fn new<R: Rng + ?Sized>(topology: Topology, learning_rate: f64, rng: &mut R) -> Network {
        let weights = WeightSet::random(&topology, rng);
        Network {
            topology,
            weights,
            optimizer: Sgd::new(learning_rate),
        }
    }

    /// Builds a network around existing weights, checking them against `topology`.
    pub fn from_weights(
        topology: Topology,
        layers: Vec<Matrix>,
        learning_rate: f64,
    ) -> Result<Network> {
        let weights = WeightSet::from_matrices(&topology, layers)?;
        Ok(Network {
            topology,
            weights,
            optimizer: Sgd::new(learning_rate),
        })
    }

    pub fn topology(&self) -> &Topology {
        &self.topology
    }

    pub fn weights(&self) -> &WeightSet {
        &self.weights
    }

    pub fn learning_rate(&self) -> f64 {
        self.optimizer.learning_rate
    }

    pub fn optimizer(&self) -> &Sgd {
        &self.optimizer
    }

    pub(crate) fn replace_weights(&mut self, weights: WeightSet) {
        self.weights = weights;
    }

    /// Independent deep copy of the current weights.
    pub fn snapshot(&self) -> Network {
        self.clone()
    }

    /// False once any weight has overflowed or become NaN.
    pub fn is_finite(&self) -> bool {
        self.weights.is_finite()
    }

    pub fn forward(&self, input: &Matrix) -> Result<ForwardPass> {
        forward(input, &self.weights)
    }

    pub fn predict(&self, input: &Matrix) -> Result<Matrix> {
        predict(input, &self.weights)
    }
}
