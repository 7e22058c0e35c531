use rand::Rng;

use crate::error::{Error, Result};
use crate::math::matrix::Matrix;
use crate::network::topology::Topology;

/// Half-width of the uniform range weights are drawn from.
pub const INIT_EPSILON: f64 = 1.2;

/// One weight matrix per layer transition.
///
/// Transition `i` has shape `(fan_in + 1) x fan_out`; row 0 holds the bias.
#[derive(Debug, Clone, PartialEq)]
pub struct WeightSet {
    layers: Vec<Matrix>,
}

impl WeightSet {
    /// Draws every weight uniformly from `[-INIT_EPSILON, INIT_EPSILON]`.
    pub fn random<R: Rng + ?Sized>(topology: &Topology, rng: &mut R) -> WeightSet {
        let layers = topology
            .transitions()
            .into_iter()
            .map(|(fan_in, fan_out)| Matrix::random_uniform(fan_in + 1, fan_out, INIT_EPSILON, rng))
            .collect();
        WeightSet { layers }
    }

    /// Wraps caller-supplied matrices after checking them against `topology`.
    pub fn from_matrices(topology: &Topology, layers: Vec<Matrix>) -> Result<WeightSet> {
        let transitions = topology.transitions();
        if layers.len() != transitions.len() {
            return Err(Error::InvalidConfig(format!(
                "topology needs {} weight matrices, got {}",
                transitions.len(),
                layers.len()
            )));
        }
        for (layer, &(fan_in, fan_out)) in layers.iter().zip(&transitions) {
            if layer.shape() != (fan_in + 1, fan_out) {
                return Err(Error::dimensions(
                    "weight set",
                    (fan_in + 1, fan_out),
                    layer.shape(),
                ));
            }
        }
        Ok(WeightSet { layers })
    }

    /// Unchecked constructor for freshly computed updates of an existing set.
    pub(crate) fn from_updated(layers: Vec<Matrix>) -> WeightSet {
        WeightSet { layers }
    }

    pub fn layers(&self) -> &[Matrix] {
        &self.layers
    }

    pub fn len(&self) -> usize {
        self.layers.len()
    }

    pub fn is_empty(&self) -> bool {
        self.layers.is_empty()
    }

    pub fn is_finite(&self) -> bool {
        self.layers.iter().all(Matrix::is_finite)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::{rngs::StdRng, SeedableRng};

    #[test]
    fn random_weights_have_bias_rows_and_chain() {
        let topology = Topology::new(5, vec![4, 3], 2);
        let mut rng = StdRng::seed_from_u64(11);
        let weights = WeightSet::random(&topology, &mut rng);

        let shapes: Vec<_> = weights.layers().iter().map(Matrix::shape).collect();
        assert_eq!(shapes, vec![(6, 4), (5, 3), (4, 2)]);
        assert!(weights
            .layers()
            .iter()
            .flat_map(|w| w.iter_rows().flatten().copied().collect::<Vec<_>>())
            .all(|x| x.abs() <= INIT_EPSILON));
    }

    #[test]
    fn same_seed_gives_same_weights() {
        let topology = Topology::new(3, vec![2], 2);
        let a = WeightSet::random(&topology, &mut StdRng::seed_from_u64(5));
        let b = WeightSet::random(&topology, &mut StdRng::seed_from_u64(5));
        assert_eq!(a, b);
    }

    #[test]
    fn from_matrices_rejects_wrong_shapes() {
        let topology = Topology::new(2, vec![2], 2);
        let missing_bias = vec![Matrix::zeros(2, 2), Matrix::zeros(3, 2)];
        assert!(matches!(
            WeightSet::from_matrices(&topology, missing_bias),
            Err(Error::DimensionMismatch { .. })
        ));
        let too_few = vec![Matrix::zeros(3, 2)];
        assert!(WeightSet::from_matrices(&topology, too_few).is_err());
    }
}
