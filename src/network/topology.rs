use serde::{Deserialize, Serialize};

/// Layer sizes of a fully-connected sigmoid network.
///
/// Fields:
/// - `input_size`   — length of one input row (pixels per image)
/// - `hidden_sizes` — neurons per hidden layer, input side first
/// - `output_size`  — number of classes
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Topology {
    pub input_size: usize,
    #[serde(default)]
    pub hidden_sizes: Vec<usize>,
    pub output_size: usize,
}

impl Topology {
    pub fn new(input_size: usize, hidden_sizes: Vec<usize>, output_size: usize) -> Topology {
        Topology {
            input_size,
            hidden_sizes,
            output_size,
        }
    }

    /// Full size chain: input, hidden layers, output.
    pub fn layer_sizes(&self) -> Vec<usize> {
        let mut sizes = Vec::with_capacity(self.hidden_sizes.len() + 2);
        sizes.push(self.input_size);
        sizes.extend_from_slice(&self.hidden_sizes);
        sizes.push(self.output_size);
        sizes
    }

    /// `(fan_in, fan_out)` of every layer transition, input side first.
    pub fn transitions(&self) -> Vec<(usize, usize)> {
        self.layer_sizes().windows(2).map(|w| (w[0], w[1])).collect()
    }

    /// Number of weight matrices: one per hidden layer plus the output layer.
    pub fn transition_count(&self) -> usize {
        self.hidden_sizes.len() + 1
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn transitions_chain_sizes() {
        let t = Topology::new(784, vec![30, 20], 10);
        assert_eq!(t.layer_sizes(), vec![784, 30, 20, 10]);
        assert_eq!(t.transitions(), vec![(784, 30), (30, 20), (20, 10)]);
        assert_eq!(t.transition_count(), 3);
    }

    #[test]
    fn no_hidden_layers_is_a_single_transition() {
        let t: Topology = serde_json::from_str(r#"{"input_size": 4, "output_size": 2}"#).unwrap();
        assert_eq!(t.transitions(), vec![(4, 2)]);
    }
}
