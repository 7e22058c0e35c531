use serde::{Deserialize, Serialize};

/// Result of scoring one network snapshot against one dataset.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Metrics {
    /// Rows whose predicted argmax matches the target argmax.
    pub correct: usize,
    /// Mean binary cross-entropy over every output entry.
    pub cost: f64,
}

impl Metrics {
    /// Fraction of `total` examples classified correctly, in `[0, 1]`.
    pub fn accuracy(&self, total: usize) -> f64 {
        if total == 0 {
            0.0
        } else {
            self.correct as f64 / total as f64
        }
    }

    /// False when the cost overflowed or became NaN (numeric divergence).
    pub fn is_finite(&self) -> bool {
        self.cost.is_finite()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn accuracy_is_a_fraction() {
        let m = Metrics { correct: 45, cost: 0.2 };
        assert_eq!(m.accuracy(50), 0.9);
        assert_eq!(m.accuracy(0), 0.0);
    }

    #[test]
    fn nan_cost_is_not_finite() {
        assert!(!Metrics { correct: 0, cost: f64::NAN }.is_finite());
        assert!(!Metrics { correct: 0, cost: f64::INFINITY }.is_finite());
        assert!(Metrics { correct: 0, cost: 0.0 }.is_finite());
    }
}
