use rand::seq::SliceRandom;
use rand::Rng;

use crate::data::idx::LabeledImage;
use crate::error::{Error, Result};
use crate::math::matrix::Matrix;

/// Stacked inputs and one-hot targets; row `k` of one belongs to row `k` of the other.
#[derive(Debug, Clone, PartialEq)]
pub struct Batch {
    inputs: Matrix,
    targets: Matrix,
}

impl Batch {
    pub fn new(inputs: Matrix, targets: Matrix) -> Result<Batch> {
        if inputs.rows() != targets.rows() {
            return Err(Error::dimensions("batch", inputs.shape(), targets.shape()));
        }
        Ok(Batch { inputs, targets })
    }

    pub fn inputs(&self) -> &Matrix {
        &self.inputs
    }

    pub fn targets(&self) -> &Matrix {
        &self.targets
    }

    pub fn len(&self) -> usize {
        self.inputs.rows()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

/// A whole labelled dataset. Never mutated once built, so it can be shared
/// between the trainer and evaluation threads behind an `Arc`.
#[derive(Debug, Clone, PartialEq)]
pub struct Dataset {
    examples: Batch,
}

impl Dataset {
    pub fn new(inputs: Matrix, targets: Matrix) -> Result<Dataset> {
        Ok(Dataset {
            examples: Batch::new(inputs, targets)?,
        })
    }

    /// Stacks decoded records, pixels unscaled, labels one-hot over `classes`.
    pub fn from_samples<S>(samples: S, classes: usize) -> Result<Dataset>
    where
        S: IntoIterator<Item = Result<LabeledImage>>,
    {
        let mut inputs = Vec::new();
        let mut targets = Vec::new();
        for (i, sample) in samples.into_iter().enumerate() {
            let LabeledImage { label, pixels } = sample?;
            let class = label as usize;
            if class >= classes {
                return Err(Error::Format(format!(
                    "label at index {} is {}, out of range for {} classes",
                    i, class, classes
                )));
            }
            let mut one_hot = vec![0.0; classes];
            one_hot[class] = 1.0;
            inputs.push(pixels.into_iter().map(f64::from).collect());
            targets.push(one_hot);
        }
        Dataset::new(Matrix::from_rows(inputs)?, Matrix::from_rows(targets)?)
    }

    pub fn inputs(&self) -> &Matrix {
        self.examples.inputs()
    }

    pub fn targets(&self) -> &Matrix {
        self.examples.targets()
    }

    pub fn len(&self) -> usize {
        self.examples.len()
    }

    pub fn is_empty(&self) -> bool {
        self.examples.is_empty()
    }

    /// The examples at `indices`, in that order.
    pub fn batch(&self, indices: &[usize]) -> Batch {
        Batch {
            inputs: self.inputs().select_rows(indices),
            targets: self.targets().select_rows(indices),
        }
    }
}

/// Shuffles `0..len` and cuts it into chunks of `batch_size`; the last chunk
/// holds the remainder and may be shorter.
///
/// # Panics
/// Panics if `batch_size == 0`.
pub fn shuffled_batches<R: Rng + ?Sized>(
    len: usize,
    batch_size: usize,
    rng: &mut R,
) -> Vec<Vec<usize>> {
    assert!(batch_size > 0, "batch_size must be at least 1");
    let mut indices: Vec<usize> = (0..len).collect();
    indices.shuffle(rng);
    indices.chunks(batch_size).map(<[usize]>::to_vec).collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;
    use rand::{rngs::StdRng, SeedableRng};

    #[test]
    fn from_samples_builds_one_hot_targets() {
        let samples = vec![
            Ok(LabeledImage { label: 2, pixels: vec![0, 128] }),
            Ok(LabeledImage { label: 0, pixels: vec![255, 1] }),
        ];
        let dataset = Dataset::from_samples(samples, 3).unwrap();
        assert_eq!(dataset.len(), 2);
        assert_eq!(dataset.inputs().row(0), &[0.0, 128.0]);
        assert_eq!(dataset.inputs().row(1), &[255.0, 1.0]);
        assert_eq!(dataset.targets().row(0), &[0.0, 0.0, 1.0]);
        assert_eq!(dataset.targets().row(1), &[1.0, 0.0, 0.0]);
    }

    #[test]
    fn from_samples_rejects_out_of_range_label() {
        let samples = vec![Ok(LabeledImage { label: 10, pixels: vec![0] })];
        assert!(matches!(Dataset::from_samples(samples, 10), Err(Error::Format(_))));
    }

    #[test]
    fn from_samples_propagates_decoder_errors() {
        let samples = vec![Err(Error::Format("broken".into()))];
        assert!(Dataset::from_samples(samples, 10).is_err());
    }

    #[test]
    fn misaligned_batch_is_a_dimension_error() {
        assert!(matches!(
            Batch::new(Matrix::zeros(3, 2), Matrix::zeros(2, 2)),
            Err(Error::DimensionMismatch { .. })
        ));
    }

    #[test]
    fn batch_gathers_aligned_rows() {
        let inputs = Matrix::from_rows(vec![vec![0.0], vec![1.0], vec![2.0]]).unwrap();
        let targets = Matrix::from_rows(vec![vec![10.0], vec![11.0], vec![12.0]]).unwrap();
        let dataset = Dataset::new(inputs, targets).unwrap();

        let batch = dataset.batch(&[2, 0]);
        assert_eq!(batch.inputs().row(0), &[2.0]);
        assert_eq!(batch.targets().row(0), &[12.0]);
        assert_eq!(batch.inputs().row(1), &[0.0]);
        assert_eq!(batch.targets().row(1), &[10.0]);
    }

    #[test]
    fn remainder_batch_is_kept() {
        let batches = shuffled_batches(10, 4, &mut StdRng::seed_from_u64(0));
        let sizes: Vec<_> = batches.iter().map(Vec::len).collect();
        assert_eq!(sizes, vec![4, 4, 2]);
    }

    #[test]
    fn consecutive_epochs_are_reshuffled() {
        let mut rng = StdRng::seed_from_u64(8);
        let first: Vec<usize> = shuffled_batches(32, 5, &mut rng).into_iter().flatten().collect();
        let second: Vec<usize> = shuffled_batches(32, 5, &mut rng).into_iter().flatten().collect();
        assert_ne!(first, second);
    }

    proptest! {
        #[test]
        fn every_example_is_seen_exactly_once(
            len in 0usize..200,
            batch_size in 1usize..50,
            seed in any::<u64>(),
        ) {
            let batches = shuffled_batches(len, batch_size, &mut StdRng::seed_from_u64(seed));
            prop_assert!(batches.iter().all(|b| !b.is_empty() && b.len() <= batch_size));
            let mut seen: Vec<usize> = batches.into_iter().flatten().collect();
            seen.sort_unstable();
            prop_assert_eq!(seen, (0..len).collect::<Vec<_>>());
        }
    }
}
