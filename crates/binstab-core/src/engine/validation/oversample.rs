use crate::core::learn::ClassCounts;
use nalgebra::DMatrix;
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use tracing::trace;

/// Balances a training partition by duplicating random minority-class rows.
///
/// Sampling is with replacement from the minority rows; originals are kept in
/// their order and the duplicates are appended after them. A partition with a
/// single class (or already balanced) is returned unchanged.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RandomOverSampler {
    seed: u64,
}

impl RandomOverSampler {
    pub fn new(seed: u64) -> Self {
        Self { seed }
    }

    /// Row indices of the resampled partition.
    pub fn resample_indices(&self, labels: &[u8]) -> Vec<usize> {
        let mut indices: Vec<usize> = (0..labels.len()).collect();
        let counts = ClassCounts::of(labels);
        if counts.single_class().is_some() || counts.negative == counts.positive {
            return indices;
        }

        let minority_class = u8::from(counts.positive < counts.negative);
        let minority: Vec<usize> = indices
            .iter()
            .copied()
            .filter(|&i| labels[i] == minority_class)
            .collect();
        let deficit = counts.negative.abs_diff(counts.positive);

        let mut rng = StdRng::seed_from_u64(self.seed);
        indices.extend((0..deficit).map(|_| minority[rng.gen_range(0..minority.len())]));
        trace!(minority_class, added = deficit, "Oversampled training partition");
        indices
    }

    pub fn resample(&self, features: &DMatrix<f64>, labels: &[u8]) -> (DMatrix<f64>, Vec<u8>) {
        let indices = self.resample_indices(labels);
        let resampled_labels = indices.iter().map(|&i| labels[i]).collect();
        (features.select_rows(&indices), resampled_labels)
    }
}
