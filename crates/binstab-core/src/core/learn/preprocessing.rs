use nalgebra::{DMatrix, DVector};
use serde::{Deserialize, Serialize};

/// Per-column standardization to zero mean and unit variance.
///
/// Columns with zero variance are only centred.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StandardScaler {
    mean: DVector<f64>,
    scale: DVector<f64>,
}

impl StandardScaler {
    pub fn fit(features: &DMatrix<f64>) -> Self {
        let n = features.nrows().max(1) as f64;
        let mean = DVector::from_iterator(
            features.ncols(),
            features.column_iter().map(|col| col.sum() / n),
        );
        let scale = DVector::from_iterator(
            features.ncols(),
            features.column_iter().zip(mean.iter()).map(|(col, m)| {
                let var = col.iter().map(|v| (v - m).powi(2)).sum::<f64>() / n;
                if var > 0.0 { var.sqrt() } else { 1.0 }
            }),
        );
        Self { mean, scale }
    }

    pub fn n_features(&self) -> usize {
        self.mean.len()
    }

    pub fn transform(&self, features: &DMatrix<f64>) -> DMatrix<f64> {
        DMatrix::from_fn(features.nrows(), features.ncols(), |i, j| {
            (features[(i, j)] - self.mean[j]) / self.scale[j]
        })
    }
}
