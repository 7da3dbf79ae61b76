use super::LearnError;
use nalgebra::DMatrix;

/// A fitted binary classifier.
///
/// `predict` returns one label (0 or 1) per row of `features`. The column count
/// must match the width the model was fitted on.
pub trait Classifier: Send + Sync {
    fn predict(&self, features: &DMatrix<f64>) -> Result<Vec<u8>, LearnError>;

    fn n_features(&self) -> usize;
}
