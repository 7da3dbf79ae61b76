use nalgebra::DMatrix;

/// A dense feature matrix (one row per compound) with its column labels.
#[derive(Debug, Clone, PartialEq)]
pub struct FeatureMatrix {
    labels: Vec<String>,
    values: DMatrix<f64>,
}

impl FeatureMatrix {
    /// Builds a matrix from row vectors. Every row must have one value per label.
    pub fn from_rows(labels: Vec<String>, rows: &[Vec<f64>]) -> Option<Self> {
        let ncols = labels.len();
        if rows.iter().any(|row| row.len() != ncols) {
            return None;
        }
        let values = DMatrix::from_fn(rows.len(), ncols, |i, j| rows[i][j]);
        Some(Self { labels, values })
    }

    pub fn labels(&self) -> &[String] {
        &self.labels
    }

    pub fn values(&self) -> &DMatrix<f64> {
        &self.values
    }

    pub fn nrows(&self) -> usize {
        self.values.nrows()
    }

    pub fn ncols(&self) -> usize {
        self.values.ncols()
    }

    pub fn row(&self, index: usize) -> Vec<f64> {
        self.values.row(index).iter().copied().collect()
    }

    /// Replaces every NaN or infinite entry with zero, returning how many were replaced.
    pub fn zero_fill_undefined(&mut self) -> usize {
        let mut replaced = 0;
        for value in self.values.iter_mut() {
            if !value.is_finite() {
                *value = 0.0;
                replaced += 1;
            }
        }
        replaced
    }

    pub fn select_rows(&self, indices: &[usize]) -> DMatrix<f64> {
        self.values.select_rows(indices)
    }
}
