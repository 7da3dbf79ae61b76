use super::preprocessing::StandardScaler;
use super::traits::Classifier;
use super::{LearnError, check_width, validate_training_set};
use nalgebra::DMatrix;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "kebab-case")]
pub struct KNearestNeighborsParams {
    pub k: usize,
}

impl Default for KNearestNeighborsParams {
    fn default() -> Self {
        Self { k: 5 }
    }
}

/// k-nearest-neighbour classifier over standardized features.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct KNearestNeighbors {
    k: usize,
    scaler: StandardScaler,
    samples: DMatrix<f64>,
    labels: Vec<u8>,
}

impl KNearestNeighborsParams {
    pub fn fit(
        &self,
        features: &DMatrix<f64>,
        labels: &[u8],
    ) -> Result<KNearestNeighbors, LearnError> {
        if self.k == 0 {
            return Err(LearnError::InvalidHyperParameter {
                name: "k",
                reason: "must be at least 1".to_string(),
            });
        }
        validate_training_set(features, labels)?;
        let scaler = StandardScaler::fit(features);
        Ok(KNearestNeighbors {
            k: self.k,
            samples: scaler.transform(features),
            scaler,
            labels: labels.to_vec(),
        })
    }
}

impl KNearestNeighbors {
    fn vote(&self, query: &[f64]) -> u8 {
        let mut neighbours: Vec<(f64, usize)> = self
            .samples
            .row_iter()
            .enumerate()
            .map(|(i, row)| {
                let dist = row
                    .iter()
                    .zip(query)
                    .map(|(a, b)| (a - b).powi(2))
                    .sum::<f64>();
                (dist, i)
            })
            .collect();
        neighbours.sort_by(|a, b| a.0.total_cmp(&b.0).then(a.1.cmp(&b.1)));
        neighbours.truncate(self.k);

        let positive = neighbours
            .iter()
            .filter(|(_, i)| self.labels[*i] == 1)
            .count();
        let negative = neighbours.len() - positive;
        match positive.cmp(&negative) {
            std::cmp::Ordering::Greater => 1,
            std::cmp::Ordering::Less => 0,
            // Tied vote: the closest neighbour decides.
            std::cmp::Ordering::Equal => self.labels[neighbours[0].1],
        }
    }
}

impl Classifier for KNearestNeighbors {
    fn predict(&self, features: &DMatrix<f64>) -> Result<Vec<u8>, LearnError> {
        check_width(features, self.scaler.n_features())?;
        let scaled = self.scaler.transform(features);
        Ok(scaled
            .row_iter()
            .map(|row| {
                let query: Vec<f64> = row.iter().copied().collect();
                self.vote(&query)
            })
            .collect())
    }

    fn n_features(&self) -> usize {
        self.scaler.n_features()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn predicts_label_of_closest_cluster() {
        let x = DMatrix::from_row_slice(6, 1, &[0.0, 0.1, 0.2, 5.0, 5.1, 5.2]);
        let y = [0, 0, 0, 1, 1, 1];
        let model = KNearestNeighborsParams { k: 3 }.fit(&x, &y).unwrap();
        let queries = DMatrix::from_row_slice(2, 1, &[0.05, 4.9]);
        assert_eq!(model.predict(&queries).unwrap(), vec![0, 1]);
    }

    #[test]
    fn tied_vote_goes_to_nearest_neighbour() {
        let x = DMatrix::from_row_slice(4, 1, &[0.0, 1.0, 2.0, 3.0]);
        let y = [0, 1, 0, 1];
        let model = KNearestNeighborsParams { k: 2 }.fit(&x, &y).unwrap();
        // The two nearest samples to 1.2 are 1.0 (class 1) and 2.0 (class 0).
        let scaled_query = DMatrix::from_row_slice(1, 1, &[1.2]);
        assert_eq!(model.predict(&scaled_query).unwrap(), vec![1]);
    }

    #[test]
    fn k_larger_than_training_set_uses_all_samples() {
        let x = DMatrix::from_row_slice(3, 1, &[0.0, 1.0, 2.0]);
        let model = KNearestNeighborsParams { k: 10 }.fit(&x, &[1, 1, 0]).unwrap();
        assert_eq!(model.predict(&x).unwrap(), vec![1, 1, 1]);
    }

    #[test]
    fn zero_k_is_rejected() {
        let x = DMatrix::from_row_slice(1, 1, &[0.0]);
        assert!(matches!(
            KNearestNeighborsParams { k: 0 }.fit(&x, &[0]),
            Err(LearnError::InvalidHyperParameter { name: "k", .. })
        ));
    }
}
