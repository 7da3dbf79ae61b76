use super::traits::Classifier;
use super::tree::{DecisionTree, DecisionTreeParams};
use super::{LearnError, check_width, validate_training_set};
use nalgebra::DMatrix;
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use serde::{Deserialize, Serialize};
use tracing::debug;

#[cfg(feature = "parallel")]
use rayon::prelude::*;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "kebab-case")]
pub struct RandomForestParams {
    pub n_estimators: usize,
    pub max_depth: Option<usize>,
    pub min_samples_split: usize,
    pub min_samples_leaf: usize,
    /// Features examined per split; `floor(sqrt(d))` when absent.
    pub max_features: Option<usize>,
    pub bootstrap: bool,
    pub seed: u64,
}

impl Default for RandomForestParams {
    fn default() -> Self {
        Self {
            n_estimators: 100,
            max_depth: None,
            min_samples_split: 2,
            min_samples_leaf: 1,
            max_features: None,
            bootstrap: true,
            seed: 0,
        }
    }
}

/// An ensemble of decision trees; predictions average the trees' leaf probabilities.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RandomForest {
    n_features: usize,
    trees: Vec<DecisionTree>,
}

impl RandomForestParams {
    pub fn fit(&self, features: &DMatrix<f64>, labels: &[u8]) -> Result<RandomForest, LearnError> {
        if self.n_estimators == 0 {
            return Err(LearnError::InvalidHyperParameter {
                name: "n-estimators",
                reason: "must be at least 1".to_string(),
            });
        }
        validate_training_set(features, labels)?;
        let n = features.nrows();
        let d = features.ncols();
        let max_features = self
            .max_features
            .unwrap_or_else(|| ((d as f64).sqrt().floor() as usize).max(1));

        let fit_tree = |t: usize| -> Result<DecisionTree, LearnError> {
            // Each tree owns its RNG stream so the ensemble is reproducible in parallel.
            let mut rng = StdRng::seed_from_u64(self.seed.wrapping_add(t as u64));
            let tree_params = DecisionTreeParams {
                max_depth: self.max_depth,
                min_samples_split: self.min_samples_split,
                min_samples_leaf: self.min_samples_leaf,
                max_features: Some(max_features),
                seed: rng.r#gen(),
            };
            if self.bootstrap {
                let rows: Vec<usize> = (0..n).map(|_| rng.gen_range(0..n)).collect();
                let sample_labels: Vec<u8> = rows.iter().map(|&i| labels[i]).collect();
                tree_params.fit(&features.select_rows(&rows), &sample_labels)
            } else {
                tree_params.fit(features, labels)
            }
        };

        #[cfg(not(feature = "parallel"))]
        let iterator = 0..self.n_estimators;

        #[cfg(feature = "parallel")]
        let iterator = (0..self.n_estimators).into_par_iter();

        let trees = iterator.map(fit_tree).collect::<Result<Vec<_>, _>>()?;
        debug!(trees = trees.len(), max_features, "Fitted random forest");

        Ok(RandomForest {
            n_features: d,
            trees,
        })
    }
}

impl RandomForest {
    pub fn n_trees(&self) -> usize {
        self.trees.len()
    }

    pub fn predict_proba(&self, features: &DMatrix<f64>) -> Result<Vec<f64>, LearnError> {
        check_width(features, self.n_features)?;
        let mut totals = vec![0.0; features.nrows()];
        for tree in &self.trees {
            for (total, p) in totals.iter_mut().zip(tree.predict_proba(features)?) {
                *total += p;
            }
        }
        let count = self.trees.len().max(1) as f64;
        Ok(totals.into_iter().map(|t| t / count).collect())
    }
}

impl Classifier for RandomForest {
    fn predict(&self, features: &DMatrix<f64>) -> Result<Vec<u8>, LearnError> {
        Ok(self
            .predict_proba(features)?
            .into_iter()
            .map(|p| u8::from(p > 0.5))
            .collect())
    }

    fn n_features(&self) -> usize {
        self.n_features
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn clusters() -> (DMatrix<f64>, Vec<u8>) {
        let x = DMatrix::from_fn(40, 4, |i, j| {
            let base = if i < 20 { 0.0 } else { 10.0 };
            base + ((i * 13 + j * 7) % 5) as f64 * 0.3
        });
        let y = (0..40).map(|i| u8::from(i >= 20)).collect();
        (x, y)
    }

    #[test]
    fn separates_well_spaced_clusters() {
        let (x, y) = clusters();
        let params = RandomForestParams {
            n_estimators: 15,
            ..Default::default()
        };
        let forest = params.fit(&x, &y).unwrap();
        assert_eq!(forest.n_trees(), 15);
        assert_eq!(forest.predict(&x).unwrap(), y);
    }

    #[test]
    fn same_seed_gives_same_forest() {
        let (x, y) = clusters();
        let params = RandomForestParams {
            n_estimators: 5,
            seed: 11,
            ..Default::default()
        };
        assert_eq!(params.fit(&x, &y).unwrap(), params.fit(&x, &y).unwrap());
    }

    #[test]
    fn zero_estimators_is_rejected() {
        let (x, y) = clusters();
        let params = RandomForestParams {
            n_estimators: 0,
            ..Default::default()
        };
        assert!(matches!(
            params.fit(&x, &y),
            Err(LearnError::InvalidHyperParameter { name: "n-estimators", .. })
        ));
    }
}
