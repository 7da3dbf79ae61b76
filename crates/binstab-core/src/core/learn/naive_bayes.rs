use super::traits::Classifier;
use super::{LearnError, check_width, validate_training_set};
use nalgebra::DMatrix;
use serde::{Deserialize, Serialize};
use std::f64::consts::PI;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "kebab-case")]
pub struct GaussianNaiveBayesParams {
    /// Fraction of the largest feature variance added to every class variance.
    pub var_smoothing: f64,
}

impl Default for GaussianNaiveBayesParams {
    fn default() -> Self {
        Self {
            var_smoothing: 1e-9,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
struct ClassDistribution {
    label: u8,
    log_prior: f64,
    mean: Vec<f64>,
    variance: Vec<f64>,
}

impl ClassDistribution {
    fn joint_log_likelihood(&self, sample: &[f64]) -> f64 {
        self.log_prior
            + sample
                .iter()
                .zip(self.mean.iter().zip(&self.variance))
                .map(|(x, (m, v))| -0.5 * (2.0 * PI * v).ln() - (x - m).powi(2) / (2.0 * v))
                .sum::<f64>()
    }
}

/// Gaussian naive Bayes with per-class, per-feature normal likelihoods.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GaussianNaiveBayes {
    n_features: usize,
    classes: Vec<ClassDistribution>,
}

fn column_variance(values: impl Iterator<Item = f64> + Clone) -> (f64, f64) {
    let n = values.clone().count().max(1) as f64;
    let mean = values.clone().sum::<f64>() / n;
    let var = values.map(|v| (v - mean).powi(2)).sum::<f64>() / n;
    (mean, var)
}

impl GaussianNaiveBayesParams {
    pub fn fit(
        &self,
        features: &DMatrix<f64>,
        labels: &[u8],
    ) -> Result<GaussianNaiveBayes, LearnError> {
        if !(self.var_smoothing >= 0.0 && self.var_smoothing.is_finite()) {
            return Err(LearnError::InvalidHyperParameter {
                name: "var-smoothing",
                reason: format!("must be non-negative, got {}", self.var_smoothing),
            });
        }
        validate_training_set(features, labels)?;
        let n = labels.len() as f64;
        let d = features.ncols();

        let max_variance = features
            .column_iter()
            .map(|col| column_variance(col.iter().copied()).1)
            .fold(0.0, f64::max);
        // Keeps the likelihood finite for constant features.
        let epsilon = (self.var_smoothing * max_variance).max(f64::MIN_POSITIVE);

        let mut classes = Vec::new();
        for label in [0u8, 1] {
            let members: Vec<usize> = (0..labels.len()).filter(|&i| labels[i] == label).collect();
            if members.is_empty() {
                continue;
            }
            let (mean, variance): (Vec<f64>, Vec<f64>) = (0..d)
                .map(|j| {
                    let (m, v) = column_variance(members.iter().map(|&i| features[(i, j)]));
                    (m, v + epsilon)
                })
                .unzip();
            classes.push(ClassDistribution {
                label,
                log_prior: (members.len() as f64 / n).ln(),
                mean,
                variance,
            });
        }

        Ok(GaussianNaiveBayes {
            n_features: d,
            classes,
        })
    }
}

impl Classifier for GaussianNaiveBayes {
    fn predict(&self, features: &DMatrix<f64>) -> Result<Vec<u8>, LearnError> {
        check_width(features, self.n_features)?;
        Ok(features
            .row_iter()
            .map(|row| {
                let sample: Vec<f64> = row.iter().copied().collect();
                let mut best = (f64::NEG_INFINITY, self.classes.first().map_or(0, |c| c.label));
                for class in &self.classes {
                    let score = class.joint_log_likelihood(&sample);
                    // Strict comparison keeps the lower label on ties.
                    if score > best.0 {
                        best = (score, class.label);
                    }
                }
                best.1
            })
            .collect())
    }

    fn n_features(&self) -> usize {
        self.n_features
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn separates_gaussian_clusters() {
        let x = DMatrix::from_row_slice(
            6,
            2,
            &[
                0.0, 1.0, 0.2, 0.8, -0.1, 1.1, //
                4.0, -2.0, 4.2, -2.1, 3.9, -1.8,
            ],
        );
        let y = [0, 0, 0, 1, 1, 1];
        let model = GaussianNaiveBayesParams::default().fit(&x, &y).unwrap();
        assert_eq!(model.predict(&x).unwrap(), y.to_vec());

        let query = DMatrix::from_row_slice(1, 2, &[3.5, -1.5]);
        assert_eq!(model.predict(&query).unwrap(), vec![1]);
    }

    #[test]
    fn single_class_predicts_that_class() {
        let x = DMatrix::from_row_slice(3, 1, &[0.0, 1.0, 2.0]);
        let model = GaussianNaiveBayesParams::default().fit(&x, &[1, 1, 1]).unwrap();
        assert_eq!(model.predict(&x).unwrap(), vec![1, 1, 1]);
    }

    #[test]
    fn constant_features_do_not_break_likelihoods() {
        let x = DMatrix::from_row_slice(4, 2, &[1.0, 0.0, 1.0, 0.1, 1.0, 5.0, 1.0, 5.1]);
        let model = GaussianNaiveBayesParams::default().fit(&x, &[0, 0, 1, 1]).unwrap();
        assert_eq!(model.predict(&x).unwrap(), vec![0, 0, 1, 1]);
    }
}
