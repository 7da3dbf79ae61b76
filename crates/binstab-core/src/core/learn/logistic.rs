use super::preprocessing::StandardScaler;
use super::traits::Classifier;
use super::{LearnError, check_width, validate_training_set};
use nalgebra::{DMatrix, DVector};
use serde::{Deserialize, Serialize};
use tracing::trace;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "kebab-case")]
pub struct LogisticRegressionParams {
    /// Inverse regularization strength; smaller values regularize more.
    pub c: f64,
    pub max_iter: usize,
    pub learning_rate: f64,
    /// Gradient norm (max-abs) below which optimization stops.
    pub tol: f64,
}

impl Default for LogisticRegressionParams {
    fn default() -> Self {
        Self {
            c: 1.0,
            max_iter: 1000,
            learning_rate: 0.5,
            tol: 1e-6,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LogisticRegression {
    scaler: StandardScaler,
    weights: DVector<f64>,
    bias: f64,
    constant: Option<u8>,
}

fn sigmoid(z: f64) -> f64 {
    if z >= 0.0 {
        1.0 / (1.0 + (-z).exp())
    } else {
        let e = z.exp();
        e / (1.0 + e)
    }
}

impl LogisticRegressionParams {
    fn validate(&self) -> Result<(), LearnError> {
        if !(self.c > 0.0 && self.c.is_finite()) {
            return Err(LearnError::InvalidHyperParameter {
                name: "c",
                reason: format!("must be positive, got {}", self.c),
            });
        }
        if !(self.learning_rate > 0.0 && self.learning_rate.is_finite()) {
            return Err(LearnError::InvalidHyperParameter {
                name: "learning-rate",
                reason: format!("must be positive, got {}", self.learning_rate),
            });
        }
        Ok(())
    }

    /// Minimizes the mean log-loss plus `‖w‖² / (2·C·n)` by batch gradient descent
    /// on standardized features.
    pub fn fit(
        &self,
        features: &DMatrix<f64>,
        labels: &[u8],
    ) -> Result<LogisticRegression, LearnError> {
        self.validate()?;
        let counts = validate_training_set(features, labels)?;
        let scaler = StandardScaler::fit(features);
        let d = features.ncols();

        if let Some(class) = counts.single_class() {
            return Ok(LogisticRegression {
                scaler,
                weights: DVector::zeros(d),
                bias: 0.0,
                constant: Some(class),
            });
        }

        let x = scaler.transform(features);
        let y = DVector::from_iterator(labels.len(), labels.iter().map(|&l| l as f64));
        let n = x.nrows() as f64;
        let penalty = 1.0 / (self.c * n);

        let mut weights = DVector::zeros(d);
        let mut bias = 0.0;
        for iteration in 0..self.max_iter {
            let logits = &x * &weights;
            let residual = DVector::from_iterator(
                logits.len(),
                logits.iter().zip(y.iter()).map(|(z, t)| sigmoid(z + bias) - t),
            );
            let grad_w = x.tr_mul(&residual) / n + &weights * penalty;
            let grad_b = residual.sum() / n;

            weights -= &grad_w * self.learning_rate;
            bias -= grad_b * self.learning_rate;

            let grad_norm = grad_w.amax().max(grad_b.abs());
            if grad_norm < self.tol {
                trace!(iteration, grad_norm, "Logistic regression converged");
                break;
            }
        }

        Ok(LogisticRegression {
            scaler,
            weights,
            bias,
            constant: None,
        })
    }
}

impl LogisticRegression {
    /// Probability of class 1 for each row.
    pub fn predict_proba(&self, features: &DMatrix<f64>) -> Result<Vec<f64>, LearnError> {
        check_width(features, self.scaler.n_features())?;
        if let Some(class) = self.constant {
            return Ok(vec![class as f64; features.nrows()]);
        }
        let logits = self.scaler.transform(features) * &self.weights;
        Ok(logits.iter().map(|z| sigmoid(z + self.bias)).collect())
    }
}

impl Classifier for LogisticRegression {
    fn predict(&self, features: &DMatrix<f64>) -> Result<Vec<u8>, LearnError> {
        Ok(self
            .predict_proba(features)?
            .into_iter()
            .map(|p| u8::from(p > 0.5))
            .collect())
    }

    fn n_features(&self) -> usize {
        self.scaler.n_features()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn separable() -> (DMatrix<f64>, Vec<u8>) {
        let x = DMatrix::from_row_slice(
            8,
            2,
            &[
                0.0, 0.1, 0.2, 0.3, 0.4, 0.0, 0.1, 0.5, //
                3.0, 3.1, 3.2, 2.9, 2.8, 3.3, 3.5, 3.0,
            ],
        );
        (x, vec![0, 0, 0, 0, 1, 1, 1, 1])
    }

    #[test]
    fn learns_linearly_separable_data() {
        let (x, y) = separable();
        let model = LogisticRegressionParams::default().fit(&x, &y).unwrap();
        assert_eq!(model.predict(&x).unwrap(), y);

        let probabilities = model.predict_proba(&x).unwrap();
        assert!(probabilities[0] < 0.5 && probabilities[7] > 0.5);
    }

    #[test]
    fn single_class_predicts_that_class() {
        let (x, _) = separable();
        let model = LogisticRegressionParams::default().fit(&x, &[1; 8]).unwrap();
        assert_eq!(model.predict(&x).unwrap(), vec![1; 8]);
    }

    #[test]
    fn rejects_wrong_width_and_bad_hyper_parameters() {
        let (x, y) = separable();
        let model = LogisticRegressionParams::default().fit(&x, &y).unwrap();
        assert_eq!(
            model.predict(&DMatrix::zeros(1, 3)),
            Err(LearnError::FeatureWidth { expected: 2, found: 3 })
        );

        let params = LogisticRegressionParams {
            c: 0.0,
            ..Default::default()
        };
        assert!(matches!(
            params.fit(&x, &y),
            Err(LearnError::InvalidHyperParameter { name: "c", .. })
        ));
    }
}
