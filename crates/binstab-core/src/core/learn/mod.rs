//! # Learning Module
//!
//! Binary classifiers trained on feature matrices, plus the artifact format used to
//! persist a fitted model between `train` and `predict`.
//!
//! ## Key Components
//!
//! - [`traits`] - The [`traits::Classifier`] trait shared by every fitted model
//! - [`preprocessing`] - Per-column standardization
//! - [`logistic`], [`neighbors`], [`naive_bayes`], [`tree`], [`forest`] - The five
//!   classifier families
//! - [`spec`] - Serializable hyper-parameters, the fitted-model enum and the default
//!   candidate zoo
//! - [`artifact`] - JSON model artifacts with version and feature-label checks
//!
//! Labels are always `0` or `1`. A training set containing a single class yields a
//! model that predicts that class for every input.

pub mod artifact;
pub mod forest;
pub mod logistic;
pub mod naive_bayes;
pub mod neighbors;
pub mod preprocessing;
pub mod spec;
pub mod traits;
pub mod tree;

use nalgebra::DMatrix;
use thiserror::Error;

#[derive(Debug, Error, Clone, PartialEq)]
pub enum LearnError {
    #[error("Cannot fit a classifier on an empty training set")]
    EmptyTrainingSet,
    #[error("Training set has {samples} samples but {labels} labels")]
    LabelCount { samples: usize, labels: usize },
    #[error("Label {0} is not binary; labels must be 0 or 1")]
    NonBinaryLabel(u8),
    #[error("Model was fitted on {expected} features but received {found}")]
    FeatureWidth { expected: usize, found: usize },
    #[error("Invalid hyper-parameter '{name}': {reason}")]
    InvalidHyperParameter { name: &'static str, reason: String },
}

/// Number of samples of class 0 and class 1.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct ClassCounts {
    pub negative: usize,
    pub positive: usize,
}

impl ClassCounts {
    pub fn of(labels: &[u8]) -> Self {
        let positive = labels.iter().filter(|&&y| y == 1).count();
        Self {
            negative: labels.len() - positive,
            positive,
        }
    }

    /// The only class present, if the labels are not mixed.
    pub fn single_class(&self) -> Option<u8> {
        match (self.negative, self.positive) {
            (0, p) if p > 0 => Some(1),
            (n, 0) if n > 0 => Some(0),
            _ => None,
        }
    }

    /// Majority class; ties resolve to 0.
    pub fn majority(&self) -> u8 {
        u8::from(self.positive > self.negative)
    }
}

/// Checks the common preconditions of every `fit` and returns the class counts.
pub(crate) fn validate_training_set(
    features: &DMatrix<f64>,
    labels: &[u8],
) -> Result<ClassCounts, LearnError> {
    if features.nrows() == 0 || features.ncols() == 0 {
        return Err(LearnError::EmptyTrainingSet);
    }
    if features.nrows() != labels.len() {
        return Err(LearnError::LabelCount {
            samples: features.nrows(),
            labels: labels.len(),
        });
    }
    if let Some(&bad) = labels.iter().find(|&&y| y > 1) {
        return Err(LearnError::NonBinaryLabel(bad));
    }
    Ok(ClassCounts::of(labels))
}

pub(crate) fn check_width(features: &DMatrix<f64>, expected: usize) -> Result<(), LearnError> {
    if features.ncols() != expected {
        return Err(LearnError::FeatureWidth {
            expected,
            found: features.ncols(),
        });
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn class_counts_report_majority_and_single_class() {
        let counts = ClassCounts::of(&[1, 0, 1]);
        assert_eq!(counts, ClassCounts { negative: 1, positive: 2 });
        assert_eq!(counts.majority(), 1);
        assert_eq!(counts.single_class(), None);

        assert_eq!(ClassCounts::of(&[0, 0]).single_class(), Some(0));
        assert_eq!(ClassCounts::of(&[0, 1]).majority(), 0);
    }

    #[test]
    fn validation_rejects_bad_inputs() {
        let x = DMatrix::from_row_slice(2, 1, &[0.0, 1.0]);
        assert_eq!(
            validate_training_set(&DMatrix::zeros(0, 1), &[]),
            Err(LearnError::EmptyTrainingSet)
        );
        assert_eq!(
            validate_training_set(&x, &[0]),
            Err(LearnError::LabelCount { samples: 2, labels: 1 })
        );
        assert_eq!(
            validate_training_set(&x, &[0, 2]),
            Err(LearnError::NonBinaryLabel(2))
        );
        assert!(validate_training_set(&x, &[0, 1]).is_ok());
    }
}
