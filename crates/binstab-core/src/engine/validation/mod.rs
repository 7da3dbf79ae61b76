//! Grouped cross-validation of candidate classifiers.
//!
//! - [`group_kfold`] - Fold assignment that keeps every group inside one fold
//! - [`oversample`] - Random minority-class oversampling of a training partition
//! - [`metrics`] - Accuracy, precision, recall and F1 for the positive class
//! - [`cross_validate`] - Fitting and scoring one candidate on every fold

pub mod cross_validate;
pub mod group_kfold;
pub mod metrics;
pub mod oversample;
