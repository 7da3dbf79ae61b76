//! # Workflows Module
//!
//! End-to-end entry points of binstab. Each workflow receives an already loaded
//! [`RecordTable`](crate::core::io::table::RecordTable), its typed configuration and
//! a featurizer built from a [`FeatureSetConfig`](crate::engine::config::FeatureSetConfig),
//! runs the [`pipeline`](crate::engine::pipeline) steps and returns a plain value.
//!
//! - **Evaluation** ([`evaluate`]) - Grouped k-fold scoring of every candidate model
//! - **Training** ([`train`]) - Fitting one candidate on a full labelled table
//! - **Prediction** ([`predict`]) - Applying a model artifact and writing stability vectors
//! - **Featurization** ([`featurize`]) - Exporting the compound table with its features

pub mod evaluate;
pub mod featurize;
pub mod predict;
pub mod train;
