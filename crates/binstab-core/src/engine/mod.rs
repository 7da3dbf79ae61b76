//! # Engine Module
//!
//! This module holds the logic between the stateless [`crate::core`] building blocks
//! and the end-to-end [`crate::workflows`]: how a record table becomes a labelled
//! feature matrix, and how candidate classifiers are scored on it.
//!
//! ## Architecture
//!
//! - **Configuration** ([`config`]) - Typed configs with builders for every workflow
//! - **Pipeline** ([`pipeline`]) - Pure steps: load, subsample, parse, convert, featurize
//! - **Conversion** ([`converter`]) - Element pairs to grouped compound pairs
//! - **Stability Mapping** ([`stability`]) - Pair predictions to stability vectors
//! - **Validation** ([`validation`]) - Grouped k-fold, oversampling, metrics and
//!   cross-validation
//! - **Progress Monitoring** ([`progress`]) - Callback-based progress events
//! - **Error Handling** ([`error`]) - The aggregate error type of the library
//!
//! Every step takes its inputs by reference and returns a new value, so a workflow
//! is a straight sequence of calls with no hidden state carried between them.

pub mod config;
pub mod converter;
pub mod error;
pub mod pipeline;
pub mod progress;
pub mod stability;
pub mod validation;
