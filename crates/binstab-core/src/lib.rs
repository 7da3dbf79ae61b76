//! # binstab Core Library
//!
//! A library for predicting and evaluating the stability of binary chemical systems
//! from compositional descriptors.
//!
//! ## Architectural Philosophy
//!
//! The library follows a strict three-layer architecture so that every step of the
//! pipeline is an explicit, testable transformation.
//!
//! - **[`core`]: The Foundation.** Stateless chemistry (`Element`, `Composition`),
//!   data models (`SystemRecord`, `CompoundSet`, `FeatureMatrix`), delimited table I/O,
//!   compositional featurizers, and the classifier implementations.
//!
//! - **[`engine`]: The Logic Core.** Configuration, error handling, progress reporting,
//!   the pure pipeline steps (load, subsample, convert, featurize), grouped k-fold
//!   cross-validation with per-fold oversampling, classification metrics, and the
//!   mapping of pair predictions onto stability vectors.
//!
//! - **[`workflows`]: The Public API.** End-to-end procedures (`evaluate`, `train`,
//!   `predict`, `featurize`) that tie `engine` and `core` together.

pub mod core;
pub mod engine;
pub mod workflows;
