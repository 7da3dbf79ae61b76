//! # Featurization Module
//!
//! Converts compositions into fixed-width numeric descriptors.
//!
//! ## Key Components
//!
//! - [`featurizer`] - The [`featurizer::Featurizer`] trait, featurizer composition and
//!   row-wise matrix construction with zero-filling of undefined values
//! - [`stoichiometry`] - p-norms of the atomic fractions
//! - [`element_property`] - Fraction-weighted statistics of elemental properties
//! - [`cohesive`] - Cohesive energy from formation energies and elemental values
//!
//! Featurizers report undefined values (for example the electronegativity of a
//! noble gas) as `NaN`; they are replaced by zero only once the full matrix has been
//! assembled, so every featurizer stays a pure function of its composition.

pub mod cohesive;
pub mod element_property;
pub mod featurizer;
pub mod stoichiometry;

use thiserror::Error;

#[derive(Debug, Error)]
pub enum FeatureError {
    #[error("Cannot featurize an empty composition")]
    EmptyComposition,
    #[error("Formation energy lookup failed for '{formula}': {message}")]
    FormationEnergy { formula: String, message: String },
    #[error("Featurizer '{name}' produced {found} values but declares {expected} labels")]
    WidthMismatch {
        name: &'static str,
        expected: usize,
        found: usize,
    },
    #[error("Compound {row} carries {found} pre-supplied features, expected {expected}")]
    ExtraFeatureWidth {
        row: usize,
        expected: usize,
        found: usize,
    },
    #[error("File I/O error for '{path}': {source}")]
    Io {
        path: String,
        source: std::io::Error,
    },
    #[error("CSV parsing error for '{path}': {source}")]
    Csv { path: String, source: csv::Error },
    #[error("Invalid formula in '{path}': {source}")]
    Formula {
        path: String,
        source: crate::core::chem::ChemError,
    },
}
