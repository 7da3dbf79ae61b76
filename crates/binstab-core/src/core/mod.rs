//! # Core Module
//!
//! This module provides the stateless building blocks of binstab: the chemical
//! model of elements and compositions, the tabular data models, delimited table I/O,
//! compositional featurizers and the classifiers trained on their output.
//!
//! ## Architecture
//!
//! - **Chemistry** ([`chem`]) - Periodic table data, electron configurations and compositions
//! - **Data Models** ([`models`]) - System records, compound rows, group ids and feature matrices
//! - **File I/O** ([`io`]) - Reading and writing delimited record tables
//! - **Featurization** ([`features`]) - Stoichiometric, elemental-property and cohesive-energy descriptors
//! - **Learning** ([`learn`]) - Binary classifiers, feature scaling and model artifacts
//!
//! ## Scientific Foundation
//!
//! - **Composition-based descriptors** in the spirit of Magpie elemental statistics
//! - **Stoichiometric p-norms** describing how evenly a compound is mixed
//! - **Cohesive energies** combining formation energies with tabulated elemental values

pub mod chem;
pub mod features;
pub mod io;
pub mod learn;
pub mod models;
