//! # Core Models Module
//!
//! Data structures describing the rows that flow through the pipeline.
//!
//! ## Key Components
//!
//! - [`ids`] - Group identifiers linking the members of a compound pair
//! - [`record`] - Parsed rows of the input table and their stability vectors
//! - [`compound`] - Compound rows produced by the converter, one per pair member
//! - [`features`] - Dense feature matrices with their column labels
//!
//! ## Usage
//!
//! ```ignore
//! use binstab::core::models::record::{StabilityVector, SystemRecord};
//!
//! let vector: StabilityVector = "[1, 0]".parse()?;
//! assert_eq!(vector.slot(0), 1);
//! ```

pub mod compound;
pub mod features;
pub mod ids;
pub mod record;
