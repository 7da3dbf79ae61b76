//! Chemical primitives: elements, their tabulated properties and compositions.

pub mod composition;
pub mod configuration;
pub mod elements;

use thiserror::Error;

#[derive(Debug, Error, Clone, PartialEq)]
pub enum ChemError {
    #[error("Unknown element symbol '{0}'")]
    UnknownElement(String),
    #[error("Invalid formula '{formula}': {reason}")]
    InvalidFormula { formula: String, reason: String },
    #[error("Invalid amount {amount} for element {symbol}; amounts must be positive and finite")]
    InvalidAmount { symbol: &'static str, amount: f64 },
}
