//! Provides input/output functionality for delimited record tables.
//!
//! Tables are read into an immutable [`table::RecordTable`], parsed into system
//! records through a column mapping, and written back out with computed columns
//! appended.

pub mod table;
