use thiserror::Error;

use super::config::ConfigError;
use super::validation::group_kfold::SplitError;
use crate::core::chem::ChemError;
use crate::core::features::FeatureError;
use crate::core::io::table::TableError;
use crate::core::learn::LearnError;
use crate::core::learn::artifact::ArtifactError;

#[derive(Debug, Error)]
pub enum EngineError {
    #[error("Invalid configuration: {source}")]
    Config {
        #[from]
        source: ConfigError,
    },

    #[error("Table error: {source}")]
    Table {
        #[from]
        source: TableError,
    },

    #[error("Composition error: {source}")]
    Chemistry {
        #[from]
        source: ChemError,
    },

    #[error("Featurization failed: {source}")]
    Feature {
        #[from]
        source: FeatureError,
    },

    #[error("Cross-validation split failed: {source}")]
    Split {
        #[from]
        source: SplitError,
    },

    #[error("Model '{model}' failed: {source}")]
    Model { model: String, source: LearnError },

    #[error("Model artifact error: {source}")]
    Artifact {
        #[from]
        source: ArtifactError,
    },

    #[error("Dataset has no labelled compounds to {purpose}")]
    NoData { purpose: &'static str },

    #[error("Compound '{formula}' from input row {row} has no stability label")]
    MissingLabel { row: usize, formula: String },

    #[error("Received {0} predictions, which cannot be grouped into compound pairs")]
    UnpairedPredictions(usize),

    #[error("Failed to start worker pool: {0}")]
    WorkerPool(String),

    #[error("Internal logic error: {0}")]
    Internal(String),
}
