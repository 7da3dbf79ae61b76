use crate::core::features::cohesive::{CohesiveEnergy, FormationEnergySource};
use crate::core::features::element_property::{ElementProperty, ElementalProperty, Statistic};
use crate::core::features::featurizer::MultipleFeaturizer;
use crate::core::features::stoichiometry::{DEFAULT_P_NORMS, Stoichiometry};
use crate::core::io::table::ColumnMapping;
use crate::core::learn::spec::{CandidateModel, default_candidates};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use thiserror::Error;

#[derive(Debug, Error, PartialEq, Eq, Clone)]
pub enum ConfigError {
    #[error("Missing required parameter: {0}")]
    MissingParameter(&'static str),
    #[error("Invalid value for '{parameter}': {reason}")]
    Invalid {
        parameter: &'static str,
        reason: String,
    },
}

/// Integer stoichiometry `A_a B_b` of one member of a compound pair.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct FormulaPair {
    pub a: u32,
    pub b: u32,
}

impl FormulaPair {
    pub const fn new(a: u32, b: u32) -> Self {
        Self { a, b }
    }
}

/// The two stoichiometries every binary system is expanded into, slot 0 first.
pub const DEFAULT_FORMULA_PAIRS: [FormulaPair; 2] = [FormulaPair::new(2, 1), FormulaPair::new(1, 2)];

#[derive(Debug, Clone, PartialEq)]
pub struct ConversionConfig {
    pub formula_pairs: [FormulaPair; 2],
    pub drop_noble_gases: bool,
}

impl ConversionConfig {
    pub fn new(formula_pairs: [FormulaPair; 2], drop_noble_gases: bool) -> Result<Self, ConfigError> {
        if formula_pairs.iter().any(|p| p.a == 0 || p.b == 0) {
            return Err(ConfigError::Invalid {
                parameter: "formula-pair",
                reason: format!(
                    "stoichiometric coefficients must be positive, got {:?}",
                    formula_pairs
                ),
            });
        }
        Ok(Self {
            formula_pairs,
            drop_noble_gases,
        })
    }
}

impl Default for ConversionConfig {
    fn default() -> Self {
        Self {
            formula_pairs: DEFAULT_FORMULA_PAIRS,
            drop_noble_gases: true,
        }
    }
}

/// How the input table is read before conversion.
#[derive(Debug, Clone, PartialEq)]
pub struct DataConfig {
    pub columns: ColumnMapping,
    pub delimiter: u8,
    /// Number of rows to keep, chosen uniformly at random; all rows when absent.
    pub subsample: Option<usize>,
    pub seed: u64,
}

impl Default for DataConfig {
    fn default() -> Self {
        Self {
            columns: ColumnMapping::default(),
            delimiter: b',',
            subsample: None,
            seed: 0,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ElementPropertyConfig {
    pub properties: Vec<ElementalProperty>,
    pub stats: Vec<Statistic>,
}

impl Default for ElementPropertyConfig {
    fn default() -> Self {
        Self {
            properties: ElementalProperty::PRESET.to_vec(),
            stats: Statistic::ALL.to_vec(),
        }
    }
}

/// Which featurizers are applied, in output order: stoichiometry, element
/// properties, cohesive energy.
#[derive(Debug, Clone, PartialEq)]
pub struct FeatureSetConfig {
    pub stoichiometry: Option<Vec<u32>>,
    pub element_property: Option<ElementPropertyConfig>,
    pub cohesive_energy: bool,
}

impl Default for FeatureSetConfig {
    fn default() -> Self {
        Self {
            stoichiometry: Some(DEFAULT_P_NORMS.to_vec()),
            element_property: Some(ElementPropertyConfig::default()),
            cohesive_energy: false,
        }
    }
}

impl FeatureSetConfig {
    /// Instantiates the configured featurizers. `formation_energies` is required when
    /// cohesive energies are enabled.
    pub fn build(
        &self,
        formation_energies: Option<Arc<dyn FormationEnergySource>>,
    ) -> Result<MultipleFeaturizer, ConfigError> {
        let mut featurizer = MultipleFeaturizer::default();
        if let Some(p_list) = &self.stoichiometry {
            featurizer.push(Box::new(Stoichiometry::new(p_list.clone())));
        }
        if let Some(ep) = &self.element_property {
            featurizer.push(Box::new(ElementProperty::new(
                ep.properties.clone(),
                ep.stats.clone(),
            )));
        }
        if self.cohesive_energy {
            let source = formation_energies
                .ok_or(ConfigError::MissingParameter("formation_energy_source"))?;
            featurizer.push(Box::new(CohesiveEnergy::new(source)));
        }
        if featurizer.is_empty() {
            return Err(ConfigError::Invalid {
                parameter: "features",
                reason: "at least one featurizer must be enabled".to_string(),
            });
        }
        Ok(featurizer)
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct EvaluationConfig {
    pub data: DataConfig,
    pub conversion: ConversionConfig,
    pub n_splits: usize,
    pub oversample: bool,
    pub seed: u64,
    /// Size of the worker pool evaluating candidates concurrently.
    pub workers: usize,
    pub candidates: Vec<CandidateModel>,
}

#[derive(Default)]
pub struct EvaluationConfigBuilder {
    data: Option<DataConfig>,
    conversion: Option<ConversionConfig>,
    n_splits: Option<usize>,
    oversample: Option<bool>,
    seed: Option<u64>,
    workers: Option<usize>,
    candidates: Option<Vec<CandidateModel>>,
}

fn default_workers() -> usize {
    std::thread::available_parallelism().map_or(1, |n| n.get())
}

fn check_unique_names(candidates: &[CandidateModel]) -> Result<(), ConfigError> {
    for (i, candidate) in candidates.iter().enumerate() {
        if candidates[..i].iter().any(|c| c.name == candidate.name) {
            return Err(ConfigError::Invalid {
                parameter: "models",
                reason: format!("duplicate model name '{}'", candidate.name),
            });
        }
    }
    Ok(())
}

impl EvaluationConfigBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn data(mut self, data: DataConfig) -> Self {
        self.data = Some(data);
        self
    }
    pub fn conversion(mut self, conversion: ConversionConfig) -> Self {
        self.conversion = Some(conversion);
        self
    }
    pub fn n_splits(mut self, n: usize) -> Self {
        self.n_splits = Some(n);
        self
    }
    pub fn oversample(mut self, enabled: bool) -> Self {
        self.oversample = Some(enabled);
        self
    }
    pub fn seed(mut self, seed: u64) -> Self {
        self.seed = Some(seed);
        self
    }
    pub fn workers(mut self, workers: usize) -> Self {
        self.workers = Some(workers);
        self
    }
    pub fn candidates(mut self, candidates: Vec<CandidateModel>) -> Self {
        self.candidates = Some(candidates);
        self
    }

    pub fn build(self) -> Result<EvaluationConfig, ConfigError> {
        let n_splits = self.n_splits.ok_or(ConfigError::MissingParameter("n_splits"))?;
        if n_splits < 2 {
            return Err(ConfigError::Invalid {
                parameter: "n_splits",
                reason: format!("at least 2 folds are required, got {n_splits}"),
            });
        }
        let workers = self.workers.unwrap_or_else(default_workers);
        if workers == 0 {
            return Err(ConfigError::Invalid {
                parameter: "workers",
                reason: "at least one worker is required".to_string(),
            });
        }
        let candidates = self.candidates.unwrap_or_else(default_candidates);
        if candidates.is_empty() {
            return Err(ConfigError::Invalid {
                parameter: "models",
                reason: "at least one candidate model is required".to_string(),
            });
        }
        check_unique_names(&candidates)?;

        Ok(EvaluationConfig {
            data: self.data.ok_or(ConfigError::MissingParameter("data"))?,
            conversion: self.conversion.unwrap_or_default(),
            n_splits,
            oversample: self.oversample.unwrap_or(true),
            seed: self.seed.unwrap_or(0),
            workers,
            candidates,
        })
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct TrainConfig {
    pub data: DataConfig,
    pub conversion: ConversionConfig,
    pub oversample: bool,
    pub seed: u64,
    pub candidate: CandidateModel,
}

#[derive(Default)]
pub struct TrainConfigBuilder {
    data: Option<DataConfig>,
    conversion: Option<ConversionConfig>,
    oversample: Option<bool>,
    seed: Option<u64>,
    candidate: Option<CandidateModel>,
}

impl TrainConfigBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn data(mut self, data: DataConfig) -> Self {
        self.data = Some(data);
        self
    }
    pub fn conversion(mut self, conversion: ConversionConfig) -> Self {
        self.conversion = Some(conversion);
        self
    }
    pub fn oversample(mut self, enabled: bool) -> Self {
        self.oversample = Some(enabled);
        self
    }
    pub fn seed(mut self, seed: u64) -> Self {
        self.seed = Some(seed);
        self
    }
    pub fn candidate(mut self, candidate: CandidateModel) -> Self {
        self.candidate = Some(candidate);
        self
    }

    pub fn build(self) -> Result<TrainConfig, ConfigError> {
        Ok(TrainConfig {
            data: self.data.ok_or(ConfigError::MissingParameter("data"))?,
            conversion: self.conversion.unwrap_or_default(),
            oversample: self.oversample.unwrap_or(true),
            seed: self.seed.unwrap_or(0),
            candidate: self
                .candidate
                .ok_or(ConfigError::MissingParameter("candidate"))?,
        })
    }
}

pub const DEFAULT_PREDICTION_COLUMN: &str = "predicted_stability";

#[derive(Debug, Clone, PartialEq)]
pub struct PredictionConfig {
    pub data: DataConfig,
    pub conversion: ConversionConfig,
    pub output_column: String,
}

#[derive(Default)]
pub struct PredictionConfigBuilder {
    data: Option<DataConfig>,
    conversion: Option<ConversionConfig>,
    output_column: Option<String>,
}

impl PredictionConfigBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn data(mut self, data: DataConfig) -> Self {
        self.data = Some(data);
        self
    }
    pub fn conversion(mut self, conversion: ConversionConfig) -> Self {
        self.conversion = Some(conversion);
        self
    }
    pub fn output_column(mut self, name: impl Into<String>) -> Self {
        self.output_column = Some(name.into());
        self
    }

    pub fn build(self) -> Result<PredictionConfig, ConfigError> {
        let output_column = self
            .output_column
            .unwrap_or_else(|| DEFAULT_PREDICTION_COLUMN.to_string());
        if output_column.trim().is_empty() {
            return Err(ConfigError::Invalid {
                parameter: "output_column",
                reason: "column name cannot be empty".to_string(),
            });
        }
        Ok(PredictionConfig {
            data: self.data.ok_or(ConfigError::MissingParameter("data"))?,
            conversion: self.conversion.unwrap_or_default(),
            output_column,
        })
    }
}

/// Settings of the featurize workflow: reading and conversion only.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct FeaturizeConfig {
    pub data: DataConfig,
    pub conversion: ConversionConfig,
}
