use crate::cli::{CommonArgs, EvaluateArgs, FeaturizeArgs, PredictArgs, TrainArgs};
use crate::error::{CliError, Result};
use crate::utils::parser;
use binstab::core::features::element_property::{ElementalProperty, Statistic};
use binstab::core::io::table::ColumnMapping;
use binstab::core::learn::spec::{CandidateModel, default_candidates};
use binstab::engine::config as core_config;
use serde::Deserialize;
use std::path::{Path, PathBuf};
use std::str::FromStr;
use tracing::debug;

#[derive(Deserialize, Debug, Default)]
#[serde(deny_unknown_fields)]
struct PartialInputConfig {
    delimiter: Option<String>,
    subsample: Option<usize>,
    seed: Option<u64>,
}

#[derive(Deserialize, Debug, Default)]
#[serde(deny_unknown_fields)]
struct PartialColumnsConfig {
    #[serde(rename = "element-a")]
    element_a: Option<String>,
    #[serde(rename = "element-b")]
    element_b: Option<String>,
    stability: Option<String>,
    group: Option<String>,
    features: Option<Vec<String>>,
}

#[derive(Deserialize, Debug, Default)]
#[serde(deny_unknown_fields)]
struct PartialConversionConfig {
    /// Two `"A:B"` coefficient pairs, slot 0 first.
    #[serde(rename = "formula-pairs")]
    formula_pairs: Option<Vec<String>>,
    #[serde(rename = "drop-noble-gases")]
    drop_noble_gases: Option<bool>,
}

#[derive(Deserialize, Debug, Default)]
#[serde(deny_unknown_fields)]
struct PartialFeaturesConfig {
    /// p-norms; an empty list disables the stoichiometry featurizer.
    stoichiometry: Option<Vec<u32>>,
    #[serde(rename = "element-property")]
    element_property: Option<bool>,
    properties: Option<Vec<ElementalProperty>>,
    stats: Option<Vec<Statistic>>,
    #[serde(rename = "cohesive-energy")]
    cohesive_energy: Option<bool>,
    #[serde(rename = "formation-energies")]
    formation_energies: Option<PathBuf>,
    #[serde(rename = "api-key-file")]
    api_key_file: Option<PathBuf>,
}

#[derive(Deserialize, Debug, Default)]
#[serde(deny_unknown_fields)]
struct PartialEvaluationConfig {
    #[serde(rename = "n-splits")]
    n_splits: Option<usize>,
    oversample: Option<bool>,
    seed: Option<u64>,
    workers: Option<usize>,
}

#[derive(Deserialize, Debug, Default)]
#[serde(deny_unknown_fields)]
struct PartialTrainingConfig {
    oversample: Option<bool>,
    seed: Option<u64>,
}

#[derive(Deserialize, Debug, Default)]
#[serde(deny_unknown_fields)]
struct PartialPredictionConfig {
    #[serde(rename = "output-column")]
    output_column: Option<String>,
}

/// Where formation energies for the cohesive-energy feature come from.
#[derive(Debug, Clone, PartialEq)]
pub enum FormationEnergySetting {
    Disabled,
    Table(PathBuf),
    MaterialsProject { api_key_file: PathBuf },
}

/// The resolved feature set together with its formation energy source.
#[derive(Debug, Clone, PartialEq)]
pub struct FeatureSelection {
    pub features: core_config::FeatureSetConfig,
    pub formation_energies: FormationEnergySetting,
}

#[derive(Deserialize, Debug, Default)]
#[serde(deny_unknown_fields)]
pub struct PartialConfig {
    input: Option<PartialInputConfig>,
    columns: Option<PartialColumnsConfig>,
    conversion: Option<PartialConversionConfig>,
    features: Option<PartialFeaturesConfig>,
    evaluation: Option<PartialEvaluationConfig>,
    training: Option<PartialTrainingConfig>,
    prediction: Option<PartialPredictionConfig>,
    models: Option<Vec<CandidateModel>>,
}

fn parse_value<T: FromStr>(key: &str, value: &str, kind: &str) -> Result<T> {
    value
        .trim()
        .parse()
        .map_err(|_| CliError::Config(format!("Invalid {} value for {}: {}", kind, key, value)))
}

impl PartialConfig {
    pub fn from_file(path: &Path) -> Result<Self> {
        debug!("Loading configuration from file: {:?}", path);
        let content = std::fs::read_to_string(path)?;
        toml::from_str(&content).map_err(|e| CliError::FileParsing {
            path: path.to_path_buf(),
            source: e.into(),
        })
    }

    /// Reads the config file when one is given; every setting falls back to its
    /// default otherwise.
    pub fn load(path: Option<&Path>) -> Result<Self> {
        match path {
            Some(path) => Self::from_file(path),
            None => {
                debug!("No configuration file given; using defaults.");
                Ok(Self::default())
            }
        }
    }

    pub fn merge_evaluate(
        mut self,
        args: &EvaluateArgs,
    ) -> Result<(core_config::EvaluationConfig, FeatureSelection)> {
        self.apply_set_values(&args.common.set_values)?;
        let data = self.merge_data(&args.common)?;
        let conversion = self.merge_conversion(&args.common)?;
        let features = self.merge_features(&args.common)?;
        let eval = self.evaluation.take().unwrap_or_default();

        let mut builder = core_config::EvaluationConfigBuilder::new()
            .data(data)
            .conversion(conversion)
            .n_splits(args.n_splits.or(eval.n_splits).unwrap_or(5))
            .oversample(args.oversample.resolve().or(eval.oversample).unwrap_or(true))
            .seed(args.seed.or(eval.seed).unwrap_or(0));
        if let Some(workers) = args.workers.or(eval.workers) {
            builder = builder.workers(workers);
        }
        if let Some(models) = self.models.take() {
            builder = builder.candidates(models);
        }
        Ok((builder.build()?, features))
    }

    pub fn merge_train(
        mut self,
        args: &TrainArgs,
    ) -> Result<(core_config::TrainConfig, FeatureSelection)> {
        self.apply_set_values(&args.common.set_values)?;
        let data = self.merge_data(&args.common)?;
        let conversion = self.merge_conversion(&args.common)?;
        let features = self.merge_features(&args.common)?;
        let training = self.training.take().unwrap_or_default();

        let candidates = self.models.take().unwrap_or_else(default_candidates);
        let candidate = candidates
            .iter()
            .find(|c| c.name == args.model)
            .cloned()
            .ok_or_else(|| {
                let available: Vec<&str> = candidates.iter().map(|c| c.name.as_str()).collect();
                CliError::Config(format!(
                    "Unknown model '{}'. Available models: {}",
                    args.model,
                    available.join(", ")
                ))
            })?;

        let config = core_config::TrainConfigBuilder::new()
            .data(data)
            .conversion(conversion)
            .oversample(
                args.oversample
                    .resolve()
                    .or(training.oversample)
                    .unwrap_or(true),
            )
            .seed(args.seed.or(training.seed).unwrap_or(0))
            .candidate(candidate)
            .build()?;
        Ok((config, features))
    }

    pub fn merge_predict(
        mut self,
        args: &PredictArgs,
    ) -> Result<(core_config::PredictionConfig, FeatureSelection)> {
        self.apply_set_values(&args.common.set_values)?;
        let data = self.merge_data(&args.common)?;
        let conversion = self.merge_conversion(&args.common)?;
        let features = self.merge_features(&args.common)?;
        let prediction = self.prediction.take().unwrap_or_default();

        let mut builder = core_config::PredictionConfigBuilder::new()
            .data(data)
            .conversion(conversion);
        if let Some(column) = args.output_column.clone().or(prediction.output_column) {
            builder = builder.output_column(column);
        }
        Ok((builder.build()?, features))
    }

    pub fn merge_featurize(
        mut self,
        args: &FeaturizeArgs,
    ) -> Result<(core_config::FeaturizeConfig, FeatureSelection)> {
        self.apply_set_values(&args.common.set_values)?;
        let config = core_config::FeaturizeConfig {
            data: self.merge_data(&args.common)?,
            conversion: self.merge_conversion(&args.common)?,
        };
        Ok((config, self.merge_features(&args.common)?))
    }

    fn merge_data(&mut self, common: &CommonArgs) -> Result<core_config::DataConfig> {
        let input = self.input.take().unwrap_or_default();
        let columns = self.columns.take().unwrap_or_default();

        let delimiter = match (common.delimiter, input.delimiter) {
            (Some(d), _) => d,
            (None, Some(d)) => parser::parse_delimiter(&d)
                .map_err(|e| CliError::Config(format!("`input.delimiter`: {}", e)))?,
            (None, None) => b',',
        };

        let defaults = ColumnMapping::default();
        let mapping = ColumnMapping {
            element_a: columns.element_a.unwrap_or(defaults.element_a),
            element_b: columns.element_b.unwrap_or(defaults.element_b),
            stability: columns.stability.unwrap_or(defaults.stability),
            group: columns.group.or(defaults.group),
            features: columns.features.unwrap_or(defaults.features),
        };

        Ok(core_config::DataConfig {
            columns: mapping,
            delimiter,
            subsample: common.subsample.or(input.subsample),
            seed: input.seed.unwrap_or(0),
        })
    }

    fn merge_conversion(&mut self, common: &CommonArgs) -> Result<core_config::ConversionConfig> {
        let conversion = self.conversion.take().unwrap_or_default();
        let formula_pairs = match conversion.formula_pairs {
            Some(pairs) => parser::parse_formula_pairs(&pairs.join(","))
                .map_err(|e| CliError::Config(format!("`conversion.formula-pairs`: {}", e)))?,
            None => core_config::DEFAULT_FORMULA_PAIRS,
        };
        let drop_noble_gases = if common.keep_noble_gases {
            false
        } else {
            conversion.drop_noble_gases.unwrap_or(true)
        };
        Ok(core_config::ConversionConfig::new(
            formula_pairs,
            drop_noble_gases,
        )?)
    }

    fn merge_features(&mut self, common: &CommonArgs) -> Result<FeatureSelection> {
        let features = self.features.take().unwrap_or_default();
        let defaults = core_config::ElementPropertyConfig::default();

        let stoichiometry = match features.stoichiometry {
            Some(p_list) if p_list.is_empty() => None,
            Some(p_list) => Some(p_list),
            None => core_config::FeatureSetConfig::default().stoichiometry,
        };
        let element_property = if features.element_property.unwrap_or(true) {
            Some(core_config::ElementPropertyConfig {
                properties: features.properties.unwrap_or(defaults.properties),
                stats: features.stats.unwrap_or(defaults.stats),
            })
        } else {
            None
        };

        let api_key_file = common.api_key_file.clone().or(features.api_key_file);
        let table = common
            .formation_energies
            .clone()
            .or(features.formation_energies);
        let requested = common.api_key_file.is_some() || common.formation_energies.is_some();
        let cohesive_energy = features.cohesive_energy.unwrap_or(requested);

        let formation_energies = if !cohesive_energy {
            FormationEnergySetting::Disabled
        } else if let Some(path) = common.formation_energies.clone() {
            FormationEnergySetting::Table(path)
        } else if let Some(api_key_file) = api_key_file {
            FormationEnergySetting::MaterialsProject { api_key_file }
        } else if let Some(path) = table {
            FormationEnergySetting::Table(path)
        } else {
            return Err(CliError::Config(
                "`features.cohesive-energy` requires either `formation-energies` or `api-key-file`."
                    .to_string(),
            ));
        };

        Ok(FeatureSelection {
            features: core_config::FeatureSetConfig {
                stoichiometry,
                element_property,
                cohesive_energy,
            },
            formation_energies,
        })
    }

    fn apply_set_values(&mut self, set_values: &[String]) -> Result<()> {
        for kv_pair in set_values {
            let (key, value_str) = kv_pair.split_once('=').ok_or_else(|| {
                CliError::Config(format!(
                    "Invalid --set format: '{}'. Expected KEY=VALUE.",
                    kv_pair
                ))
            })?;
            let key = key.trim();

            match key {
                "input.delimiter" => {
                    self.input.get_or_insert_with(Default::default).delimiter =
                        Some(value_str.to_string());
                }
                "input.subsample" => {
                    self.input.get_or_insert_with(Default::default).subsample =
                        Some(parse_value(key, value_str, "integer")?);
                }
                "input.seed" => {
                    self.input.get_or_insert_with(Default::default).seed =
                        Some(parse_value(key, value_str, "integer")?);
                }
                "columns.element-a" => {
                    self.columns.get_or_insert_with(Default::default).element_a =
                        Some(value_str.to_string());
                }
                "columns.element-b" => {
                    self.columns.get_or_insert_with(Default::default).element_b =
                        Some(value_str.to_string());
                }
                "columns.stability" => {
                    self.columns.get_or_insert_with(Default::default).stability =
                        Some(value_str.to_string());
                }
                "columns.group" => {
                    self.columns.get_or_insert_with(Default::default).group =
                        Some(value_str.to_string());
                }
                "conversion.formula-pairs" => {
                    self.conversion
                        .get_or_insert_with(Default::default)
                        .formula_pairs =
                        Some(value_str.split(',').map(|s| s.trim().to_string()).collect());
                }
                "conversion.drop-noble-gases" => {
                    self.conversion
                        .get_or_insert_with(Default::default)
                        .drop_noble_gases = Some(parse_value(key, value_str, "boolean")?);
                }
                "features.stoichiometry" => {
                    let p_list = value_str
                        .split(',')
                        .filter(|s| !s.trim().is_empty())
                        .map(|s| parse_value(key, s, "integer"))
                        .collect::<Result<Vec<u32>>>()?;
                    self.features.get_or_insert_with(Default::default).stoichiometry =
                        Some(p_list);
                }
                "features.element-property" => {
                    self.features
                        .get_or_insert_with(Default::default)
                        .element_property = Some(parse_value(key, value_str, "boolean")?);
                }
                "features.cohesive-energy" => {
                    self.features
                        .get_or_insert_with(Default::default)
                        .cohesive_energy = Some(parse_value(key, value_str, "boolean")?);
                }
                "evaluation.n-splits" => {
                    self.evaluation.get_or_insert_with(Default::default).n_splits =
                        Some(parse_value(key, value_str, "integer")?);
                }
                "evaluation.oversample" => {
                    self.evaluation
                        .get_or_insert_with(Default::default)
                        .oversample = Some(parse_value(key, value_str, "boolean")?);
                }
                "evaluation.seed" => {
                    self.evaluation.get_or_insert_with(Default::default).seed =
                        Some(parse_value(key, value_str, "integer")?);
                }
                "evaluation.workers" => {
                    self.evaluation.get_or_insert_with(Default::default).workers =
                        Some(parse_value(key, value_str, "integer")?);
                }
                "training.oversample" => {
                    self.training.get_or_insert_with(Default::default).oversample =
                        Some(parse_value(key, value_str, "boolean")?);
                }
                "training.seed" => {
                    self.training.get_or_insert_with(Default::default).seed =
                        Some(parse_value(key, value_str, "integer")?);
                }
                "prediction.output-column" => {
                    self.prediction
                        .get_or_insert_with(Default::default)
                        .output_column = Some(value_str.to_string());
                }
                _ => {
                    return Err(CliError::Config(format!(
                        "Unsupported configuration key for --set: '{}'",
                        key
                    )));
                }
            }
        }
        Ok(())
    }
}
